// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Structs, traits, and functions for defining and running a set of scripted
//! operations.

use std::{
    collections::HashMap,
    io::{Read, Write},
};

use anyhow::Context as _;
use camino::Utf8Path;
use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

use crate::ui::{PlainUi, ProgressUi, Ui};

const PROGRESS_TICK_INTERVAL: std::time::Duration =
    std::time::Duration::from_millis(100);

type StepFn = dyn Fn(&mut Context, &dyn Ui) -> anyhow::Result<()>;

/// A step in a scripted procedure.
pub struct ScriptStep {
    /// A descriptive label for this procedure step.
    label: String,

    /// The function to execute to run this procedure step.
    func: Box<StepFn>,

    /// A list of commands that this step expects to launch via
    /// `[std::process::Command]`. The script runner uses these to check for
    /// missing dependencies before running the script.
    prereq_commands: Vec<&'static str>,
}

impl ScriptStep {
    pub fn new(
        label: impl Into<String>,
        func: impl Fn(&mut Context, &dyn Ui) -> anyhow::Result<()> + 'static,
    ) -> Self {
        Self {
            label: label.into(),
            func: Box::new(func),
            prereq_commands: Vec::new(),
        }
    }

    pub fn with_prereqs(
        label: impl Into<String>,
        func: impl Fn(&mut Context, &dyn Ui) -> anyhow::Result<()> + 'static,
        commands: &[&'static str],
    ) -> Self {
        Self {
            label: label.into(),
            func: Box::new(func),
            prereq_commands: commands.to_vec(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn prereq_commands(&self) -> &[&'static str] {
        self.prereq_commands.as_slice()
    }
}

/// Prerequisites a script found wanting before it ran. Errors abort the run;
/// warnings are printed and the run continues.
#[derive(Default)]
pub struct MissingPrerequisites {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl MissingPrerequisites {
    pub fn from_messages(errors: Vec<String>, warnings: Vec<String>) -> Self {
        Self { errors, warnings }
    }
}

/// Implemented by objects that can be used as scripts.
pub trait Script {
    /// Yields a slice of steps that can be executed to run this script.
    fn steps(&self) -> &[ScriptStep];

    fn print_configuration(
        &self,
        w: Box<dyn std::io::Write>,
    ) -> std::io::Result<()>;

    fn check_prerequisites(&self) -> MissingPrerequisites;

    /// Yields a `HashMap` that contains key-value pairs that should be
    /// inserted into the script's `[Context]` prior to running it.
    fn initial_context(&self) -> HashMap<String, String>;
}

struct StepAndProgress<'a> {
    step: &'a ScriptStep,
    bar: ProgressBar,
}

/// Runs a script, pretty-printing its various labels and the outcomes of
/// each step. The first failing step aborts the whole run.
pub fn run_script(
    script: Box<dyn Script>,
    interactive: bool,
    work_dir: &Utf8Path,
) -> anyhow::Result<()> {
    std::fs::create_dir_all(work_dir)
        .with_context(|| format!("creating working directory {work_dir}"))?;

    script.print_configuration(Box::new(std::io::stdout()))?;
    println!();

    let prereqs = script.check_prerequisites();
    for warning in prereqs.warnings.iter() {
        println!("{} {}", "warning:".yellow().bold(), warning);
    }

    if !prereqs.errors.is_empty() {
        let s = "Some prerequisites were not satisfied:".bold();
        println!("{}", s);

        for unsatisfied in prereqs.errors.iter() {
            println!("  {}", unsatisfied);
        }

        println!();
        anyhow::bail!("some script prerequisites weren't satisfied");
    }

    if interactive {
        println!("Press Enter to continue or CTRL-C to cancel.");
        std::io::stdout().flush()?;
        std::io::stdin().read(&mut [0u8])?;
    }

    let mut ctx = Context::new(script.initial_context());
    let multi = interactive.then_some(MultiProgress::new());

    let steps_with_progress: Vec<StepAndProgress> = script
        .steps()
        .iter()
        .map(|step| {
            let bar = if let Some(multi) = &multi {
                multi.add(ProgressBar::new_spinner())
            } else {
                ProgressBar::hidden()
            };

            bar.set_message(step.label().to_owned());
            bar.set_style(
                ProgressStyle::with_template("  {msg:.dim}").unwrap(),
            );
            bar.tick();
            StepAndProgress { step, bar }
        })
        .collect();

    for StepAndProgress { step, bar } in steps_with_progress {
        bar.set_style(ProgressStyle::default_spinner());
        bar.enable_steady_tick(PROGRESS_TICK_INTERVAL);

        let result = if interactive {
            let ui = ProgressUi::new(&bar, step.label());
            (step.func)(&mut ctx, &ui)
        } else {
            println!("{}", step.label().bold());
            (step.func)(&mut ctx, &PlainUi)
        };

        match result {
            Ok(()) => {
                bar.set_message(step.label().to_owned());
                bar.set_style(
                    ProgressStyle::with_template("✓ {msg:.green}").unwrap(),
                );
                bar.finish();
            }
            Err(e) => {
                bar.set_style(
                    ProgressStyle::with_template("⚠ {msg:.bold.red}").unwrap(),
                );
                bar.finish();
                return Err(e);
            }
        }
    }

    Ok(())
}

/// A shared script execution context, provided to each step in a running
/// script. Each context contains a key-value store that individual steps can
/// use to pass values to future steps. The `[Script]` trait's
/// `initial_context` function allows each script to populate the store
/// before the script executes.
pub struct Context {
    vars: HashMap<String, String>,
}

impl Context {
    pub fn new(vars: HashMap<String, String>) -> Self {
        Self { vars }
    }

    /// Gets the value of the supplied `var`, returning `None` if the value
    /// is not in the store.
    pub fn get_var(&self, var: &str) -> Option<&str> {
        self.vars.get(var).map(|v| v.as_str())
    }

    /// Sets the value of the supplied `var` to `value`, returning the old
    /// value if one was present.
    pub fn set_var(&mut self, var: &str, value: String) -> Option<String> {
        self.vars.insert(var.to_owned(), value)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn context_set_var_returns_the_previous_value() {
        let mut ctx = Context::new(HashMap::new());
        assert!(ctx.set_var("work_dir", "/tmp/a".to_string()).is_none());
        assert_eq!(
            ctx.set_var("work_dir", "/tmp/b".to_string()).as_deref(),
            Some("/tmp/a")
        );
        assert_eq!(ctx.get_var("work_dir"), Some("/tmp/b"));
    }

    #[test]
    fn missing_context_vars_read_as_none() {
        let ctx = Context::new(HashMap::new());
        assert_eq!(ctx.get_var("image_size"), None);
    }
}

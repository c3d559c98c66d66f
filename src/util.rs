// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Utility functions shared by multiple script steps.

use std::process::{Command, Output};

use crate::runner::ScriptStep;
use crate::ui::Ui;

/// Runs a `Command` and returns its output. Returns `Err` if the command's
/// exit status indicates that it failed.
pub fn run_command_check_status(
    cmd: &mut Command,
    ui: &dyn Ui,
) -> anyhow::Result<Output> {
    ui.set_substep(&format!("executing: {:?}", cmd));
    let output = cmd.output()?;
    if !output.status.success() {
        anyhow::bail!(
            "'{}' returned non-success exit code: {:?}",
            cmd.get_program().to_string_lossy(),
            output
        );
    }

    Ok(output)
}

/// Checks that every executable named in the supplied steps' prerequisite
/// lists resolves on PATH, returning one message per missing command.
pub fn check_executable_prerequisites(steps: &[ScriptStep]) -> Vec<String> {
    let mut missing = Vec::new();
    let mut seen = std::collections::BTreeSet::new();
    for step in steps {
        for command in step.prereq_commands() {
            if !seen.insert(*command) {
                continue;
            }

            if which::which(command).is_err() {
                missing.push(format!(
                    "command '{}' (needed to {}) not found on PATH",
                    command,
                    step.label()
                ));
            }
        }
    }

    missing
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ui::PlainUi;

    #[test]
    fn successful_command_yields_its_output() {
        let output = run_command_check_status(
            Command::new("sh").args(["-c", "echo generated"]),
            &PlainUi,
        )
        .unwrap();
        assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "generated");
    }

    #[test]
    fn failing_command_is_an_error() {
        let err = run_command_check_status(
            Command::new("sh").args(["-c", "exit 3"]),
            &PlainUi,
        )
        .unwrap_err();
        assert!(err.to_string().contains("non-success exit code"));
    }

    #[test]
    fn reports_each_missing_command_once() {
        let steps = vec![
            ScriptStep::with_prereqs(
                "frob the image",
                |_, _| Ok(()),
                &["quimby-test-no-such-command", "sh"],
            ),
            ScriptStep::with_prereqs(
                "frob it again",
                |_, _| Ok(()),
                &["quimby-test-no-such-command"],
            ),
        ];

        let missing = check_executable_prerequisites(&steps);
        assert_eq!(missing.len(), 1);
        assert!(missing[0].contains("quimby-test-no-such-command"));
        assert!(missing[0].contains("frob the image"));
    }
}

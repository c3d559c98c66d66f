// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Defines the script that renders, builds, and archives a disk image for
//! each selected Ubuntu release.

use std::collections::HashMap;
use std::io::Write as _;

use anyhow::{Context as _, Result};
use camino::Utf8PathBuf;
use colored::Colorize;
use itertools::Itertools;

use crate::{
    containerfile,
    releases::Release,
    runner::{Context, MissingPrerequisites, Script, ScriptStep},
    steps,
    ui::Ui,
    util::check_executable_prerequisites,
    SETUP_SCRIPT, SETUP_SCRIPT_NAME,
};

pub struct GenerateImagesArgs {
    pub work_dir: Utf8PathBuf,
    pub releases: Vec<&'static Release>,
    pub image_size: String,
}

pub struct GenerateImagesScript {
    steps: Vec<ScriptStep>,
    args: GenerateImagesArgs,
}

impl GenerateImagesScript {
    pub fn new(args: GenerateImagesArgs) -> Self {
        Self { steps: get_script(&args.releases), args }
    }
}

impl Script for GenerateImagesScript {
    fn steps(&self) -> &[ScriptStep] {
        self.steps.as_slice()
    }

    fn print_configuration(
        &self,
        mut w: Box<dyn std::io::Write>,
    ) -> std::io::Result<()> {
        writeln!(
            w,
            "Generating Ubuntu guest disk images with these options:\n"
        )?;

        let args = &self.args;
        writeln!(w, "  {}: {}", "Working directory".bold(), args.work_dir)?;
        writeln!(w, "  {}: {}", "Image size".bold(), args.image_size)?;
        writeln!(
            w,
            "  {}: {}",
            "Releases".bold(),
            args.releases
                .iter()
                .map(|release| format!(
                    "{} ({})",
                    release.version, release.codename
                ))
                .join(", ")
        )?;

        Ok(())
    }

    fn check_prerequisites(&self) -> MissingPrerequisites {
        MissingPrerequisites::from_messages(
            check_executable_prerequisites(self.steps()),
            Vec::new(),
        )
    }

    fn initial_context(&self) -> HashMap<String, String> {
        let args = &self.args;
        [
            ("work_dir".to_string(), args.work_dir.to_string()),
            ("image_size".to_string(), args.image_size.clone()),
        ]
        .into_iter()
        .collect()
    }
}

fn work_dir(ctx: &Context) -> Utf8PathBuf {
    Utf8PathBuf::from(ctx.get_var("work_dir").unwrap())
}

fn build_dir(ctx: &Context, release: &Release) -> Utf8PathBuf {
    work_dir(ctx).join(release.version)
}

fn stage_setup_script(ctx: &mut Context, _ui: &dyn Ui) -> Result<()> {
    // podman wants an absolute path on the host side of the volume mapping,
    // so resolve the working directory once here for every release to share.
    let shared_dir = work_dir(ctx)
        .canonicalize_utf8()
        .context("resolving the working directory for the shared mount")?;

    let script = shared_dir.join(SETUP_SCRIPT_NAME);
    std::fs::write(&script, SETUP_SCRIPT)
        .with_context(|| format!("writing {script}"))?;

    // The containers invoke it straight off the shared mount.
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755))
        .with_context(|| format!("marking {script} executable"))?;

    ctx.set_var("shared_dir", shared_dir.into_string());
    Ok(())
}

fn render_build_file(
    release: &'static Release,
    ctx: &mut Context,
    ui: &dyn Ui,
) -> Result<()> {
    let build_dir = build_dir(ctx, release);
    std::fs::create_dir_all(&build_dir)
        .with_context(|| format!("creating build directory {build_dir}"))?;

    let build_file = build_dir.join("Dockerfile");
    ui.set_substep(&format!("writing {build_file}"));

    let image_size = ctx.get_var("image_size").unwrap().to_owned();
    std::fs::write(&build_file, containerfile::render(release, &image_size))
        .with_context(|| format!("writing {build_file}"))?;

    Ok(())
}

fn build_container_image(
    release: &'static Release,
    ctx: &mut Context,
    ui: &dyn Ui,
) -> Result<()> {
    steps::build_container_image(release, &build_dir(ctx, release), ui)
}

fn remove_build_dir(
    release: &'static Release,
    ctx: &mut Context,
    _ui: &dyn Ui,
) -> Result<()> {
    let build_dir = build_dir(ctx, release);
    std::fs::remove_dir_all(&build_dir)
        .with_context(|| format!("removing build directory {build_dir}"))
}

fn generate_disk_image(
    release: &'static Release,
    ctx: &mut Context,
    ui: &dyn Ui,
) -> Result<()> {
    let shared_dir = Utf8PathBuf::from(ctx.get_var("shared_dir").unwrap());
    steps::generate_disk_image(release, &shared_dir, ui)
}

fn archive_disk_image(
    release: &'static Release,
    ctx: &mut Context,
    ui: &dyn Ui,
) -> Result<()> {
    steps::archive_disk_image(release, &work_dir(ctx), ui)
}

fn get_script(releases: &[&'static Release]) -> Vec<ScriptStep> {
    let mut script =
        vec![ScriptStep::new("stage guest setup script", stage_setup_script)];

    for release in releases {
        let release = *release;
        script.push(ScriptStep::new(
            format!("render build file for Ubuntu {}", release.version),
            move |ctx, ui| render_build_file(release, ctx, ui),
        ));
        script.push(ScriptStep::with_prereqs(
            format!(
                "build image generator container for Ubuntu {}",
                release.version
            ),
            move |ctx, ui| build_container_image(release, ctx, ui),
            &["podman"],
        ));
        script.push(ScriptStep::new(
            format!("remove build directory for Ubuntu {}", release.version),
            move |ctx, ui| remove_build_dir(release, ctx, ui),
        ));
        script.push(ScriptStep::with_prereqs(
            format!(
                "generate disk image for Ubuntu {} (privileged container)",
                release.version
            ),
            move |ctx, ui| generate_disk_image(release, ctx, ui),
            &["podman"],
        ));
        script.push(ScriptStep::with_prereqs(
            format!("archive disk image for Ubuntu {}", release.version),
            move |ctx, ui| archive_disk_image(release, ctx, ui),
            &["tar"],
        ));
    }

    script
}

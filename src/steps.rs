// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The external commands each release's workflow launches. Command
//! construction is kept apart from execution so tests can pin the exact
//! invocations.

use std::process::Command;

use anyhow::Result;
use camino::Utf8Path;

use crate::releases::Release;
use crate::ui::Ui;
use crate::util::run_command_check_status;

/// `podman build` over a release's rendered build directory.
pub fn container_build_command(
    release: &Release,
    build_dir: &Utf8Path,
) -> Command {
    let mut cmd = Command::new("podman");
    cmd.args(["build", "-t", &release.container_tag(), build_dir.as_str()]);
    cmd
}

/// `podman run` for a release's builder container. The container needs
/// `--privileged` to loop-mount the image it populates; the shared directory
/// is where it finds `setup.sh` and deposits the generated image.
pub fn container_run_command(
    release: &Release,
    shared_dir: &Utf8Path,
) -> Command {
    let mut cmd = Command::new("podman");
    cmd.args([
        "run",
        "--privileged",
        "-v",
        &format!("{}:/shared", shared_dir),
        "-t",
        &release.container_tag(),
    ]);
    cmd
}

/// `tar` over a release's generated image. `-S` keeps the archive
/// sparse-aware, and the work dir becomes the process CWD so archive members
/// carry bare file names.
pub fn archive_command(release: &Release, work_dir: &Utf8Path) -> Command {
    let mut cmd = Command::new("tar");
    cmd.args([
        "-Szcf",
        &release.archive_file_name(),
        &release.image_file_name(),
    ])
    .current_dir(work_dir);
    cmd
}

pub fn build_container_image(
    release: &Release,
    build_dir: &Utf8Path,
    ui: &dyn Ui,
) -> Result<()> {
    run_command_check_status(&mut container_build_command(release, build_dir), ui)
        .map(|_| ())
}

pub fn generate_disk_image(
    release: &Release,
    shared_dir: &Utf8Path,
    ui: &dyn Ui,
) -> Result<()> {
    run_command_check_status(&mut container_run_command(release, shared_dir), ui)
        .map(|_| ())
}

pub fn archive_disk_image(
    release: &Release,
    work_dir: &Utf8Path,
    ui: &dyn Ui,
) -> Result<()> {
    run_command_check_status(&mut archive_command(release, work_dir), ui)
        .map(|_| ())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::releases::{resolve, RELEASES};

    fn argv(cmd: &Command) -> Vec<String> {
        std::iter::once(cmd.get_program())
            .chain(cmd.get_args())
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn container_build_invocation() {
        let precise = &RELEASES[0];
        let cmd =
            container_build_command(precise, Utf8Path::new("/work/12.04"));
        assert_eq!(
            argv(&cmd),
            ["podman", "build", "-t", "gen-ubuntu1204-image", "/work/12.04"]
        );
    }

    #[test]
    fn container_run_invocation_is_privileged_and_shares_the_work_dir() {
        let jammy = resolve(&["jammy".to_string()]).unwrap()[0];
        let cmd = container_run_command(jammy, Utf8Path::new("/work"));
        assert_eq!(
            argv(&cmd),
            [
                "podman",
                "run",
                "--privileged",
                "-v",
                "/work:/shared",
                "-t",
                "gen-ubuntu2204-image",
            ]
        );
    }

    #[test]
    fn archive_invocation_is_sparse_aware_and_rooted_in_the_work_dir() {
        let precise = &RELEASES[0];
        let cmd = archive_command(precise, Utf8Path::new("/work"));
        assert_eq!(
            argv(&cmd),
            [
                "tar",
                "-Szcf",
                "out_of_tree_ubuntu_12__04.img.tar.gz",
                "out_of_tree_ubuntu_12__04.img",
            ]
        );
        assert_eq!(
            cmd.get_current_dir(),
            Some(std::path::Path::new("/work"))
        );
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! quimby: batch-builds Ubuntu root disk images for QEMU-backed test rigs.

use app::{App, Command};
use clap::Parser;

/// The name under which the guest setup script is staged into the working
/// directory; the generated build files invoke it by this name off the
/// shared mount.
pub const SETUP_SCRIPT_NAME: &str = "setup.sh";

/// The guest setup script itself, shipped with the tool.
pub const SETUP_SCRIPT: &str = include_str!("../setup/setup.sh");

#[cfg(not(target_os = "linux"))]
compile_error!("only Linux targets are supported");

pub mod app;
pub mod containerfile;
pub mod generate_images;
pub mod releases;
pub mod runner;
pub mod steps;
pub mod ui;
pub mod util;

fn main() -> anyhow::Result<()> {
    let app = App::parse();
    let interactive = match app.interactive {
        Some(val) => val,
        None => atty::is(atty::Stream::Stdout),
    };

    match &app.command {
        Command::ListReleases => {
            releases::print_releases(&mut std::io::stdout())?;
            Ok(())
        }
        Command::GenerateImages { args } => {
            let script = app.generate_script(args)?;
            runner::run_script(script, interactive, &app.work_dir)
        }
    }
}

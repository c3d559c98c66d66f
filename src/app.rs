// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};

use crate::generate_images::{GenerateImagesArgs, GenerateImagesScript};
use crate::releases;
use crate::runner::Script;

#[derive(Parser)]
pub struct App {
    /// The directory in which to render build files and collect generated
    /// images and archives.
    #[arg(long, default_value = ".")]
    pub work_dir: Utf8PathBuf,

    /// Forces the tool to run in an interactive or non-interactive mode. If
    /// not set, the tool infers whether to run interactively from whether it
    /// is running in an interactive terminal.
    #[arg(long, default_value = Option::None)]
    pub interactive: Option<bool>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Builds a root disk image and its compressed archive for each selected
    /// Ubuntu release.
    GenerateImages {
        #[command(flatten)]
        args: GenerateArgs,
    },

    /// Lists the Ubuntu releases this tool can generate images for.
    ListReleases,
}

#[derive(Args, Clone)]
pub struct GenerateArgs {
    /// Limits generation to the named releases, given by version ("22.04")
    /// or codename ("jammy"). May be repeated. Defaults to every supported
    /// release.
    #[arg(long = "release")]
    pub releases: Vec<String>,

    /// The size of each generated disk image, in qemu-img size syntax.
    #[arg(long, default_value = "2G")]
    pub image_size: String,
}

impl App {
    /// Builds the script for the generate-images command.
    pub fn generate_script(
        &self,
        args: &GenerateArgs,
    ) -> anyhow::Result<Box<dyn Script>> {
        let releases = releases::resolve(&args.releases)?;
        Ok(Box::new(GenerateImagesScript::new(GenerateImagesArgs {
            work_dir: self.work_dir.clone(),
            releases,
            image_size: args.image_size.clone(),
        })))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        App::command().debug_assert();
    }

    #[test]
    fn release_flag_may_be_repeated() {
        let app = App::parse_from([
            "quimby",
            "--work-dir",
            "/tmp/images",
            "generate-images",
            "--release",
            "jammy",
            "--release",
            "16.04",
        ]);

        let Command::GenerateImages { args } = app.command else {
            panic!("expected the generate-images subcommand");
        };
        assert_eq!(args.releases, ["jammy", "16.04"]);
        assert_eq!(args.image_size, "2G");
    }

    #[test]
    fn unknown_release_fails_script_construction() {
        let app = App::parse_from([
            "quimby",
            "generate-images",
            "--release",
            "warty",
        ]);

        let Command::GenerateImages { args } = &app.command else {
            panic!("expected the generate-images subcommand");
        };
        assert!(app.generate_script(args).is_err());
    }
}

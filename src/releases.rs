// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The table of Ubuntu releases this tool can build images for, along with
//! the identifiers derived from each release's version string.

use anyhow::{bail, Result};
use itertools::Itertools;

/// An Ubuntu release the tool knows how to build an image for.
#[derive(Debug)]
pub struct Release {
    /// The numbered version, e.g. "22.04".
    pub version: &'static str,

    /// The release's code name, e.g. "jammy". debootstrap selects its suite
    /// by this name.
    pub codename: &'static str,

    /// The package mirror debootstrap fetches from. Releases past their end
    /// of life live on the old-releases archive.
    pub mirror: &'static str,
}

pub const RELEASES: &[Release] = &[
    Release {
        version: "12.04",
        codename: "precise",
        mirror: "http://old-releases.ubuntu.com/ubuntu",
    },
    Release {
        version: "14.04",
        codename: "trusty",
        mirror: "http://archive.ubuntu.com/ubuntu",
    },
    Release {
        version: "16.04",
        codename: "xenial",
        mirror: "http://archive.ubuntu.com/ubuntu",
    },
    Release {
        version: "18.04",
        codename: "bionic",
        mirror: "http://archive.ubuntu.com/ubuntu",
    },
    Release {
        version: "20.04",
        codename: "focal",
        mirror: "http://archive.ubuntu.com/ubuntu",
    },
    Release {
        version: "22.04",
        codename: "jammy",
        mirror: "http://archive.ubuntu.com/ubuntu",
    },
    Release {
        version: "24.04",
        codename: "noble",
        mirror: "http://archive.ubuntu.com/ubuntu",
    },
];

impl Release {
    /// The version with its dots removed, e.g. "2204". Tags the per-release
    /// builder container.
    pub fn numeric_version(&self) -> String {
        self.version.replace('.', "")
    }

    /// The version with dots replaced by double underscores, e.g. "22__04".
    /// Appears in generated image file names.
    pub fn image_version(&self) -> String {
        self.version.replace('.', "__")
    }

    /// The tag given to the container image that generates this release's
    /// disk image.
    pub fn container_tag(&self) -> String {
        format!("gen-ubuntu{}-image", self.numeric_version())
    }

    /// The name of the raw disk image the builder container writes into the
    /// shared directory. Downstream consumers fetch images by exactly this
    /// name, so it is a contract rather than a style choice.
    pub fn image_file_name(&self) -> String {
        format!("out_of_tree_ubuntu_{}.img", self.image_version())
    }

    /// The name of the compressed archive produced from the disk image.
    pub fn archive_file_name(&self) -> String {
        format!("{}.tar.gz", self.image_file_name())
    }
}

/// Resolves user-supplied release names (versions or codenames) to table
/// entries. An empty selection selects every release.
pub fn resolve(names: &[String]) -> Result<Vec<&'static Release>> {
    if names.is_empty() {
        return Ok(RELEASES.iter().collect());
    }

    let mut selected = Vec::new();
    for name in names {
        match RELEASES.iter().find(|release| {
            release.version == name.as_str() || release.codename == name.as_str()
        }) {
            Some(release) => selected.push(release),
            None => bail!(
                "unknown release '{}' (expected one of: {})",
                name,
                RELEASES
                    .iter()
                    .map(|release| format!(
                        "{} ({})",
                        release.version, release.codename
                    ))
                    .join(", ")
            ),
        }
    }

    Ok(selected)
}

/// Writes the release table, one entry per line.
pub fn print_releases(w: &mut impl std::io::Write) -> std::io::Result<()> {
    for release in RELEASES {
        writeln!(
            w,
            "{:<7} {:<8} {}",
            release.version, release.codename, release.mirror
        )?;
    }

    Ok(())
}

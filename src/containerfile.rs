// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The container build file rendered for each release, and its per-release
//! substitutions.

use crate::releases::Release;

// The build container does the actual image generation in its CMD:
// debootstrap a root filesystem, run the shared setup script over it, then
// copy it into a fresh ext4 image through a loop mount. Everything under
// /shared is the host working directory.
const TEMPLATE: &str = r"FROM ubuntu:{version}

ENV DEBIAN_FRONTEND=noninteractive
RUN apt update
RUN apt install -y debootstrap qemu-utils
RUN apt install -y linux-image-generic

ENV TMPDIR=/tmp/ubuntu
ENV IMAGEDIR=/tmp/image
ENV IMAGE=/shared/out_of_tree_ubuntu_{image_version}.img
ENV REPOSITORY={repository}
ENV RELEASE={codename}

RUN mkdir $IMAGEDIR

# Must be executed with --privileged because of /dev/loop
CMD debootstrap --include=openssh-server,policykit-1 \
    $RELEASE $TMPDIR $REPOSITORY && \
    /shared/setup.sh $TMPDIR && \
    qemu-img create $IMAGE {image_size} && \
    mkfs.ext4 -F $IMAGE && \
    mount -o loop $IMAGE $IMAGEDIR && \
    cp -a $TMPDIR/* $IMAGEDIR/ && \
    umount $IMAGEDIR
";

/// Renders the build file for `release`, substituting the release's fields
/// and derived tokens plus the configured disk image size.
pub fn render(release: &Release, image_size: &str) -> String {
    TEMPLATE
        .replace("{version}", release.version)
        .replace("{image_version}", &release.image_version())
        .replace("{repository}", release.mirror)
        .replace("{codename}", release.codename)
        .replace("{image_size}", image_size)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::releases::RELEASES;

    #[test]
    fn substitutes_every_release_correctly() {
        for release in RELEASES {
            let rendered = render(release, "2G");
            assert!(
                rendered.starts_with(&format!("FROM ubuntu:{}", release.version))
            );
            assert!(
                rendered.contains(&format!("ENV RELEASE={}", release.codename))
            );
            assert!(rendered
                .contains(&format!("ENV REPOSITORY={}", release.mirror)));
            assert!(rendered.contains(&format!(
                "ENV IMAGE=/shared/out_of_tree_ubuntu_{}.img",
                release.image_version()
            )));
            assert!(
                !rendered.contains('{'),
                "unsubstituted placeholder in:\n{rendered}"
            );
        }
    }

    #[test]
    fn honors_the_configured_image_size() {
        let rendered = render(&RELEASES[0], "8G");
        assert!(rendered.contains("qemu-img create $IMAGE 8G"));
    }

    #[test]
    fn generated_image_lands_on_the_shared_mount() {
        let rendered = render(&RELEASES[0], "2G");
        assert!(rendered.contains("/shared/setup.sh $TMPDIR"));
        assert!(rendered.contains("ENV IMAGE=/shared/"));
    }
}

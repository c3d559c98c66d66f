// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Step-facing progress reporting.

use indicatif::ProgressBar;

/// Lets a running step surface what it is currently doing without caring how
/// progress is drawn.
pub trait Ui {
    /// Replaces the detail text shown for the current step.
    fn set_substep(&self, substep: &str);
}

/// Spinner-backed UI used for interactive runs.
pub struct ProgressUi<'a> {
    bar: &'a ProgressBar,
    label: &'a str,
}

impl<'a> ProgressUi<'a> {
    pub fn new(bar: &'a ProgressBar, label: &'a str) -> Self {
        Self { bar, label }
    }
}

impl Ui for ProgressUi<'_> {
    fn set_substep(&self, substep: &str) {
        self.bar.set_message(format!("{}: {}", self.label, substep));
    }
}

/// UI for non-interactive runs; substeps go to stdout, one per line.
pub struct PlainUi;

impl Ui for PlainUi {
    fn set_substep(&self, substep: &str) {
        println!("  {substep}");
    }
}

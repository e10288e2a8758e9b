//! Preset histograms used by the diagrams.
//!
//! Each preset is a list of per-bin item counts, ready for
//! [`Histogram::from_array`].

use crate::bins::Histogram;

/// First chi-squared comparison, left histogram.
pub const CHISQR1_LEFT: [usize; 8] = [1, 2, 4, 6, 3, 4, 1, 1];
/// First chi-squared comparison, right histogram.
pub const CHISQR1_RIGHT: [usize; 8] = [1, 2, 3, 5, 4, 6, 2, 1];

/// Second chi-squared comparison, left histogram. Its last bin is empty.
pub const CHISQR2_LEFT: [usize; 8] = [2, 2, 3, 2, 4, 5, 8, 0];
/// Second chi-squared comparison, center histogram.
pub const CHISQR2_CENTER: [usize; 8] = [2, 2, 3, 2, 4, 5, 8, 8];
/// Second chi-squared comparison, right histogram.
pub const CHISQR2_RIGHT: [usize; 8] = [2, 2, 2, 2, 3, 3, 3, 3];

/// A nearly uniform histogram.
pub const ENTROPY_HIGH: [usize; 8] = [3, 4, 3, 3, 3, 4, 3, 3];
/// A bell-shaped histogram.
pub const ENTROPY_MED: [usize; 8] = [1, 2, 4, 7, 7, 4, 2, 1];
/// A histogram dominated by one bin.
pub const ENTROPY_LOW: [usize; 8] = [1, 7, 1, 1, 1, 1, 1, 1];

/// The model distribution of the cross-entropy diagram.
pub const XENTROPY_Q: [usize; 8] = [2, 7, 4, 2, 5, 1, 3, 2];

const PRESETS: &[(&str, &[usize])] = &[
    ("chisqr1.left", &CHISQR1_LEFT),
    ("chisqr1.right", &CHISQR1_RIGHT),
    ("chisqr2.left", &CHISQR2_LEFT),
    ("chisqr2.center", &CHISQR2_CENTER),
    ("chisqr2.right", &CHISQR2_RIGHT),
    ("entropy.high", &ENTROPY_HIGH),
    ("entropy.med", &ENTROPY_MED),
    ("entropy.low", &ENTROPY_LOW),
    ("xentropy.q", &XENTROPY_Q),
];

/// Look up a preset by name, such as `"entropy.med"`.
pub fn dataset(name: &str) -> Option<&'static [usize]> {
    PRESETS
        .iter()
        .find(|(preset, _)| *preset == name)
        .map(|(_, counts)| *counts)
}

/// Names of all presets.
pub fn names() -> impl Iterator<Item = &'static str> {
    PRESETS.iter().map(|(name, _)| *name)
}

/// A new histogram holding the named preset.
pub fn histogram(name: &str) -> Option<Histogram> {
    dataset(name).map(Histogram::from_array)
}

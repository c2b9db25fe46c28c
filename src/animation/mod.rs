//! Animation timing and easing.

pub(crate) mod clock;
pub(crate) mod ease;

//! Settings description and its resolution into pixel geometry.

pub(crate) mod model;
pub(crate) mod presets;
pub(crate) mod resolve;
pub(crate) mod units;

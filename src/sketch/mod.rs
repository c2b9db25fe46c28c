//! The sketch runtime: controller, lifecycle hooks, preload gate and tick scheduling.

pub(crate) mod controller;
pub(crate) mod preload;
pub(crate) mod props;
pub(crate) mod renderer;
pub(crate) mod scheduler;

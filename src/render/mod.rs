//! Render adapter seam and the CPU reference adapter.

pub(crate) mod adapter;
pub(crate) mod raster;

//! Single-frame and sequence export.

pub(crate) mod encode;
pub(crate) mod pipeline;
pub(crate) mod request;

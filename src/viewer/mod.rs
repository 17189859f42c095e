//! 2-D viewer support: the bitmap label font, the numeric formatter and the
//! overlay that renders scale labels into image buffers.

pub mod fonts;
pub mod label;
pub mod overlay;

//! Vector outputs (SVG/DXF) implemented as drawing surfaces.

pub mod dxf;
pub mod svg;

pub use dxf::{DxfError, DxfSurface};
pub use svg::{SvgError, SvgSurface, text_element};

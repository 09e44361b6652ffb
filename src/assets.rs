pub(crate) mod decode;
pub(crate) mod fonts;
pub(crate) mod glyph;
pub(crate) mod loader;
pub(crate) mod svg_raster;

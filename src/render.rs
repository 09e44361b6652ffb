pub(crate) mod background;
pub(crate) mod clock;
pub(crate) mod effects;
pub(crate) mod frame;
pub(crate) mod palette;
pub(crate) mod scene;
pub(crate) mod schedule;
pub(crate) mod surface;
pub(crate) mod text;

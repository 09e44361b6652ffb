pub(crate) mod catalog;
pub(crate) mod color;
pub(crate) mod request;

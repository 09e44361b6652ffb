pub(crate) mod png;

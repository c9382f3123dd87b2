pub(crate) mod decode;
pub(crate) mod overlay;
pub(crate) mod paths;

pub(crate) mod model;
pub(crate) mod template;
pub(crate) mod validate;

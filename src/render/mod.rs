pub(crate) mod cpu;
pub(crate) mod paint;
pub(crate) mod surface;

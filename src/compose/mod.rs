pub(crate) mod pan;
pub(crate) mod placement;

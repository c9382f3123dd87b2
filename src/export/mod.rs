pub(crate) mod archive;
pub(crate) mod batch;
pub(crate) mod encode;
pub(crate) mod naming;
pub(crate) mod telemetry;

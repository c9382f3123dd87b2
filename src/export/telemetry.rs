use std::io::Write as _;
use std::path::PathBuf;

use anyhow::Context as _;

use crate::foundation::error::BrandframeResult;

/// Best-effort notification sent once per export, before any encoding.
///
/// Failures are logged by the exporter and never affect the export itself.
pub trait ExportTelemetry {
    /// Report that `caption` is being exported.
    fn notify(&mut self, caption: &str) -> BrandframeResult<()>;
}

/// Telemetry that does nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoTelemetry;

impl ExportTelemetry for NoTelemetry {
    fn notify(&mut self, _caption: &str) -> BrandframeResult<()> {
        Ok(())
    }
}

/// Appends one `{"name": caption}` JSON document per line to a file.
#[derive(Clone, Debug)]
pub struct JsonLinesTelemetry {
    path: PathBuf,
}

impl JsonLinesTelemetry {
    /// Log into `path`, creating it when missing.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ExportTelemetry for JsonLinesTelemetry {
    fn notify(&mut self, caption: &str) -> BrandframeResult<()> {
        let line = serde_json::to_string(&serde_json::json!({ "name": caption }))
            .context("serialize telemetry record")?;
        let mut f = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("open telemetry log '{}'", self.path.display()))?;
        writeln!(f, "{line}")
            .with_context(|| format!("append telemetry log '{}'", self.path.display()))?;
        Ok(())
    }
}

use rayon::prelude::*;

use crate::export::archive::{ArchiveEntry, ArchiveSink, build_zip};
use crate::export::encode::{ExportImageFormat, encode_surface};
use crate::export::naming::{archive_file_name, format_file_name, sanitize_caption_prefix};
use crate::export::telemetry::ExportTelemetry;
use crate::foundation::core::FormatId;
use crate::foundation::error::{BrandframeError, BrandframeResult};
use crate::render::surface::RenderedSurface;

/// Characters kept from the caption when naming exported files.
pub const DEFAULT_PREFIX_CHARS: usize = 30;

/// File-name stem used when the caption yields nothing usable.
pub const DEFAULT_FILE_NAME: &str = "graphic";

/// What one export produced.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExportReport {
    /// Name handed to the archive sink.
    pub archive_name: String,
    /// Size of the archive in bytes.
    pub archive_bytes: usize,
    /// Files inside the archive, in format order.
    pub files: Vec<String>,
    /// Formats without a render target.
    pub skipped: Vec<FormatId>,
    /// Formats whose encode failed, with the error message.
    pub failed: Vec<(FormatId, String)>,
}

/// Encodes every exportable format in parallel and bundles the results into one archive.
#[derive(Clone, Debug)]
pub struct BatchExporter {
    format: ExportImageFormat,
    prefix_chars: usize,
    default_name: String,
    archive_prefix: Option<String>,
}

impl Default for BatchExporter {
    fn default() -> Self {
        Self {
            format: ExportImageFormat::default(),
            prefix_chars: DEFAULT_PREFIX_CHARS,
            default_name: DEFAULT_FILE_NAME.to_string(),
            archive_prefix: None,
        }
    }
}

impl BatchExporter {
    /// Exporter with PNG output and default naming.
    pub fn new() -> Self {
        Self::default()
    }

    /// Image container for every file.
    pub fn with_format(mut self, format: ExportImageFormat) -> Self {
        self.format = format;
        self
    }

    /// Maximum caption characters used in file names.
    pub fn with_prefix_chars(mut self, n: usize) -> Self {
        self.prefix_chars = n;
        self
    }

    /// Stem used when the caption sanitizes to nothing.
    pub fn with_default_name(mut self, name: impl Into<String>) -> Self {
        self.default_name = name.into();
        self
    }

    /// Prefix prepended to the archive name.
    pub fn with_archive_prefix(mut self, prefix: Option<String>) -> Self {
        self.archive_prefix = prefix;
        self
    }

    /// Export `targets` (format id plus its current surface, `None` when it has no render target).
    ///
    /// Encodes run in parallel and are joined before the archive is built. Formats without a
    /// surface are skipped and failed encodes are reported; the sink is only called when at least
    /// one file was encoded.
    #[tracing::instrument(skip_all, fields(targets = targets.len(), format = ?self.format))]
    pub fn export(
        &self,
        caption: &str,
        targets: &[(FormatId, Option<&RenderedSurface>)],
        telemetry: &mut dyn ExportTelemetry,
        sink: &mut dyn ArchiveSink,
    ) -> BrandframeResult<ExportReport> {
        if let Err(e) = telemetry.notify(caption) {
            tracing::warn!(error = %e, "export telemetry failed");
        }

        let stem = sanitize_caption_prefix(caption, self.prefix_chars, &self.default_name);
        let mut report = ExportReport {
            archive_name: archive_file_name(self.archive_prefix.as_deref(), &stem),
            ..ExportReport::default()
        };

        let mut exportable = Vec::with_capacity(targets.len());
        for (id, surface) in targets {
            match surface {
                Some(s) => exportable.push((id, *s)),
                None => {
                    tracing::warn!(format = %id, "no render target; format skipped");
                    report.skipped.push(id.clone());
                }
            }
        }
        if exportable.is_empty() {
            return Err(BrandframeError::export("no exportable formats"));
        }

        let format = self.format;
        let encoded: Vec<(&FormatId, BrandframeResult<Vec<u8>>)> = exportable
            .par_iter()
            .map(|(id, surface)| (*id, encode_surface(surface, format)))
            .collect();

        let mut entries = Vec::with_capacity(encoded.len());
        for (id, result) in encoded {
            match result {
                Ok(bytes) => entries.push(ArchiveEntry {
                    name: format_file_name(&stem, id, format.extension()),
                    bytes,
                }),
                Err(e) => {
                    tracing::warn!(format = %id, error = %e, "encode failed");
                    report.failed.push((id.clone(), e.to_string()));
                }
            }
        }
        if entries.is_empty() {
            return Err(BrandframeError::export(format!(
                "every format failed to encode ({})",
                report
                    .failed
                    .iter()
                    .map(|(id, e)| format!("{id}: {e}"))
                    .collect::<Vec<_>>()
                    .join("; ")
            )));
        }

        let archive = build_zip(&entries)?;
        report.files = entries.into_iter().map(|e| e.name).collect();
        report.archive_bytes = archive.len();
        sink.save(&report.archive_name, &archive)?;

        tracing::info!(
            archive = %report.archive_name,
            files = report.files.len(),
            skipped = report.skipped.len(),
            failed = report.failed.len(),
            "export finished"
        );
        Ok(report)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/batch.rs"]
mod tests;

//! Branding overlays, decoded once per format and looked up on every render pass.

use std::collections::HashMap;
use std::path::Path;

use rayon::prelude::*;

use crate::assets::decode::{PreparedImage, decode_image_file};
use crate::assets::paths::resolve;
use crate::config::template::TemplateConfig;
use crate::foundation::core::FormatId;
use crate::foundation::error::BrandframeResult;
use crate::render::paint::ImagePaint;

/// What the render pipeline should draw in the overlay layer of one format.
#[derive(Clone, Copy, Debug)]
pub enum OverlayState<'a> {
    /// No overlay configured; the layer is empty.
    NotConfigured,
    /// Overlay configured but no load attempted yet; the layer is empty.
    Pending,
    /// Overlay decoded and ready.
    Loaded(&'a ImagePaint),
    /// Overlay configured but unavailable; a warning border is drawn instead.
    Failed,
}

#[derive(Clone, Debug)]
enum OverlayEntry {
    Loaded(ImagePaint),
    Failed(String),
}

/// Outcome of [`OverlayCache::load_all`]. Loading never fails as a whole.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OverlayLoadReport {
    /// Formats whose overlay decoded successfully.
    pub loaded: Vec<FormatId>,
    /// Formats whose overlay failed, with the reason.
    pub failed: Vec<(FormatId, String)>,
}

/// One decoded overlay per format id.
#[derive(Clone, Debug, Default)]
pub struct OverlayCache {
    entries: HashMap<FormatId, OverlayEntry>,
}

impl OverlayCache {
    /// Empty cache; every configured overlay reads as [`OverlayState::Pending`] until loaded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode every configured overlay under `root`.
    ///
    /// Loads run in parallel and the call returns once every attempt has resolved. A failed load
    /// is logged and recorded; it never aborts the others.
    #[tracing::instrument(skip(configs), fields(formats = configs.len()))]
    pub fn load_all(configs: &[TemplateConfig], root: &Path) -> (Self, OverlayLoadReport) {
        let attempts: Vec<(FormatId, BrandframeResult<ImagePaint>)> = configs
            .par_iter()
            .filter_map(|cfg| cfg.overlay.as_deref().map(|rel| (cfg, rel)))
            .map(|(cfg, rel)| {
                let loaded = decode_image_file(&resolve(root, rel))
                    .and_then(|img| ImagePaint::from_prepared(&img));
                (cfg.id.clone(), loaded)
            })
            .collect();

        let mut cache = Self::new();
        let mut report = OverlayLoadReport::default();
        for (id, result) in attempts {
            match result {
                Ok(paint) => {
                    report.loaded.push(id.clone());
                    cache.entries.insert(id, OverlayEntry::Loaded(paint));
                }
                Err(e) => {
                    tracing::warn!(format = %id, error = %e, "overlay failed to load");
                    report.failed.push((id.clone(), e.to_string()));
                    cache.entries.insert(id, OverlayEntry::Failed(e.to_string()));
                }
            }
        }
        tracing::info!(
            loaded = report.loaded.len(),
            failed = report.failed.len(),
            "overlays resolved"
        );
        (cache, report)
    }

    /// Register an already decoded overlay for `id`.
    pub fn insert(&mut self, id: FormatId, image: &PreparedImage) -> BrandframeResult<()> {
        let paint = ImagePaint::from_prepared(image)?;
        self.entries.insert(id, OverlayEntry::Loaded(paint));
        Ok(())
    }

    /// Decoded overlay for `id`, if any.
    pub fn get(&self, id: &FormatId) -> Option<&ImagePaint> {
        match self.entries.get(id) {
            Some(OverlayEntry::Loaded(p)) => Some(p),
            _ => None,
        }
    }

    /// Failure reason recorded for `id`, if its load failed.
    pub fn failure(&self, id: &FormatId) -> Option<&str> {
        match self.entries.get(id) {
            Some(OverlayEntry::Failed(reason)) => Some(reason),
            _ => None,
        }
    }

    /// Overlay layer state for `cfg`.
    pub fn state(&self, cfg: &TemplateConfig) -> OverlayState<'_> {
        match (self.entries.get(&cfg.id), &cfg.overlay) {
            (Some(OverlayEntry::Loaded(paint)), _) => OverlayState::Loaded(paint),
            (Some(OverlayEntry::Failed(_)), Some(_)) => OverlayState::Failed,
            (_, Some(_)) => OverlayState::Pending,
            (_, None) => OverlayState::NotConfigured,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/overlay.rs"]
mod tests;

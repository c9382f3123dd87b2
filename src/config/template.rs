//! Immutable format descriptors and the ordered registry that holds them.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::assets::paths::normalize_rel_path;
use crate::config::model::{RegistryDef, TemplateDef};
use crate::config::validate::validate_registry;
use crate::foundation::core::{FormatId, Point};
use crate::foundation::error::{BrandframeError, BrandframeResult};

/// Factor turning a point-based font size into the pixel unit used for line spacing.
pub const LINE_UNIT_PER_POINT: f32 = 1.33;

/// CSS conversion from points to pixels, used for the glyph size itself.
pub const PX_PER_POINT: f32 = 4.0 / 3.0;

/// Line height multiplier used when a format does not declare one.
pub const DEFAULT_LINE_HEIGHT: f32 = 1.2;

const TRAINING_PRESET_JSON: &str = include_str!("../../presets/training.json");

/// Caption rules for a format that renders text.
#[derive(Clone, Debug, PartialEq)]
pub struct TextRules {
    /// Font size in points.
    pub font_size_pt: f32,
    /// Multiplier applied on top of the point-to-pixel line unit.
    pub line_height: f32,
    /// Maximum number of lines drawn; more lines raise the overflow flag.
    pub max_lines: usize,
    /// Top-left anchor of the first line.
    pub origin: Point,
    /// Width a line must stay strictly below.
    pub max_width_px: f32,
}

impl TextRules {
    /// Glyph size in pixels.
    pub fn font_px(&self) -> f32 {
        self.font_size_pt * PX_PER_POINT
    }

    /// Vertical distance between consecutive line origins.
    pub fn line_step_px(&self) -> f64 {
        f64::from(self.font_size_pt * LINE_UNIT_PER_POINT * self.line_height)
    }
}

/// One output format: geometry, optional overlay and optional caption rules.
#[derive(Clone, Debug, PartialEq)]
pub struct TemplateConfig {
    /// Unique id, also used in exported file names.
    pub id: FormatId,
    /// Display label.
    pub name: String,
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Height (from the top) that the photo must cover.
    pub photo_area: u32,
    /// Normalized path of the branding overlay, relative to the assets root.
    pub overlay: Option<String>,
    /// Caption rules; `None` for formats without text.
    pub text: Option<TextRules>,
}

impl TemplateConfig {
    /// A text-less format whose photo covers the full height.
    pub fn new(id: impl Into<FormatId>, width: u32, height: u32) -> Self {
        let id = id.into();
        Self {
            name: id.to_string(),
            id,
            width,
            height,
            photo_area: height,
            overlay: None,
            text: None,
        }
    }

    /// Set the display label.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the photo area height.
    pub fn with_photo_area(mut self, photo_area: u32) -> Self {
        self.photo_area = photo_area;
        self
    }

    /// Set the overlay path.
    pub fn with_overlay(mut self, overlay: impl Into<String>) -> Self {
        self.overlay = Some(overlay.into());
        self
    }

    /// Enable captions with the given rules.
    pub fn with_text(mut self, rules: TextRules) -> Self {
        self.text = Some(rules);
        self
    }

    /// Whether this format renders a caption.
    pub fn has_text(&self) -> bool {
        self.text.is_some()
    }

    /// Preview header label.
    pub fn label(&self) -> &str {
        &self.name
    }

    /// Preview header dimensions, e.g. `1080x1920`.
    pub fn dimensions_label(&self) -> String {
        format!("{}x{}", self.width, self.height)
    }

    fn from_def(def: &TemplateDef) -> BrandframeResult<Self> {
        let text = if def.has_text {
            let missing = |f: &str| BrandframeError::validation(format!("{}: missing {f}", def.id));
            Some(TextRules {
                font_size_pt: def.font_size.ok_or_else(|| missing("font_size"))?,
                line_height: def.line_height.unwrap_or(DEFAULT_LINE_HEIGHT),
                max_lines: def.max_lines.ok_or_else(|| missing("max_lines"))? as usize,
                origin: Point::new(
                    def.text_x.ok_or_else(|| missing("text_x"))?,
                    def.text_y.ok_or_else(|| missing("text_y"))?,
                ),
                max_width_px: def.max_width.ok_or_else(|| missing("max_width"))?,
            })
        } else {
            None
        };

        Ok(Self {
            id: FormatId::new(def.id.clone()),
            name: def.name.clone().unwrap_or_else(|| def.id.clone()),
            width: def.width,
            height: def.height,
            photo_area: def.photo_area.unwrap_or(def.height),
            overlay: def.overlay.as_deref().map(normalize_rel_path).transpose()?,
            text,
        })
    }

    fn to_def(&self) -> TemplateDef {
        let text = self.text.as_ref();
        TemplateDef {
            id: self.id.to_string(),
            name: Some(self.name.clone()),
            width: self.width,
            height: self.height,
            has_text: text.is_some(),
            photo_area: Some(self.photo_area),
            overlay: self.overlay.clone(),
            font_size: text.map(|t| t.font_size_pt),
            line_height: text.map(|t| t.line_height),
            max_lines: text.map(|t| u32::try_from(t.max_lines).unwrap_or(u32::MAX)),
            text_x: text.map(|t| t.origin.x),
            text_y: text.map(|t| t.origin.y),
            max_width: text.map(|t| t.max_width_px),
        }
    }
}

/// Ordered, validated set of formats. Read once, never mutated.
#[derive(Clone, Debug, PartialEq)]
pub struct TemplateRegistry {
    configs: Vec<TemplateConfig>,
    archive_prefix: Option<String>,
}

impl TemplateRegistry {
    /// Parse and validate a registry from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> BrandframeResult<Self> {
        let def: RegistryDef = serde_json::from_reader(r)
            .map_err(|e| BrandframeError::serde(format!("parse format registry JSON: {e}")))?;
        Self::from_def(&def)
    }

    /// Parse and validate a registry from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> BrandframeResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            BrandframeError::validation(format!("open format registry '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Parse and validate a registry from a JSON string.
    pub fn from_json_str(json: &str) -> BrandframeResult<Self> {
        let def: RegistryDef = serde_json::from_str(json)
            .map_err(|e| BrandframeError::serde(format!("parse format registry JSON: {e}")))?;
        Self::from_def(&def)
    }

    /// Validate programmatically built configs.
    pub fn from_configs(configs: Vec<TemplateConfig>) -> BrandframeResult<Self> {
        let def = RegistryDef {
            formats: configs.iter().map(TemplateConfig::to_def).collect(),
            archive_prefix: None,
        };
        Self::from_def(&def)
    }

    /// The five training-campaign formats (post, square, story, web banner, event page).
    pub fn training_preset() -> BrandframeResult<Self> {
        Self::from_json_str(TRAINING_PRESET_JSON)
    }

    fn from_def(def: &RegistryDef) -> BrandframeResult<Self> {
        validate_registry(def).map_err(|e| {
            BrandframeError::validation(format!("format registry validation failed:\n{e}"))
        })?;
        let configs = def
            .formats
            .iter()
            .map(TemplateConfig::from_def)
            .collect::<BrandframeResult<Vec<_>>>()?;
        Ok(Self {
            configs,
            archive_prefix: def
                .archive_prefix
                .as_deref()
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string),
        })
    }

    /// Formats in declaration order.
    pub fn configs(&self) -> &[TemplateConfig] {
        &self.configs
    }

    /// Look up a format by id.
    pub fn get(&self, id: &FormatId) -> Option<&TemplateConfig> {
        self.configs.iter().find(|c| &c.id == id)
    }

    /// Number of formats.
    pub fn len(&self) -> usize {
        self.configs.len()
    }

    /// Always `false` for a validated registry.
    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }

    /// Prefix prepended to the archive file name, if configured.
    pub fn archive_prefix(&self) -> Option<&str> {
        self.archive_prefix.as_deref()
    }

    /// Replace the archive prefix.
    pub fn with_archive_prefix(mut self, prefix: Option<String>) -> Self {
        self.archive_prefix = prefix;
        self
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/template.rs"]
mod tests;

use std::collections::HashSet;
use std::fmt;

use crate::assets::paths::normalize_rel_path;
use crate::config::model::{RegistryDef, TemplateDef};

/// Largest surface edge the rasterizer accepts.
pub(crate) const MAX_SURFACE_EDGE: u32 = u16::MAX as u32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SchemaPathElem {
    Field(&'static str),
    Index(usize),
}

#[derive(Debug, Clone)]
pub(crate) struct SchemaError {
    pub(crate) path: Vec<SchemaPathElem>,
    pub(crate) message: String,
}

impl SchemaError {
    fn at(path: &[SchemaPathElem], message: impl Into<String>) -> Self {
        Self {
            path: path.to_vec(),
            message: message.into(),
        }
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            return write!(f, "{}", self.message);
        }
        write!(f, "{}: {}", format_path(&self.path), self.message)
    }
}

fn format_path(path: &[SchemaPathElem]) -> String {
    let mut s = String::from("$");
    for p in path {
        match *p {
            SchemaPathElem::Field(name) => {
                s.push('.');
                s.push_str(name);
            }
            SchemaPathElem::Index(i) => {
                s.push('[');
                s.push_str(&i.to_string());
                s.push(']');
            }
        }
    }
    s
}

#[derive(Debug, Clone)]
pub(crate) struct SchemaErrors {
    pub(crate) errors: Vec<SchemaError>,
}

impl fmt::Display for SchemaErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{e}")?;
        }
        Ok(())
    }
}

impl std::error::Error for SchemaErrors {}

pub(crate) fn validate_registry(def: &RegistryDef) -> Result<(), SchemaErrors> {
    let mut errors = Vec::new();
    let mut path = vec![SchemaPathElem::Field("formats")];

    if def.formats.is_empty() {
        errors.push(SchemaError::at(&path, "at least one format is required"));
    }

    let mut seen = HashSet::new();
    for (i, t) in def.formats.iter().enumerate() {
        path.push(SchemaPathElem::Index(i));
        if !t.id.trim().is_empty() && !seen.insert(t.id.as_str()) {
            path.push(SchemaPathElem::Field("id"));
            errors.push(SchemaError::at(
                &path,
                format!("duplicate format id '{}'", t.id),
            ));
            path.pop();
        }
        validate_template(t, &mut path, &mut errors);
        path.pop();
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(SchemaErrors { errors })
    }
}

fn validate_template(t: &TemplateDef, path: &mut Vec<SchemaPathElem>, errors: &mut Vec<SchemaError>) {
    let mut field = |path: &mut Vec<SchemaPathElem>, name: &'static str, msg: String| {
        path.push(SchemaPathElem::Field(name));
        errors.push(SchemaError::at(path, msg));
        path.pop();
    };

    if t.id.trim().is_empty() {
        field(path, "id", "must be non-empty".to_string());
    } else if t.id.contains(['/', '\\'])
        || t.id.contains("..")
        || t.id.chars().any(char::is_control)
    {
        // Ids become file names inside the archive and in render output dirs.
        field(
            path,
            "id",
            format!(
                "'{}' must not contain path separators, '..' or control characters",
                t.id
            ),
        );
    }
    if t.width == 0 || t.width > MAX_SURFACE_EDGE {
        field(path, "width", format!("must be in 1..={MAX_SURFACE_EDGE}"));
    }
    if t.height == 0 || t.height > MAX_SURFACE_EDGE {
        field(path, "height", format!("must be in 1..={MAX_SURFACE_EDGE}"));
    }
    if let Some(area) = t.photo_area
        && (area == 0 || area > t.height)
    {
        field(path, "photo_area", format!("must be in 1..={}", t.height));
    }
    if let Some(overlay) = &t.overlay
        && let Err(e) = normalize_rel_path(overlay)
    {
        field(path, "overlay", e.to_string());
    }

    if !t.has_text {
        return;
    }

    match t.font_size {
        None => field(path, "font_size", "required when has_text".to_string()),
        Some(v) if !v.is_finite() || v <= 0.0 => {
            field(path, "font_size", "must be finite and > 0".to_string())
        }
        Some(_) => {}
    }
    if let Some(v) = t.line_height
        && (!v.is_finite() || v <= 0.0)
    {
        field(path, "line_height", "must be finite and > 0".to_string());
    }
    match t.max_lines {
        None => field(path, "max_lines", "required when has_text".to_string()),
        Some(0) => field(path, "max_lines", "must be >= 1".to_string()),
        Some(_) => {}
    }
    match t.text_x {
        None => field(path, "text_x", "required when has_text".to_string()),
        Some(v) if !v.is_finite() => field(path, "text_x", "must be finite".to_string()),
        Some(_) => {}
    }
    match t.text_y {
        None => field(path, "text_y", "required when has_text".to_string()),
        Some(v) if !v.is_finite() => field(path, "text_y", "must be finite".to_string()),
        Some(_) => {}
    }
    match t.max_width {
        None => field(path, "max_width", "required when has_text".to_string()),
        Some(v) if !v.is_finite() || v <= 0.0 => {
            field(path, "max_width", "must be finite and > 0".to_string())
        }
        Some(_) => {}
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/validate.rs"]
mod tests;

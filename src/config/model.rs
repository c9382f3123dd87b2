use serde::{Deserialize, Serialize};

/// One format as written in the registry JSON.
///
/// The short legacy field names are accepted as aliases so existing configuration files load
/// unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub(crate) struct TemplateDef {
    pub(crate) id: String,
    #[serde(default)]
    pub(crate) name: Option<String>,
    #[serde(alias = "w")]
    pub(crate) width: u32,
    #[serde(alias = "h")]
    pub(crate) height: u32,
    #[serde(default, alias = "hasText")]
    pub(crate) has_text: bool,
    #[serde(default, alias = "photoHeight", alias = "photoArea")]
    pub(crate) photo_area: Option<u32>,
    #[serde(default, alias = "overlayAssetPath")]
    pub(crate) overlay: Option<String>,
    #[serde(default, alias = "fontSize")]
    pub(crate) font_size: Option<f32>,
    #[serde(default, alias = "lineHeight", alias = "lineHeightMultiplier")]
    pub(crate) line_height: Option<f32>,
    #[serde(default, alias = "maxLines")]
    pub(crate) max_lines: Option<u32>,
    #[serde(default, alias = "textX")]
    pub(crate) text_x: Option<f64>,
    #[serde(default, alias = "textY")]
    pub(crate) text_y: Option<f64>,
    #[serde(default, alias = "maxWidth", alias = "maxLineWidthPx")]
    pub(crate) max_width: Option<f32>,
}

/// Whole registry document: either a bare list of formats or an object with extra settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub(crate) struct RegistryDef {
    pub(crate) formats: Vec<TemplateDef>,
    pub(crate) archive_prefix: Option<String>,
}

impl<'de> Deserialize<'de> for RegistryDef {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            List(Vec<TemplateDef>),
            Doc {
                formats: Vec<TemplateDef>,
                #[serde(default)]
                archive_prefix: Option<String>,
            },
        }

        match Repr::deserialize(deserializer)? {
            Repr::List(formats) => Ok(Self {
                formats,
                archive_prefix: None,
            }),
            Repr::Doc {
                formats,
                archive_prefix,
            } => Ok(Self {
                formats,
                archive_prefix,
            }),
        }
    }
}

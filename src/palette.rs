//! Color palette transformation
//!
//! Converts a theme palette document
//!
//! ```xml
//! <s:colorPalette xmlns:s="http://schemas.microsoft.com/sharepoint/">
//!   <s:color name="Accent" value="FF0000" />
//! </s:colorPalette>
//! ```
//!
//! into `{"palette": {"Accent": "#FF0000"}}`. Color values are only prefixed,
//! never validated: a malformed hex value passes through unchanged.

use crate::error::{MigrationError, Result};
use crate::markup::MarkupElement;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const PALETTE_ROOT: &str = "colorPalette";
pub const PALETTE_COLOR: &str = "color";
/// File name of the palette inside the themed stylesheet folder
pub const PALETTE_FILE_NAME: &str = "theme.spcolor";

/// Flat color name to `#`-prefixed hex mapping
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteDocument {
    pub palette: BTreeMap<String, String>,
}

impl PaletteDocument {
    pub fn to_json(&self) -> Result<serde_json::Value> {
        serde_json::to_value(self).map_err(|e| MigrationError::PaletteFormat {
            detail: e.to_string(),
        })
    }
}

fn palette_error(detail: impl Into<String>) -> MigrationError {
    MigrationError::PaletteFormat {
        detail: detail.into(),
    }
}

pub fn transform_palette(xml: &str) -> Result<PaletteDocument> {
    let root = MarkupElement::parse(xml).map_err(|e| palette_error(e.to_string()))?;
    if root.local_name() != PALETTE_ROOT {
        return Err(palette_error(format!(
            "expected a {} root element, found <{}>",
            PALETTE_ROOT, root.name
        )));
    }

    let mut palette = BTreeMap::new();
    for color in root
        .child_elements()
        .filter(|e| e.local_name() == PALETTE_COLOR)
    {
        let name = color
            .attribute("name")
            .ok_or_else(|| palette_error("color entry without a name attribute"))?;
        let value = color
            .attribute("value")
            .ok_or_else(|| palette_error(format!("color '{}' has no value attribute", name)))?;
        palette.insert(name.to_string(), format!("#{}", value));
    }

    Ok(PaletteDocument { palette })
}

/// Strip the site's server-relative URL from its absolute URL, leaving the host part
pub fn remove_site_from_url<'a>(full_url: &'a str, site_url: &str) -> &'a str {
    if full_url.len() >= site_url.len() {
        let split = full_url.len() - site_url.len();
        if let Some(tail) = full_url.get(split..)
            && tail.eq_ignore_ascii_case(site_url)
        {
            return &full_url[..split];
        }
    }
    full_url
}

/// Absolute URL and server-relative path of a workspace's palette file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteLocation {
    pub url: String,
    pub path: String,
}

pub fn palette_location(
    workspace_url: &str,
    server_relative_url: &str,
    themed_css_folder: &str,
) -> PaletteLocation {
    let host = remove_site_from_url(workspace_url.trim_end_matches('/'), server_relative_url);
    let path = format!(
        "{}/{}",
        themed_css_folder.trim_end_matches('/'),
        PALETTE_FILE_NAME
    );
    PaletteLocation {
        url: format!("{}{}", host, path),
        path,
    }
}

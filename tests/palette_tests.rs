//! Palette transformation tests
mod common;

use common::PALETTE_XML;
use serde_json::json;
use site_migrate::palette::*;
use site_migrate::MigrationError;

#[test]
fn test_two_colors_become_palette_json() {
    let doc = transform_palette(PALETTE_XML).unwrap();
    assert_eq!(
        doc.to_json().unwrap(),
        json!({"palette": {"Accent": "#FF0000", "Base": "#003366"}})
    );
}

#[test]
fn test_root_without_prefix_is_accepted() {
    let doc = transform_palette(r#"<colorPalette><color name="Text" value="000000" /></colorPalette>"#)
        .unwrap();
    assert_eq!(doc.palette["Text"], "#000000");
}

#[test]
fn test_empty_palette() {
    let doc = transform_palette(r#"<s:colorPalette xmlns:s="urn:s"></s:colorPalette>"#).unwrap();
    assert_eq!(doc.to_json().unwrap(), json!({"palette": {}}));
}

#[test]
fn test_color_without_value_is_an_error() {
    let err = transform_palette(r#"<s:colorPalette xmlns:s="urn:s"><s:color name="Accent" /></s:colorPalette>"#)
        .unwrap_err();
    assert!(matches!(err, MigrationError::PaletteFormat { .. }));
}

#[test]
fn test_not_markup_is_an_error() {
    assert!(matches!(
        transform_palette("{\"palette\": {}}"),
        Err(MigrationError::PaletteFormat { .. })
    ));
}

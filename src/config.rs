//! Migration configuration loaded from a TOML file
//!
//! Every section and key is optional; missing values take the defaults below.

use crate::codec::DEFAULT_RESERVED_RECEIVER_FIELD;
use crate::normalize::DEFAULT_EXCLUDED_PATH_FRAGMENTS;
use crate::template::ListDefinition;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MigrationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_url: Option<String>,
    pub store: StoreConfig,
    pub extraction: ExtractionConfig,
    pub replay: ReplayConfig,
    pub theme: ThemeConfig,
}

impl MigrationConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory holding persisted templates
    pub directory: String,
    pub file_name: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            directory: "templates".to_string(),
            file_name: "site-template.toml".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    pub excluded_path_fragments: Vec<String>,
    pub reserved_receiver_field: String,
    /// Item value failures tolerated per list before its extraction aborts
    pub max_item_errors: usize,
    pub events_list_pattern: String,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            excluded_path_fragments: DEFAULT_EXCLUDED_PATH_FRAGMENTS
                .iter()
                .map(|f| f.to_string())
                .collect(),
            reserved_receiver_field: DEFAULT_RESERVED_RECEIVER_FIELD.to_string(),
            max_item_errors: 10,
            events_list_pattern: "Lists/sapiensEvents".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayConfig {
    pub clear_navigation: bool,
    pub provision_content_types_to_sub_webs: bool,
    pub pages_library: String,
    pub asset_library: String,
    /// List instance added to the template right before it is applied
    pub auxiliary_list: AuxiliaryList,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            clear_navigation: true,
            provision_content_types_to_sub_webs: true,
            pages_library: "SitePages".to_string(),
            asset_library: "SiteAssets".to_string(),
            auxiliary_list: AuxiliaryList::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuxiliaryList {
    pub enabled: bool,
    pub title: String,
    pub url: String,
    pub template_type: i32,
    pub enable_attachments: bool,
}

impl Default for AuxiliaryList {
    fn default() -> Self {
        Self {
            enabled: true,
            title: "Test List".to_string(),
            url: "lists/Testlist".to_string(),
            template_type: 105,
            enable_attachments: true,
        }
    }
}

impl AuxiliaryList {
    /// The list to inject, if injection is enabled
    pub fn to_list_definition(&self) -> Option<ListDefinition> {
        if !self.enabled {
            return None;
        }
        let mut list = ListDefinition::new(&self.title, &self.url);
        list.template_type = Some(self.template_type);
        list.enable_attachments = self.enable_attachments;
        Some(list)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Name the copied palette is registered under on the target
    pub name: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            name: "Migrated Theme".to_string(),
        }
    }
}

//! Interfaces consumed from the hosting platform
//!
//! The engine never talks to a remote workspace directly. Everything it needs
//! from the source or target goes through [`SitePlatform`]. Implementations own
//! authentication, transport, retries and timeouts; calls are blocking.

use crate::codec::{FieldKind, RawFieldValue};
use crate::error::PlatformError;
use crate::template::Template;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

pub type PlatformResult<T> = std::result::Result<T, PlatformError>;

/// A resolved workspace (site)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Workspace {
    /// Stable identity of the workspace, used as a cache key
    pub id: String,
    /// Absolute URL (e.g. "https://tenant.example.com/sites/source")
    pub url: String,
    /// Server-relative URL (e.g. "/sites/source")
    pub server_relative_url: String,
}

/// A list as enumerated on a workspace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListSummary {
    pub title: String,
    /// Web-relative path of the list root folder (e.g. "Lists/Contacts")
    pub relative_path: String,
}

impl ListSummary {
    pub fn new(title: impl Into<String>, relative_path: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            relative_path: relative_path.into(),
        }
    }
}

/// Live field metadata of a list
#[derive(Debug, Clone, PartialEq)]
pub struct FieldMetadata {
    pub internal_name: String,
    /// Display name
    pub title: String,
    pub kind: FieldKind,
    pub read_only: bool,
    pub schema_xml: String,
}

impl FieldMetadata {
    pub fn new(internal_name: impl Into<String>, title: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            internal_name: internal_name.into(),
            title: title.into(),
            kind,
            read_only: false,
            schema_xml: String::new(),
        }
    }
}

/// One list item with its raw field values keyed by internal name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListItem {
    pub id: u32,
    pub values: HashMap<String, RawFieldValue>,
}

/// Kind of a provisioning message reported by the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Progress,
    Completed,
    Warning,
    Error,
}

/// Event reported by the platform while it extracts or applies a template
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProvisioningEvent {
    Progress {
        message: String,
        step: u32,
        total: u32,
    },
    Message {
        message: String,
        kind: MessageKind,
    },
}

impl fmt::Display for ProvisioningEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProvisioningEvent::Progress {
                message,
                step,
                total,
            } => write!(f, "{:02}/{:02} - {}", step, total, message),
            ProvisioningEvent::Message { message, .. } => write!(f, "{}", message),
        }
    }
}

pub type ProgressCallback = Arc<dyn Fn(&ProvisioningEvent) + Send + Sync>;

/// Options for pulling a template from a workspace
#[derive(Clone, Default)]
pub struct ExtractionOptions {
    pub include_hidden_lists: bool,
    pub include_all_client_side_pages: bool,
    pub include_site_groups: bool,
    /// Only these list titles are extracted
    pub lists_to_extract: Vec<String>,
    pub progress: Option<ProgressCallback>,
}

impl fmt::Debug for ExtractionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractionOptions")
            .field("include_hidden_lists", &self.include_hidden_lists)
            .field(
                "include_all_client_side_pages",
                &self.include_all_client_side_pages,
            )
            .field("include_site_groups", &self.include_site_groups)
            .field("lists_to_extract", &self.lists_to_extract)
            .finish_non_exhaustive()
    }
}

/// Options for applying a template to a workspace
#[derive(Clone, Default)]
pub struct ApplyOptions {
    pub clear_navigation: bool,
    pub provision_content_types_to_sub_webs: bool,
    pub progress: Option<ProgressCallback>,
}

impl fmt::Debug for ApplyOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApplyOptions")
            .field("clear_navigation", &self.clear_navigation)
            .field(
                "provision_content_types_to_sub_webs",
                &self.provision_content_types_to_sub_webs,
            )
            .finish_non_exhaustive()
    }
}

/// A hosted workspace platform, used both as migration source and target
pub trait SitePlatform: Send + Sync {
    /// Resolve a workspace from its absolute URL
    fn workspace(&self, url: &str) -> PlatformResult<Workspace>;

    fn list_titles(&self, workspace: &Workspace) -> PlatformResult<Vec<ListSummary>>;

    fn get_template(
        &self,
        workspace: &Workspace,
        options: &ExtractionOptions,
    ) -> PlatformResult<Template>;

    fn apply_template(
        &self,
        workspace: &Workspace,
        template: &Template,
        options: &ApplyOptions,
    ) -> PlatformResult<()>;

    fn get_fields(&self, workspace: &Workspace, list_title: &str)
    -> PlatformResult<Vec<FieldMetadata>>;

    fn get_items(&self, workspace: &Workspace, list_title: &str) -> PlatformResult<Vec<ListItem>>;

    fn resolve_login_name(&self, workspace: &Workspace, user_id: u32) -> PlatformResult<String>;

    /// Server-relative URLs of every file in a library, recursively
    fn list_files(&self, workspace: &Workspace, library: &str) -> PlatformResult<Vec<String>>;

    fn file_exists(&self, workspace: &Workspace, server_relative_url: &str)
    -> PlatformResult<bool>;

    fn move_file(&self, workspace: &Workspace, from: &str, to: &str) -> PlatformResult<()>;

    /// Create a single folder given its web-relative path; no-op when present
    fn ensure_folder(&self, workspace: &Workspace, web_relative_path: &str) -> PlatformResult<()>;

    /// Server-relative URL of the folder holding the themed stylesheet files
    fn themed_css_folder_url(&self, workspace: &Workspace) -> PlatformResult<String>;

    fn read_file_as_string(
        &self,
        workspace: &Workspace,
        server_relative_url: &str,
    ) -> PlatformResult<String>;

    fn apply_theme(
        &self,
        workspace: &Workspace,
        name: &str,
        theme_json: &serde_json::Value,
    ) -> PlatformResult<()>;
}

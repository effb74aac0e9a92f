use serde::{Deserialize, Serialize};

/// The portable migration document
///
/// Built once per extraction run, normalized in place, persisted, and loaded
/// fresh for replay. Field schemas are kept as raw markup text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Template {
    /// Ordered list definitions
    pub lists: Vec<ListDefinition>,
    /// Client side pages, keyed by their (possibly flattened) page name
    pub pages: Vec<PageDefinition>,
    /// Loose files provisioned from a content source
    pub files: Vec<FileEntry>,
    /// Composed look of the source site, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<ComposedLook>,
    /// Custom actions; never portable, cleared during normalization
    pub custom_actions: CustomActions,
    /// Where file entries read their content from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_source: Option<ContentSource>,
}

impl Template {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn find_list(&self, title: &str) -> Option<&ListDefinition> {
        self.lists.iter().find(|l| l.title == title)
    }
}

/// A list instance and everything it carries
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListDefinition {
    pub title: String,
    /// Web-relative URL of the list root folder (e.g. "Lists/Contacts")
    pub url: String,
    /// Platform list template type (e.g. 100 for a generic list, 105 for contacts)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_type: Option<i32>,
    pub enable_attachments: bool,
    /// Fields defined locally on the list
    pub fields: Vec<FieldDefinition>,
    /// Fields defined at a broader scope and referenced by the list
    pub field_refs: Vec<FieldReference>,
    pub data_rows: DataRows,
}

impl ListDefinition {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            ..Self::default()
        }
    }
}

/// A locally defined field: internal name plus its raw schema markup
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldDefinition {
    pub name: String,
    pub schema_xml: String,
}

impl FieldDefinition {
    pub fn new(name: impl Into<String>, schema_xml: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema_xml: schema_xml.into(),
        }
    }
}

/// Pointer from a list to a field defined elsewhere
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldReference {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub display_name: String,
}

impl FieldReference {
    pub fn new(name: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            display_name: display_name.into(),
        }
    }
}

/// How imported rows treat existing items on the target
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpdateBehavior {
    /// Rows replace items that conflict
    overwrite,
    /// Rows are always added as new items
    #[default]
    append,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataRows {
    pub update_behavior: UpdateBehavior,
    pub rows: Vec<DataRow>,
}

/// One extracted item as ordered field name / canonical text pairs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataRow {
    pub values: Vec<RowValue>,
}

/// A single canonical value; `value = None` is null, distinct from empty text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RowValue {
    pub field: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl DataRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value; a second value for the same field replaces the first
    pub fn insert(&mut self, field: impl Into<String>, value: Option<String>) {
        let field = field.into();
        match self.values.iter_mut().find(|v| v.field == field) {
            Some(existing) => existing.value = value,
            None => self.values.push(RowValue { field, value }),
        }
    }

    /// `None` when the field is absent, `Some(None)` when it is present and null
    pub fn get(&self, field: &str) -> Option<Option<&str>> {
        self.values
            .iter()
            .find(|v| v.field == field)
            .map(|v| v.value.as_deref())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageDefinition {
    /// Page name relative to the pages library, without the extension
    pub page_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub overwrite: bool,
}

impl PageDefinition {
    pub fn new(page_name: impl Into<String>) -> Self {
        Self {
            page_name: page_name.into(),
            title: None,
            overwrite: true,
        }
    }
}

#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileLevel {
    draft,
    #[default]
    published,
    checked_out,
}

/// A file provisioned from the template's content source
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileEntry {
    /// Path of the file relative to the content source
    pub src: String,
    /// Site-relative destination folder
    pub folder: String,
    pub overwrite: bool,
    pub level: FileLevel,
}

/// A document library on a workspace that file entries are read from
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentSource {
    pub workspace_url: String,
    pub library: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComposedLook {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_file: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomActions {
    pub site: Vec<CustomAction>,
    pub web: Vec<CustomAction>,
}

impl CustomActions {
    pub fn clear(&mut self) {
        self.site.clear();
        self.web.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.site.is_empty() && self.web.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomAction {
    pub name: String,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script_src: Option<String>,
}

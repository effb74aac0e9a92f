//! Common test utilities for integration tests
#![allow(dead_code)]

use site_migrate::codec::{FieldKind, RawFieldValue};
use site_migrate::platform::{
    ApplyOptions, ExtractionOptions, FieldMetadata, ListItem, ListSummary, PlatformResult,
};
use site_migrate::template::{
    CustomAction, FieldDefinition, FieldReference, ListDefinition, PageDefinition,
};
use site_migrate::{MigrationConfig, PlatformError, SitePlatform, Template, Workspace};
use std::collections::{BTreeSet, HashMap};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

pub const SOURCE_URL: &str = "https://t.example.com/sites/source";
pub const TARGET_URL: &str = "https://t.example.com/sites/target";

/// In-memory platform that records every mutating call
#[derive(Default)]
pub struct FakePlatform {
    pub lists: Vec<ListSummary>,
    pub template: Template,
    pub fields: HashMap<String, Vec<FieldMetadata>>,
    pub items: HashMap<String, Vec<ListItem>>,
    pub logins: HashMap<u32, String>,
    /// Time a login lookup takes
    pub login_delay: Duration,
    pub themed_css_folder: Option<String>,
    /// File contents keyed by server-relative URL
    pub documents: HashMap<String, String>,
    /// Operation name that fails with a platform error
    pub fail_operation: Option<&'static str>,

    pub files: Mutex<BTreeSet<String>>,
    pub login_fetches: AtomicUsize,
    pub extraction_options: Mutex<Vec<Vec<String>>>,
    pub applied: Mutex<Vec<Template>>,
    pub apply_options: Mutex<Vec<(bool, bool)>>,
    pub folders: Mutex<Vec<String>>,
    pub moves: Mutex<Vec<(String, String)>>,
    pub themes: Mutex<Vec<(String, serde_json::Value)>>,
}

impl FakePlatform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_files(self, files: &[&str]) -> Self {
        self.files
            .lock()
            .unwrap()
            .extend(files.iter().map(|f| f.to_string()));
        self
    }

    pub fn login_fetches(&self) -> usize {
        self.login_fetches.load(Ordering::SeqCst)
    }

    pub fn applied(&self) -> Vec<Template> {
        self.applied.lock().unwrap().clone()
    }

    pub fn moves(&self) -> Vec<(String, String)> {
        self.moves.lock().unwrap().clone()
    }

    pub fn folders(&self) -> Vec<String> {
        self.folders.lock().unwrap().clone()
    }

    fn check(&self, operation: &'static str) -> PlatformResult<()> {
        if self.fail_operation == Some(operation) {
            return Err(PlatformError::new(operation, "simulated failure"));
        }
        Ok(())
    }
}

impl SitePlatform for FakePlatform {
    fn workspace(&self, url: &str) -> PlatformResult<Workspace> {
        self.check("workspace")?;
        let server_relative_url = url
            .splitn(4, '/')
            .nth(3)
            .map(|path| format!("/{}", path))
            .unwrap_or_else(|| "/".to_string());
        Ok(Workspace {
            id: url.to_lowercase(),
            url: url.to_string(),
            server_relative_url,
        })
    }

    fn list_titles(&self, _workspace: &Workspace) -> PlatformResult<Vec<ListSummary>> {
        self.check("list_titles")?;
        Ok(self.lists.clone())
    }

    fn get_template(
        &self,
        _workspace: &Workspace,
        options: &ExtractionOptions,
    ) -> PlatformResult<Template> {
        self.check("get_template")?;
        self.extraction_options
            .lock()
            .unwrap()
            .push(options.lists_to_extract.clone());
        let mut template = self.template.clone();
        template
            .lists
            .retain(|l| options.lists_to_extract.contains(&l.title));
        Ok(template)
    }

    fn apply_template(
        &self,
        _workspace: &Workspace,
        template: &Template,
        options: &ApplyOptions,
    ) -> PlatformResult<()> {
        self.check("apply_template")?;
        self.applied.lock().unwrap().push(template.clone());
        self.apply_options.lock().unwrap().push((
            options.clear_navigation,
            options.provision_content_types_to_sub_webs,
        ));
        Ok(())
    }

    fn get_fields(&self, _workspace: &Workspace, list_title: &str) -> PlatformResult<Vec<FieldMetadata>> {
        self.check("get_fields")?;
        Ok(self.fields.get(list_title).cloned().unwrap_or_default())
    }

    fn get_items(&self, _workspace: &Workspace, list_title: &str) -> PlatformResult<Vec<ListItem>> {
        self.check("get_items")?;
        Ok(self.items.get(list_title).cloned().unwrap_or_default())
    }

    fn resolve_login_name(&self, _workspace: &Workspace, user_id: u32) -> PlatformResult<String> {
        self.check("resolve_login_name")?;
        self.login_fetches.fetch_add(1, Ordering::SeqCst);
        if !self.login_delay.is_zero() {
            thread::sleep(self.login_delay);
        }
        self.logins
            .get(&user_id)
            .cloned()
            .ok_or_else(|| PlatformError::new("resolve_login_name", format!("unknown user {}", user_id)))
    }

    fn list_files(&self, workspace: &Workspace, library: &str) -> PlatformResult<Vec<String>> {
        self.check("list_files")?;
        let prefix = format!(
            "{}/{}/",
            workspace.server_relative_url.trim_end_matches('/'),
            library
        );
        Ok(self
            .files
            .lock()
            .unwrap()
            .iter()
            .filter(|f| f.starts_with(&prefix))
            .cloned()
            .collect())
    }

    fn file_exists(&self, _workspace: &Workspace, server_relative_url: &str) -> PlatformResult<bool> {
        self.check("file_exists")?;
        Ok(self.files.lock().unwrap().contains(server_relative_url))
    }

    fn move_file(&self, _workspace: &Workspace, from: &str, to: &str) -> PlatformResult<()> {
        self.check("move_file")?;
        let mut files = self.files.lock().unwrap();
        if !files.remove(from) {
            return Err(PlatformError::new("move_file", format!("{} not found", from)));
        }
        files.insert(to.to_string());
        self.moves
            .lock()
            .unwrap()
            .push((from.to_string(), to.to_string()));
        Ok(())
    }

    fn ensure_folder(&self, _workspace: &Workspace, web_relative_path: &str) -> PlatformResult<()> {
        self.check("ensure_folder")?;
        self.folders
            .lock()
            .unwrap()
            .push(web_relative_path.to_string());
        Ok(())
    }

    fn themed_css_folder_url(&self, _workspace: &Workspace) -> PlatformResult<String> {
        self.check("themed_css_folder_url")?;
        self.themed_css_folder
            .clone()
            .ok_or_else(|| PlatformError::new("themed_css_folder_url", "no theme applied"))
    }

    fn read_file_as_string(
        &self,
        _workspace: &Workspace,
        server_relative_url: &str,
    ) -> PlatformResult<String> {
        self.check("read_file_as_string")?;
        self.documents
            .get(server_relative_url)
            .cloned()
            .ok_or_else(|| PlatformError::new("read_file_as_string", "file not found"))
    }

    fn apply_theme(
        &self,
        _workspace: &Workspace,
        name: &str,
        theme_json: &serde_json::Value,
    ) -> PlatformResult<()> {
        self.check("apply_theme")?;
        self.themes
            .lock()
            .unwrap()
            .push((name.to_string(), theme_json.clone()));
        Ok(())
    }
}

/// Create a list item from field name / value pairs
pub fn item(id: u32, values: Vec<(&str, RawFieldValue)>) -> ListItem {
    ListItem {
        id,
        values: values
            .into_iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect(),
    }
}

pub fn field(name: &str, title: &str, kind: FieldKind) -> FieldMetadata {
    FieldMetadata::new(name, title, kind)
}

pub const PALETTE_XML: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<s:colorPalette isInverted="false" previewSlot1="BackgroundOverlay" xmlns:s="http://schemas.microsoft.com/sharepoint/">
  <s:color name="Accent" value="FF0000" />
  <s:color name="Base" value="003366" />
</s:colorPalette>"#;

pub const THEMED_FOLDER: &str = "/sites/source/_catalogs/theme/Themed/A1B2C3";

/// A source workspace with a contacts list, an events list and system lists
pub fn source_platform() -> FakePlatform {
    let mut platform = FakePlatform::new();
    platform.lists = vec![
        ListSummary::new("Contacts", "Lists/Contacts"),
        ListSummary::new("Events", "Lists/sapiensEvents"),
        ListSummary::new("Style Library", "Style Library"),
        ListSummary::new("Site Pages", "SitePages"),
    ];

    let mut contacts = ListDefinition::new("Contacts", "Lists/Contacts");
    contacts.template_type = Some(105);
    contacts.fields = vec![
        FieldDefinition::new(
            "Phone",
            r#"<Field Type="Text" Name="Phone" DisplayName="Phone Number" />"#,
        ),
        FieldDefinition::new(
            "Label",
            r#"<Field Type="Calculated" Name="Label" DisplayName="Label"><Formula>=[{fieldtitle:Title}]&amp;" "&amp;[{fieldtitle:Phone}]</Formula><Validation Message="bad">=TRUE</Validation></Field>"#,
        ),
    ];
    contacts.field_refs = vec![FieldReference::new("Owner", "Account Owner")];

    let mut events = ListDefinition::new("Events", "Lists/sapiensEvents");
    events.field_refs = vec![
        FieldReference::new("EventDate", "Start Time"),
        FieldReference::new("EndDate", "End Time"),
        FieldReference::new("Location", "Location"),
    ];

    let style = ListDefinition::new("Style Library", "Style Library");

    platform.template.lists = vec![contacts, events, style];
    platform.template.pages = vec![
        PageDefinition::new("home"),
        PageDefinition::new("news/2024/launch"),
    ];
    platform.template.custom_actions.site = vec![CustomAction {
        name: "Banner".to_string(),
        location: "ClientSideExtension.ApplicationCustomizer".to_string(),
        script_src: None,
    }];

    let mut phone = field("Phone", "Phone Number", FieldKind::Text);
    phone.schema_xml = r#"<Field Type="Text" Name="Phone" />"#.to_string();
    let mut modified = field("Modified", "Modified", FieldKind::DateTime);
    modified.read_only = true;
    platform.fields.insert(
        "Contacts".to_string(),
        vec![
            field("Title", "Full Name", FieldKind::Text),
            phone,
            field("Owner", "Account Owner", FieldKind::User),
            field("sapiensatUpdateID", "Update", FieldKind::Integer),
            field("Attachments", "Attachments", FieldKind::Attachments),
            modified,
        ],
    );

    let mut start = field("EventDate", "Start Time", FieldKind::DateTime);
    start.schema_xml = r#"<Field Type="DateTime" Name="EventDate" DisplayName="Start Time" />"#.to_string();
    let mut end = field("EndDate", "End Time", FieldKind::DateTime);
    end.schema_xml = r#"<Field Type="DateTime" Name="EndDate" DisplayName="End Time" />"#.to_string();
    platform.fields.insert(
        "Events".to_string(),
        vec![field("Title", "Title", FieldKind::Text), start, end],
    );

    platform.items.insert(
        "Contacts".to_string(),
        vec![
            item(
                1,
                vec![
                    ("Title", RawFieldValue::Text("Ada".to_string())),
                    ("Phone", RawFieldValue::Null),
                    (
                        "Owner",
                        RawFieldValue::User(site_migrate::codec::UserValue::new(7)),
                    ),
                    ("sapiensatUpdateID", RawFieldValue::Integer(5)),
                    ("Attachments", RawFieldValue::Boolean(false)),
                    ("Modified", RawFieldValue::Text("ignored".to_string())),
                ],
            ),
            item(
                2,
                vec![
                    ("Title", RawFieldValue::Text("Grace".to_string())),
                    ("Phone", RawFieldValue::Text("555-0100".to_string())),
                    (
                        "Owner",
                        RawFieldValue::User(site_migrate::codec::UserValue::new(7)),
                    ),
                    ("sapiensatUpdateID", RawFieldValue::Null),
                ],
            ),
        ],
    );
    platform.logins.insert(7, "i:0#.f|membership|ada@example.com".to_string());

    platform.themed_css_folder = Some(THEMED_FOLDER.to_string());
    platform.documents.insert(
        format!("{}/theme.spcolor", THEMED_FOLDER),
        PALETTE_XML.to_string(),
    );
    platform.with_files(&[
        "/sites/source/SiteAssets/site.css",
        "/sites/source/SiteAssets/img/logo.png",
    ])
}

pub fn test_config() -> MigrationConfig {
    MigrationConfig::default()
}

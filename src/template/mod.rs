//! The portable template document and its persistence
//!
//! - `model`: in-memory template structure (lists, fields, rows, pages, files)
//! - `store`: the template store interface and its file system implementation

mod model;
mod store;

pub use model::{
    ComposedLook, ContentSource, CustomAction, CustomActions, DataRow, DataRows, FieldDefinition,
    FieldReference, FileEntry, FileLevel, ListDefinition, PageDefinition, RowValue, Template,
    UpdateBehavior,
};
pub use store::{FileTemplateStore, TemplateStore};

//! Template normalization for cross-site replay
//!
//! - `formula`: display-name substitution in calculated fields, validation stripping
//! - `list_hooks`: pluggable per-list fix-ups (events lists)
//! - `denylist`: system list exclusion by path fragment

mod denylist;
mod formula;
mod list_hooks;

pub use denylist::{DEFAULT_EXCLUDED_PATH_FRAGMENTS, qualifying_lists};
pub use formula::{
    CALCULATED_TYPE, FieldTitleMap, TITLE_FIELD, VALIDATION_ELEMENT, build_field_titles,
    field_title_token, rewrite_list_formulas, rewrite_schema,
};
pub use list_hooks::{EventListHook, ListHook, RECURRENCE_FIELDS};

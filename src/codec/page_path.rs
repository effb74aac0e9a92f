//! Page path codec
//!
//! Templates store client side pages under a flat name. Pages that live in
//! sub folders of the pages library get their interior `/` replaced by
//! [`PATH_TOKEN`] before the template is persisted, and are moved back into
//! their folders after the template has been applied.
//!
//! The token is not collision free: a page whose real name already contains
//! `__` decodes into an extra folder level.

use crate::template::Template;

/// Stand-in for `/` inside flattened page names
pub const PATH_TOKEN: &str = "__";

pub fn encode_page_name(name: &str) -> String {
    name.replace('/', PATH_TOKEN)
}

pub fn decode_page_name(flat: &str) -> String {
    flat.replace(PATH_TOKEN, "/")
}

/// Flatten every nested page name of the template, returning how many changed
pub fn encode_template_pages(template: &mut Template) -> usize {
    let mut changed = 0;
    for page in &mut template.pages {
        if page.page_name.contains('/') {
            page.page_name = encode_page_name(&page.page_name);
            changed += 1;
        }
    }
    changed
}

/// A page move that restores a flattened page into its folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRelocation {
    /// Current server-relative URL
    pub from: String,
    /// Restored server-relative URL
    pub to: String,
    /// Web-relative folders to ensure, outermost first
    pub folders: Vec<String>,
}

/// Plan the relocation of one page file.
///
/// `library_url` is the server-relative URL of the pages library and anchors
/// the split: everything up to and including its trailing `/` is kept as is,
/// the remainder is decoded. `web_url` is the server-relative URL of the
/// workspace, used to express folders web-relative.
///
/// Returns `None` for files outside the library or without a flattened name.
pub fn plan_relocation(file_url: &str, library_url: &str, web_url: &str) -> Option<PageRelocation> {
    let prefix = format!("{}/", library_url.trim_end_matches('/'));
    let head = file_url.get(..prefix.len())?;
    if !head.eq_ignore_ascii_case(&prefix) {
        return None;
    }
    let remainder = &file_url[prefix.len()..];
    if !remainder.contains(PATH_TOKEN) {
        return None;
    }

    let restored = decode_page_name(remainder);
    let to = format!("{}{}", head, restored);

    let library_web_relative = strip_prefix_ignore_case(head.trim_end_matches('/'), web_url)
        .trim_start_matches('/')
        .to_string();
    let mut folders = Vec::new();
    let mut current = library_web_relative;
    if let Some((directories, _file)) = restored.rsplit_once('/') {
        for segment in directories.split('/').filter(|s| !s.is_empty()) {
            current = if current.is_empty() {
                segment.to_string()
            } else {
                format!("{}/{}", current, segment)
            };
            folders.push(current.clone());
        }
    }

    Some(PageRelocation {
        from: file_url.to_string(),
        to,
        folders,
    })
}

fn strip_prefix_ignore_case<'a>(value: &'a str, prefix: &str) -> &'a str {
    match value.get(..prefix.len()) {
        Some(head) if head.eq_ignore_ascii_case(prefix) => &value[prefix.len()..],
        _ => value,
    }
}

//! Text summaries of a stored template, used by the `inspect` command

use crate::template::{ListDefinition, Template};

/// Keep lists whose title or URL contains `keyword` (case-insensitive)
///
/// # Arguments
/// * `lists` - Lists to filter in place
/// * `keyword` - Keyword to search for
pub fn apply_list_filter(lists: &mut Vec<&ListDefinition>, keyword: &str) {
    let keyword_lower = keyword.to_lowercase();
    lists.retain(|list| {
        list.title.to_lowercase().contains(&keyword_lower)
            || list.url.to_lowercase().contains(&keyword_lower)
    });
}

/// Format a template into a display string
///
/// # Arguments
/// * `template` - Template to summarize
/// * `filter` - Optional keyword restricting the lists shown
/// * `include_fields` - Whether to list field names under each list
pub fn format_template(template: &Template, filter: Option<&str>, include_fields: bool) -> String {
    let mut lists: Vec<&ListDefinition> = template.lists.iter().collect();
    if let Some(keyword) = filter {
        apply_list_filter(&mut lists, keyword);
    }

    let mut result = format!(
        "Template: {} list(s), {} page(s), {} file(s)\n",
        template.lists.len(),
        template.pages.len(),
        template.files.len()
    );
    if let Some(theme) = &template.theme {
        result.push_str(&format!("Theme: {}\n", theme.name));
    }

    if lists.is_empty() {
        result.push_str("\nNo lists found\n");
        return result;
    }

    result.push('\n');
    for list in lists {
        result.push_str(&format!(
            "- {} ({}) rows: {}, update: {:?}\n",
            list.title,
            list.url,
            list.data_rows.rows.len(),
            list.data_rows.update_behavior
        ));
        if let Some(template_type) = list.template_type {
            result.push_str(&format!("  Template type: {}\n", template_type));
        }
        if include_fields {
            for field in &list.fields {
                result.push_str(&format!("  Field: {}\n", field.name));
            }
            for field_ref in &list.field_refs {
                result.push_str(&format!(
                    "  Field ref: {} ({})\n",
                    field_ref.name, field_ref.display_name
                ));
            }
        }
    }

    if !template.pages.is_empty() {
        result.push_str("\nPages:\n");
        for page in &template.pages {
            result.push_str(&format!("- {}\n", page.page_name));
        }
    }

    result
}

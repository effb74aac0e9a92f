use crate::platform::ListSummary;

/// Path fragments of system lists that are never migrated
///
/// Matching is a case-sensitive substring test on the list's relative path.
pub const DEFAULT_EXCLUDED_PATH_FRAGMENTS: [&str; 20] = [
    "Style Library",
    "FormServerTemplates",
    "Shared%20Documents",
    "Shared Documents",
    "masterpage",
    "solutions",
    "wp",
    "Converted Forms",
    "Documents",
    "theme",
    "SiteAssets",
    "Composed Looks",
    "appdata",
    "appfiles",
    "lt",
    "design",
    "IWConvertedForms",
    "wte",
    "SitePages",
    "catalogs/",
];

/// Lists whose relative path contains none of the excluded fragments, in source order
pub fn qualifying_lists<S: AsRef<str>>(lists: &[ListSummary], excluded: &[S]) -> Vec<ListSummary> {
    lists
        .iter()
        .filter(|list| {
            !excluded
                .iter()
                .any(|fragment| list.relative_path.contains(fragment.as_ref()))
        })
        .cloned()
        .collect()
}

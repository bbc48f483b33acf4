//! Free-text list filters.

/// Trim a filter, treating blank input as no filter at all.
pub(crate) fn normalise_search(search: Option<String>) -> Option<String> {
    search
        .map(|raw| raw.trim().to_owned())
        .filter(|trimmed| !trimmed.is_empty())
}

use crate::models::{DirectoryEntry, DirectoryQuery, Resource, ALL_SECTORS};

/// Treat absent, blank and "All" filter values as no filter
#[inline]
fn active(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("all"))
        .map(str::to_lowercase)
}

/// Check if a resource passes the explore filters
///
/// - `query` is matched against name, description, provider and tags
/// - `sector` passes "All Sectors" resources and any sector containing it
/// - `stage` must match one listed stage exactly
#[inline]
pub fn matches_explore_filters(
    resource: &Resource,
    query: Option<&str>,
    sector: Option<&str>,
    stage: Option<&str>,
) -> bool {
    if let Some(q) = query {
        let haystack = format!(
            "{} {} {} {}",
            resource.name,
            resource.description.as_deref().unwrap_or(""),
            resource.provider.as_deref().unwrap_or(""),
            resource.tags.join(" ")
        )
        .to_lowercase();
        if !haystack.contains(q) {
            return false;
        }
    }

    if let Some(sector) = sector {
        let open = resource.sectors.iter().any(|s| s.eq_ignore_ascii_case(ALL_SECTORS));
        if !open && !resource.sectors.iter().any(|s| s.to_lowercase().contains(sector)) {
            return false;
        }
    }

    if let Some(stage) = stage {
        if !resource.stages.iter().any(|s| s.trim().to_lowercase() == stage) {
            return false;
        }
    }

    true
}

/// Filter one category of resources, keeping dataset order
pub fn filter_resources<'a>(
    resources: &'a [Resource],
    query: &Option<String>,
    sector: &Option<String>,
    stage: &Option<String>,
) -> Vec<&'a Resource> {
    let query = active(query);
    let sector = active(sector);
    let stage = active(stage);

    resources
        .iter()
        .filter(|r| matches_explore_filters(r, query.as_deref(), sector.as_deref(), stage.as_deref()))
        .collect()
}

/// Check if a directory listing passes the directory filters
#[inline]
pub fn matches_directory_filters(entry: &DirectoryEntry, query: &DirectoryQuery) -> bool {
    if let Some(search) = active(&query.search) {
        if !entry.name.to_lowercase().contains(&search) && !entry.area.to_lowercase().contains(&search) {
            return false;
        }
    }

    if let Some(region) = active(&query.region) {
        if entry.sub_region.as_str().to_lowercase() != region {
            return false;
        }
    }

    if let Some(broad_type) = active(&query.broad_type) {
        if entry.broad_type.as_str().to_lowercase() != broad_type {
            return false;
        }
    }

    if let Some(equity) = active(&query.equity) {
        if entry.equity_category.as_str().to_lowercase() != equity {
            return false;
        }
    }

    true
}

pub fn filter_directory<'a>(entries: &'a [DirectoryEntry], query: &DirectoryQuery) -> Vec<&'a DirectoryEntry> {
    entries
        .iter()
        .filter(|e| matches_directory_filters(e, query))
        .collect()
}

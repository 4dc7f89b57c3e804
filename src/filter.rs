use crate::schema::{CatalogEntry, Client, Project, ProjectStatus};
use crate::utils::match_key;
use serde::{Deserialize, Serialize};

/// Dashboard status buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StatusFilter {
    #[default]
    All,
    /// Planning, InProgress and Paused: every project that is neither finished nor dropped.
    InProgress,
    Completed,
}

impl StatusFilter {
    pub fn accepts(self, status: ProjectStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Completed => status == ProjectStatus::Completed,
            StatusFilter::InProgress => matches!(
                status,
                ProjectStatus::InProgress | ProjectStatus::Paused | ProjectStatus::Planning
            ),
        }
    }
}

/// Projects whose name or client name contains `search_term` (case-insensitive, trimmed)
/// and whose status falls in `status_filter`, in their original order.
pub fn filter_projects<'a>(
    projects: &'a [Project],
    clients: &[Client],
    search_term: &str,
    status_filter: StatusFilter,
) -> Vec<&'a Project> {
    let needle = match_key(search_term);

    projects
        .iter()
        .filter(|project| status_filter.accepts(project.status))
        .filter(|project| {
            if needle.is_empty() || project.name.to_lowercase().contains(&needle) {
                return true;
            }
            clients
                .iter()
                .find(|c| c.id == project.client_id)
                .is_some_and(|c| c.name.to_lowercase().contains(&needle))
        })
        .collect()
}

/// Catalog entries whose name contains `search_term`; an empty term returns everything.
pub fn search_catalog<'a>(catalog: &'a [CatalogEntry], search_term: &str) -> Vec<&'a CatalogEntry> {
    let needle = match_key(search_term);
    catalog
        .iter()
        .filter(|entry| needle.is_empty() || entry.name.to_lowercase().contains(&needle))
        .collect()
}

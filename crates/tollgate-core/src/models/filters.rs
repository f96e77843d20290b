//! Filter types for querying processes.

use std::str::FromStr;

#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{Process, Role};
use crate::catalog;

/// Which processes to include based on their closed flag.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    /// Open processes only
    Pending,
    /// Closed processes only
    Completed,
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(StatusFilter::All),
            "pending" | "open" => Ok(StatusFilter::Pending),
            "completed" | "closed" => Ok(StatusFilter::Completed),
            _ => Err(format!("Invalid status filter: {s}")),
        }
    }
}

/// Filter options for querying processes.
#[derive(Debug, Clone, Default)]
pub struct ProcessFilter {
    pub status: StatusFilter,

    /// Case-insensitive match against the id, requester name and objective
    pub search: Option<String>,

    /// Only processes whose current step is owned by this role
    pub responsible: Option<Role>,
}

impl ProcessFilter {
    /// Whether the process passes every configured criterion.
    pub fn matches(&self, process: &Process) -> bool {
        let status_ok = match self.status {
            StatusFilter::All => true,
            StatusFilter::Pending => !process.closed,
            StatusFilter::Completed => process.closed,
        };

        let search_ok = match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(term) => {
                let term = term.to_lowercase();
                std::iter::once(Some(process.id.as_str()))
                    .chain([
                        process.text_field("nomeSolicitante"),
                        process.text_field("objetivo"),
                    ])
                    .flatten()
                    .any(|text| text.to_lowercase().contains(&term))
            }
        };

        let responsible_ok = self.responsible.map_or(true, |role| {
            catalog::definition(process.current_step_id).responsible == role
        });

        status_ok && search_ok && responsible_ok
    }
}

impl From<&crate::params::ListProcesses> for ProcessFilter {
    fn from(params: &crate::params::ListProcesses) -> Self {
        Self {
            status: params.status,
            search: params.search.clone(),
            responsible: params.responsible,
        }
    }
}

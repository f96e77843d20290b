//! Roles that own workflow steps.

use std::{fmt, str::FromStr};

#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Type-safe enumeration of the roles taking part in the approval workflow.
///
/// Every step in the catalog is owned by exactly one role. The same role may
/// own more than one step (the primary requester also owns closure).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Opens the request and confirms its closure
    PrimaryRequester,
    /// Classifies national items
    ServicesSpecialist,
    /// Tax assessment
    Fiscal,
    /// Regulatory checklist
    Regulatory,
    /// Enters the external system data
    Requester,
    /// Validates cost marking
    Finance,
    /// Marks the cost
    Costs,
    /// Finalizes master data and reorder point
    Supply,
    /// Parameterizes tax systems when required
    TaxSystems,
}

impl Role {
    /// All roles, in catalog order of their first owned step.
    pub const ALL: [Role; 9] = [
        Role::PrimaryRequester,
        Role::ServicesSpecialist,
        Role::Fiscal,
        Role::Regulatory,
        Role::Requester,
        Role::Finance,
        Role::Costs,
        Role::Supply,
        Role::TaxSystems,
    ];

    /// Machine-readable key, identical to the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::PrimaryRequester => "primary_requester",
            Role::ServicesSpecialist => "services_specialist",
            Role::Fiscal => "fiscal",
            Role::Regulatory => "regulatory",
            Role::Requester => "requester",
            Role::Finance => "finance",
            Role::Costs => "costs",
            Role::Supply => "supply",
            Role::TaxSystems => "tax_systems",
        }
    }

    /// Human-readable label shown to users.
    pub fn title(&self) -> &'static str {
        match self {
            Role::PrimaryRequester => "Solicitante Primário",
            Role::ServicesSpecialist => "Especialista de Serviços",
            Role::Fiscal => "Fiscal",
            Role::Regulatory => "Regulatório",
            Role::Requester => "Requisitante",
            Role::Finance => "Finanças",
            Role::Costs => "Custos",
            Role::Supply => "Supply",
            Role::TaxSystems => "Sistemas Fiscais",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    /// Accepts the snake_case key (dashes allowed) or the display title.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == normalized || role.title().to_lowercase() == normalized)
            .ok_or_else(|| format!("Invalid role: {s}"))
    }
}

//! Step identifiers and SLA budgets.

use std::{fmt, str::FromStr};

#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Closed enumeration of the workflow's step identifiers.
///
/// Declaration order matches the catalog sequencing order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub enum StepId {
    Primary,
    Services,
    Fiscal,
    Regulatory,
    Requester,
    Finance,
    Costs,
    Supply,
    TaxSystems,
    /// Synthetic exit step
    Closure,
}

impl StepId {
    /// Convert to the serialized identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            StepId::Primary => "primary",
            StepId::Services => "services",
            StepId::Fiscal => "fiscal",
            StepId::Regulatory => "regulatory",
            StepId::Requester => "requester",
            StepId::Finance => "finance",
            StepId::Costs => "costs",
            StepId::Supply => "supply",
            StepId::TaxSystems => "taxSystems",
            StepId::Closure => "closure",
        }
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StepId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "primary" => Ok(StepId::Primary),
            "services" => Ok(StepId::Services),
            "fiscal" => Ok(StepId::Fiscal),
            "regulatory" => Ok(StepId::Regulatory),
            "requester" => Ok(StepId::Requester),
            "finance" => Ok(StepId::Finance),
            "costs" => Ok(StepId::Costs),
            "supply" => Ok(StepId::Supply),
            "taxSystems" | "tax_systems" => Ok(StepId::TaxSystems),
            "closure" => Ok(StepId::Closure),
            _ => Err(format!("Invalid step id: {s}")),
        }
    }
}

/// Time budget granted to a step before it is overdue.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "snake_case")]
pub enum SlaDuration {
    /// Fixed budget in whole hours. Zero means the step is not timed.
    Hours(u32),
    /// No deadline has been agreed yet
    Undetermined,
}

impl SlaDuration {
    /// Budget in milliseconds, or `None` when no deadline is tracked.
    pub fn as_millis(&self) -> Option<i64> {
        match self {
            SlaDuration::Hours(0) | SlaDuration::Undetermined => None,
            SlaDuration::Hours(hours) => Some(i64::from(*hours) * 3_600_000),
        }
    }
}

impl fmt::Display for SlaDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlaDuration::Hours(0) => f.write_str("untimed"),
            SlaDuration::Hours(hours) => write!(f, "{hours}h"),
            SlaDuration::Undetermined => f.write_str("to be defined"),
        }
    }
}

//! Static step catalog and per-step required fields.
//!
//! The catalog order is the sequencing order of the workflow. It is fixed at
//! compile time; the entry step and the synthetic closure step are always
//! active.

use crate::{
    activation::Condition,
    error::{Result, WorkflowError},
    models::{ProcessData, Role, SlaDuration, StepId},
};

/// Immutable definition of one workflow step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepDefinition {
    pub id: StepId,
    /// Display label
    pub title: &'static str,
    /// The single role allowed to edit while this step is current
    pub responsible: Role,
    pub sla: SlaDuration,
    /// Whether the step applies to a given process
    pub activation: Condition,
}

/// Field that must be answered before a step is sent, optionally only under a
/// condition on the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequiredField {
    pub field: &'static str,
    pub when: Condition,
}

const fn required(field: &'static str) -> RequiredField {
    RequiredField {
        field,
        when: Condition::Always,
    }
}

const fn required_when(field: &'static str, when: Condition) -> RequiredField {
    RequiredField { field, when }
}

const PARTS: Condition = Condition::FieldEquals {
    field: "tipoCadastro",
    value: "Peças",
};

static CATALOG: [StepDefinition; 10] = [
    StepDefinition {
        id: StepId::Primary,
        title: "Solicitante Primário",
        responsible: Role::PrimaryRequester,
        sla: SlaDuration::Hours(0),
        activation: Condition::Always,
    },
    StepDefinition {
        id: StepId::Services,
        title: "Especialista de Serviços",
        responsible: Role::ServicesSpecialist,
        sla: SlaDuration::Hours(48),
        activation: Condition::FieldIsTrue("itemNacional"),
    },
    StepDefinition {
        id: StepId::Fiscal,
        title: "Fiscal",
        responsible: Role::Fiscal,
        sla: SlaDuration::Hours(48),
        activation: Condition::Always,
    },
    StepDefinition {
        id: StepId::Regulatory,
        title: "Regulatório",
        responsible: Role::Regulatory,
        sla: SlaDuration::Hours(48),
        activation: Condition::Always,
    },
    StepDefinition {
        id: StepId::Requester,
        title: "Requisitante",
        responsible: Role::Requester,
        sla: SlaDuration::Hours(48),
        activation: Condition::Always,
    },
    StepDefinition {
        id: StepId::Finance,
        title: "Finanças",
        responsible: Role::Finance,
        sla: SlaDuration::Hours(72),
        activation: Condition::Always,
    },
    StepDefinition {
        id: StepId::Costs,
        title: "Custos",
        responsible: Role::Costs,
        sla: SlaDuration::Hours(24),
        activation: Condition::Always,
    },
    StepDefinition {
        id: StepId::Supply,
        title: "Supply",
        responsible: Role::Supply,
        sla: SlaDuration::Hours(24),
        activation: Condition::Always,
    },
    StepDefinition {
        id: StepId::TaxSystems,
        title: "Sistemas Fiscais",
        responsible: Role::TaxSystems,
        sla: SlaDuration::Undetermined,
        activation: Condition::FieldIsTrue("requerParametrizacao"),
    },
    StepDefinition {
        id: StepId::Closure,
        title: "Conclusão",
        responsible: Role::PrimaryRequester,
        sla: SlaDuration::Hours(0),
        activation: Condition::Always,
    },
];

static PRIMARY_FIELDS: [RequiredField; 5] = [
    required("nomeSolicitante"),
    required("objetivo"),
    required("descricao"),
    required("itemNacional"),
    required("urgencia"),
];

static SERVICES_FIELDS: [RequiredField; 3] = [
    required("tipoCadastro"),
    required_when("temperaturaMDG", PARTS),
    required_when("ncmCode", PARTS),
];

static FISCAL_FIELDS: [RequiredField; 1] = [required("requerParametrizacao")];

/// All step definitions in sequencing order.
pub fn steps() -> &'static [StepDefinition] {
    &CATALOG
}

/// Entry step of every process.
pub fn first() -> &'static StepDefinition {
    &CATALOG[0]
}

/// Definition for a step id. The id enumeration is closed, so this cannot
/// miss.
pub fn definition(id: StepId) -> &'static StepDefinition {
    // StepId variants are declared in catalog order.
    &CATALOG[id as usize]
}

/// Definition for a step id given as text.
///
/// # Errors
///
/// Returns `WorkflowError::UnknownStep` when the id is not in the catalog.
pub fn find(id: &str) -> Result<&'static StepDefinition> {
    id.parse::<StepId>()
        .map(definition)
        .map_err(|_| WorkflowError::UnknownStep { id: id.to_string() })
}

/// Required-field rules declared for a step.
pub fn required_rules(step: StepId) -> &'static [RequiredField] {
    match step {
        StepId::Primary => &PRIMARY_FIELDS,
        StepId::Services => &SERVICES_FIELDS,
        StepId::Fiscal => &FISCAL_FIELDS,
        _ => &[],
    }
}

/// Fields that must be answered before `step` is sent, given the current
/// data.
pub fn required_fields_for(step: StepId, data: &ProcessData) -> Vec<&'static str> {
    required_rules(step)
        .iter()
        .filter(|rule| rule.when.evaluate(data))
        .map(|rule| rule.field)
        .collect()
}

/// Required fields that are absent, null or blank. `false` counts as an
/// answer.
pub fn missing_required_fields(step: StepId, data: &ProcessData) -> Vec<&'static str> {
    required_fields_for(step, data)
        .into_iter()
        .filter(|field| !is_answered(data.get(*field)))
        .collect()
}

/// Check that `step` can be sent with `data`.
///
/// # Errors
///
/// Returns `WorkflowError::ValidationFailed` listing the missing fields.
pub fn validate_step(step: StepId, data: &ProcessData) -> Result<()> {
    let missing = missing_required_fields(step, data);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(WorkflowError::ValidationFailed {
            step,
            fields: missing.into_iter().map(String::from).collect(),
        })
    }
}

fn is_answered(value: Option<&serde_json::Value>) -> bool {
    match value {
        None | Some(serde_json::Value::Null) => false,
        Some(serde_json::Value::String(text)) => !text.trim().is_empty(),
        Some(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_definition_matches_id() {
        for definition in steps() {
            assert_eq!(super::definition(definition.id).id, definition.id);
        }
        assert_eq!(steps().len(), 10);
    }

    #[test]
    fn test_entry_and_exit_always_active() {
        assert_eq!(first().id, StepId::Primary);
        assert_eq!(first().activation, Condition::Always);
        let closure = steps().last().copied();
        assert_eq!(closure.map(|d| d.id), Some(StepId::Closure));
        assert_eq!(closure.map(|d| d.activation), Some(Condition::Always));
    }

    #[test]
    fn test_find_by_text() {
        assert_eq!(find("taxSystems").map(|d| d.title).ok(), Some("Sistemas Fiscais"));
        assert!(matches!(
            find("approval"),
            Err(WorkflowError::UnknownStep { ref id }) if id == "approval"
        ));
    }

    #[test]
    fn test_sla_budgets() {
        assert_eq!(definition(StepId::Fiscal).sla, SlaDuration::Hours(48));
        assert_eq!(definition(StepId::Finance).sla, SlaDuration::Hours(72));
        assert_eq!(definition(StepId::Costs).sla, SlaDuration::Hours(24));
        assert_eq!(definition(StepId::TaxSystems).sla, SlaDuration::Undetermined);
    }

    #[test]
    fn test_primary_required_fields() {
        let mut data = ProcessData::new();
        data.insert("nomeSolicitante".to_string(), json!("Ana"));
        data.insert("objetivo".to_string(), json!("  "));
        data.insert("itemNacional".to_string(), json!(false));
        data.insert("urgencia".to_string(), json!(null));

        assert_eq!(
            missing_required_fields(StepId::Primary, &data),
            vec!["objetivo", "descricao", "urgencia"]
        );
    }

    #[test]
    fn test_services_fields_depend_on_registration_type() {
        let mut data = ProcessData::new();
        data.insert("tipoCadastro".to_string(), json!("Outros"));
        assert_eq!(required_fields_for(StepId::Services, &data), vec!["tipoCadastro"]);

        data.insert("tipoCadastro".to_string(), json!("Peças"));
        assert_eq!(
            required_fields_for(StepId::Services, &data),
            vec!["tipoCadastro", "temperaturaMDG", "ncmCode"]
        );
    }

    #[test]
    fn test_validate_step() {
        let mut data = ProcessData::new();
        let err = validate_step(StepId::Fiscal, &data).unwrap_err();
        assert!(matches!(
            err,
            WorkflowError::ValidationFailed { step: StepId::Fiscal, ref fields }
                if fields == &vec!["requerParametrizacao".to_string()]
        ));

        data.insert("requerParametrizacao".to_string(), json!(false));
        assert!(validate_step(StepId::Fiscal, &data).is_ok());
        assert!(validate_step(StepId::Supply, &ProcessData::new()).is_ok());
    }
}

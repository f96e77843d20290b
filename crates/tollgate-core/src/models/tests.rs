#[cfg(test)]
mod model_tests {
    use jiff::Timestamp;
    use serde_json::json;

    use crate::{
        models::{
            HistoryAction, Process, ProcessFilter, Role, SlaDuration, StatusFilter, StepId,
            StepTiming,
        },
        params::ListProcesses,
    };

    fn created() -> Timestamp {
        Timestamp::from_second(1640995200).unwrap() // 2022-01-01 00:00:00 UTC
    }

    fn create_test_process(id: &str, requester: &str) -> Process {
        let mut process = Process::open(id.to_string(), created());
        process
            .data
            .insert("nomeSolicitante".to_string(), json!(requester));
        process
            .data
            .insert("objetivo".to_string(), json!("Cadastro de reagente"));
        process
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!("fiscal".parse::<Role>(), Ok(Role::Fiscal));
        assert_eq!("tax-systems".parse::<Role>(), Ok(Role::TaxSystems));
        assert_eq!("PRIMARY_REQUESTER".parse::<Role>(), Ok(Role::PrimaryRequester));
        assert_eq!(
            Role::Finance.title().to_uppercase().parse::<Role>(),
            Ok(Role::Finance)
        );
        assert!("auditor".parse::<Role>().is_err());

        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>(), Ok(role));
        }
    }

    #[test]
    fn test_step_id_parsing_and_wire_names() {
        assert_eq!("taxSystems".parse::<StepId>(), Ok(StepId::TaxSystems));
        assert_eq!("tax_systems".parse::<StepId>(), Ok(StepId::TaxSystems));
        assert!("approval".parse::<StepId>().is_err());

        assert_eq!(
            serde_json::to_value(StepId::TaxSystems).unwrap(),
            json!("taxSystems")
        );
        assert_eq!(StepId::Closure.to_string(), "closure");
    }

    #[test]
    fn test_sla_duration() {
        assert_eq!(SlaDuration::Hours(48).as_millis(), Some(48 * 3_600_000));
        assert_eq!(SlaDuration::Hours(0).as_millis(), None);
        assert_eq!(SlaDuration::Undetermined.as_millis(), None);
        assert_eq!(SlaDuration::Undetermined.to_string(), "to be defined");
        assert_eq!(SlaDuration::Hours(0).to_string(), "untimed");
    }

    #[test]
    fn test_process_serialization_shape() {
        let mut process = create_test_process("REQ-220101-001", "Ana");
        process.send_to_next(Some("ok".to_string()), created());

        let value = serde_json::to_value(&process).unwrap();
        assert_eq!(value["current_step_id"], json!("fiscal"));
        assert_eq!(value["history"][0]["action"], json!("sent"));
        assert_eq!(value["history"][0]["responsible"], json!("primary_requester"));
        assert!(value["steps_start"]["fiscal"]["started_at"].is_string());
        assert_eq!(value["steps_start"]["fiscal"]["sla"], json!({"hours": 48}));

        let parsed: Process = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, process);
    }

    #[test]
    fn test_process_accessors() {
        let mut process = create_test_process("REQ-220101-001", "Ana");
        assert_eq!(process.text_field("nomeSolicitante"), Some("Ana"));
        assert_eq!(process.text_field("itemNacional"), None);
        assert_eq!(
            process.current_timing(),
            Some(&StepTiming {
                started_at: created(),
                sla: SlaDuration::Hours(0)
            })
        );
        assert!(process.last_entry().is_none());

        process.save_draft(Default::default(), created());
        process.send_to_next(None, created());
        assert_eq!(
            process.last_entry().map(|e| e.action),
            Some(HistoryAction::Sent)
        );
        let actions: Vec<_> = process.chronological_history().map(|e| e.action).collect();
        assert_eq!(actions, vec![HistoryAction::Saved, HistoryAction::Sent]);
    }

    #[test]
    fn test_filter_status_and_search() {
        let open = create_test_process("REQ-220101-001", "Maria Silva");
        let mut closed = create_test_process("REQ-220101-002", "João Santos");
        closed.closed = true;

        let pending = ProcessFilter {
            status: StatusFilter::Pending,
            ..Default::default()
        };
        assert!(pending.matches(&open));
        assert!(!pending.matches(&closed));

        let completed = ProcessFilter::from(&ListProcesses {
            status: StatusFilter::Completed,
            ..Default::default()
        });
        assert!(completed.matches(&closed));
        assert!(!completed.matches(&open));

        let by_name = ProcessFilter {
            search: Some("SILVA".to_string()),
            ..Default::default()
        };
        assert!(by_name.matches(&open));
        assert!(!by_name.matches(&closed));

        let by_id = ProcessFilter {
            search: Some("-002".to_string()),
            ..Default::default()
        };
        assert!(by_id.matches(&closed));

        let blank = ProcessFilter {
            search: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(blank.matches(&open) && blank.matches(&closed));
    }

    #[test]
    fn test_filter_responsible() {
        let process = create_test_process("REQ-220101-001", "Ana");
        let mine = ProcessFilter {
            responsible: Some(Role::PrimaryRequester),
            ..Default::default()
        };
        let theirs = ProcessFilter {
            responsible: Some(Role::Fiscal),
            ..Default::default()
        };
        assert!(mine.matches(&process));
        assert!(!theirs.matches(&process));
    }

    #[test]
    fn test_status_filter_parsing() {
        assert_eq!("open".parse::<StatusFilter>(), Ok(StatusFilter::Pending));
        assert_eq!("Completed".parse::<StatusFilter>(), Ok(StatusFilter::Completed));
        assert!("archived".parse::<StatusFilter>().is_err());
    }
}

//! Demo processes for an empty store.

use jiff::{SignedDuration, Timestamp};
use serde_json::json;

use crate::models::{Process, ProcessData};

fn answers(pairs: &[(&str, serde_json::Value)]) -> ProcessData {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.clone()))
        .collect()
}

/// Two processes walked through the real state machine: the newer one is
/// waiting on fiscal, the older one on the services specialist.
pub fn demo_processes(prefix: &str, now: Timestamp) -> Vec<Process> {
    let date = now
        .to_zoned(jiff::tz::TimeZone::UTC)
        .strftime("%y%m%d")
        .to_string();
    let hours_ago = |hours: i64| now - SignedDuration::from_hours(hours);

    let mut services = Process::open(format!("{prefix}-{date}-001"), hours_ago(30));
    services.save_draft(
        answers(&[
            ("nomeSolicitante", json!("João Santos")),
            ("objetivo", json!("Reposição de peças do cromatógrafo")),
            ("tipoCadastro", json!("Peças")),
            ("itemNacional", json!(true)),
            ("urgencia", json!("Médio")),
        ]),
        hours_ago(29),
    );
    services.send_to_next(None, hours_ago(28));

    let mut fiscal = Process::open(format!("{prefix}-{date}-002"), hours_ago(12));
    fiscal.save_draft(
        answers(&[
            ("nomeSolicitante", json!("Maria Silva")),
            ("objetivo", json!("Cadastro de reagente importado")),
            ("tipoCadastro", json!("Material")),
            ("itemNacional", json!(false)),
            ("urgencia", json!("Urgente")),
        ]),
        hours_ago(11),
    );
    fiscal.send_to_next(Some("Prioridade alta".to_string()), hours_ago(10));

    vec![fiscal, services]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StepId;

    #[test]
    fn test_demo_processes() {
        let now = Timestamp::from_second(1_736_000_000).unwrap();
        let processes = demo_processes("REQ", now);

        assert_eq!(processes.len(), 2);
        assert_eq!(processes[0].current_step_id, StepId::Fiscal);
        assert_eq!(processes[1].current_step_id, StepId::Services);
        assert!(processes.iter().all(|p| !p.closed && p.history.len() == 2));
        assert!(processes[0].id.starts_with("REQ-"));
        assert!(processes[0].id.ends_with("-002"));
    }
}

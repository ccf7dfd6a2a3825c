use roboadvisor_core::config::{AppConfig, LoadOptions};
use roboadvisor_core::dialog::{DialogAction, InvocationSource, LexRequest};
use roboadvisor_core::{recommend, RiskLevel, SlotName, Slots, TurnDispatcher};
use serde::Serialize;

use crate::commands::{escape_json, CommandResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

pub fn run(json_output: bool) -> CommandResult {
    let report = build_report();
    let exit_code = if report.overall_status == CheckStatus::Pass { 0 } else { 3 };

    if json_output {
        let output = serde_json::to_string(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                escape_json(&error.to_string())
            )
        });
        return CommandResult { exit_code, output };
    }

    CommandResult { exit_code, output: render_human(&report) }
}

fn build_report() -> DoctorReport {
    let mut checks = Vec::new();

    match AppConfig::load(LoadOptions::default()) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });
            let dispatcher = TurnDispatcher::from_config(&config.dialog);
            checks.push(check_dispatcher_registration(&dispatcher, &config));
            checks.push(check_sample_turns(&dispatcher, &config.dialog.intent_name));
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            for name in ["dispatcher_registration", "sample_turns"] {
                checks.push(DoctorCheck {
                    name,
                    status: CheckStatus::Skipped,
                    details: "skipped because configuration did not load".to_string(),
                });
            }
        }
    }

    let all_pass = checks.iter().all(|check| check.status == CheckStatus::Pass);
    let overall_status = if all_pass { CheckStatus::Pass } else { CheckStatus::Fail };
    let summary = if all_pass {
        "doctor: all readiness checks passed".to_string()
    } else {
        "doctor: one or more readiness checks failed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

fn check_dispatcher_registration(dispatcher: &TurnDispatcher, config: &AppConfig) -> DoctorCheck {
    let intents = dispatcher.supported_intents();
    if intents.contains(&config.dialog.intent_name.as_str()) {
        DoctorCheck {
            name: "dispatcher_registration",
            status: CheckStatus::Pass,
            details: format!("handling intents: {}", intents.join(", ")),
        }
    } else {
        DoctorCheck {
            name: "dispatcher_registration",
            status: CheckStatus::Fail,
            details: format!("intent `{}` has no handler", config.dialog.intent_name),
        }
    }
}

enum Expected {
    Elicit(SlotName),
    Delegate,
    CloseWith(&'static str),
}

fn check_sample_turns(dispatcher: &TurnDispatcher, intent_name: &str) -> DoctorCheck {
    let valid_slots = Slots::new()
        .with(SlotName::FirstName, "Doctor")
        .with(SlotName::Age, "30")
        .with(SlotName::InvestmentAmount, "10000")
        .with(SlotName::RiskLevel, "Medium");

    let samples = [
        (
            "invalid_age",
            InvocationSource::DialogCodeHook,
            Slots::new().with(SlotName::Age, "70"),
            Expected::Elicit(SlotName::Age),
        ),
        ("valid_slots", InvocationSource::DialogCodeHook, valid_slots.clone(), Expected::Delegate),
        (
            "fulfillment",
            InvocationSource::FulfillmentCodeHook,
            valid_slots,
            Expected::CloseWith(recommend(RiskLevel::Medium)),
        ),
    ];
    let total = samples.len();

    let failures = samples
        .into_iter()
        .filter_map(|(label, source, slots, expected)| {
            let outcome = dispatcher.dispatch(LexRequest::new(intent_name, source, slots));
            let passed = match (outcome, expected) {
                (Ok(response), Expected::Elicit(slot)) => matches!(
                    response.dialog_action,
                    DialogAction::ElicitSlot { slot_to_elicit, .. } if slot_to_elicit == slot
                ),
                (Ok(response), Expected::Delegate) => {
                    matches!(response.dialog_action, DialogAction::Delegate { .. })
                }
                (Ok(response), Expected::CloseWith(allocation)) => matches!(
                    &response.dialog_action,
                    DialogAction::Close { message, .. } if message.content.contains(allocation)
                ),
                (Err(_), _) => false,
            };
            (!passed).then_some(label)
        })
        .collect::<Vec<_>>();

    if failures.is_empty() {
        DoctorCheck {
            name: "sample_turns",
            status: CheckStatus::Pass,
            details: format!("{total} sample turns produced the expected dialog actions"),
        }
    } else {
        DoctorCheck {
            name: "sample_turns",
            status: CheckStatus::Fail,
            details: format!("unexpected dialog actions for: {}", failures.join(", ")),
        }
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}

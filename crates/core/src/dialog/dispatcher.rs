use thiserror::Error;
use tracing::{debug, warn};

use crate::audit::{AuditCategory, AuditContext, AuditEvent, AuditOutcome, AuditSink};
use crate::config::DialogConfig;
use crate::dialog::envelope::{
    DialogAction, DialogResponse, FulfillmentState, InvocationSource, LexRequest, Message,
};
use crate::domain::{RiskLevel, SlotName};
use crate::recommendation::recommend;
use crate::validation::{FieldValidator, ValidationResult};

pub const DEFAULT_INTENT_NAME: &str = "recommendPortfolio";

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error("intent with name `{intent}` is not supported")]
    UnsupportedIntent { intent: String },
    #[error("slot `{slot}` reached fulfillment without a valid value ({value:?})")]
    UnvalidatedSlot { slot: SlotName, value: Option<String> },
}

/// Handles every turn for one intent.
pub trait IntentHandler: Send + Sync {
    fn intent_name(&self) -> &str;
    fn handle(&self, request: LexRequest) -> Result<DialogResponse, DispatchError>;
}

/// Validates portfolio slots while the dialog is in progress and answers with a recommendation
/// once the platform asks for fulfillment.
#[derive(Clone, Debug)]
pub struct RecommendPortfolioHandler {
    intent_name: String,
    validator: FieldValidator,
}

impl Default for RecommendPortfolioHandler {
    fn default() -> Self {
        Self::new(DEFAULT_INTENT_NAME)
    }
}

impl RecommendPortfolioHandler {
    pub fn new(intent_name: impl Into<String>) -> Self {
        Self { intent_name: intent_name.into(), validator: FieldValidator }
    }

    fn validate_turn(&self, request: LexRequest) -> DialogResponse {
        let LexRequest { current_intent, session_attributes, .. } = request;
        let mut slots = current_intent.slots;

        match self.validator.validate(&slots) {
            ValidationResult::Valid => DialogResponse::delegate(session_attributes, slots),
            ValidationResult::Invalid(violation) => {
                slots.clear(violation.slot);
                DialogResponse::elicit_slot(
                    session_attributes,
                    current_intent.name,
                    slots,
                    violation.slot,
                    Message::plain_text(violation.message),
                )
            }
        }
    }

    fn fulfill(&self, request: LexRequest) -> Result<DialogResponse, DispatchError> {
        let raw = request.slots().get(SlotName::RiskLevel);
        let risk_level = raw.and_then(|value| value.parse::<RiskLevel>().ok()).ok_or_else(|| {
            DispatchError::UnvalidatedSlot {
                slot: SlotName::RiskLevel,
                value: raw.map(str::to_string),
            }
        })?;

        Ok(DialogResponse::close(
            request.session_attributes,
            FulfillmentState::Fulfilled,
            Message::plain_text(fulfillment_message(risk_level)),
        ))
    }
}

impl IntentHandler for RecommendPortfolioHandler {
    fn intent_name(&self) -> &str {
        &self.intent_name
    }

    fn handle(&self, request: LexRequest) -> Result<DialogResponse, DispatchError> {
        match request.invocation_source {
            InvocationSource::DialogCodeHook => Ok(self.validate_turn(request)),
            InvocationSource::FulfillmentCodeHook => self.fulfill(request),
        }
    }
}

pub fn fulfillment_message(risk_level: RiskLevel) -> String {
    format!(
        "Thank you for your information. Your recommended portfolio: {}.",
        recommend(risk_level)
    )
}

/// Routes a dialog turn to the handler registered for its intent.
pub struct TurnDispatcher {
    handlers: Vec<Box<dyn IntentHandler>>,
}

impl Default for TurnDispatcher {
    fn default() -> Self {
        Self::new().with_handler(RecommendPortfolioHandler::default())
    }
}

impl TurnDispatcher {
    pub fn new() -> Self {
        Self { handlers: Vec::new() }
    }

    pub fn from_config(config: &DialogConfig) -> Self {
        Self::new().with_handler(RecommendPortfolioHandler::new(config.intent_name.clone()))
    }

    pub fn with_handler<H>(mut self, handler: H) -> Self
    where
        H: IntentHandler + 'static,
    {
        self.handlers.push(Box::new(handler));
        self
    }

    pub fn supported_intents(&self) -> Vec<&str> {
        self.handlers.iter().map(|handler| handler.intent_name()).collect()
    }

    pub fn dispatch(&self, request: LexRequest) -> Result<DialogResponse, DispatchError> {
        let Some(handler) =
            self.handlers.iter().find(|handler| handler.intent_name() == request.intent_name())
        else {
            return Err(DispatchError::UnsupportedIntent {
                intent: request.current_intent.name,
            });
        };

        debug!(
            event_name = "dialog.turn.routed",
            intent = request.intent_name(),
            invocation_source = ?request.invocation_source,
            "routing dialog turn"
        );
        handler.handle(request)
    }

    pub fn dispatch_with_audit<S>(
        &self,
        request: LexRequest,
        sink: &S,
        audit: &AuditContext,
    ) -> Result<DialogResponse, DispatchError>
    where
        S: AuditSink + ?Sized,
    {
        let intent = request.intent_name().to_string();
        let source = request.invocation_source;
        let result = self.dispatch(request);

        let event = match &result {
            Ok(response) => {
                let (event_type, category, outcome) = match &response.dialog_action {
                    DialogAction::ElicitSlot { .. } => {
                        ("dialog.turn.elicited", AuditCategory::Validation, AuditOutcome::Rejected)
                    }
                    DialogAction::Delegate { .. } => {
                        ("dialog.turn.delegated", AuditCategory::Validation, AuditOutcome::Success)
                    }
                    DialogAction::Close { .. } => {
                        ("dialog.turn.fulfilled", AuditCategory::Fulfillment, AuditOutcome::Success)
                    }
                };
                let event = AuditEvent::new(audit, event_type, category, outcome)
                    .with_metadata("intent", intent)
                    .with_metadata("invocation_source", format!("{source:?}"))
                    .with_metadata("dialog_action", response.dialog_action.kind());
                match &response.dialog_action {
                    DialogAction::ElicitSlot { slot_to_elicit, .. } => {
                        event.with_metadata("slot_to_elicit", slot_to_elicit.as_str())
                    }
                    _ => event,
                }
            }
            Err(error) => {
                warn!(
                    event_name = "dialog.turn.dispatch_failed",
                    correlation_id = %audit.correlation_id,
                    intent = %intent,
                    error = %error,
                    "dialog turn could not be dispatched"
                );
                AuditEvent::new(
                    audit,
                    "dialog.turn.failed",
                    AuditCategory::Ingress,
                    AuditOutcome::Failed,
                )
                .with_metadata("intent", intent)
                .with_metadata("invocation_source", format!("{source:?}"))
                .with_metadata("error", error.to_string())
            }
        };
        sink.emit(event);

        result
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::{
        DispatchError, IntentHandler, RecommendPortfolioHandler, TurnDispatcher,
        DEFAULT_INTENT_NAME,
    };
    use crate::audit::{AuditContext, AuditOutcome, InMemoryAuditSink};
    use crate::config::DialogConfig;
    use crate::dialog::envelope::{
        DialogAction, DialogResponse, FulfillmentState, InvocationSource, LexRequest,
    };
    use crate::domain::{SlotName, Slots};
    use crate::validation::AGE_MESSAGE;

    fn portfolio_slots(age: &str, amount: &str, risk: &str) -> Slots {
        Slots::new()
            .with(SlotName::FirstName, "Ada")
            .with(SlotName::Age, age)
            .with(SlotName::InvestmentAmount, amount)
            .with(SlotName::RiskLevel, risk)
    }

    fn request(source: InvocationSource, slots: Slots) -> LexRequest {
        LexRequest::new(DEFAULT_INTENT_NAME, source, slots)
    }

    #[test]
    fn invalid_age_elicits_the_age_slot_again() {
        let dispatcher = TurnDispatcher::default();
        let slots = Slots::new().with(SlotName::Age, "70");

        let response = dispatcher
            .dispatch(request(InvocationSource::DialogCodeHook, slots))
            .expect("dialog turn should dispatch");

        match response.dialog_action {
            DialogAction::ElicitSlot { intent_name, slots, slot_to_elicit, message } => {
                assert_eq!(intent_name, DEFAULT_INTENT_NAME);
                assert_eq!(slot_to_elicit, SlotName::Age);
                assert_eq!(slots.raw("age"), Some(&None));
                assert_eq!(message.content, AGE_MESSAGE);
            }
            other => panic!("expected ElicitSlot, got {other:?}"),
        }
    }

    #[test]
    fn only_the_first_violation_is_reported_and_cleared() {
        let dispatcher = TurnDispatcher::default();
        let slots = portfolio_slots("0", "10", "reckless");

        let response = dispatcher
            .dispatch(request(InvocationSource::DialogCodeHook, slots))
            .expect("dialog turn should dispatch");

        let DialogAction::ElicitSlot { slots, slot_to_elicit, .. } = response.dialog_action else {
            panic!("expected ElicitSlot");
        };
        assert_eq!(slot_to_elicit, SlotName::Age);
        assert_eq!(slots.get(SlotName::InvestmentAmount), Some("10"));
        assert_eq!(slots.get(SlotName::RiskLevel), Some("reckless"));
    }

    #[test]
    fn valid_slots_delegate_with_slots_intact() {
        let dispatcher = TurnDispatcher::default();
        let slots = portfolio_slots("30", "10000", "Medium");

        let response = dispatcher
            .dispatch(request(InvocationSource::DialogCodeHook, slots.clone()))
            .expect("dialog turn should dispatch");

        assert_eq!(response.dialog_action, DialogAction::Delegate { slots });
    }

    #[test]
    fn partially_collected_slots_still_delegate() {
        let dispatcher = TurnDispatcher::default();
        let slots = Slots::new().with(SlotName::Age, "42");

        let response = dispatcher
            .dispatch(request(InvocationSource::DialogCodeHook, slots))
            .expect("dialog turn should dispatch");

        assert_eq!(response.dialog_action.kind(), "Delegate");
    }

    #[test]
    fn fulfillment_closes_with_the_recommendation() {
        let dispatcher = TurnDispatcher::default();
        let slots = portfolio_slots("30", "10000", "Medium");

        let response = dispatcher
            .dispatch(request(InvocationSource::FulfillmentCodeHook, slots))
            .expect("fulfillment should dispatch");

        let DialogAction::Close { fulfillment_state, message } = response.dialog_action else {
            panic!("expected Close");
        };
        assert_eq!(fulfillment_state, FulfillmentState::Fulfilled);
        assert!(message.content.contains("40% bonds (AGG), 60% equities (SPY)"));
    }

    #[test]
    fn fulfillment_without_a_valid_risk_level_is_an_error() {
        let dispatcher = TurnDispatcher::default();

        let error = dispatcher
            .dispatch(request(InvocationSource::FulfillmentCodeHook, Slots::new()))
            .expect_err("missing risk level must not be fulfilled");
        assert_eq!(error, DispatchError::UnvalidatedSlot { slot: SlotName::RiskLevel, value: None });

        let error = dispatcher
            .dispatch(request(
                InvocationSource::FulfillmentCodeHook,
                Slots::new().with(SlotName::RiskLevel, "extreme"),
            ))
            .expect_err("unknown risk level must not be fulfilled");
        assert!(matches!(error, DispatchError::UnvalidatedSlot { value: Some(_), .. }));
    }

    #[test]
    fn unsupported_intent_is_fatal() {
        let dispatcher = TurnDispatcher::default();
        let request = LexRequest::new(
            "orderFlowers",
            InvocationSource::DialogCodeHook,
            portfolio_slots("30", "10000", "Medium"),
        );

        let error = dispatcher.dispatch(request).expect_err("unknown intent must fail");
        assert_eq!(error, DispatchError::UnsupportedIntent { intent: "orderFlowers".to_string() });
        assert!(error.to_string().contains("orderFlowers"));
    }

    #[test]
    fn session_attributes_pass_through_every_response_shape() {
        let dispatcher = TurnDispatcher::default();
        for (source, age) in [
            (InvocationSource::DialogCodeHook, "70"),
            (InvocationSource::DialogCodeHook, "30"),
            (InvocationSource::FulfillmentCodeHook, "30"),
        ] {
            let mut request = request(source, portfolio_slots(age, "10000", "low"));
            request.session_attributes.insert("channel".to_string(), Value::from("web"));

            let response: DialogResponse = dispatcher.dispatch(request).expect("dispatch");
            assert_eq!(response.session_attributes.get("channel"), Some(&json!("web")));
        }
    }

    #[test]
    fn configured_intent_name_replaces_the_default() {
        let dispatcher =
            TurnDispatcher::from_config(&DialogConfig { intent_name: "portfolioAdvice".to_string() });
        assert_eq!(dispatcher.supported_intents(), vec!["portfolioAdvice"]);

        let error = dispatcher
            .dispatch(request(InvocationSource::DialogCodeHook, Slots::new()))
            .expect_err("default intent is no longer registered");
        assert!(matches!(error, DispatchError::UnsupportedIntent { .. }));
    }

    #[test]
    fn handler_reports_its_intent_name() {
        assert_eq!(RecommendPortfolioHandler::default().intent_name(), DEFAULT_INTENT_NAME);
    }

    #[test]
    fn audited_dispatch_records_turn_outcomes() {
        let dispatcher = TurnDispatcher::default();
        let sink = InMemoryAuditSink::default();
        let audit = AuditContext::new(Some("user-1".to_string()), "req-9", "test");

        dispatcher
            .dispatch_with_audit(
                request(InvocationSource::DialogCodeHook, Slots::new().with(SlotName::Age, "99")),
                &sink,
                &audit,
            )
            .expect("dispatch");
        dispatcher
            .dispatch_with_audit(
                LexRequest::new("other", InvocationSource::DialogCodeHook, Slots::new()),
                &sink,
                &audit,
            )
            .expect_err("unsupported intent");

        let events = sink.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].event_type, "dialog.turn.elicited");
        assert_eq!(events[0].metadata.get("slot_to_elicit").map(String::as_str), Some("age"));
        assert_eq!(events[1].event_type, "dialog.turn.failed");
        assert_eq!(events[1].outcome, AuditOutcome::Failed);
        assert!(events.iter().all(|event| event.correlation_id == "req-9"));
    }
}

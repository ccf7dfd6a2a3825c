use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::{SlotName, Slots};

pub type SessionAttributes = Map<String, Value>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvocationSource {
    DialogCodeHook,
    FulfillmentCodeHook,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentIntent {
    pub name: String,
    #[serde(default)]
    pub slots: Slots,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotInfo {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

/// A single dialog turn as delivered by the conversational platform.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LexRequest {
    pub current_intent: CurrentIntent,
    pub invocation_source: InvocationSource,
    #[serde(default)]
    pub session_attributes: SessionAttributes,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bot: Option<BotInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_transcript: Option<String>,
}

impl LexRequest {
    pub fn new(intent_name: impl Into<String>, source: InvocationSource, slots: Slots) -> Self {
        Self {
            current_intent: CurrentIntent { name: intent_name.into(), slots },
            invocation_source: source,
            session_attributes: SessionAttributes::new(),
            message_version: None,
            user_id: None,
            bot: None,
            input_transcript: None,
        }
    }

    pub fn intent_name(&self) -> &str {
        &self.current_intent.name
    }

    pub fn slots(&self) -> &Slots {
        &self.current_intent.slots
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentType {
    PlainText,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub content_type: ContentType,
    pub content: String,
}

impl Message {
    pub fn plain_text(content: impl Into<String>) -> Self {
        Self { content_type: ContentType::PlainText, content: content.into() }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FulfillmentState {
    Fulfilled,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DialogAction {
    #[serde(rename_all = "camelCase")]
    ElicitSlot { intent_name: String, slots: Slots, slot_to_elicit: SlotName, message: Message },
    #[serde(rename_all = "camelCase")]
    Delegate { slots: Slots },
    #[serde(rename_all = "camelCase")]
    Close { fulfillment_state: FulfillmentState, message: Message },
}

impl DialogAction {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ElicitSlot { .. } => "ElicitSlot",
            Self::Delegate { .. } => "Delegate",
            Self::Close { .. } => "Close",
        }
    }
}

/// Response handed back to the platform at the end of a turn.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogResponse {
    pub session_attributes: SessionAttributes,
    pub dialog_action: DialogAction,
}

impl DialogResponse {
    pub fn elicit_slot(
        session_attributes: SessionAttributes,
        intent_name: impl Into<String>,
        slots: Slots,
        slot_to_elicit: SlotName,
        message: Message,
    ) -> Self {
        Self {
            session_attributes,
            dialog_action: DialogAction::ElicitSlot {
                intent_name: intent_name.into(),
                slots,
                slot_to_elicit,
                message,
            },
        }
    }

    pub fn delegate(session_attributes: SessionAttributes, slots: Slots) -> Self {
        Self { session_attributes, dialog_action: DialogAction::Delegate { slots } }
    }

    pub fn close(
        session_attributes: SessionAttributes,
        fulfillment_state: FulfillmentState,
        message: Message,
    ) -> Self {
        Self { session_attributes, dialog_action: DialogAction::Close { fulfillment_state, message } }
    }
}

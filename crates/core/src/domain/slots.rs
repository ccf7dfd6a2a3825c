use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Slots the portfolio intent collects from the user.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlotName {
    #[serde(rename = "firstName")]
    FirstName,
    #[serde(rename = "age")]
    Age,
    #[serde(rename = "investmentAmount")]
    InvestmentAmount,
    #[serde(rename = "riskLevel")]
    RiskLevel,
}

impl SlotName {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FirstName => "firstName",
            Self::Age => "age",
            Self::InvestmentAmount => "investmentAmount",
            Self::RiskLevel => "riskLevel",
        }
    }
}

impl fmt::Display for SlotName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Slot values as the dialog platform sends them.
///
/// A `null` value and a missing key both read as "not yet provided". Slots this handler does not
/// know about are kept so they round-trip back to the platform unchanged.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Slots(BTreeMap<String, Option<String>>);

impl Slots {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, slot: SlotName, value: impl Into<String>) -> Self {
        self.0.insert(slot.as_str().to_string(), Some(value.into()));
        self
    }

    pub fn get(&self, slot: SlotName) -> Option<&str> {
        self.0.get(slot.as_str()).and_then(|value| value.as_deref())
    }

    pub fn set(&mut self, slot: SlotName, value: Option<String>) {
        self.0.insert(slot.as_str().to_string(), value);
    }

    /// Clears the value but keeps the key, so the platform still sees the slot as declared.
    pub fn clear(&mut self, slot: SlotName) {
        self.set(slot, None);
    }

    pub fn raw(&self, name: &str) -> Option<&Option<String>> {
        self.0.get(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{SlotName, Slots};

    #[test]
    fn null_and_missing_slots_read_as_absent() {
        let slots: Slots = serde_json::from_value(json!({
            "age": null,
            "riskLevel": "Low"
        }))
        .expect("slots should deserialize");

        assert_eq!(slots.get(SlotName::Age), None);
        assert_eq!(slots.get(SlotName::InvestmentAmount), None);
        assert_eq!(slots.get(SlotName::RiskLevel), Some("Low"));
    }

    #[test]
    fn clear_keeps_the_key_with_a_null_value() {
        let mut slots = Slots::new().with(SlotName::Age, "70");
        slots.clear(SlotName::Age);

        assert_eq!(slots.raw("age"), Some(&None));
        assert_eq!(serde_json::to_value(&slots).expect("serialize"), json!({ "age": null }));
    }

    #[test]
    fn unknown_slots_survive_a_round_trip() {
        let input = json!({ "age": "30", "favouriteColour": "teal" });
        let slots: Slots = serde_json::from_value(input.clone()).expect("deserialize");

        assert_eq!(slots.len(), 2);
        assert_eq!(serde_json::to_value(&slots).expect("serialize"), input);
    }
}

use std::num::IntErrorKind;

use serde::{Deserialize, Serialize};

use crate::domain::{RiskLevel, SlotName, Slots};

pub const MIN_AGE_EXCLUSIVE: i64 = 0;
pub const MAX_AGE_EXCLUSIVE: i64 = 65;
pub const MIN_INVESTMENT_AMOUNT: i64 = 5000;

pub const AGE_MESSAGE: &str = "Your age must be greater than 0 and less than 65 to use this \
                               service, please provide a different age.";
pub const INVESTMENT_AMOUNT_MESSAGE: &str = "Your investment must be greater than or equal to \
                                             $5000, please provide a different investment amount.";
pub const RISK_LEVEL_MESSAGE: &str = "The selected risk level is not valid, please choose a valid \
                                      risk level for your investment ('None', 'Low', 'Medium', \
                                      'High').";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotViolation {
    pub slot: SlotName,
    pub message: String,
}

/// Outcome of checking the collected slots.
///
/// A violation always carries both the offending slot and the user-facing message, and a valid
/// result carries neither.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ValidationResult {
    Valid,
    Invalid(SlotViolation),
}

impl ValidationResult {
    fn invalid(slot: SlotName, message: &str) -> Self {
        Self::Invalid(SlotViolation { slot, message: message.to_string() })
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    pub fn violated_slot(&self) -> Option<SlotName> {
        match self {
            Self::Valid => None,
            Self::Invalid(violation) => Some(violation.slot),
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Valid => None,
            Self::Invalid(violation) => Some(&violation.message),
        }
    }
}

/// Checks the portfolio slots that have been provided so far.
///
/// Rules run in order (age, investment amount, risk level) and the first failure wins. Slots
/// without a value are skipped so the platform can keep eliciting them one at a time.
pub fn validate_slots(
    age: Option<&str>,
    investment_amount: Option<&str>,
    risk_level: Option<&str>,
) -> ValidationResult {
    if let Some(age) = age {
        let in_range = parse_whole_number(age)
            .ok()
            .is_some_and(|age| age > MIN_AGE_EXCLUSIVE && age < MAX_AGE_EXCLUSIVE);
        if !in_range {
            return ValidationResult::invalid(SlotName::Age, AGE_MESSAGE);
        }
    }

    if let Some(amount) = investment_amount {
        let sufficient = match parse_whole_number(amount) {
            Ok(amount) => amount >= MIN_INVESTMENT_AMOUNT,
            Err(IntErrorKind::PosOverflow) => true,
            Err(_) => false,
        };
        if !sufficient {
            return ValidationResult::invalid(SlotName::InvestmentAmount, INVESTMENT_AMOUNT_MESSAGE);
        }
    }

    if let Some(risk_level) = risk_level {
        if risk_level.parse::<RiskLevel>().is_err() {
            return ValidationResult::invalid(SlotName::RiskLevel, RISK_LEVEL_MESSAGE);
        }
    }

    ValidationResult::Valid
}

#[derive(Clone, Copy, Debug, Default)]
pub struct FieldValidator;

impl FieldValidator {
    pub fn validate(&self, slots: &Slots) -> ValidationResult {
        validate_slots(
            slots.get(SlotName::Age),
            slots.get(SlotName::InvestmentAmount),
            slots.get(SlotName::RiskLevel),
        )
    }
}

// Decimals and words fail to parse. Overflow is reported by kind so callers can still compare it.
fn parse_whole_number(raw: &str) -> Result<i64, IntErrorKind> {
    raw.trim().parse::<i64>().map_err(|error| error.kind().clone())
}

#[cfg(test)]
mod tests {
    use super::{
        validate_slots, FieldValidator, ValidationResult, AGE_MESSAGE, INVESTMENT_AMOUNT_MESSAGE,
        RISK_LEVEL_MESSAGE,
    };
    use crate::domain::{SlotName, Slots};

    #[test]
    fn ages_inside_the_open_range_are_accepted() {
        for age in 1..65 {
            let result = validate_slots(Some(&age.to_string()), None, None);
            assert!(result.is_valid(), "age {age} should be accepted");
        }
    }

    #[test]
    fn ages_outside_the_open_range_are_rejected() {
        for age in [-30, -1, 0, 65, 66, 70, 120] {
            let result = validate_slots(Some(&age.to_string()), None, None);
            assert_eq!(result.violated_slot(), Some(SlotName::Age), "age {age} should fail");
            assert_eq!(result.message(), Some(AGE_MESSAGE));
        }
    }

    #[test]
    fn investment_amount_threshold_is_inclusive() {
        assert!(validate_slots(None, Some("5000"), None).is_valid());
        assert!(validate_slots(None, Some("1000000"), None).is_valid());

        for amount in ["4999", "0", "-5000"] {
            let result = validate_slots(None, Some(amount), None);
            assert_eq!(result.violated_slot(), Some(SlotName::InvestmentAmount));
            assert_eq!(result.message(), Some(INVESTMENT_AMOUNT_MESSAGE));
        }
    }

    #[test]
    fn risk_level_membership_ignores_case() {
        for risk in ["None", "LOW", "medium", "High"] {
            assert!(validate_slots(None, None, Some(risk)).is_valid(), "{risk} should pass");
        }

        let result = validate_slots(None, None, Some("aggressive"));
        assert_eq!(result.violated_slot(), Some(SlotName::RiskLevel));
        assert_eq!(result.message(), Some(RISK_LEVEL_MESSAGE));
    }

    #[test]
    fn non_numeric_values_are_rejected_explicitly() {
        for raw in ["thirty", "30.5", "", "NaN", "-99999999999999999999"] {
            assert_eq!(
                validate_slots(Some(raw), None, None).violated_slot(),
                Some(SlotName::Age),
                "age `{raw}` should fail"
            );
            assert_eq!(
                validate_slots(None, Some(raw), None).violated_slot(),
                Some(SlotName::InvestmentAmount),
                "amount `{raw}` should fail"
            );
        }
    }

    #[test]
    fn amounts_beyond_i64_are_still_sufficient() {
        let result = validate_slots(Some("30"), Some("99999999999999999999"), Some("low"));
        assert!(result.is_valid(), "huge amount should pass: {result:?}");

        assert_eq!(
            validate_slots(Some("99999999999999999999"), None, None).violated_slot(),
            Some(SlotName::Age)
        );
    }

    #[test]
    fn surrounding_whitespace_is_tolerated_for_numbers() {
        assert!(validate_slots(Some(" 30 "), Some("5000\n"), None).is_valid());
    }

    #[test]
    fn first_failure_short_circuits_later_checks() {
        let result = validate_slots(Some("70"), Some("10"), Some("reckless"));
        assert_eq!(result.violated_slot(), Some(SlotName::Age));

        let result = validate_slots(Some("30"), Some("10"), Some("reckless"));
        assert_eq!(result.violated_slot(), Some(SlotName::InvestmentAmount));
    }

    #[test]
    fn absent_slots_are_not_treated_as_invalid() {
        assert_eq!(validate_slots(None, None, None), ValidationResult::Valid);
    }

    #[test]
    fn valid_result_has_no_violation_details() {
        let result = validate_slots(Some("30"), Some("10000"), Some("Medium"));
        assert!(result.is_valid());
        assert_eq!(result.violated_slot(), None);
        assert_eq!(result.message(), None);
    }

    #[test]
    fn field_validator_reads_values_from_slots() {
        let slots = Slots::new()
            .with(SlotName::FirstName, "Ada")
            .with(SlotName::Age, "30")
            .with(SlotName::InvestmentAmount, "2500");

        let result = FieldValidator.validate(&slots);
        assert_eq!(result.violated_slot(), Some(SlotName::InvestmentAmount));
    }
}

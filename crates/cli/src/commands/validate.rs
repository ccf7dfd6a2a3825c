use roboadvisor_core::{validate_slots, ValidationResult};

use crate::commands::CommandResult;

pub fn run(
    age: Option<&str>,
    investment_amount: Option<&str>,
    risk_level: Option<&str>,
) -> CommandResult {
    match validate_slots(age, investment_amount, risk_level) {
        ValidationResult::Valid => {
            CommandResult::success("validate", "all provided slots are valid")
        }
        ValidationResult::Invalid(violation) => CommandResult::failure(
            "validate",
            &format!("invalid_{}", violation.slot),
            violation.message,
            1,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::run;

    #[test]
    fn invalid_slot_is_reported_as_error_class() {
        let result = run(Some("70"), None, None);

        assert_eq!(result.exit_code, 1);
        assert!(result.output.contains("\"error_class\":\"invalid_age\""));
    }

    #[test]
    fn no_values_is_valid() {
        assert_eq!(run(None, None, None).exit_code, 0);
    }
}

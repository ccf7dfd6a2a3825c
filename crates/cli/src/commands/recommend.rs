use roboadvisor_core::recommend_raw;

use crate::commands::CommandResult;

pub fn run(risk_level: &str) -> CommandResult {
    match recommend_raw(risk_level) {
        Ok(allocation) => CommandResult::success("recommend", allocation),
        Err(error) => CommandResult::failure("recommend", "unknown_risk_level", error.to_string(), 1),
    }
}

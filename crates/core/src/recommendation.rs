use thiserror::Error;

use crate::domain::RiskLevel;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RecommendationError {
    #[error("no portfolio is defined for risk level `{0}`")]
    UnknownRiskLevel(String),
}

/// Bond/equity allocation for a risk level.
pub fn recommend(risk_level: RiskLevel) -> &'static str {
    match risk_level {
        RiskLevel::None => "100% bonds (AGG), 0% equities (SPY)",
        RiskLevel::Low => "60% bonds (AGG), 40% equities (SPY)",
        RiskLevel::Medium => "40% bonds (AGG), 60% equities (SPY)",
        RiskLevel::High => "20% bonds (AGG), 80% equities (SPY)",
    }
}

/// Looks up an allocation from unparsed slot text.
///
/// Callers are expected to have validated the value already; an unknown key is reported as an
/// error rather than an empty allocation.
pub fn recommend_raw(risk_level: &str) -> Result<&'static str, RecommendationError> {
    risk_level
        .parse::<RiskLevel>()
        .map(recommend)
        .map_err(|_| RecommendationError::UnknownRiskLevel(risk_level.to_string()))
}

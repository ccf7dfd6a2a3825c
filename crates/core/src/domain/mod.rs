pub mod risk;
pub mod slots;

pub use risk::{ParseRiskLevelError, RiskLevel};
pub use slots::{SlotName, Slots};

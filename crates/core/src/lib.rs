//! Core of the portfolio recommendation bot.
//!
//! - **Slots** (`domain`) - slot names, slot values and the closed `RiskLevel` set
//! - **Validation** (`validation`) - ordered, short-circuiting checks on collected slots
//! - **Recommendation** (`recommendation`) - fixed risk level to allocation table
//! - **Dialog** (`dialog`) - platform request/response envelope and the turn dispatcher
//!
//! ```text
//! LexRequest → TurnDispatcher → IntentHandler ─┬─ DialogCodeHook → FieldValidator → ElicitSlot | Delegate
//!                                              └─ FulfillmentCodeHook → recommend → Close
//! ```

pub mod audit;
pub mod config;
pub mod dialog;
pub mod domain;
pub mod errors;
pub mod recommendation;
pub mod validation;

pub use dialog::{
    DialogAction, DialogResponse, DispatchError, IntentHandler, InvocationSource, LexRequest,
    RecommendPortfolioHandler, TurnDispatcher,
};
pub use domain::{RiskLevel, SlotName, Slots};
pub use errors::{ApplicationError, InterfaceError};
pub use recommendation::{recommend, recommend_raw, RecommendationError};
pub use validation::{validate_slots, FieldValidator, SlotViolation, ValidationResult};

pub mod dispatcher;
pub mod envelope;

pub use dispatcher::{
    fulfillment_message, DispatchError, IntentHandler, RecommendPortfolioHandler, TurnDispatcher,
    DEFAULT_INTENT_NAME,
};
pub use envelope::{
    ContentType, CurrentIntent, DialogAction, DialogResponse, FulfillmentState, InvocationSource,
    LexRequest, Message, SessionAttributes,
};

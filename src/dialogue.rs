//! Per-session dialogue engine
//!
//! A finite-state machine that collects the ordered fields for one of the
//! two auction-creation flows. The transition function is pure; the session
//! store and the conversation router own all mutation and I/O.

#[cfg(test)]
mod proptests;
mod state;
mod transition;

pub use state::{
    fields, AuctionFlow, DutchRequest, EnglishRequest, FieldMap, FlowState, MalformedField,
};
pub use transition::{prompts, start, step, FlowOutcome, StepResult};

//! Pure dialogue step function
//!
//! Given the current flow state, the fields collected so far, and one text
//! input, produce the next state, the updated field map, the reply to show,
//! and, on the final step, the completed request. No I/O and no session
//! storage here; the bot owns both.

use super::state::{
    fields, AuctionFlow, DutchRequest, EnglishRequest, FieldMap, FlowState, MalformedField,
};

/// Prompts shown when entering each collection state.
pub mod prompts {
    pub const NFT_ADDRESS: &str = "Send the address of your NFT:";
    pub const TOKEN_ID: &str = "Send the token_id of your NFT:";
    pub const ERC20_ADDRESS: &str = "Send the address of the ERC20 token bids will be paid in:";
    pub const MIN_PRICE: &str = "Send the minimum bid:";
    pub const DURATION: &str = "Send the bidding duration in seconds:";
    pub const START_PRICE: &str = "Send the starting price:";
    pub const DECAY_RATE: &str = "Send the price decay rate, in tokens per second:";
    pub const CHOOSE_ACTION: &str = "Choose an action:";
}

/// Completed flow artifact, emitted exactly once per flow instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowOutcome {
    English(EnglishRequest),
    Dutch(DutchRequest),
}

/// Result of one dialogue step.
#[derive(Debug)]
pub struct StepResult {
    pub state: FlowState,
    pub fields: FieldMap,
    pub reply: String,
    pub outcome: Option<FlowOutcome>,
}

impl StepResult {
    fn advance(state: FlowState, fields: FieldMap, reply: &str) -> Self {
        Self {
            state,
            fields,
            reply: reply.to_string(),
            outcome: None,
        }
    }

    /// Malformed numeric input: stay in place and re-ask. The flow never
    /// moves backwards, and never aborts over a typo.
    fn reprompt(state: FlowState, fields: FieldMap, prompt: &str) -> Self {
        Self {
            state,
            fields,
            reply: format!("That needs to be a whole number. {prompt}"),
            outcome: None,
        }
    }
}

/// Begin a flow: fresh field map, first prompt.
pub fn start(flow: AuctionFlow) -> StepResult {
    StepResult::advance(
        FlowState::AwaitingNftAddress(flow),
        FieldMap::new(),
        prompts::NFT_ADDRESS,
    )
}

/// Feed one text input into an active flow.
pub fn step(state: FlowState, mut field_map: FieldMap, input: &str) -> StepResult {
    match state {
        FlowState::Idle => StepResult::advance(FlowState::Idle, field_map, prompts::CHOOSE_ACTION),

        FlowState::AwaitingNftAddress(flow) => {
            field_map.insert(fields::NFT_ADDRESS, input);
            StepResult::advance(FlowState::AwaitingTokenId(flow), field_map, prompts::TOKEN_ID)
        }

        FlowState::AwaitingTokenId(flow) => {
            if !parses_u64(input) {
                return StepResult::reprompt(state, field_map, prompts::TOKEN_ID);
            }
            field_map.insert(fields::TOKEN_ID, input);
            StepResult::advance(
                FlowState::AwaitingPaymentToken(flow),
                field_map,
                prompts::ERC20_ADDRESS,
            )
        }

        FlowState::AwaitingPaymentToken(flow) => {
            field_map.insert(fields::ERC20_ADDRESS, input);
            match flow {
                AuctionFlow::English => StepResult::advance(
                    FlowState::AwaitingMinimumBid,
                    field_map,
                    prompts::MIN_PRICE,
                ),
                AuctionFlow::Dutch => StepResult::advance(
                    FlowState::AwaitingStartPrice,
                    field_map,
                    prompts::START_PRICE,
                ),
            }
        }

        FlowState::AwaitingMinimumBid => {
            if !parses_u128(input) {
                return StepResult::reprompt(state, field_map, prompts::MIN_PRICE);
            }
            field_map.insert(fields::MIN_PRICE, input);
            StepResult::advance(FlowState::AwaitingDuration, field_map, prompts::DURATION)
        }

        FlowState::AwaitingDuration => {
            if !parses_u64(input) {
                return StepResult::reprompt(state, field_map, prompts::DURATION);
            }
            field_map.insert(fields::DURATION, input);
            complete(field_map, |map| {
                EnglishRequest::from_fields(map).map(FlowOutcome::English)
            })
        }

        FlowState::AwaitingStartPrice => {
            if !parses_u128(input) {
                return StepResult::reprompt(state, field_map, prompts::START_PRICE);
            }
            field_map.insert(fields::START_PRICE, input);
            StepResult::advance(FlowState::AwaitingDecayRate, field_map, prompts::DECAY_RATE)
        }

        FlowState::AwaitingDecayRate => {
            if !parses_u128(input) {
                return StepResult::reprompt(state, field_map, prompts::DECAY_RATE);
            }
            field_map.insert(fields::DECAY_RATE, input);
            complete(field_map, |map| {
                DutchRequest::from_fields(map).map(FlowOutcome::Dutch)
            })
        }
    }
}

/// Terminal coercion. Per-step validation makes failure unreachable through
/// the normal flow, but a partial request is never emitted regardless.
fn complete(
    field_map: FieldMap,
    build: impl Fn(&FieldMap) -> Result<FlowOutcome, MalformedField>,
) -> StepResult {
    match build(&field_map) {
        Ok(outcome) => StepResult {
            state: FlowState::Idle,
            fields: field_map,
            reply: String::new(),
            outcome: Some(outcome),
        },
        Err(err) => StepResult {
            state: FlowState::Idle,
            fields: field_map,
            reply: format!("Something went wrong collecting your answers ({err}). Let's start over."),
            outcome: None,
        },
    }
}

fn parses_u64(input: &str) -> bool {
    input.parse::<u64>().is_ok()
}

fn parses_u128(input: &str) -> bool {
    input.parse::<u128>().is_ok()
}

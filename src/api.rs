//! HTTP surface
//!
//! Two jobs: the renderer endpoint that turns a handoff token into the
//! transaction-submission page, and a generic channel adapter that lets any
//! conversation transport deliver `(session_key, text)` events over HTTP.

mod handlers;

pub use handlers::create_router;

use crate::bot::Bot;
use crate::chain::ChainClient;
use crate::config::AbiBundle;
use std::sync::Arc;

/// Page template bundled with the binary. Placeholders `<<data>>`,
/// `<<aggregator_abi>>` and `<<erc721_abi>>` are filled per request.
pub const CREATE_PAGE_TEMPLATE: &str = include_str!("../assets/create.html");

/// Static context for the `/create/{token}` page: the HTML template and the
/// ABI descriptor blobs substituted into it.
pub struct RendererContext {
    pub template: &'static str,
    pub abis: AbiBundle,
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub bot: Arc<Bot<ChainClient>>,
    pub renderer: Arc<RendererContext>,
}

impl AppState {
    pub fn new(bot: Bot<ChainClient>, abis: AbiBundle) -> Self {
        Self {
            bot: Arc::new(bot),
            renderer: Arc::new(RendererContext {
                template: CREATE_PAGE_TEMPLATE,
                abis,
            }),
        }
    }
}

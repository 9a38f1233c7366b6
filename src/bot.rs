//! Conversation routing
//!
//! Maps `(session_key, text)` events from the conversation channel onto the
//! dialogue engine and the listing pipeline, and composes the reply text.
//! The channel itself (message delivery, command parsing quirks) stays
//! outside this crate; whatever drives it calls [`Bot::handle_message`].

use crate::auctions;
use crate::chain::{BlockTag, ChainError, ChainReader};
use crate::dialogue::{self, AuctionFlow, FlowOutcome};
use crate::handoff::{self, CreateParams};
use crate::listing::{format_listings, Explorer};
use crate::sessions::SessionStore;
use std::sync::Arc;

/// Menu button labels. The channel renders these as a reply keyboard; the
/// bot matches on the literal text coming back.
pub mod buttons {
    pub const LIST_AUCTIONS: &str = "List auctions";
    pub const CREATE_AUCTION: &str = "Create auction";
    pub const ENGLISH: &str = "English";
    pub const DUTCH: &str = "Dutch";
    pub const FAIR: &str = "Fair";
}

/// Outgoing reply. `keyboard` is an opaque UI affordance for the channel;
/// `None` asks it to remove any keyboard currently shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub keyboard: Option<Vec<Vec<String>>>,
}

impl Reply {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: None,
        }
    }

    fn with_menu(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: Some(vec![vec![
                buttons::LIST_AUCTIONS.to_string(),
                buttons::CREATE_AUCTION.to_string(),
            ]]),
        }
    }

    fn with_auction_types(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: Some(vec![vec![
                buttons::ENGLISH.to_string(),
                buttons::DUTCH.to_string(),
                buttons::FAIR.to_string(),
            ]]),
        }
    }
}

/// The conversational front of the service. One instance serves every
/// session; per-user serialization lives in the session store.
pub struct Bot<C: ChainReader> {
    chain: Arc<C>,
    sessions: SessionStore,
    explorer: Explorer,
    web_base_url: String,
}

impl<C: ChainReader> Bot<C> {
    pub fn new(chain: Arc<C>, explorer: Explorer, web_base_url: impl Into<String>) -> Self {
        Self {
            chain,
            sessions: SessionStore::new(),
            explorer,
            web_base_url: web_base_url.into(),
        }
    }

    /// Handle one incoming channel event and produce the reply.
    ///
    /// Command words take precedence over field capture: starting a flow or
    /// pressing a menu button mid-flow abandons the old flow, discarding its
    /// field map.
    pub async fn handle_message(&self, session_key: &str, text: &str) -> Reply {
        let session = self.sessions.get_or_create(session_key);
        let mut session = session.lock().await;

        tracing::info!(session_key, state = ?session.state, "incoming message");

        match text {
            "/start" => {
                session.reset();
                Reply::with_menu(dialogue::prompts::CHOOSE_ACTION)
            }

            buttons::LIST_AUCTIONS => {
                session.reset();
                self.list_auctions().await
            }

            buttons::CREATE_AUCTION => {
                session.reset();
                Reply::with_auction_types("Choose the auction type:")
            }

            buttons::ENGLISH => self.begin_flow(&mut session, AuctionFlow::English),
            buttons::DUTCH => self.begin_flow(&mut session, AuctionFlow::Dutch),

            buttons::FAIR => {
                session.reset();
                Reply::with_menu("Fair auction creation isn't available yet.")
            }

            _ if session.state.in_flow() => {
                let result = dialogue::step(
                    session.state,
                    std::mem::take(&mut session.fields),
                    text,
                );
                session.state = result.state;
                session.fields = result.fields;

                match result.outcome {
                    Some(outcome) => {
                        session.reset();
                        self.completion_reply(&outcome)
                    }
                    None => Reply::plain(result.reply),
                }
            }

            _ => Reply::with_menu(dialogue::prompts::CHOOSE_ACTION),
        }
    }

    fn begin_flow(
        &self,
        session: &mut crate::sessions::Session,
        flow: AuctionFlow,
    ) -> Reply {
        session.reset();
        let started = dialogue::start(flow);
        session.state = started.state;
        session.fields = started.fields;
        Reply::plain(started.reply)
    }

    fn completion_reply(&self, outcome: &FlowOutcome) -> Reply {
        match outcome {
            FlowOutcome::English(request) => {
                let token = handoff::encode(&CreateParams::from(request));
                let link = handoff::build_link(&self.web_base_url, &token);
                Reply::with_menu(format!(
                    "English auction ready to create:\n\
                     NFT address: {}\n\
                     ERC20 address: {}\n\
                     Minimum bid: {}\n\
                     Bidding duration: {} seconds\n\
                     token_id: {}\n\
                     Link: {link}",
                    request.nft,
                    request.payment_token,
                    request.minimum_bid,
                    request.bidding_duration_secs,
                    request.nft_token_id,
                ))
            }
            // The Dutch flow collects its parameters but has no web handoff
            // yet; it echoes them back so nothing is silently dropped.
            FlowOutcome::Dutch(request) => Reply::with_menu(format!(
                "Dutch auction parameters collected:\n\
                 NFT address: {}\n\
                 ERC20 address: {}\n\
                 Starting price: {}\n\
                 Decay rate: {} tokens/second\n\
                 token_id: {}",
                request.nft,
                request.payment_token,
                request.start_price,
                request.decay_rate_per_sec,
                request.nft_token_id,
            )),
        }
    }

    async fn list_auctions(&self) -> Reply {
        match self.collect_listings().await {
            Ok(block) if block.is_empty() => Reply::with_menu("No auctions yet."),
            Ok(block) => Reply::with_menu(block),
            Err(err) => {
                tracing::error!(error = %err, retryable = err.is_retryable(), "listing failed");
                Reply::with_menu(
                    "Couldn't fetch the auction list right now. Please try again in a moment.",
                )
            }
        }
    }

    async fn collect_listings(&self) -> Result<String, ChainError> {
        let events = self
            .chain
            .auction_created_events(0, BlockTag::Latest)
            .await?;
        let listings = auctions::resolve_all(self.chain.as_ref(), &events).await?;
        Ok(format_listings(&listings, &self.explorer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::testing::MockChain;
    use crate::chain::{Address, AuctionEvent, AuctionType};
    use crate::dialogue::prompts;

    fn addr(byte: &str) -> Address {
        Address::parse(&format!("0x{}", byte.repeat(20))).unwrap()
    }

    fn bot_with(chain: MockChain) -> Bot<MockChain> {
        Bot::new(
            Arc::new(chain),
            Explorer::new("https://sepolia.etherscan.io"),
            "http://localhost:8080",
        )
    }

    fn listed_chain() -> MockChain {
        let auction = addr("aa");
        let mut chain = MockChain::new();
        chain.events.push(AuctionEvent {
            auction_type: AuctionType::English,
            auction_address: auction.clone(),
            nft_address: addr("bb"),
            nft_token_id: 7,
            payment_token: addr("cc"),
        });
        chain
            .token_names
            .insert(addr("cc").as_str().to_string(), "GOLD".to_string());
        chain
            .nft_names
            .insert(addr("bb").as_str().to_string(), "Apes".to_string());
        chain
            .owners
            .insert(auction.as_str().to_string(), addr("dd"));
        chain
            .end_times
            .insert(auction.as_str().to_string(), 1_700_000_000);
        chain
            .english_prices
            .insert(auction.as_str().to_string(), 500);
        chain
    }

    #[tokio::test]
    async fn start_shows_main_menu() {
        let bot = bot_with(MockChain::new());
        let reply = bot.handle_message("u1", "/start").await;
        assert_eq!(reply.text, prompts::CHOOSE_ACTION);
        let keyboard = reply.keyboard.unwrap();
        assert!(keyboard[0].contains(&buttons::LIST_AUCTIONS.to_string()));
    }

    #[tokio::test]
    async fn listing_renders_resolved_auctions() {
        let bot = bot_with(listed_chain());
        let reply = bot.handle_message("u1", buttons::LIST_AUCTIONS).await;
        assert!(reply.text.contains("NFT: [Apes:7]"));
        assert!(reply.text.contains("Type: English"));
        assert!(reply.text.contains("Price: 500"));
        assert!(reply.text.contains("End time: 2023-11-14 22:13:20"));
    }

    #[tokio::test]
    async fn listing_with_no_events_says_so() {
        let bot = bot_with(MockChain::new());
        let reply = bot.handle_message("u1", buttons::LIST_AUCTIONS).await;
        assert_eq!(reply.text, "No auctions yet.");
    }

    #[tokio::test]
    async fn listing_failure_reports_without_partial_rows() {
        let mut chain = listed_chain();
        chain.fail_with = Some(|| ChainError::Unavailable("rpc down".to_string()));
        let bot = bot_with(chain);
        let reply = bot.handle_message("u1", buttons::LIST_AUCTIONS).await;
        assert!(reply.text.contains("Couldn't fetch"));
        assert!(!reply.text.contains("Apes"));
    }

    #[tokio::test]
    async fn english_flow_ends_with_decodable_link() {
        let bot = bot_with(MockChain::new());

        bot.handle_message("u1", buttons::CREATE_AUCTION).await;
        let reply = bot.handle_message("u1", buttons::ENGLISH).await;
        assert_eq!(reply.text, prompts::NFT_ADDRESS);
        assert!(reply.keyboard.is_none());

        bot.handle_message("u1", "0xNFT").await;
        bot.handle_message("u1", "7").await;
        bot.handle_message("u1", "0xTOKEN").await;
        bot.handle_message("u1", "500").await;
        let done = bot.handle_message("u1", "3600").await;

        assert!(done.text.contains("English auction ready to create"));
        let link_line = done
            .text
            .lines()
            .find(|line| line.starts_with("Link: "))
            .expect("completion reply carries a link");
        let token = link_line
            .trim_start_matches("Link: http://localhost:8080/create/")
            .to_string();
        let params = handoff::decode(&token).unwrap();
        assert_eq!(params.nft, "0xNFT");
        assert_eq!(params.token, "0xTOKEN");
        assert_eq!(params.token_id, 7);
        assert_eq!(params.bid_limit, 500);
        assert_eq!(params.bidding_time, 3600);
    }

    #[tokio::test]
    async fn dutch_flow_echoes_parameters_without_link() {
        let bot = bot_with(MockChain::new());

        bot.handle_message("u1", buttons::DUTCH).await;
        bot.handle_message("u1", "0xNFT").await;
        bot.handle_message("u1", "7").await;
        bot.handle_message("u1", "0xTOKEN").await;
        bot.handle_message("u1", "1000").await;
        let done = bot.handle_message("u1", "3").await;

        assert!(done.text.contains("Dutch auction parameters collected"));
        assert!(done.text.contains("Starting price: 1000"));
        assert!(!done.text.contains("Link:"));
    }

    #[tokio::test]
    async fn restart_mid_flow_discards_old_fields() {
        let bot = bot_with(MockChain::new());

        // Walk the English flow up to the minimum-bid question.
        bot.handle_message("u1", buttons::ENGLISH).await;
        bot.handle_message("u1", "0xOLD").await;
        bot.handle_message("u1", "1").await;
        bot.handle_message("u1", "0xOLDTOKEN").await;

        // Flow-reset trigger mid-flow: previous fields are discarded.
        bot.handle_message("u1", buttons::ENGLISH).await;
        bot.handle_message("u1", "0xNEW").await;
        bot.handle_message("u1", "2").await;
        bot.handle_message("u1", "0xNEWTOKEN").await;
        bot.handle_message("u1", "10").await;
        let done = bot.handle_message("u1", "60").await;

        assert!(done.text.contains("NFT address: 0xNEW"));
        assert!(!done.text.contains("0xOLD"));
    }

    #[tokio::test]
    async fn fair_creation_is_not_available() {
        let bot = bot_with(MockChain::new());
        let reply = bot.handle_message("u1", buttons::FAIR).await;
        assert!(reply.text.contains("isn't available yet"));
    }

    #[tokio::test]
    async fn unknown_text_while_idle_shows_menu() {
        let bot = bot_with(MockChain::new());
        let reply = bot.handle_message("u1", "what").await;
        assert_eq!(reply.text, prompts::CHOOSE_ACTION);
        assert!(reply.keyboard.is_some());
    }

    #[tokio::test]
    async fn sessions_do_not_interfere() {
        let bot = bot_with(MockChain::new());
        bot.handle_message("u1", buttons::ENGLISH).await;
        let other = bot.handle_message("u2", "hello").await;
        assert_eq!(other.text, prompts::CHOOSE_ACTION);

        // u1 is still mid-flow.
        let reply = bot.handle_message("u1", "0xNFT").await;
        assert_eq!(reply.text, prompts::TOKEN_ID);
    }
}

//! Property tests for the dialogue flows

use super::state::{fields, AuctionFlow, FlowState};
use super::transition::{start, step, FlowOutcome};
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;

/// Free-text inputs for address steps: anything non-empty the channel can
/// deliver on one line. The engine records them verbatim.
fn address_input() -> impl Strategy<Value = String> {
    "[!-~]{1,64}"
}

proptest! {
    /// Any sequence of valid inputs through the English flow yields exactly
    /// the five expected keys, verbatim, in submission order.
    #[test]
    fn english_flow_emits_exact_fields(
        nft in address_input(),
        token_id in any::<u64>(),
        erc20 in address_input(),
        min_price in any::<u64>(),
        duration in any::<u64>(),
    ) {
        let token_id = token_id.to_string();
        let min_price = min_price.to_string();
        let duration = duration.to_string();

        let mut result = start(AuctionFlow::English);
        for input in [nft.as_str(), &token_id, &erc20, &min_price, &duration] {
            prop_assert!(result.outcome.is_none());
            result = step(result.state, result.fields, input);
        }

        prop_assert_eq!(result.state, FlowState::Idle);
        prop_assert_eq!(
            result.fields.keys(),
            vec![
                fields::NFT_ADDRESS,
                fields::TOKEN_ID,
                fields::ERC20_ADDRESS,
                fields::MIN_PRICE,
                fields::DURATION,
            ]
        );
        prop_assert_eq!(result.fields.get(fields::NFT_ADDRESS), Some(nft.as_str()));
        prop_assert_eq!(result.fields.get(fields::TOKEN_ID), Some(token_id.as_str()));
        prop_assert_eq!(result.fields.get(fields::ERC20_ADDRESS), Some(erc20.as_str()));
        prop_assert_eq!(result.fields.get(fields::MIN_PRICE), Some(min_price.as_str()));
        prop_assert_eq!(result.fields.get(fields::DURATION), Some(duration.as_str()));

        let Some(FlowOutcome::English(request)) = result.outcome else {
            return Err(TestCaseError::fail("English flow did not complete"));
        };
        prop_assert_eq!(request.nft, nft);
        prop_assert_eq!(request.payment_token, erc20);
    }

    /// Non-numeric input at a numeric step never advances the state and
    /// never loses already-collected fields.
    #[test]
    fn garbage_token_id_never_advances(garbage in "[a-zA-Z !@#]{1,16}") {
        let started = start(AuctionFlow::Dutch);
        let at_token_id = step(started.state, started.fields, "0xNFT");
        let rejected = step(at_token_id.state, at_token_id.fields, &garbage);

        prop_assert_eq!(rejected.state, FlowState::AwaitingTokenId(AuctionFlow::Dutch));
        prop_assert_eq!(rejected.fields.keys(), vec![fields::NFT_ADDRESS]);
        prop_assert!(rejected.outcome.is_none());
    }
}

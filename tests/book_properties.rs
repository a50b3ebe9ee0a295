//! Property-based tests for top-of-book invariants.
//!
//! After every update the cached tops must match an independent O(n)
//! recomputation over the level maps, whatever mix of upserts and removals
//! (including removal of the current top) produced them.

use btse_orderbook::orderbook::{apply_update, OrderBookState};
use btse_orderbook::types::{OrderbookUpdate, Side};
use btse_orderbook::Config;
use proptest::prelude::*;
use rust_decimal::Decimal;

/// One level change: (side, price in ticks, size in lots; 0 removes)
type Op = (Side, u32, u32);

fn arb_side() -> impl Strategy<Value = Side> {
    prop_oneof![Just(Side::Bid), Just(Side::Ask)]
}

/// Narrow price range so removals often hit existing levels and the top
fn arb_op() -> impl Strategy<Value = Op> {
    (arb_side(), 0u32..40, prop_oneof![1 => Just(0u32), 2 => 1u32..1_000])
}

fn arb_batches() -> impl Strategy<Value = Vec<Vec<Op>>> {
    prop::collection::vec(prop::collection::vec(arb_op(), 1..8), 1..40)
}

/// Ticks of 0.25 so prices carry a fractional part
fn price_text(ticks: u32) -> String {
    (Decimal::from(ticks) * Decimal::new(25, 2)).to_string()
}

fn to_update(seq: u64, ops: &[Op]) -> OrderbookUpdate {
    ops.iter().fold(
        OrderbookUpdate::delta("PROP", seq, seq - 1, seq),
        |update, &(side, ticks, size)| {
            let price = price_text(ticks);
            let size = size.to_string();
            match side {
                Side::Bid => update.bid(&price, &size),
                Side::Ask => update.ask(&price, &size),
            }
        },
    )
}

fn recomputed_best(book: &OrderBookState, side: Side) -> Option<(Decimal, Decimal)> {
    let levels = book.levels(side).iter();
    match side {
        Side::Bid => levels.max_by(|a, b| a.0.cmp(&b.0)),
        Side::Ask => levels.min_by(|a, b| a.0.cmp(&b.0)),
    }
}

proptest! {
    #[test]
    fn prop_top_matches_recomputation(batches in arb_batches()) {
        let config = Config::new().with_crossed_book_reports(false);
        let mut book = OrderBookState::new("PROP");

        for (i, ops) in batches.iter().enumerate() {
            let report = apply_update(&mut book, &to_update(i as u64 + 1, ops), 0, &config);
            prop_assert!(report.is_clean());

            let bid = book.best_bid().map(|t| (t.price, t.size));
            let ask = book.best_ask().map(|t| (t.price, t.size));
            prop_assert_eq!(bid, recomputed_best(&book, Side::Bid));
            prop_assert_eq!(ask, recomputed_best(&book, Side::Ask));

            // No zero-size level is ever stored
            for side in [Side::Bid, Side::Ask] {
                prop_assert!(book.levels(side).iter().all(|(_, size)| size > Decimal::ZERO));
            }
        }
    }

    #[test]
    fn prop_upserts_only_track_extremes(ops in prop::collection::vec((arb_side(), 0u32..10_000, 1u32..100), 1..200)) {
        let config = Config::new().with_crossed_book_reports(false);
        let mut book = OrderBookState::new("PROP");

        for (i, op) in ops.iter().enumerate() {
            apply_update(&mut book, &to_update(i as u64 + 1, std::slice::from_ref(op)), 0, &config);
            prop_assert_eq!(
                book.best_bid().map(|t| t.price),
                recomputed_best(&book, Side::Bid).map(|l| l.0)
            );
            prop_assert_eq!(
                book.best_ask().map(|t| t.price),
                recomputed_best(&book, Side::Ask).map(|l| l.0)
            );
        }
    }

    #[test]
    fn prop_removing_absent_levels_is_noop(prices in prop::collection::vec(0u32..1_000, 1..50)) {
        let mut book = OrderBookState::new("PROP");
        let before = book.clone();

        let ops: Vec<Op> = prices.iter().map(|&p| (Side::Ask, p, 0)).collect();
        let report = apply_update(&mut book, &to_update(1, &ops), 0, &Config::new());

        prop_assert!(report.is_clean());
        prop_assert_eq!(book.top(), before.top());
        prop_assert!(book.is_empty());
    }

    #[test]
    fn prop_last_entry_in_batch_wins(ticks in 0u32..100, first in 0u32..50, last in 0u32..50) {
        let mut book = OrderBookState::new("PROP");
        let ops = [(Side::Bid, ticks, first), (Side::Bid, ticks, last)];
        apply_update(&mut book, &to_update(1, &ops), 0, &Config::new());

        let price: Decimal = price_text(ticks).parse().unwrap();
        let expected = (last > 0).then(|| Decimal::from(last));
        prop_assert_eq!(book.levels(Side::Bid).get(&price), expected);
    }
}

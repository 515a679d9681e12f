//! Property tests for the universal invariants: randomized sequences of
//! limit/market/cancel operations must never corrupt the book.

use clob_engine::orderbook::book::OrderBook;
use clob_engine::orderbook::matching;
use clob_engine::orderbook::order::{ClientId, LimitOrder, MarketOrder, OrderSide};
use clob_engine::prelude::EventBus;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Limit { side: OrderSide, price: f64, qty: f64, client: u8 },
    Market { side: OrderSide, qty: f64, client: u8 },
    Cancel { target: usize, client: u8 },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    let side = prop_oneof![Just(OrderSide::Buy), Just(OrderSide::Sell)];
    prop_oneof![
        3 => (side.clone(), 1i64..110, 1i64..20, 0u8..4)
            .prop_map(|(side, price, qty, client)| Op::Limit {
                side,
                price: price as f64,
                qty: qty as f64,
                client,
            }),
        1 => (side, 1i64..20, 0u8..4).prop_map(|(side, qty, client)| Op::Market {
            side,
            qty: qty as f64,
            client,
        }),
        1 => (0usize..50, 0u8..4).prop_map(|(target, client)| Op::Cancel { target, client }),
    ]
}

fn client_name(index: u8) -> String {
    format!("client-{index}")
}

fn check_invariants(book: &OrderBook) {
    for (price, level) in book.levels(OrderSide::Buy) {
        assert!(!level.is_empty(), "empty queue left at bid price {price}");
        for order in level.iter() {
            assert_eq!(order.common.side, OrderSide::Buy);
            assert_eq!(order.price, price);
        }
    }
    for (price, level) in book.levels(OrderSide::Sell) {
        assert!(!level.is_empty(), "empty queue left at ask price {price}");
        for order in level.iter() {
            assert_eq!(order.common.side, OrderSide::Sell);
            assert_eq!(order.price, price);
        }
    }

    for order_id in book.resting_order_ids() {
        let found = book.get(order_id);
        assert!(found.is_some(), "indexed order not present in its queue");
        assert_eq!(found.unwrap().common.order_id, order_id);
    }

    if let (Some(bid), Some(ask)) = (book.best_bid(), book.best_ask()) {
        assert!(bid <= ask, "book is crossed: bid={bid} ask={ask}");
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn invariants_hold_after_random_operation_sequences(ops in prop::collection::vec(op_strategy(), 0..60)) {
        let mut book = OrderBook::new();
        let bus = EventBus::test_mode();
        let mut all_order_ids = Vec::new();

        for op in ops {
            match op {
                Op::Limit { side, price, qty, client } => {
                    let order = LimitOrder::new(ClientId::from(client_name(client)), side, price, qty);
                    let outcome = matching::match_limit(&mut book, &bus, order);
                    all_order_ids.push(outcome.order_id);
                }
                Op::Market { side, qty, client } => {
                    let order = MarketOrder::new(ClientId::from(client_name(client)), side, qty);
                    let outcome = matching::match_market(&mut book, &bus, order);
                    all_order_ids.push(outcome.order_id);
                }
                Op::Cancel { target, client } => {
                    if let Some(&order_id) = all_order_ids.get(target % all_order_ids.len().max(1)) {
                        let _ = matching::cancel(&mut book, &bus, order_id, &ClientId::from(client_name(client)));
                    }
                }
            }
            check_invariants(&book);
        }
    }

    #[test]
    fn aggressor_remaining_quantity_is_monotone_non_increasing(
        resting_qty in 1i64..100,
        aggressor_qty in 1i64..100,
    ) {
        let mut book = OrderBook::new();
        let bus = EventBus::test_mode();
        matching::match_limit(
            &mut book,
            &bus,
            LimitOrder::new(ClientId::from("maker"), OrderSide::Sell, 100.0, resting_qty as f64),
        );

        let aggressor = LimitOrder::new(ClientId::from("taker"), OrderSide::Buy, 100.0, aggressor_qty as f64);
        let outcome = matching::match_limit(&mut book, &bus, aggressor);

        prop_assert!(outcome.remaining_qty <= aggressor_qty as f64);
        prop_assert!(outcome.remaining_qty >= 0.0);
    }

    #[test]
    fn conservation_of_quantity_across_a_single_trade(
        resting_qty in 1i64..100,
        aggressor_qty in 1i64..100,
    ) {
        let mut book = OrderBook::new();
        let bus = EventBus::test_mode();
        matching::match_limit(
            &mut book,
            &bus,
            LimitOrder::new(ClientId::from("maker"), OrderSide::Sell, 100.0, resting_qty as f64),
        );

        let outcome = matching::match_limit(
            &mut book,
            &bus,
            LimitOrder::new(ClientId::from("taker"), OrderSide::Buy, 100.0, aggressor_qty as f64),
        );

        let traded: f64 = outcome.trades.iter().map(|t| t.qty).sum();
        prop_assert_eq!(traded, resting_qty.min(aggressor_qty) as f64);
        prop_assert_eq!(outcome.filled_qty, traded);
    }
}

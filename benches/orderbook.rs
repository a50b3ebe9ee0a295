//! Benchmarks for order book operations.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use btse_orderbook::orderbook::{apply_update, OrderBookState, OrderBookStore};
use btse_orderbook::types::{OrderbookUpdate, Side};
use btse_orderbook::Config;
use rust_decimal::Decimal;

fn populated(depth: u32) -> OrderBookState {
    let mut book = OrderBookState::new("BENCH");
    for i in 1..=depth {
        book.upsert(Side::Bid, Decimal::new(i64::from(50_000 - i), 1), Decimal::ONE, 0);
        book.upsert(Side::Ask, Decimal::new(i64::from(50_000 + i), 1), Decimal::ONE, 0);
    }
    book
}

fn bench_apply_delta(c: &mut Criterion) {
    let mut group = c.benchmark_group("apply_delta");
    let config = Config::new().with_sequence_checks(false);

    for depth in [10, 100, 1000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(depth), depth, |b, &depth| {
            let mut book = populated(depth);

            // A typical delta: size changes below the top on both sides
            let update = OrderbookUpdate::delta("BENCH", 1, 0, 0)
                .bid("4999.5", "3")
                .bid("4999.0", "2")
                .ask("5000.5", "3")
                .ask("5001.0", "2");

            b.iter(|| apply_update(&mut book, black_box(&update), 0, &config));
        });
    }

    group.finish();
}

fn bench_remove_top(c: &mut Criterion) {
    let mut group = c.benchmark_group("remove_top");

    for depth in [10, 100, 1000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(depth), depth, |b, &depth| {
            let mut book = populated(depth);
            let top = Decimal::new(49_999, 1);

            // Remove the best bid, forcing a rescan, then put it back
            b.iter(|| {
                book.remove(Side::Bid, black_box(top), 1);
                book.upsert(Side::Bid, top, Decimal::ONE, 1);
            });
        });
    }

    group.finish();
}

fn bench_full_book(c: &mut Criterion) {
    let store = OrderBookStore::new();
    store
        .publish("BENCH", populated(500))
        .expect("symbol matches");

    c.bench_function("full_book_depth_20", |b| {
        b.iter(|| black_box(store.get_full_book("BENCH", Some(20))));
    });

    c.bench_function("get_top", |b| {
        b.iter(|| black_box(store.get_top("BENCH")));
    });
}

criterion_group!(benches, bench_apply_delta, bench_remove_top, bench_full_book);
criterion_main!(benches);

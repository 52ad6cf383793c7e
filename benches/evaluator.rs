use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use holdem_engine::cards::{parse_cards, Card};
use holdem_engine::chips::{Bank, ChipStack};
use holdem_engine::evaluator::{evaluate_five, evaluate_hand};

fn five(s: &str) -> [Card; 5] {
    let cards = parse_cards(s).unwrap();
    [cards[0], cards[1], cards[2], cards[3], cards[4]]
}

fn bench_evaluate_five(c: &mut Criterion) {
    let mut g = c.benchmark_group("evaluate_five");
    for (name, hand) in [
        ("high_card", "AH KD 7S 5C 2D"),
        ("full_house", "AH AD AC KH KD"),
        ("wheel", "AS 2H 3D 4C 5S"),
        ("royal", "AS KS QS JS TS"),
    ] {
        let input = five(hand);
        g.bench_with_input(BenchmarkId::new(name, hand), &input, |b, input| {
            b.iter(|| evaluate_five(black_box(input)))
        });
    }
    g.finish();
}

fn bench_evaluate_seven(c: &mut Criterion) {
    let seven = parse_cards("AS AH KS QS JS TS 9S").unwrap();
    c.bench_function("evaluate_hand/7", |b| b.iter(|| evaluate_hand(black_box(&seven))));
}

fn bench_exchange(c: &mut Criterion) {
    let bank = Bank::default();
    let start = ChipStack::from_counts([(100, 20)]).unwrap();
    c.bench_function("transfer_with_exchange/35_from_100s", |b| {
        b.iter(|| {
            let mut from = start.clone();
            let mut to = ChipStack::new();
            from.transfer_with_exchange(&mut to, black_box(35), &bank).unwrap();
            to
        })
    });
}

criterion_group!(benches, bench_evaluate_five, bench_evaluate_seven, bench_exchange);
criterion_main!(benches);

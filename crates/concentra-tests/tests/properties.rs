//! Property-based tests over the whole load-rank-solve pipeline.
//!
//! Inputs are random producer sequences with random timestamps inside the
//! synthetic week; every property is checked through a loaded store rather
//! than on the ranking primitives alone.

use chrono::Duration;
use proptest::prelude::*;

use concentra_core::config::Window;
use concentra_core::types::Block;
use concentra_metrics::aggregate::min_required_count;
use concentra_metrics::ranking::Ranking;
use concentra_tests::helpers::*;

fn arb_blocks() -> impl Strategy<Value = Vec<Block>> {
    prop::collection::vec(("[a-f]", 0i64..7 * DAY), 1..200).prop_map(|raw| {
        raw.into_iter()
            .map(|(producer, offset)| Block::new(producer, at(offset)))
            .collect()
    })
}

#[test]
fn reference_distribution_needs_one_producer() {
    let blocks = blocks_from(
        &repeated(&[("a", 50), ("b", 20), ("c", 15), ("d", 10), ("e", 5)]),
        6 * DAY,
        60,
    );
    let store = load_store("N", blocks, vec![], None);
    let report = store.evaluate_windows(&day_and_week(), 0.5);
    assert_eq!(report.min_required, Some(1));
}

#[test]
fn equal_weights_rank_by_id() {
    let blocks = blocks_from(&repeated(&[("b", 10), ("a", 10), ("c", 10)]), 6 * DAY, 60);
    let store = load_store("N", blocks, vec![], None);
    let day = &day_and_week()[0];
    let stats = store.producer_stats(day, 0.5).unwrap();
    let ids: Vec<&str> = stats.producers.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b", "c"]);
    assert_eq!(stats.threshold.required_count, 2);
}

#[test]
fn minimum_over_windows() {
    // Window A: 3 equal producers at 0.5 need 2; window B: 7 equal need 4.
    let mut blocks = blocks_from(&["a", "b", "c"], 0, 60);
    blocks.extend(blocks_from(&["p", "q", "r", "s", "t", "u", "v"], DAY, 60));
    let store = load_store("N", blocks, vec![], None);
    let windows = vec![
        Window::new("A", at(0), at(DAY)).unwrap(),
        Window::new("B", at(DAY), at(2 * DAY)).unwrap(),
    ];
    let report = store.evaluate_windows(&windows, 0.5);
    let counts: Vec<usize> = report
        .successes()
        .map(|(_, s)| s.threshold.required_count)
        .collect();
    assert_eq!(counts, vec![2, 4]);
    assert_eq!(report.min_required, Some(2));
    assert_eq!(
        min_required_count(report.successes().map(|(_, s)| &s.threshold)),
        Some(2)
    );
}

proptest! {
    #[test]
    fn windows_return_exactly_their_blocks(blocks in arb_blocks(), split in 1i64..7 * DAY) {
        let store = load_store("N", blocks.clone(), vec![], None);
        let left = store.get_blocks(at(0), at(split));
        let right = store.get_blocks(at(split), end_of_week());
        prop_assert_eq!(left.len() + right.len(), blocks.len());
        prop_assert!(left.iter().all(|b| b.timestamp < at(split)));
        prop_assert!(right.iter().all(|b| b.timestamp >= at(split)));
    }

    #[test]
    fn window_count_matches_filter(blocks in arb_blocks(), hours in 1i64..168) {
        let store = load_store("N", blocks.clone(), vec![], None);
        let window = Window::trailing("w", end_of_week(), Duration::hours(hours)).unwrap();
        let expected = blocks.iter().filter(|b| window.contains(b.timestamp)).count();
        prop_assert_eq!(store.blocks_in(&window).len(), expected);
    }

    #[test]
    fn required_count_is_minimal_through_store(blocks in arb_blocks(), t in 0.05f64..=1.0) {
        let store = load_store("N", blocks, vec![], None);
        let week = &day_and_week()[1];
        let stats = store.producer_stats(week, t).unwrap();
        let ranking: &Ranking = &stats.producers;
        let k = stats.threshold.required_count;
        let target = t * ranking.total();
        prop_assert!(!stats.threshold.unreachable);
        prop_assert!(ranking.cumulative_weight(k) >= target);
        prop_assert!(ranking.cumulative_weight(k - 1) < target);
    }

    #[test]
    fn evaluation_is_deterministic(blocks in arb_blocks()) {
        let a = load_store("N", blocks.clone(), vec![], None).network_stats(&day_and_week());
        let b = load_store("N", blocks, vec![], None).network_stats(&day_and_week());
        prop_assert_eq!(a, b);
    }
}

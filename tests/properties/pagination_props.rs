use proptest::prelude::*;

use leaderboard::config::DisplayConfig;
use leaderboard::core::{Entry, PageRequest, Paginator, ResultSet, Slot, Source};

fn board(keys: &[String]) -> ResultSet {
    let n = keys.len() as i64;
    let entries = keys
        .iter()
        .enumerate()
        .map(|(i, key)| Entry::new(key.clone(), Some(n - i as i64), 42.0))
        .collect();
    ResultSet::new(Source::Snark, entries, n, None)
}

fn keys() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("B62q[a-zA-Z0-9]{1,6}", 0..120)
}

proptest! {
    #[test]
    fn offset_past_end_is_empty(keys in keys(), extra in 0usize..50, size in 1usize..30) {
        let rs = board(&keys);
        let request = PageRequest::first(size).with_offset(keys.len() + extra);
        let page = Paginator::default().compute(&rs, &request).unwrap();
        prop_assert!(page.rows.is_empty());
    }

    #[test]
    fn search_ranks_are_original_positions(keys in keys(), term in "[a-zA-Z0-9]{1,2}") {
        let rs = board(&keys);
        let request = PageRequest::first(keys.len().max(1)).with_search(Some(term.clone()));
        let page = Paginator::default().compute(&rs, &request).unwrap();

        let needle = term.to_lowercase();
        let expected: Vec<usize> = keys
            .iter()
            .enumerate()
            .filter(|(_, key)| key.to_lowercase().contains(&needle))
            .map(|(idx, _)| idx + 1)
            .collect();
        let ranks: Vec<usize> = page.rows.iter().map(|row| row.rank).collect();
        prop_assert_eq!(&ranks, &expected);
        for row in &page.rows {
            prop_assert_eq!(&row.key, &keys[row.rank - 1]);
        }
    }

    #[test]
    fn filtering_preserves_order(keys in keys(), term in "[a-z0-9]{1,2}") {
        let rs = board(&keys);
        let request = PageRequest::first(200).with_search(Some(term));
        let page = Paginator::default().compute(&rs, &request).unwrap();
        prop_assert!(page.rows.windows(2).all(|pair| pair[0].rank < pair[1].rank));
    }

    #[test]
    fn total_pages_is_ceiling(keys in keys(), size in 1usize..40) {
        let rs = board(&keys);
        let page = Paginator::default().compute(&rs, &PageRequest::first(size)).unwrap();
        prop_assert_eq!(page.total_pages, keys.len().div_ceil(size));
        if keys.is_empty() {
            prop_assert_eq!(page.total_pages, 0);
            prop_assert!(page.leaderboard_empty);
        }
    }

    #[test]
    fn compute_is_idempotent(keys in keys(), size in 1usize..20, page_number in 1usize..10) {
        let rs = board(&keys);
        let engine = Paginator::new(DisplayConfig { show_score_column: true, ..DisplayConfig::default() });
        let request = PageRequest::page(size, page_number);
        prop_assert_eq!(engine.compute(&rs, &request).unwrap(), engine.compute(&rs, &request).unwrap());
    }

    #[test]
    fn unfiltered_rows_number_from_offset(keys in keys(), size in 1usize..20, page_number in 1usize..8) {
        let rs = board(&keys);
        let page = Paginator::default().compute(&rs, &PageRequest::page(size, page_number)).unwrap();
        let offset = (page_number - 1) * size;
        prop_assert!(page.rows.len() <= size);
        for (idx, row) in page.rows.iter().enumerate() {
            prop_assert_eq!(row.rank, offset + idx + 1);
        }
    }

    #[test]
    fn strip_always_has_seven_slots(keys in keys(), size in 1usize..20, page_number in 1usize..15) {
        let rs = board(&keys);
        let page = Paginator::default().compute(&rs, &PageRequest::page(size, page_number)).unwrap();
        prop_assert_eq!(page.controls.controls.len(), 7);
        prop_assert_eq!(page.controls.overlapping, page.total_pages <= 3);
        prop_assert_eq!(page.controls.prev().enabled, page_number > 1);
        prop_assert!(page.controls.slot(Slot::Middle).target.is_none());
    }

    #[test]
    fn maintenance_keeps_totals(keys in keys(), size in 1usize..20) {
        let rs = board(&keys);
        let engine = Paginator::new(DisplayConfig { maintenance_mode: true, ..DisplayConfig::default() });
        let page = engine.compute(&rs, &PageRequest::first(size)).unwrap();
        prop_assert!(page.rows.is_empty());
        prop_assert_eq!(page.total_filtered_count, keys.len());
        prop_assert_eq!(page.total_pages, keys.len().div_ceil(size));
    }
}

use chrono::{DateTime, Utc};

use leaderboard::config::{Config, DisplayConfig};
use leaderboard::core::{
    LeaderboardFetcher, PageRequest, Paginator, Slot, Source, TabController,
};
use leaderboard::error::LbError;
use leaderboard::storage::LeaderboardStore;
use leaderboard::test_utils::LeaderboardFixture;

const DAY: i64 = 86_400;

#[test]
fn first_page_of_125_from_store() {
    let fixture = LeaderboardFixture::new();
    fixture.seed_ranked(Source::Snark, 125);
    let rs = fixture.stores.fetch(Source::Snark).unwrap();

    let page = Paginator::default().compute(&rs, &PageRequest::first(10)).unwrap();
    assert_eq!(page.rows.iter().map(|r| r.rank).collect::<Vec<_>>(), (1..=10).collect::<Vec<_>>());
    assert_eq!(page.total_pages, 13);
    assert!(page.controls.slot(Slot::Second).enabled);
    assert!(!page.controls.prev().enabled);
    assert!(!page.leaderboard_empty);
}

#[test]
fn inactive_and_unscored_producers_are_excluded() {
    let fixture = LeaderboardFixture::new();
    fixture.add_node(Source::Sidecar, "B62qactive", Some(10), 100.0, true);
    fixture.add_node(Source::Sidecar, "B62qpending", Some(50), 100.0, false);
    fixture.add_node(Source::Sidecar, "B62qnew", None, 0.0, true);

    let rs = fixture.stores.fetch(Source::Sidecar).unwrap();
    assert_eq!(rs.total_count, 1);
    assert_eq!(rs.entries[0].key, "B62qactive");
}

#[test]
fn max_score_counts_batches_in_window() {
    let fixture = LeaderboardFixture::new();
    let now = Utc::now().timestamp();
    let end = now - 3600;
    for days_back in [0, 10, 45, 89] {
        let batch_end = end - days_back * DAY;
        fixture.add_batch(Source::Snark, batch_end - 600, batch_end);
    }
    fixture.add_batch(Source::Snark, end - 200 * DAY - 600, end - 200 * DAY);

    let rs = fixture.stores.fetch(Source::Snark).unwrap();
    assert_eq!(rs.max_score, 4);
    let expected = DateTime::<Utc>::from_timestamp(end, 0)
        .unwrap()
        .format("%d-%m-%Y %H:%M")
        .to_string();
    assert_eq!(rs.stats().last_modified.as_deref(), Some(expected.as_str()));
}

#[test]
fn configured_window_narrows_max_score() {
    let mut config = Config::default();
    config.scoring.window_days = 30;
    let fixture = LeaderboardFixture::with_config(config);
    let end = Utc::now().timestamp() - 60;
    for days_back in [0, 10, 45, 89] {
        let batch_end = end - days_back * DAY;
        fixture.add_batch(Source::Sidecar, batch_end - 600, batch_end);
    }
    assert_eq!(fixture.stores.fetch(Source::Sidecar).unwrap().max_score, 2);
}

#[test]
fn broken_store_is_a_fetch_error_not_an_empty_board() {
    let dir = tempfile::tempdir().unwrap();
    let store = LeaderboardStore::open(
        Source::Snark,
        dir.path().join("snark.db"),
        std::time::Duration::from_millis(50),
        90,
    )
    .unwrap();
    store
        .with_conn(|conn| {
            conn.execute_batch("DROP TABLE bot_logs;")?;
            Ok(())
        })
        .unwrap();

    let err = store.fetch().unwrap_err();
    assert_eq!(err.code(), "fetch_failed");
    assert!(matches!(err, LbError::Fetch { tab: Source::Snark, .. }));
}

#[test]
fn tab_controller_over_real_stores() {
    let fixture = LeaderboardFixture::new();
    fixture.seed_ranked(Source::Snark, 40);
    fixture.seed_ranked(Source::Sidecar, 8);

    let mut tabs = TabController::new(Paginator::new(DisplayConfig::default()), Source::Snark, 10);
    let fetcher: &dyn LeaderboardFetcher = &*fixture.stores;

    tabs.search(Some("q003".to_string()), fetcher).unwrap();
    let page = &tabs.rendered().unwrap().page;
    assert_eq!(page.rows.iter().map(|r| r.rank).collect::<Vec<_>>(), (30..=39).collect::<Vec<_>>());

    let page = &tabs.switch_to(Source::Sidecar, fetcher).unwrap().page;
    assert_eq!(page.source, Source::Sidecar);
    assert_eq!(page.search_term.as_deref(), Some("q003"));
    assert!(page.rows.is_empty());
    assert_eq!(page.total_pages, 0);
}

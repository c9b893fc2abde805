use std::time::Duration;

use rusqlite::Connection;
use stockdesk_models::Domain;
use stockdesk_sql::{CapabilityRouter, QueryExecutor, QueryOutcome, SqliteExecutor};
use tempfile::TempDir;

fn seeded_db() -> (TempDir, SqliteExecutor) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("snapshot.db");
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(
        "CREATE TABLE forex_hist_data (
             currency_pair TEXT NOT NULL,
             trading_date TEXT NOT NULL,
             close_price REAL,
             note TEXT
         );
         INSERT INTO forex_hist_data VALUES ('USD/INR', '2025-01-02', 85.75, NULL);
         INSERT INTO forex_hist_data VALUES ('EUR/USD', '2025-01-02', 1.0, '');
         CREATE TABLE alerts (id INTEGER PRIMARY KEY, message TEXT);",
    )
    .unwrap();
    drop(conn);

    let executor = SqliteExecutor::new(&path, Duration::from_secs(5));
    (dir, executor)
}

#[tokio::test]
async fn rows_render_as_text_table() {
    let (_dir, executor) = seeded_db();
    let outcome = executor
        .execute(
            "SELECT currency_pair, close_price, note FROM forex_hist_data ORDER BY currency_pair",
        )
        .await;

    assert_eq!(outcome.row_count(), 2);
    assert_eq!(
        outcome.render(),
        "currency_pair | close_price | note\n\
         ----------------------------------\n\
         EUR/USD | 1.0 | \n\
         USD/INR | 85.75 | NULL\n\
         \n\
         (2 rows returned)"
    );
}

#[tokio::test]
async fn zero_rows_is_not_a_failure() {
    let (_dir, executor) = seeded_db();
    let outcome = executor.execute("SELECT * FROM alerts").await;
    assert_eq!(outcome, QueryOutcome::NoResults);
    assert_eq!(outcome.render(), "Query returned no results.");
}

#[tokio::test]
async fn bad_sql_comes_back_as_text() {
    let (_dir, executor) = seeded_db();
    let outcome = executor.execute("SELECT * FROM missing_table").await;
    assert!(outcome.is_failure());
    assert!(outcome.render().starts_with("SQL Error: "));
    assert!(outcome.render().contains("missing_table"));

    // The executor stays usable after a failure.
    let again = executor.execute("SELECT COUNT(*) AS n FROM alerts").await;
    assert_eq!(again.row_count(), 1);
}

#[tokio::test]
async fn missing_database_file_is_a_failure() {
    let dir = tempfile::tempdir().unwrap();
    let executor = SqliteExecutor::new(dir.path().join("absent.db"), Duration::from_secs(5));
    let outcome = executor.execute("SELECT 1").await;
    assert!(outcome.is_failure());
}

#[tokio::test]
async fn inventory_lists_tables_with_counts() {
    let (_dir, executor) = seeded_db();
    let tables = executor.table_inventory().await.unwrap();
    let summary: Vec<(&str, i64)> = tables.iter().map(|t| (t.name.as_str(), t.rows)).collect();
    assert_eq!(summary, vec![("alerts", 0), ("forex_hist_data", 2)]);
}

#[tokio::test]
async fn capability_reports_unknown_names_without_touching_the_database() {
    let (_dir, executor) = seeded_db();
    let router = CapabilityRouter::standard();
    let cap = router.for_domain(Domain::CrossStrategy);

    let text = cap.run(&executor, "nasdaq_top_movers").await;
    assert_eq!(
        text,
        "Query 'nasdaq_top_movers' not found. Available queries: \
         common_stocks_both_strategies, common_stocks_summary"
    );
}

#[tokio::test]
async fn capability_turns_execution_errors_into_text() {
    let (_dir, executor) = seeded_db();
    let router = CapabilityRouter::standard();
    let text = router
        .for_domain(Domain::Forex)
        .run(&executor, "forex_latest_rates")
        .await;
    assert!(text.starts_with("SQL Error: "), "got: {text}");
}

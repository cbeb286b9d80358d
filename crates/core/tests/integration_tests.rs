// ═══════════════════════════════════════════════════════════════════
// Integration Tests — FinanceDashboard over real stores
// ═══════════════════════════════════════════════════════════════════

use chrono::{DateTime, Months, NaiveDate, TimeZone, Utc};

use finance_dashboard_core::errors::{CoreError, ErrorKind};
use finance_dashboard_core::models::filter::{FilterParams, Period};
use finance_dashboard_core::models::history::HistoryPoint;
use finance_dashboard_core::models::projection::ProjectionConfig;
use finance_dashboard_core::storage::json_store::JsonFileStore;
use finance_dashboard_core::storage::memory::MemoryStore;
use finance_dashboard_core::FinanceDashboard;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn point(date: NaiveDate, values: &[(&str, f64)]) -> HistoryPoint {
    HistoryPoint::from_values(date, values.iter().copied()).unwrap()
}

fn now() -> DateTime<Utc> {
    Utc.from_utc_datetime(&d(2025, 6, 15).and_hms_opt(9, 30, 0).unwrap())
}

/// Twelve monthly snapshots, 2024-07-01 through 2025-06-01.
async fn seed<S: finance_dashboard_core::storage::traits::FinancesStore>(
    dashboard: &FinanceDashboard<S>,
) {
    dashboard.add_category("Savings", "#00aa00").await.unwrap();
    dashboard.add_category("Brokerage", "#0000ff").await.unwrap();
    for i in 0..12u32 {
        let date = d(2024, 7, 1).checked_add_months(Months::new(i)).unwrap();
        let savings = 1000.0 + 100.0 * f64::from(i);
        let brokerage = 5000.0;
        dashboard
            .upsert_history_point(point(date, &[("Savings", savings), ("Brokerage", brokerage)]))
            .await
            .unwrap();
    }
}

// ═══════════════════════════════════════════════════════════════════
// Empty dashboards
// ═══════════════════════════════════════════════════════════════════

mod empty {
    use super::*;

    #[tokio::test]
    async fn projections_report_no_data() {
        let dashboard = FinanceDashboard::new(MemoryStore::new());
        let err = dashboard
            .projections_at(ProjectionConfig::default(), now())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoData);
    }

    #[tokio::test]
    async fn breakdown_reports_no_data() {
        let dashboard = FinanceDashboard::new(MemoryStore::new());
        let err = dashboard
            .breakdown(&FilterParams::period(Period::All))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::NoData));
    }

    #[tokio::test]
    async fn file_store_starts_with_empty_document() {
        let dir = tempfile::tempdir().unwrap();
        let dashboard = FinanceDashboard::new(JsonFileStore::new(dir.path().join("f.json")));
        let data = dashboard.data().await.unwrap();
        assert!(data.categories.is_empty());
        assert!(data.history.is_empty());
    }
}

// ═══════════════════════════════════════════════════════════════════
// Full workflow over the JSON file store
// ═══════════════════════════════════════════════════════════════════

mod file_workflow {
    use super::*;

    #[tokio::test]
    async fn seed_project_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("finances.json");
        let dashboard = FinanceDashboard::new(JsonFileStore::new(&path));
        seed(&dashboard).await;

        let result = dashboard
            .projections_at(ProjectionConfig::from_query(Some("12"), Some("3")), now())
            .await
            .unwrap();
        assert_eq!(result.series.len(), 2);
        assert_eq!(result.series[0].category.as_str(), "Savings");
        assert!((result.growth_rates[0].monthly_rate - 1.0 / 15.0).abs() < 1e-9);
        assert_eq!(result.growth_rates[1].monthly_rate, 0.0);
        assert!(result.series[1].projected().all(|p| p.value == 5000.0));

        // A second dashboard over the same file sees everything.
        let reopened = FinanceDashboard::new(JsonFileStore::new(&path));
        let data = reopened.data().await.unwrap();
        assert_eq!(data.categories.len(), 2);
        assert_eq!(data.history.len(), 12);
        assert_eq!(data.categories[0].color.as_str(), "#00AA00");
    }

    #[tokio::test]
    async fn duplicate_category_leaves_document_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let dashboard = FinanceDashboard::new(JsonFileStore::new(dir.path().join("f.json")));
        dashboard.add_category("Cash", "#111111").await.unwrap();
        let before = dashboard.data().await.unwrap();

        let err = dashboard.add_category("Cash", "#222222").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(dashboard.data().await.unwrap(), before);
    }

    #[tokio::test]
    async fn every_write_refreshes_last_updated() {
        let dir = tempfile::tempdir().unwrap();
        let dashboard = FinanceDashboard::new(JsonFileStore::new(dir.path().join("f.json")));
        dashboard.add_category("Cash", "#111111").await.unwrap();
        let first = dashboard.data().await.unwrap().last_updated;

        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        dashboard
            .upsert_history_point(point(d(2025, 1, 1), &[("Cash", 1.0)]))
            .await
            .unwrap();
        assert!(dashboard.data().await.unwrap().last_updated > first);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Category and history edits through the facade
// ═══════════════════════════════════════════════════════════════════

mod edits {
    use super::*;

    #[tokio::test]
    async fn rename_flows_into_breakdown_and_projections() {
        let dashboard = FinanceDashboard::new(MemoryStore::new());
        seed(&dashboard).await;

        let renamed = dashboard
            .update_category("Savings", "Emergency Fund", "#00AA00")
            .await
            .unwrap();
        assert_eq!(renamed.name.as_str(), "Emergency Fund");

        let breakdown = dashboard
            .breakdown(&FilterParams::period(Period::All))
            .await
            .unwrap();
        assert_eq!(breakdown.items[0].category.as_str(), "Emergency Fund");
        assert_eq!(breakdown.items[0].value, 2100.0);
        assert_eq!(breakdown.total, 7100.0);
        assert_eq!(breakdown.date, Some(d(2025, 6, 1)));

        let result = dashboard
            .projections_at(ProjectionConfig::new(12, 3), now())
            .await
            .unwrap();
        assert!(result.growth_rates[0].monthly_rate > 0.0);
    }

    #[tokio::test]
    async fn removing_a_category_drops_its_balances() {
        let dashboard = FinanceDashboard::new(MemoryStore::new());
        seed(&dashboard).await;

        dashboard.remove_category("Brokerage").await.unwrap();
        let data = dashboard.data().await.unwrap();
        assert_eq!(data.categories.len(), 1);
        assert!(data.history.iter().all(|p| p.value_of("Brokerage") == 0.0));
        assert!(data.history.iter().all(|p| !p.data.contains_key("Brokerage")));

        let err = dashboard.remove_category("Brokerage").await.unwrap_err();
        assert!(matches!(err, CoreError::CategoryNotFound(_)));
    }

    #[tokio::test]
    async fn moving_a_snapshot_keeps_history_sorted() {
        let dashboard = FinanceDashboard::new(MemoryStore::new());
        seed(&dashboard).await;

        dashboard
            .update_history_point(d(2024, 7, 1), point(d(2025, 6, 10), &[("Savings", 2200.0)]))
            .await
            .unwrap();
        let data = dashboard.data().await.unwrap();
        assert_eq!(data.history.first().unwrap().date, d(2024, 8, 1));
        assert_eq!(data.history.last().unwrap().date, d(2025, 6, 10));

        let removed = dashboard.delete_history_point(d(2025, 6, 10)).await.unwrap();
        assert_eq!(removed.value_of("Savings"), 2200.0);
        assert_eq!(dashboard.data().await.unwrap().history.len(), 11);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Queries
// ═══════════════════════════════════════════════════════════════════

mod queries {
    use super::*;

    #[tokio::test]
    async fn explicit_range_filter() {
        let dashboard = FinanceDashboard::new(MemoryStore::new());
        seed(&dashboard).await;

        let points = dashboard
            .filter_history(&FilterParams::range(Some("2024-09-01"), Some("2024-11-30")))
            .await
            .unwrap();
        let dates: Vec<_> = points.iter().map(|p| p.date).collect();
        assert_eq!(dates, vec![d(2024, 9, 1), d(2024, 10, 1), d(2024, 11, 1)]);
    }

    #[tokio::test]
    async fn malformed_filter_is_a_validation_error() {
        let dashboard = FinanceDashboard::new(MemoryStore::new());
        seed(&dashboard).await;

        let err = dashboard
            .filter_history(&FilterParams::range(Some("2024/09/01"), None))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn breakdown_of_empty_window_is_insufficient() {
        let dashboard = FinanceDashboard::new(MemoryStore::new());
        seed(&dashboard).await;

        let err = dashboard
            .breakdown(&FilterParams::range(Some("2000-01-01"), Some("2000-12-31")))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InsufficientData);
    }

    #[tokio::test]
    async fn breakdown_uses_latest_point_in_window() {
        let dashboard = FinanceDashboard::new(MemoryStore::new());
        seed(&dashboard).await;

        let breakdown = dashboard
            .breakdown(&FilterParams::range(None, Some("2024-12-31")))
            .await
            .unwrap();
        assert_eq!(breakdown.date, Some(d(2024, 12, 1)));
        assert_eq!(breakdown.items[0].value, 1500.0);
    }

    #[tokio::test]
    async fn history_chart_covers_window() {
        let dashboard = FinanceDashboard::new(MemoryStore::new());
        seed(&dashboard).await;

        let chart = dashboard
            .history_chart(&FilterParams::period(Period::All))
            .await
            .unwrap();
        assert_eq!(chart.len(), 12);
        assert_eq!(chart[0].total, 6000.0);
        assert_eq!(chart[11].total, 7100.0);
    }

    #[tokio::test]
    async fn narrow_calculation_window_needs_two_points() {
        let dashboard = FinanceDashboard::new(MemoryStore::new());
        dashboard.add_category("Cash", "#111111").await.unwrap();
        dashboard
            .upsert_history_point(point(d(2025, 6, 1), &[("Cash", 1.0)]))
            .await
            .unwrap();

        let err = dashboard
            .projections_at(ProjectionConfig::new(3, 3), now())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InsufficientData);
    }
}

//! Aggregate queries behind the dashboard summary.

use std::future::Future;

use sqlx::SqlitePool;

use super::RepositoryError;
use crate::models::{DashboardSummary, MonthlyTotal};

/// Items at or below this stock level count as low stock.
pub const LOW_STOCK_THRESHOLD: i64 = 10;

/// Number of month buckets in the sales chart.
pub const CHART_MONTHS: i64 = 6;

/// Compute the dashboard summary.
///
/// Each figure is queried independently; a failing query is logged and its
/// figure reported as zero (or an empty series) so the others still show.
pub async fn summary(pool: &SqlitePool) -> DashboardSummary {
    let (customers, items, invoices, sales, low_stock, chart_data) = tokio::join!(
        or_default("customers", count(pool, "SELECT COUNT(*) FROM customers")),
        or_default("items", count(pool, "SELECT COUNT(*) FROM items")),
        or_default("invoices", count(pool, "SELECT COUNT(*) FROM invoices")),
        or_default("sales", total_sales(pool)),
        or_default("low_stock", low_stock(pool)),
        or_default("chart_data", monthly_totals(pool)),
    );

    DashboardSummary {
        customers,
        items,
        invoices,
        sales,
        low_stock,
        chart_data,
    }
}

async fn or_default<T: Default>(
    figure: &'static str,
    query: impl Future<Output = Result<T, RepositoryError>>,
) -> T {
    query.await.unwrap_or_else(|e| {
        tracing::warn!(figure, error = %e, "Dashboard query failed");
        T::default()
    })
}

async fn count(pool: &SqlitePool, sql: &'static str) -> Result<i64, RepositoryError> {
    Ok(sqlx::query_scalar(sql).fetch_one(pool).await?)
}

async fn total_sales(pool: &SqlitePool) -> Result<f64, RepositoryError> {
    // TOTAL() is 0.0 on an empty table where SUM() would be NULL.
    Ok(sqlx::query_scalar("SELECT TOTAL(grand_total) FROM invoices")
        .fetch_one(pool)
        .await?)
}

async fn low_stock(pool: &SqlitePool) -> Result<i64, RepositoryError> {
    Ok(
        sqlx::query_scalar("SELECT COUNT(*) FROM items WHERE stock <= ?")
            .bind(LOW_STOCK_THRESHOLD)
            .fetch_one(pool)
            .await?,
    )
}

async fn monthly_totals(pool: &SqlitePool) -> Result<Vec<MonthlyTotal>, RepositoryError> {
    Ok(sqlx::query_as::<_, MonthlyTotal>(
        "SELECT strftime('%m-%Y', date) AS month, TOTAL(grand_total) AS total
         FROM invoices
         GROUP BY month
         ORDER BY MAX(date) DESC
         LIMIT ?",
    )
    .bind(CHART_MONTHS)
    .fetch_all(pool)
    .await?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::test_support::TestStore;

    #[tokio::test]
    async fn test_empty_store_is_all_zero() {
        let ts = TestStore::new().await;
        let summary = summary(&ts.pool()).await;
        assert_eq!(summary, DashboardSummary::default());

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["lowStock"], 0);
        assert_eq!(json["chartData"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_counts_and_monthly_series() {
        let ts = TestStore::new().await;
        let pool = ts.pool();

        sqlx::query(
            "INSERT INTO items (name, stock) VALUES ('a', 10), ('b', 11), ('c', -3);
             INSERT INTO customers (name) VALUES ('Acme');
             INSERT INTO invoices (invoice_no, date, grand_total) VALUES
                 ('1', '2024-01-15', 10.0),
                 ('2', '2024-01-20', 5.5),
                 ('3', '2024-03-02', 100.0);",
        )
        .execute(&pool)
        .await
        .unwrap();

        let summary = summary(&pool).await;
        assert_eq!(summary.customers, 1);
        assert_eq!(summary.items, 3);
        assert_eq!(summary.invoices, 3);
        assert!((summary.sales - 115.5).abs() < f64::EPSILON);
        assert_eq!(summary.low_stock, 2);

        let months: Vec<_> = summary
            .chart_data
            .iter()
            .map(|m| (m.month.clone().unwrap(), m.total))
            .collect();
        assert_eq!(
            months,
            vec![("03-2024".to_string(), 100.0), ("01-2024".to_string(), 15.5)]
        );
    }

    #[tokio::test]
    async fn test_chart_capped_at_six_months() {
        let ts = TestStore::new().await;
        let pool = ts.pool();

        for month in 1..=8 {
            sqlx::query("INSERT INTO invoices (invoice_no, date, grand_total) VALUES (?, ?, 1.0)")
                .bind(format!("INV-{month}"))
                .bind(format!("2024-{month:02}-01"))
                .execute(&pool)
                .await
                .unwrap();
        }

        let summary = summary(&pool).await;
        assert_eq!(summary.chart_data.len(), 6);
        assert_eq!(summary.chart_data[0].month.as_deref(), Some("08-2024"));
    }
}

//! Database metrics.
//!
//! Query latency histograms labelled by query name, plus pool gauges.

use metrics::{counter, gauge, histogram};
use sqlx::PgPool;
use std::time::Instant;

fn record_query_duration(query_name: &'static str, duration_secs: f64) {
    histogram!("storefront_db_query_duration_seconds", "query" => query_name).record(duration_secs);
}

/// Counts a query that returned an error.
pub fn record_query_error(query_name: &'static str) {
    counter!("storefront_db_query_errors_total", "query" => query_name).increment(1);
}

/// Publishes connection pool gauges. Called by the readiness probe.
pub fn record_pool_metrics(pool: &PgPool) {
    let size = pool.size() as usize;
    let idle = pool.num_idle();

    gauge!("storefront_db_connections_active").set(size.saturating_sub(idle) as f64);
    gauge!("storefront_db_connections_idle").set(idle as f64);
    gauge!("storefront_db_connections_total").set(size as f64);
}

/// Times one repository call.
///
/// ```no_run
/// # use persistence::metrics::QueryTimer;
/// # async fn count_orders(pool: &sqlx::PgPool) -> Result<i64, sqlx::Error> {
/// let timer = QueryTimer::new("count_orders");
/// let result = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM orders")
///     .fetch_one(pool)
///     .await;
/// timer.finish(result)
/// # }
/// ```
pub struct QueryTimer {
    query_name: &'static str,
    start: Instant,
}

impl QueryTimer {
    pub fn new(query_name: &'static str) -> Self {
        Self {
            query_name,
            start: Instant::now(),
        }
    }

    /// Records the elapsed time.
    pub fn record(self) {
        record_query_duration(self.query_name, self.start.elapsed().as_secs_f64());
    }

    /// Records the elapsed time and counts errors, passing the result through.
    pub fn finish<T>(self, result: Result<T, sqlx::Error>) -> Result<T, sqlx::Error> {
        if result.is_err() {
            record_query_error(self.query_name);
        }
        self.record();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_timer_keeps_name() {
        let timer = QueryTimer::new("list_active_products");
        assert_eq!(timer.query_name, "list_active_products");
    }

    #[test]
    fn test_finish_passes_result_through() {
        let ok: Result<i32, sqlx::Error> = Ok(7);
        assert_eq!(QueryTimer::new("q").finish(ok).unwrap(), 7);

        let err: Result<i32, sqlx::Error> = Err(sqlx::Error::RowNotFound);
        assert!(matches!(
            QueryTimer::new("q").finish(err),
            Err(sqlx::Error::RowNotFound)
        ));
    }
}

//! Engine metrics

use std::time::Duration;

/// Counter metric types
#[derive(Debug, Clone, Copy)]
pub enum CounterMetric {
    /// Markets created
    MarketsCreated,
    /// Bets placed
    BetsPlaced,
    /// Bets resolved at settlement
    BetsResolved,
    /// Markets settled
    MarketsSettled,
}

/// Increment a counter by one
pub fn increment(metric: CounterMetric) {
    let metric_name = match metric {
        CounterMetric::MarketsCreated => "wagerbook_markets_created_total",
        CounterMetric::BetsPlaced => "wagerbook_bets_placed_total",
        CounterMetric::BetsResolved => "wagerbook_bets_resolved_total",
        CounterMetric::MarketsSettled => "wagerbook_markets_settled_total",
    };

    metrics::counter!(metric_name).increment(1);
}

/// Record how long one whole-market settlement took
pub fn record_settlement_duration(duration: Duration) {
    metrics::histogram!("wagerbook_settlement_duration_ms").record(duration.as_millis() as f64);
}

use super::DimensionSet;
use chrono::{
    DateTime,
    Duration,
    Utc,
};
use serde::{
    Deserialize,
    Serialize,
};
use std::fmt;

/// How far back a query looks. Two sampling periods, so that at least one
/// sample is eligible even when CloudWatch reports late.
pub const QUERY_WINDOW_SECONDS: i64 = 120;
/// Sampling period of every statistic query.
pub const QUERY_PERIOD_SECONDS: i32 = 60;

/// Statistical reduction requested for a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Statistic {
    Average,
    Sum,
}

impl Statistic {
    /// Name of the statistic on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Statistic::Average => "Average",
            Statistic::Sum => "Sum",
        }
    }

    /// The aggregate of `datapoint` matching this statistic.
    pub fn select(&self, datapoint: &Datapoint) -> Option<f64> {
        match self {
            Statistic::Average => datapoint.average,
            Statistic::Sum => datapoint.sum,
        }
    }
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One time-stamped aggregate sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Datapoint {
    pub timestamp: DateTime<Utc>,
    pub average: Option<f64>,
    pub sum: Option<f64>,
}

/// Picks the most recent datapoint.
///
/// On identical timestamps the one seen last wins. Returns `None` for an empty
/// slice, never a zero-valued sample.
pub fn latest_datapoint(datapoints: &[Datapoint]) -> Option<&Datapoint> {
    datapoints.iter().fold(None, |latest: Option<&Datapoint>, datapoint| match latest {
        Some(best) if datapoint.timestamp < best.timestamp => Some(best),
        _ => Some(datapoint),
    })
}

/// A request for one statistic of one metric over a time window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticQuery {
    pub namespace: String,
    pub metric_name: String,
    pub dimensions: DimensionSet,
    pub statistic: Statistic,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub period_seconds: i32,
}

impl StatisticQuery {
    /// Query for the most recent samples up to `now` in the load balancer namespace.
    pub fn latest(dimensions: DimensionSet, metric_name: &str, statistic: Statistic, now: DateTime<Utc>) -> Self {
        Self {
            namespace: super::STATISTICS_NAMESPACE.to_string(),
            metric_name: metric_name.to_string(),
            dimensions,
            statistic,
            start_time: now - Duration::seconds(QUERY_WINDOW_SECONDS),
            end_time: now,
            period_seconds: QUERY_PERIOD_SECONDS,
        }
    }
}

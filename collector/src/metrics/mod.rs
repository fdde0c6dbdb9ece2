pub mod datapoint;
pub mod dimension;

// Re-export the main types for easy access
pub use datapoint::*;
pub use dimension::*;
use serde::{
    Deserialize,
    Serialize,
};
use std::{
    collections::BTreeMap,
    fmt,
    ops::Deref,
};

/// Namespace holding the per-zone host count catalog used for zone discovery.
pub const DISCOVERY_NAMESPACE: &str = "AWS/ELB";
/// Namespace of the Application Load Balancer statistic family.
pub const STATISTICS_NAMESPACE: &str = "AWS/ApplicationELB";

/// Metric names
pub mod names {
    pub const HEALTHY_HOST_COUNT: &str = "HealthyHostCount";
    pub const UNHEALTHY_HOST_COUNT: &str = "UnHealthyHostCount";
    pub const TARGET_RESPONSE_TIME: &str = "TargetResponseTime";
    pub const HTTP_CODE_TARGET_2XX: &str = "HTTPCode_Target_2XX_Count";
    pub const HTTP_CODE_TARGET_3XX: &str = "HTTPCode_Target_3XX_Count";
    pub const HTTP_CODE_TARGET_4XX: &str = "HTTPCode_Target_4XX_Count";
    pub const HTTP_CODE_TARGET_5XX: &str = "HTTPCode_Target_5XX_Count";

    /// Health metrics queried once per availability zone, in query order.
    pub const HOST_COUNTS: [&str; 2] = [HEALTHY_HOST_COUNT, UNHEALTHY_HOST_COUNT];

    /// Status-code classes summed over the whole load balancer, in query order.
    pub const HTTP_CODES: [&str; 4] = [
        HTTP_CODE_TARGET_2XX,
        HTTP_CODE_TARGET_3XX,
        HTTP_CODE_TARGET_4XX,
        HTTP_CODE_TARGET_5XX,
    ];
}

/// An availability zone identifier as reported by the metric catalog.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Zone(String);

impl Zone {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for Zone {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Zone {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Key under which a per-zone metric is reported, e.g. `HealthyHostCount_us-east-1a`.
pub fn zone_metric_key(metric_name: &str, zone: &Zone) -> String {
    format!("{metric_name}_{zone}")
}

/// Values gathered during one polling cycle, keyed by metric key.
///
/// Built from scratch every cycle. A key is only present when its query
/// produced a value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricValues(BTreeMap<String, f64>);

impl MetricValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: f64) -> Option<f64> {
        self.0.insert(key.into(), value)
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.0.get(key).copied()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(key, value)| (key.as_str(), *value))
    }
}

impl FromIterator<(String, f64)> for MetricValues {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

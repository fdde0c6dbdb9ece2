//! # ALB Metrics Collector
//!
//! Fetches AWS Application Load Balancer metrics from CloudWatch and shapes them for
//! the Mackerel agent.
//!
//! ## Architecture
//!
//! - **`cloudwatch`**: the `MetricsService` seam and its AWS SDK implementation
//! - **`metrics`**: zones, dimensions, statistic queries, datapoints and metric values
//! - **`collectors`**: zone discovery, per-cycle aggregation and the `AlbPlugin` facade
//! - **`schema`**: graph definitions derived from the discovered zones
//!
//! ## Failure model
//!
//! Zone discovery errors are fatal and surface as [`QueryError`]. Failures of single
//! statistic queries only drop the affected metric from the cycle's [`MetricValues`].

#[macro_use]
extern crate tracing;

pub mod cloudwatch;
pub mod collectors;
pub mod error;
pub mod metrics;
pub mod schema;

#[cfg(test)]
mod test_support;

pub use cloudwatch::{
    CloudWatchService,
    MetricsService,
    ServiceConfig,
    StaticCredentials,
};
pub use collectors::*;
pub use error::QueryError;
pub use metrics::*;
pub use schema::{
    graph_schema,
    Graph,
    GraphMetric,
    GraphSchema,
    Unit,
};

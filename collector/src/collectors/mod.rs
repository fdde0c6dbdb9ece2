//! # Collectors Module
//!
//! - **`ZoneDiscoverer`**: enumerates the availability zones reporting target health
//! - **`MetricAggregator`**: fetches the latest datapoint of every metric for one cycle
//! - **`AlbPlugin`**: discovers zones once and serves graph definitions and values from them

pub mod aggregator;
pub mod discoverer;
pub mod plugin;

// Re-export the main types for easy access
pub use aggregator::MetricAggregator;
pub use discoverer::ZoneDiscoverer;
pub use plugin::AlbPlugin;

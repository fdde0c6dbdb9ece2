use crate::metrics::Statistic;

/// Errors raised while talking to the monitoring API or interpreting its answers.
#[derive(thiserror::Error, Debug)]
pub enum QueryError {
    /// Transport, authentication or service-side failure
    #[error("CloudWatch request failed: {0}")]
    Service(String),

    /// The statistic query succeeded but returned an empty datapoint list
    #[error("fetched no datapoints for {metric}")]
    NoDatapoints { metric: String },

    /// The latest datapoint does not carry the requested aggregate
    #[error("latest datapoint for {metric} has no {statistic} value")]
    MissingValue { metric: String, statistic: Statistic },

    /// The metric catalog could not be interpreted
    #[error("malformed metric catalog: {0}")]
    MalformedCatalog(String),
}

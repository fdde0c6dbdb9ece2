//! # CloudWatch Query Service
//!
//! The seam between the collectors and the monitoring API. Collectors only see the
//! [`MetricsService`] trait; [`CloudWatchService`] is the production implementation on
//! top of the AWS SDK.

use crate::{
    error::QueryError,
    metrics::{
        CatalogEntry,
        Datapoint,
        Dimension,
        DimensionFilter,
        Statistic,
        StatisticQuery,
    },
};
use aws_sdk_cloudwatch::{
    config::{
        Credentials,
        Region,
    },
    error::DisplayErrorContext,
    primitives::DateTime as SmithyDateTime,
    types,
    Client,
};
use chrono::{
    DateTime,
    Utc,
};
use std::{
    future::Future,
    pin::Pin,
};

pub type ServiceFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, QueryError>> + Send + 'a>>;

/// Read access to a metric catalog and its statistics
pub trait MetricsService: Send + Sync {
    /// List the catalog entries of `metric_name` in `namespace` that match every filter
    fn list_metrics<'a>(
        &'a self,
        namespace: &'a str,
        metric_name: &'a str,
        filters: &'a [DimensionFilter],
    ) -> ServiceFuture<'a, Vec<CatalogEntry>>;

    /// Fetch the datapoints answering `query`, in whatever order the service returns them
    fn get_statistics<'a>(&'a self, query: &'a StatisticQuery) -> ServiceFuture<'a, Vec<Datapoint>>;
}

/// Static access key pair, used instead of the default credential chain when configured.
#[derive(Clone)]
pub struct StaticCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
}

impl std::fmt::Debug for StaticCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .finish()
    }
}

/// Already-resolved connection settings.
#[derive(Debug, Clone, Default)]
pub struct ServiceConfig {
    /// Falls back to the SDK region chain (environment, profile, instance metadata) when absent
    pub region: Option<String>,
    pub credentials: Option<StaticCredentials>,
}

/// [`MetricsService`] backed by the CloudWatch API.
#[derive(Debug, Clone)]
pub struct CloudWatchService {
    client: Client,
}

impl CloudWatchService {
    pub async fn connect(config: &ServiceConfig) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());

        if let Some(region) = &config.region {
            loader = loader.region(Region::new(region.clone()));
        }

        if let Some(credentials) = &config.credentials {
            loader = loader.credentials_provider(Credentials::new(
                credentials.access_key_id.clone(),
                credentials.secret_access_key.clone(),
                None,
                None,
                "mackerel-plugin-alb",
            ));
        }

        let sdk_config = loader.load().await;
        debug!(region = ?sdk_config.region(), "CloudWatch client configured");

        Self {
            client: Client::new(&sdk_config),
        }
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

impl MetricsService for CloudWatchService {
    fn list_metrics<'a>(
        &'a self,
        namespace: &'a str,
        metric_name: &'a str,
        filters: &'a [DimensionFilter],
    ) -> ServiceFuture<'a, Vec<CatalogEntry>> {
        Box::pin(async move {
            let filters: Vec<types::DimensionFilter> = filters
                .iter()
                .map(|filter| {
                    types::DimensionFilter::builder()
                        .name(filter.name.clone())
                        .set_value(filter.value.clone())
                        .build()
                })
                .collect();

            let mut entries = Vec::new();
            let mut next_token: Option<String> = None;

            loop {
                let response = self
                    .client
                    .list_metrics()
                    .namespace(namespace)
                    .metric_name(metric_name)
                    .set_dimensions(Some(filters.clone()))
                    .set_next_token(next_token.take())
                    .send()
                    .await
                    .map_err(|e| QueryError::Service(DisplayErrorContext(&e).to_string()))?;

                for metric in response.metrics() {
                    entries.push(catalog_entry(metric)?);
                }

                match response.next_token() {
                    Some(token) if !token.is_empty() => next_token = Some(token.to_string()),
                    _ => break,
                }
            }

            Ok(entries)
        })
    }

    fn get_statistics<'a>(&'a self, query: &'a StatisticQuery) -> ServiceFuture<'a, Vec<Datapoint>> {
        Box::pin(async move {
            let dimensions: Vec<types::Dimension> = query
                .dimensions
                .iter()
                .map(|dimension| {
                    types::Dimension::builder()
                        .name(dimension.name.clone())
                        .value(dimension.value.clone())
                        .build()
                })
                .collect();

            let response = self
                .client
                .get_metric_statistics()
                .namespace(&query.namespace)
                .metric_name(&query.metric_name)
                .set_dimensions(Some(dimensions))
                .start_time(to_smithy(query.start_time))
                .end_time(to_smithy(query.end_time))
                .period(query.period_seconds)
                .statistics(to_sdk_statistic(query.statistic))
                .send()
                .await
                .map_err(|e| QueryError::Service(DisplayErrorContext(&e).to_string()))?;

            let datapoints = response.datapoints().iter().filter_map(to_datapoint).collect();

            Ok(datapoints)
        })
    }
}

fn catalog_entry(metric: &types::Metric) -> Result<CatalogEntry, QueryError> {
    let dimensions = metric
        .dimensions()
        .iter()
        .map(|dimension| match (dimension.name(), dimension.value()) {
            (Some(name), Some(value)) => Ok(Dimension::new(name, value)),
            _ => Err(QueryError::MalformedCatalog(format!(
                "dimension without name or value on metric {:?}",
                metric.metric_name()
            ))),
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CatalogEntry {
        namespace: metric.namespace().unwrap_or_default().to_string(),
        metric_name: metric.metric_name().unwrap_or_default().to_string(),
        dimensions,
    })
}

fn to_sdk_statistic(statistic: Statistic) -> types::Statistic {
    match statistic {
        Statistic::Average => types::Statistic::Average,
        Statistic::Sum => types::Statistic::Sum,
    }
}

fn to_smithy(time: DateTime<Utc>) -> SmithyDateTime {
    SmithyDateTime::from_millis(time.timestamp_millis())
}

fn from_smithy(time: &SmithyDateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(time.secs(), time.subsec_nanos())
}

/// Datapoints without a timestamp cannot take part in latest-datapoint selection and are dropped.
fn to_datapoint(datapoint: &types::Datapoint) -> Option<Datapoint> {
    let timestamp = datapoint.timestamp().and_then(from_smithy)?;
    Some(Datapoint {
        timestamp,
        average: datapoint.average(),
        sum: datapoint.sum(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    #[test]
    fn timestamps_survive_sdk_conversion() {
        let time = Utc.with_ymd_and_hms(2024, 2, 29, 23, 59, 0).unwrap();
        assert_eq!(from_smithy(&to_smithy(time)), Some(time));
    }

    #[test]
    fn sdk_datapoints_keep_both_aggregates() {
        let time = Utc.with_ymd_and_hms(2024, 1, 1, 0, 1, 0).unwrap();
        let sdk = types::Datapoint::builder()
            .timestamp(to_smithy(time))
            .average(0.5)
            .sum(12.0)
            .build();

        assert_eq!(
            to_datapoint(&sdk),
            Some(Datapoint {
                timestamp: time,
                average: Some(0.5),
                sum: Some(12.0),
            })
        );
    }

    #[test]
    fn sdk_datapoints_without_timestamp_are_dropped() {
        let sdk = types::Datapoint::builder().average(1.0).build();
        assert_eq!(to_datapoint(&sdk), None);
    }

    #[test]
    fn catalog_entries_keep_dimension_order() {
        let metric = types::Metric::builder()
            .namespace("AWS/ELB")
            .metric_name("HealthyHostCount")
            .dimensions(types::Dimension::builder().name("LoadBalancer").value("lb").build())
            .dimensions(types::Dimension::builder().name("AvailabilityZone").value("a").build())
            .build();

        let entry = catalog_entry(&metric).unwrap();
        assert_eq!(
            entry.dimensions,
            vec![Dimension::new("LoadBalancer", "lb"), Dimension::new("AvailabilityZone", "a")]
        );
    }

    #[test]
    fn catalog_dimension_without_value_is_malformed() {
        let metric = types::Metric::builder()
            .metric_name("HealthyHostCount")
            .dimensions(types::Dimension::builder().name("AvailabilityZone").build())
            .build();

        assert!(matches!(catalog_entry(&metric), Err(QueryError::MalformedCatalog(_))));
    }
}

use crate::{
    cloudwatch::MetricsService,
    error::QueryError,
    metrics::{
        latest_datapoint,
        names,
        zone_metric_key,
        DimensionSet,
        MetricValues,
        Statistic,
        StatisticQuery,
        Target,
        Zone,
    },
};
use chrono::{
    DateTime,
    Utc,
};

/// Collects the latest value of every load balancer metric for one polling cycle.
pub struct MetricAggregator<'a, S: ?Sized> {
    service: &'a S,
    target: &'a Target,
}

impl<'a, S: MetricsService + ?Sized> MetricAggregator<'a, S> {
    pub fn new(service: &'a S, target: &'a Target) -> Self {
        Self { service, target }
    }

    /// Fetch all metrics as of now. See [`MetricAggregator::fetch_metrics_at`].
    pub async fn fetch_metrics(&self, zones: &[Zone]) -> MetricValues {
        self.fetch_metrics_at(zones, Utc::now()).await
    }

    /// Query the host counts of every zone, then the whole-balancer response time and
    /// status code counts, one after another.
    ///
    /// A query that fails or yields no value only drops its own key; the returned map
    /// holds whatever could be fetched.
    #[instrument(level = "debug", skip(self, zones), fields(zones = zones.len()))]
    pub async fn fetch_metrics_at(&self, zones: &[Zone], now: DateTime<Utc>) -> MetricValues {
        let mut requests: Vec<(String, StatisticQuery)> = Vec::with_capacity(zones.len() * 2 + 5);

        for zone in zones {
            let dimensions = DimensionSet::for_zone(zone, self.target);
            for metric_name in names::HOST_COUNTS {
                requests.push((
                    zone_metric_key(metric_name, zone),
                    StatisticQuery::latest(dimensions.clone(), metric_name, Statistic::Average, now),
                ));
            }
        }

        let global = DimensionSet::global(self.target);
        requests.push((
            names::TARGET_RESPONSE_TIME.to_string(),
            StatisticQuery::latest(global.clone(), names::TARGET_RESPONSE_TIME, Statistic::Average, now),
        ));
        for metric_name in names::HTTP_CODES {
            requests.push((
                metric_name.to_string(),
                StatisticQuery::latest(global.clone(), metric_name, Statistic::Sum, now),
            ));
        }

        let mut values = MetricValues::new();
        for (key, query) in requests {
            match self.latest_value(&query).await {
                Ok(value) => {
                    trace!(%key, value, "Fetched metric");
                    if values.insert(key.clone(), value).is_some() {
                        warn!(%key, "Metric key fetched twice, keeping the later value");
                    }
                }
                Err(QueryError::NoDatapoints { .. }) => {
                    debug!(%key, "No datapoints, skipping metric");
                }
                Err(error) => {
                    warn!(%key, %error, "Failed to fetch metric, skipping");
                }
            }
        }

        debug!(fetched = values.len(), "Metric collection finished");
        values
    }

    /// The requested aggregate of the most recent datapoint answering `query`.
    pub async fn latest_value(&self, query: &StatisticQuery) -> Result<f64, QueryError> {
        let datapoints = self.service.get_statistics(query).await?;

        let latest = latest_datapoint(&datapoints).ok_or_else(|| QueryError::NoDatapoints {
            metric: query.metric_name.clone(),
        })?;

        query.statistic.select(latest).ok_or_else(|| QueryError::MissingValue {
            metric: query.metric_name.clone(),
            statistic: query.statistic,
        })
    }
}

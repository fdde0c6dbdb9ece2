use crate::{
    cloudwatch::MetricsService,
    collectors::{
        MetricAggregator,
        ZoneDiscoverer,
    },
    error::QueryError,
    metrics::{
        MetricValues,
        Target,
        Zone,
    },
    schema::{
        graph_schema,
        GraphSchema,
    },
};

/// Ties zone discovery, metric collection and graph definitions together for one
/// load balancer / target group pair.
///
/// Zones are discovered once, in [`AlbPlugin::prepare`], and reused by every later call.
pub struct AlbPlugin<S> {
    service: S,
    target: Target,
    zones: Vec<Zone>,
}

impl<S: MetricsService> AlbPlugin<S> {
    /// Discover the availability zones and return a plugin ready to report.
    ///
    /// Fails when the zone catalog cannot be listed; there is no retry.
    pub async fn prepare(service: S, target: Target) -> Result<Self, QueryError> {
        let zones = ZoneDiscoverer::new(&service).discover().await?;
        if zones.is_empty() {
            warn!("No availability zone reports HealthyHostCount; host count graphs will be empty");
        }

        Ok(Self {
            service,
            target,
            zones,
        })
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    /// Graph definitions for the discovered zones.
    pub fn graph_definition(&self) -> GraphSchema {
        graph_schema(&self.zones)
    }

    /// Latest value of every metric that could be fetched this cycle.
    pub async fn fetch_metrics(&self) -> MetricValues {
        MetricAggregator::new(&self.service, &self.target)
            .fetch_metrics(&self.zones)
            .await
    }
}

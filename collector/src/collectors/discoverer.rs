use crate::{
    cloudwatch::MetricsService,
    error::QueryError,
    metrics::{
        dimensions,
        names,
        CatalogEntry,
        DimensionFilter,
        Zone,
        DISCOVERY_NAMESPACE,
    },
};

/// Enumerates the availability zones that report target health.
pub struct ZoneDiscoverer<'a, S: ?Sized> {
    service: &'a S,
}

impl<'a, S: MetricsService + ?Sized> ZoneDiscoverer<'a, S> {
    pub fn new(service: &'a S) -> Self {
        Self { service }
    }

    /// List the healthy-host-count catalog and keep the zone of every entry dimensioned
    /// by the zone alone. Zones come back in catalog order, without duplicates.
    ///
    /// Any service failure is returned as-is; callers treat it as fatal.
    #[instrument(level = "debug", skip(self))]
    pub async fn discover(&self) -> Result<Vec<Zone>, QueryError> {
        let filters = [DimensionFilter::named(dimensions::AVAILABILITY_ZONE)];
        let catalog = self
            .service
            .list_metrics(DISCOVERY_NAMESPACE, names::HEALTHY_HOST_COUNT, &filters)
            .await?;

        let mut zones: Vec<Zone> = Vec::with_capacity(catalog.len());
        for entry in &catalog {
            let Some(zone) = zone_of(entry) else {
                trace!(dimensions = ?entry.dimensions, "Skipping catalog entry");
                continue;
            };
            if zones.contains(&zone) {
                debug!(%zone, "Duplicate zone in catalog");
                continue;
            }
            zones.push(zone);
        }

        info!(count = zones.len(), ?zones, "Discovered availability zones");
        Ok(zones)
    }
}

/// The zone of a catalog entry carrying exactly one `AvailabilityZone` dimension.
fn zone_of(entry: &CatalogEntry) -> Option<Zone> {
    match entry.dimensions.as_slice() {
        [only] if only.name == dimensions::AVAILABILITY_ZONE && !only.value.is_empty() => {
            Some(Zone::new(only.value.clone()))
        }
        _ => None,
    }
}

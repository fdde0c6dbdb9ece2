use crate::{
    cloudwatch::{
        MetricsService,
        ServiceFuture,
    },
    error::QueryError,
    metrics::{
        CatalogEntry,
        Datapoint,
        DimensionFilter,
        DimensionSet,
        StatisticQuery,
    },
};
use chrono::{
    TimeZone,
    Utc,
};
use std::{
    collections::HashMap,
    sync::Mutex,
};

type Listing = (String, String, Vec<DimensionFilter>);
type Answer = Result<Vec<Datapoint>, String>;

/// In-memory [`MetricsService`] with a scripted catalog and per-query answers.
///
/// Statistic queries without a scripted answer return no datapoints.
#[derive(Default)]
pub(crate) struct FakeService {
    catalog: Option<Result<Vec<CatalogEntry>, String>>,
    answers: HashMap<(String, DimensionSet), Answer>,
    listings: Mutex<Vec<Listing>>,
    queries: Mutex<Vec<StatisticQuery>>,
}

impl FakeService {
    pub(crate) fn with_catalog(catalog: Vec<CatalogEntry>) -> Self {
        Self {
            catalog: Some(Ok(catalog)),
            ..Self::default()
        }
    }

    pub(crate) fn failing_catalog(message: &str) -> Self {
        Self {
            catalog: Some(Err(message.to_string())),
            ..Self::default()
        }
    }

    pub(crate) fn answer(mut self, metric_name: &str, dimensions: DimensionSet, datapoints: Vec<Datapoint>) -> Self {
        self.answers.insert((metric_name.to_string(), dimensions), Ok(datapoints));
        self
    }

    pub(crate) fn fail(mut self, metric_name: &str, dimensions: DimensionSet, message: &str) -> Self {
        self.answers
            .insert((metric_name.to_string(), dimensions), Err(message.to_string()));
        self
    }

    pub(crate) fn listings(&self) -> Vec<Listing> {
        self.listings.lock().unwrap().clone()
    }

    pub(crate) fn queries(&self) -> Vec<StatisticQuery> {
        self.queries.lock().unwrap().clone()
    }
}

impl MetricsService for FakeService {
    fn list_metrics<'a>(
        &'a self,
        namespace: &'a str,
        metric_name: &'a str,
        filters: &'a [DimensionFilter],
    ) -> ServiceFuture<'a, Vec<CatalogEntry>> {
        Box::pin(async move {
            self.listings
                .lock()
                .unwrap()
                .push((namespace.to_string(), metric_name.to_string(), filters.to_vec()));
            match &self.catalog {
                Some(Ok(catalog)) => Ok(catalog.clone()),
                Some(Err(message)) => Err(QueryError::Service(message.clone())),
                None => Ok(Vec::new()),
            }
        })
    }

    fn get_statistics<'a>(&'a self, query: &'a StatisticQuery) -> ServiceFuture<'a, Vec<Datapoint>> {
        Box::pin(async move {
            self.queries.lock().unwrap().push(query.clone());
            match self.answers.get(&(query.metric_name.clone(), query.dimensions.clone())) {
                Some(Ok(datapoints)) => Ok(datapoints.clone()),
                Some(Err(message)) => Err(QueryError::Service(message.clone())),
                None => Ok(Vec::new()),
            }
        })
    }
}

/// A datapoint at `secs` past the epoch carrying the same value as average and sum.
pub(crate) fn datapoint(secs: i64, value: f64) -> Datapoint {
    Datapoint {
        timestamp: Utc.timestamp_opt(secs, 0).unwrap(),
        average: Some(value),
        sum: Some(value),
    }
}

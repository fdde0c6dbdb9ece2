//! Graph definitions handed to the host agent. The host count graphs carry one
//! stacked series per availability zone and are rebuilt from the zone list on
//! every call.

use crate::metrics::{
    names,
    zone_metric_key,
    Zone,
};
use serde::{
    Deserialize,
    Serialize,
};
use std::collections::BTreeMap;

pub const TARGET_RESPONSE_TIME_GRAPH: &str = "alb.targetresponsetime";
pub const HTTP_TARGET_GRAPH: &str = "alb.http_target";
pub const HEALTHY_HOST_COUNT_GRAPH: &str = "alb.healthy_host_count";
pub const UNHEALTHY_HOST_COUNT_GRAPH: &str = "alb.unhealthy_host_count";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Float,
    Integer,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphMetric {
    pub name: String,
    pub label: String,
    pub stacked: bool,
}

impl GraphMetric {
    fn new(name: impl Into<String>, label: impl Into<String>, stacked: bool) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            stacked,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Graph {
    pub label: String,
    pub unit: Unit,
    pub metrics: Vec<GraphMetric>,
}

/// Graphs keyed by graph identifier.
pub type GraphSchema = BTreeMap<String, Graph>;

struct HostCountGraph {
    id: &'static str,
    label: &'static str,
    metric_name: &'static str,
}

const HOST_COUNT_GRAPHS: [HostCountGraph; 2] = [
    HostCountGraph {
        id: HEALTHY_HOST_COUNT_GRAPH,
        label: "ALB Healthy Host Count",
        metric_name: names::HEALTHY_HOST_COUNT,
    },
    HostCountGraph {
        id: UNHEALTHY_HOST_COUNT_GRAPH,
        label: "ALB Unhealthy Host Count",
        metric_name: names::UNHEALTHY_HOST_COUNT,
    },
];

fn static_graphs() -> GraphSchema {
    let response_time = Graph {
        label: "Whole ALB TargetResponseTime".to_string(),
        unit: Unit::Float,
        metrics: vec![GraphMetric::new(
            names::TARGET_RESPONSE_TIME,
            names::TARGET_RESPONSE_TIME,
            false,
        )],
    };

    let http_target = Graph {
        label: "Whole ALB HTTP Target Count".to_string(),
        unit: Unit::Integer,
        metrics: names::HTTP_CODES
            .iter()
            .zip(["2XX", "3XX", "4XX", "5XX"])
            .map(|(name, label)| GraphMetric::new(*name, label, true))
            .collect(),
    };

    GraphSchema::from([
        (TARGET_RESPONSE_TIME_GRAPH.to_string(), response_time),
        (HTTP_TARGET_GRAPH.to_string(), http_target),
    ])
}

/// A freshly built schema for `zones`: the static graphs plus one host count
/// series per zone, stacked and labelled with the zone identifier.
///
/// An empty zone list yields host count graphs without series.
pub fn graph_schema(zones: &[Zone]) -> GraphSchema {
    let mut schema = static_graphs();

    for graph in &HOST_COUNT_GRAPHS {
        let metrics = zones
            .iter()
            .map(|zone| GraphMetric::new(zone_metric_key(graph.metric_name, zone), zone.as_str(), true))
            .collect();

        schema.insert(
            graph.id.to_string(),
            Graph {
                label: graph.label.to_string(),
                unit: Unit::Integer,
                metrics,
            },
        );
    }

    schema
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn zones(ids: &[&str]) -> Vec<Zone> {
        ids.iter().map(|id| Zone::from(*id)).collect()
    }

    #[test]
    fn host_count_graphs_have_one_stacked_series_per_zone() {
        let schema = graph_schema(&zones(&["a", "b"]));

        let healthy = &schema[HEALTHY_HOST_COUNT_GRAPH];
        assert_eq!(healthy.label, "ALB Healthy Host Count");
        assert_eq!(healthy.unit, Unit::Integer);
        assert_eq!(
            healthy.metrics,
            vec![
                GraphMetric::new("HealthyHostCount_a", "a", true),
                GraphMetric::new("HealthyHostCount_b", "b", true),
            ]
        );

        let unhealthy = &schema[UNHEALTHY_HOST_COUNT_GRAPH];
        assert_eq!(
            unhealthy.metrics,
            vec![
                GraphMetric::new("UnHealthyHostCount_a", "a", true),
                GraphMetric::new("UnHealthyHostCount_b", "b", true),
            ]
        );
    }

    #[test]
    fn schema_follows_zone_changes() {
        let before = graph_schema(&zones(&["a"]));
        assert_eq!(before[HEALTHY_HOST_COUNT_GRAPH].metrics.len(), 1);

        let after = graph_schema(&zones(&["a", "b", "c"]));
        assert_eq!(after[HEALTHY_HOST_COUNT_GRAPH].metrics.len(), 3);
        assert_eq!(after[UNHEALTHY_HOST_COUNT_GRAPH].metrics.len(), 3);

        let shrunk = graph_schema(&zones(&["c"]));
        assert_eq!(
            shrunk[HEALTHY_HOST_COUNT_GRAPH].metrics,
            vec![GraphMetric::new("HealthyHostCount_c", "c", true)]
        );
    }

    #[test]
    fn static_graphs_do_not_depend_on_zones() {
        let empty = graph_schema(&[]);
        let many = graph_schema(&zones(&["x", "y"]));

        assert_eq!(empty.len(), 4);
        assert_eq!(empty[TARGET_RESPONSE_TIME_GRAPH], many[TARGET_RESPONSE_TIME_GRAPH]);
        assert_eq!(empty[HTTP_TARGET_GRAPH], many[HTTP_TARGET_GRAPH]);
        assert!(empty[HEALTHY_HOST_COUNT_GRAPH].metrics.is_empty());

        let http = &many[HTTP_TARGET_GRAPH];
        assert_eq!(http.unit, Unit::Integer);
        assert_eq!(
            http.metrics.iter().map(|m| m.label.as_str()).collect::<Vec<_>>(),
            vec!["2XX", "3XX", "4XX", "5XX"]
        );
        assert!(http.metrics.iter().all(|m| m.stacked));
        assert!(!many[TARGET_RESPONSE_TIME_GRAPH].metrics[0].stacked);
    }

    #[test]
    fn graphs_serialize_in_agent_shape() {
        let schema = graph_schema(&zones(&["a"]));
        let json = serde_json::to_value(&schema[HEALTHY_HOST_COUNT_GRAPH]).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "label": "ALB Healthy Host Count",
                "unit": "integer",
                "metrics": [{ "name": "HealthyHostCount_a", "label": "a", "stacked": true }],
            })
        );
    }
}

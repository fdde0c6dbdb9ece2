use super::Zone;
use serde::{
    Deserialize,
    Serialize,
};

/// Dimension names
pub mod dimensions {
    pub const AVAILABILITY_ZONE: &str = "AvailabilityZone";
    pub const LOAD_BALANCER: &str = "LoadBalancer";
    pub const TARGET_GROUP: &str = "TargetGroup";
}

/// A named key/value tag scoping a query to a resource or sub-resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimension {
    pub name: String,
    pub value: String,
}

impl Dimension {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Restricts a catalog listing to metrics carrying a dimension, optionally with a fixed value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DimensionFilter {
    pub name: String,
    pub value: Option<String>,
}

impl DimensionFilter {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
        }
    }
}

/// One entry of the metric catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogEntry {
    pub namespace: String,
    pub metric_name: String,
    pub dimensions: Vec<Dimension>,
}

/// The load balancer and target group a plugin instance reports on. Both are optional;
/// an absent value widens the queries to every resource in the account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub load_balancer: Option<String>,
    pub target_group: Option<String>,
}

impl Target {
    pub fn new(load_balancer: Option<String>, target_group: Option<String>) -> Self {
        Self {
            load_balancer,
            target_group,
        }
    }
}

/// Ordered dimensions identifying the entity a statistic query is about.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DimensionSet(Vec<Dimension>);

impl DimensionSet {
    /// Dimensions of the whole load balancer / target group pair, without a zone.
    pub fn global(target: &Target) -> Self {
        let mut set = Self::default();
        set.extend_with_target(target);
        set
    }

    /// Dimensions of a single zone, narrowed by the configured load balancer and target group.
    pub fn for_zone(zone: &Zone, target: &Target) -> Self {
        let mut set = Self(vec![Dimension::new(dimensions::AVAILABILITY_ZONE, zone.as_str())]);
        set.extend_with_target(target);
        set
    }

    fn extend_with_target(&mut self, target: &Target) {
        if let Some(load_balancer) = target.load_balancer.as_deref() {
            self.0.push(Dimension::new(dimensions::LOAD_BALANCER, load_balancer));
        }
        if let Some(target_group) = target.target_group.as_deref() {
            self.0.push(Dimension::new(dimensions::TARGET_GROUP, target_group));
        }
    }

    pub fn as_slice(&self) -> &[Dimension] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &Dimension> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Dimension>> for DimensionSet {
    fn from(dimensions: Vec<Dimension>) -> Self {
        Self(dimensions)
    }
}

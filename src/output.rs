//! Mackerel agent plugin protocol.
//!
//! In definition mode the plugin prints its graph definitions, otherwise one
//! `<graph>.<metric>\t<value>\t<epoch seconds>` line per known value.

use alb_plugin_collector::{
    GraphSchema,
    MetricValues,
};
use chrono::{
    DateTime,
    Utc,
};
use color_eyre::Result;
use eyre::Context as _;
use std::io::Write;

/// Set by the agent when it asks a plugin for its graph definitions.
pub const META_ENV: &str = "MACKEREL_AGENT_PLUGIN_META";

const DEFINITION_HEADER: &str = "# mackerel-agent-plugin";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Definitions,
    Values,
}

impl Mode {
    pub fn from_env() -> Self {
        Self::from_meta(std::env::var(META_ENV).ok().as_deref())
    }

    pub fn from_meta(meta: Option<&str>) -> Self {
        match meta {
            Some(value) if !value.is_empty() => Mode::Definitions,
            _ => Mode::Values,
        }
    }
}

#[derive(serde::Serialize)]
struct GraphDefinitions<'a> {
    graphs: &'a GraphSchema,
}

pub fn write_definitions<W: Write>(out: &mut W, schema: &GraphSchema) -> Result<()> {
    writeln!(out, "{DEFINITION_HEADER}")?;
    serde_json::to_writer(&mut *out, &GraphDefinitions { graphs: schema })
        .context("Failed to serialize graph definitions")?;
    writeln!(out)?;
    Ok(())
}

/// Values are written in schema order. Metrics without a value this cycle are left out,
/// as are non-finite values the agent would reject.
pub fn write_values<W: Write>(
    out: &mut W,
    schema: &GraphSchema,
    values: &MetricValues,
    now: DateTime<Utc>,
) -> Result<()> {
    let epoch = now.timestamp();
    for (graph_id, graph) in schema {
        for metric in &graph.metrics {
            let Some(value) = values.get(&metric.name) else {
                continue;
            };
            if !value.is_finite() {
                warn!(metric = %metric.name, value, "Skipping non-finite value");
                continue;
            }
            writeln!(out, "{graph_id}.{}\t{value:.6}\t{epoch}", metric.name)?;
        }
    }
    Ok(())
}

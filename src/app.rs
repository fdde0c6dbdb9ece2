use crate::output::{
    self,
    Mode,
};
use alb_plugin_collector::{
    AlbPlugin,
    CloudWatchService,
    ServiceConfig,
    StaticCredentials,
    Target,
};
use alb_plugin_config::{
    Args,
    Config,
};
use color_eyre::Result;
use eyre::Context as _;
use std::io::Write as _;

/// One plugin invocation: discover zones, then print either graph definitions or values.
pub struct App {
    config: Config,
}

impl App {
    pub fn new(args: Args) -> Result<Self> {
        let config = Config::new(args).context("Failed to load configuration")?;
        Ok(Self { config })
    }

    pub fn verbose(&self) -> bool {
        self.config.verbose
    }

    fn service_config(&self) -> ServiceConfig {
        ServiceConfig {
            region: self.config.region.clone(),
            credentials: self
                .config
                .credentials()
                .map(|(access_key_id, secret_access_key)| StaticCredentials {
                    access_key_id: access_key_id.to_string(),
                    secret_access_key: secret_access_key.to_string(),
                }),
        }
    }

    fn target(&self) -> Target {
        Target::new(self.config.lbname.clone(), self.config.tgname.clone())
    }

    pub async fn run(self) -> Result<()> {
        let mode = Mode::from_env();
        info!(?mode, target = ?self.target(), "Starting ALB plugin");

        let service = CloudWatchService::connect(&self.service_config()).await;
        let plugin = AlbPlugin::prepare(service, self.target())
            .await
            .context("Failed to discover availability zones")?;

        match mode {
            Mode::Definitions => {
                let mut out = std::io::stdout().lock();
                output::write_definitions(&mut out, &plugin.graph_definition())?;
                out.flush()?;
            }
            Mode::Values => {
                let values = plugin.fetch_metrics().await;
                if values.is_empty() {
                    warn!("No metric could be fetched this cycle");
                }
                let mut out = std::io::stdout().lock();
                output::write_values(&mut out, &plugin.graph_definition(), &values, chrono::Utc::now())?;
                out.flush()?;
            }
        }

        Ok(())
    }
}

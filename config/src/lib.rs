#[macro_use]
extern crate tracing;

mod app_config;
mod args;

use app_config::AppConfig;
pub use app_config::get_config_dir;
pub use args::Args;
use serde::{
    Deserialize,
    Serialize,
};
use std::path::Path;

/// Resolved plugin settings.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(flatten, skip_serializing)]
    pub app_config: AppConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lbname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tgname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_key_id: Option<String>,
    #[serde(default, skip_serializing)]
    pub secret_access_key: Option<String>,
    #[serde(default)]
    pub verbose: bool,
}

const DEFAULT_CONFIG: &str = include_str!("default-config.yaml");

impl Config {
    /// Layer the built-in defaults, `config.yaml` from the config directory, `ALB_PLUGIN_*`
    /// environment variables and `args`, later sources winning.
    pub fn new(args: Args) -> Result<Self, config::ConfigError> {
        let environment = config::Environment::with_prefix(&app_config::PROJECT_NAME);
        Self::load(args, &get_config_dir(), environment)
    }

    fn load(args: Args, config_dir: &Path, environment: config::Environment) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder()
            .set_default("config_dir", config_dir.to_string_lossy().to_string())?
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Yaml));

        let config_files = [("config.yaml", config::FileFormat::Yaml)];

        for (file, format) in &config_files {
            let source = config::File::from(config_dir.join(file))
                .format(*format)
                .required(false);
            builder = builder.add_source(source);
        }

        builder = builder.add_source(environment).add_source(args);

        let mut cfg: Self = builder.build()?.try_deserialize()?;
        cfg.normalize();
        debug!(region = ?cfg.region, lbname = ?cfg.lbname, tgname = ?cfg.tgname, "Configuration loaded");

        Ok(cfg)
    }

    /// Empty strings mean "not set", as with the agent's `-lbname=` style flags.
    fn normalize(&mut self) {
        for value in [
            &mut self.region,
            &mut self.lbname,
            &mut self.tgname,
            &mut self.access_key_id,
            &mut self.secret_access_key,
        ] {
            if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
                *value = None;
            }
        }
    }

    /// The static key pair, when both halves are configured.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (&self.access_key_id, &self.secret_access_key) {
            (Some(id), Some(secret)) => Some((id.as_str(), secret.as_str())),
            (Some(_), None) | (None, Some(_)) => {
                warn!("Only one of access key id and secret access key is set, using the default credential chain");
                None
            }
            (None, None) => None,
        }
    }

    pub fn config_dir(&self) -> &Path {
        &self.app_config.config_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use temp_dir::TempDir;

    fn environment(vars: &[(&str, &str)]) -> config::Environment {
        let source: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        config::Environment::with_prefix("ALB_PLUGIN").source(Some(source))
    }

    #[test]
    fn defaults_leave_everything_unset() {
        let dir = TempDir::new().unwrap();

        let cfg = Config::load(Args::default(), dir.path(), environment(&[])).unwrap();

        assert_eq!(cfg.region, None);
        assert_eq!(cfg.lbname, None);
        assert_eq!(cfg.tgname, None);
        assert_eq!(cfg.credentials(), None);
        assert!(!cfg.verbose);
        assert_eq!(cfg.config_dir(), dir.path());
    }

    #[test]
    fn later_sources_override_earlier_ones() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.child("config.yaml"),
            "region: eu-west-1\nlbname: app/from-file/1\ntgname: targetgroup/from-file/1\n",
        )
        .unwrap();
        let args = Args {
            tgname: Some("targetgroup/from-args/3".to_string()),
            ..Args::default()
        };

        let cfg = Config::load(
            args,
            dir.path(),
            environment(&[("ALB_PLUGIN_LBNAME", "app/from-env/2")]),
        )
        .unwrap();

        assert_eq!(cfg.region.as_deref(), Some("eu-west-1"));
        assert_eq!(cfg.lbname.as_deref(), Some("app/from-env/2"));
        assert_eq!(cfg.tgname.as_deref(), Some("targetgroup/from-args/3"));
    }

    #[test]
    fn empty_values_are_treated_as_unset() {
        let dir = TempDir::new().unwrap();
        let args = Args {
            lbname: Some(String::new()),
            region: Some("ap-northeast-1".to_string()),
            ..Args::default()
        };

        let cfg = Config::load(args, dir.path(), environment(&[])).unwrap();

        assert_eq!(cfg.lbname, None);
        assert_eq!(cfg.region.as_deref(), Some("ap-northeast-1"));
    }

    #[test]
    fn credentials_need_both_halves() {
        let dir = TempDir::new().unwrap();
        let args = Args {
            access_key_id: Some("AKIDEXAMPLE".to_string()),
            ..Args::default()
        };
        let cfg = Config::load(args, dir.path(), environment(&[])).unwrap();
        assert_eq!(cfg.credentials(), None);

        let args = Args {
            access_key_id: Some("AKIDEXAMPLE".to_string()),
            secret_access_key: Some("wJalrXUtnFEMI".to_string()),
            ..Args::default()
        };
        let cfg = Config::load(args, dir.path(), environment(&[])).unwrap();
        assert_eq!(cfg.credentials(), Some(("AKIDEXAMPLE", "wJalrXUtnFEMI")));
    }
}

use clap::Parser;

/// Mackerel agent plugin for AWS Application Load Balancer metrics
#[derive(Parser, Debug, Clone, Default)]
#[command(author, version = version(), about, long_about = None)]
pub struct Args {
    /// AWS region. Defaults to the region of the environment or instance.
    #[clap(long, value_name = "REGION")]
    pub region: Option<String>,

    /// Load balancer dimension, e.g. `app/my-alb/50dc6c495c0c9188`.
    #[clap(long, value_name = "NAME")]
    pub lbname: Option<String>,

    /// Target group dimension, e.g. `targetgroup/my-targets/73e2d6bc24d8a067`.
    #[clap(long, value_name = "NAME")]
    pub tgname: Option<String>,

    /// AWS access key id. Uses the default credential chain when omitted.
    #[clap(long = "access-key-id", value_name = "KEY")]
    pub access_key_id: Option<String>,

    /// AWS secret access key.
    #[clap(long = "secret-access-key", value_name = "SECRET")]
    pub secret_access_key: Option<String>,

    /// Log debug output to stderr.
    #[clap(long = "verbose", action)]
    pub verbose: bool,
}

mod config_ext {
    use super::*;
    use config::{
        Map,
        Source,
        Value,
    };
    use std::collections::HashMap;

    impl Source for Args {
        fn clone_into_box(&self) -> Box<dyn Source + Send + Sync> {
            Box::new((*self).clone())
        }

        fn collect(&self) -> Result<Map<String, Value>, config::ConfigError> {
            let mut cache = HashMap::<String, Value>::new();
            let optional = [
                ("region", &self.region),
                ("lbname", &self.lbname),
                ("tgname", &self.tgname),
                ("access_key_id", &self.access_key_id),
                ("secret_access_key", &self.secret_access_key),
            ];
            for (key, value) in optional {
                if let Some(value) = value {
                    cache.insert(key.to_string(), value.clone().into());
                }
            }
            if self.verbose {
                cache.insert("verbose".to_string(), true.into());
            }
            Ok(cache)
        }
    }
}

pub fn version() -> String {
    let version = clap::crate_version!();
    let config_dir_path = crate::get_config_dir().display().to_string();

    format!(
        "\
{version}

Config directory: {config_dir_path}"
    )
}

#[macro_use]
extern crate tracing;

mod app;
mod logging;
pub mod output;

pub use alb_plugin_config::Args;
pub use app::App;
pub use logging::{
    init_errors,
    init_logging,
};

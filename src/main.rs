use clap::Parser;
use color_eyre::Result;
use mackerel_plugin_alb::{
    init_errors,
    init_logging,
    App,
    Args,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_errors()?;
    let app = App::new(Args::parse())?;
    init_logging(app.verbose())?;
    app.run().await
}

use anyhow::Result;
use replydesk::api::{Backend, HttpBackend};
use replydesk::app::App;
use replydesk::cli::Flags;
use replydesk::config::Config;
use replydesk::logging;
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let flags = Flags::from_args();
    let mut config = Config::load(flags.config.as_deref())?;
    flags.apply(&mut config);

    let _guard = logging::init(&config.logging)?;
    info!(base_url = %config.api.base_url, auto = flags.auto, "starting replydesk");

    let backend: Arc<dyn Backend> = Arc::new(HttpBackend::new(config.api.base_url.clone()));
    let app = App::new(config, backend, flags.auto);

    let mut terminal = ratatui::init();
    let result = app.run(&mut terminal).await;
    ratatui::restore();

    if let Err(e) = &result {
        error!(error = %e, "replydesk exited with an error");
    }
    result
}

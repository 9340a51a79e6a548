mod command;
mod config;
mod logging;
mod render;
mod session;

use anyhow::{Context, Result};
use leadgen_core::client::ApiClient;
use session::{Session, SessionOutcome};
use std::io::Write;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

#[tokio::main]
async fn main() -> Result<()> {
    config::read_config()?;
    let config = config::CONFIG.get().unwrap();

    let _logging_guard = logging::init_logging("logs", "leadgen", &config.log_level);

    tracing::info!("leadgen starting, backend at {}", config.api_base_url);

    let client = ApiClient::new(
        &config.api_base_url,
        Duration::from_secs(config.request_timeout_secs),
    )
    .context("Failed to create API client")?;

    let mut session = Session::new(client);

    println!("leadgen - local business lead finder (type 'help' for commands)");
    session.startup().await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("leadgen> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break; // stdin closed
        };

        let command = match command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(usage) => {
                println!("{usage}");
                continue;
            }
        };

        match session.handle(command).await {
            Ok(SessionOutcome::Continue) => {}
            Ok(SessionOutcome::Quit) => break,
            Err(e) => {
                tracing::error!("Command failed: {:#}", e);
                println!("{}", render::render_error(&format!("{e:#}")));
            }
        }
    }

    tracing::info!("leadgen exiting");
    Ok(())
}

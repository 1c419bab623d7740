use anyhow::Result;
use clap::Parser;
use lgtmeme::{Cli, Config, GitHub, run_cycle};
use tracing::{error, info};

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let interval = cli.poll_interval()?;
    let config = Config::from_env()?;
    let forge = GitHub::from_env().await?;

    info!(
        user = %config.username,
        orgs = ?config.organizations,
        interval_secs = interval.as_secs(),
        "starting approval watch"
    );

    // The first tick completes immediately, so a cycle runs at startup
    // before the interval cadence takes over.
    let mut ticker = tokio::time::interval(interval);
    loop {
        ticker.tick().await;

        match run_cycle(&forge, &config).await {
            Ok(summary) => info!(
                repos = summary.repos_tracked,
                matched = summary.repos_matched,
                candidates = summary.candidates,
                posted = summary.posted,
                duplicates = summary.already_celebrated,
                post_failures = summary.post_failures,
                errors = summary.pull_errors,
                "cycle complete"
            ),
            Err(err) => error!("cycle failed: {err:#}"),
        }

        if cli.once {
            break;
        }
    }

    Ok(())
}

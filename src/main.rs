use clap::Parser;
use log::{debug, info};
use std::collections::HashSet;
use std::{error::Error, sync::Arc};

use mapperdb::config::Config;
use mapperdb::db::{Link, LinkAction, LinkListener};
use mapperdb::monitor::{self, LinkMonitor};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Poll the snapshot source once and exit
    #[arg(long)]
    once: bool,
}

/// Logs the link changes it was configured to report
struct LogListener {
    actions: HashSet<LinkAction>,
}

impl LogListener {
    fn new(actions: &[LinkAction]) -> Self {
        Self {
            actions: actions.iter().copied().collect(),
        }
    }
}

impl LinkListener for LogListener {
    fn on_link(&self, record: &Link, action: LinkAction) {
        if !self.actions.contains(&action) {
            debug!("[Link] Ignoring {} on {}", action, record);
            return;
        }

        match action {
            LinkAction::New => info!("[Link] New link {}", record),
            LinkAction::Modify => info!(
                "[Link] Modified link {}: {}",
                record,
                serde_json::to_string(&record.properties).unwrap_or_default()
            ),
            LinkAction::Remove => info!("[Link] Removed link {}", record),
        }
    }
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    // Parse command line arguments
    let args = Args::parse();

    info!("Starting link monitor...");
    info!("Loading configuration from: {}", args.config);

    // Load configuration
    let config = Config::load_from_file(&args.config)?;

    debug!("Monitor settings: {:?}", config);

    let source = monitor::from_location(&config.source, config.timeout_duration())?;
    let listener = Arc::new(LogListener::new(&config.actions));
    let link_monitor = LinkMonitor::new(source, listener);

    if args.once {
        let count = link_monitor.poll().await?;
        info!("Reported {} link changes", count);
        return Ok(());
    }

    info!("Watching {} every {}s", config.source, config.interval);

    tokio::select! {
        res = link_monitor.run(config.interval_duration()) => res?,
        _ = tokio::signal::ctrl_c() => info!("Received Ctrl-C, shutting down"),
    }

    Ok(())
}

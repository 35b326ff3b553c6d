//! FoodVision command-line client.
//!
//! Usage:
//!     foodvision classify ./lunch.jpg
//!     foodvision categories
//!     foodvision init-config

mod config;
mod logging;
mod render;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use foodvision_core::Phase;
use foodvision_engine::{read_artifact, ClientSettings, Collaborators, SessionDriver};
use foodvision_logging::{fv_error, fv_info};

use config::SettingsOverrides;
use logging::LogDestination;

#[derive(Parser, Debug)]
#[command(name = "foodvision", about = "Classify a food photo and look up its nutrition")]
struct Cli {
    /// Settings file (RON). Defaults to ./foodvision.ron when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Classifier upload endpoint
    #[arg(long, global = true)]
    upload_url: Option<String>,

    /// Classifier status endpoint
    #[arg(long, global = true)]
    status_url: Option<String>,

    /// Nutrition search endpoint
    #[arg(long, global = true)]
    enrichment_url: Option<String>,

    /// Nutrition service API key
    #[arg(
        long,
        global = true,
        env = "FOODVISION_ENRICHMENT_API_KEY",
        hide_env_values = true
    )]
    enrichment_api_key: Option<String>,

    /// Milliseconds between status checks
    #[arg(long, global = true)]
    poll_interval_ms: Option<u64>,

    /// Status checks before giving up
    #[arg(long, global = true, conflicts_with = "no_poll_limit")]
    max_poll_attempts: Option<u32>,

    /// Poll until the job finishes or the process is interrupted
    #[arg(long, global = true)]
    no_poll_limit: bool,

    /// Where log output goes
    #[arg(long, value_enum, global = true, default_value_t = LogDestination::File)]
    log: LogDestination,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Upload an image, wait for its category and print nutrition facts
    Classify {
        /// Image file to classify
        image: PathBuf,
    },
    /// List the categories the classifier can predict
    Categories,
    /// Write the default settings to ./foodvision.ron (or --config)
    InitConfig,
}

impl Cli {
    fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            upload_url: self.upload_url.clone(),
            status_url: self.status_url.clone(),
            enrichment_url: self.enrichment_url.clone(),
            enrichment_api_key: self.enrichment_api_key.clone(),
            poll_interval_ms: self.poll_interval_ms,
            max_poll_attempts: self.max_poll_attempts,
            unbounded_polling: self.no_poll_limit,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    logging::initialize(cli.log, cli.verbose);

    match &cli.command {
        Command::Categories => {
            print!("{}", render::render_categories());
            Ok(ExitCode::SUCCESS)
        }
        Command::InitConfig => {
            let path = cli
                .config
                .clone()
                .unwrap_or_else(|| PathBuf::from(config::DEFAULT_CONFIG_FILENAME));
            config::write_settings(&path, &ClientSettings::default())?;
            println!("Wrote {}", path.display());
            Ok(ExitCode::SUCCESS)
        }
        Command::Classify { image } => {
            let settings = config::load_settings(cli.config.as_deref())?;
            let settings = cli.overrides().apply(settings);
            settings.validate().context("invalid settings")?;
            classify(&settings, image).await
        }
    }
}

async fn classify(settings: &ClientSettings, image: &Path) -> anyhow::Result<ExitCode> {
    let collaborators = Collaborators::http(settings).context("failed to set up http clients")?;
    let mut driver = SessionDriver::new(collaborators, settings);
    let job_id = match read_artifact(image).await {
        Ok(artifact) => {
            let job_id = driver.select_artifact(artifact);
            fv_info!("Classifying {} as job_id={}", image.display(), job_id);
            driver.submit();
            job_id
        }
        Err(err) => driver.select_unreadable(&err),
    };

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut last_phase = None;
    loop {
        let view = driver.snapshot();
        if last_phase != Some(view.phase) {
            if let Some(line) = render::progress_line(&view) {
                println!("{}", line);
            }
            last_phase = Some(view.phase);
        }
        if !view.busy {
            break;
        }

        let interrupted = tokio::select! {
            _ = &mut ctrl_c => true,
            _ = driver.process_next() => false,
        };
        if interrupted {
            driver.reset();
            eprintln!("Cancelled.");
            return Ok(ExitCode::from(130));
        }
    }

    let view = driver.snapshot();
    print!("{}", render::render_result(&view));
    if view.phase == Phase::Failed {
        fv_error!(
            "Job {} failed: {}",
            job_id,
            view.error_message.as_deref().unwrap_or_default()
        );
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

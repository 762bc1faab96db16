use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use argh::FromArgs;
use tokio::io::{AsyncBufReadExt, BufReader};

use skypane_core::config::API_KEY_ENV;
use skypane_core::{AppError, Config};
use skypane_ui::{
    terminal, DisplayZone, LookupOutcome, MemoryPage, Renderer, Trigger, WeatherController,
};
use skypane_weather::{get_current_location, Location, WeatherProvider};

type Controller = WeatherController<WeatherProvider, MemoryPage>;

#[derive(FromArgs)]
/// Current weather for a location, rendered to the terminal
struct Args {
    /// path to the configuration file (default: <config dir>/skypane/config.toml)
    #[argh(option, short = 'c')]
    config: Option<PathBuf>,

    /// location to look up on start, as a place name or "lat,long"
    #[argh(option, short = 'l')]
    location: Option<String>,

    /// print the first lookup and exit
    #[argh(switch)]
    once: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    skypane_core::init()?;

    let args: Args = argh::from_env();

    let (config, _) = match &args.config {
        Some(path) => Config::load_validated_from(path)?,
        None => Config::load_validated()?,
    };

    if !config.weather.is_configured() {
        bail!(
            "No weather API key configured. Set weather.api_key in the config file or {}",
            API_KEY_ENV
        );
    }

    let provider = WeatherProvider::with_base_url(
        config.weather.api_key.clone(),
        &config.weather.base_url,
        Duration::from_secs(config.weather.timeout_seconds),
    )?;
    let zone = DisplayZone::from_name(config.ui.timezone.as_deref())?;

    let controller: Arc<Controller> = Arc::new(WeatherController::new(
        provider,
        MemoryPage::new(),
        Renderer::new(zone),
        Duration::from_millis(config.ui.error_flash_ms),
    ));

    let first = match args.location {
        Some(query) => Some(Trigger::enter(query)),
        None => {
            let configured = config
                .location
                .coordinates()
                .map(|(lat, lon)| Location::new(lat, lon));
            match get_current_location(configured).await {
                Ok(location) => Some(Trigger::Geolocated(location)),
                Err(e) => {
                    tracing::debug!("Skipping initial lookup: {}", e);
                    None
                }
            }
        }
    };

    if args.once {
        let Some(trigger) = first else {
            bail!("Nothing to look up: pass --location or configure coordinates");
        };
        let outcome = controller.handle(trigger).await;
        print!("{}", controller.page(terminal::draw));
        if let Some(LookupOutcome::Failed(e)) = outcome {
            bail!(AppError::from(e).user_message());
        }
        return Ok(());
    }

    if let Some(trigger) = first {
        tokio::spawn(run(Arc::clone(&controller), trigger));
    }

    println!("Type a location and press Enter. Commands: :search :toggle :quit");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let trigger = match line.trim() {
            "" => continue,
            ":quit" => break,
            ":search" => Trigger::SearchClicked,
            ":toggle" => Trigger::TemperatureClicked,
            text => Trigger::enter(text),
        };
        tokio::spawn(run(Arc::clone(&controller), trigger));
    }

    tracing::info!("SkyPane shutting down");
    Ok(())
}

/// Handle one trigger and print the page it leaves behind.
async fn run(controller: Arc<Controller>, trigger: Trigger) {
    match controller.handle(trigger).await {
        Some(LookupOutcome::Superseded) => return,
        Some(LookupOutcome::Failed(e)) => {
            let err = AppError::from(e);
            tracing::error!("{}", err);
            eprintln!("{}", err.user_message());
        }
        Some(LookupOutcome::Rendered(_)) | None => {}
    }
    print!("{}", controller.page(terminal::draw));
}

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::eyre;
use color_eyre::Result;

use nowify::{logging, Config, PlayerState, Poller, Settings, Spotify};

#[derive(Parser, Debug)]
#[command(name = "nowify", version, about = "Show the track currently playing on Spotify")]
struct Args {
    /// Settings file, defaults to nowify.yml or nowify.yaml in the working directory
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Milliseconds between polls
    #[arg(short, long)]
    interval: Option<u64>,

    /// Fetch once, print the snapshot as json and exit
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    logging::init();

    let args = Args::parse();

    let config = Config::from_env()?;
    let mut settings = match &args.settings {
        Some(path) => Settings::load(path)?,
        None => Settings::load_with_fallback(["nowify.yml", "nowify.yaml"])?,
    };
    if let Some(interval) = args.interval {
        settings = settings.with_interval_ms(interval)?;
    }

    let spotify = Spotify::new(config, &settings)?;

    if args.once {
        let now_playing = spotify.fetch_now_playing().await?;
        println!("{}", serde_json::to_string_pretty(&now_playing)?);
        return Ok(());
    }

    log::info!("Polling every {}ms", settings.interval_ms);
    let poller = Poller::start(spotify, settings.interval());
    let mut updates = poller.subscribe();
    let mut state = PlayerState::default();

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = &mut ctrl_c => break,
            changed = updates.changed() => {
                if changed.is_err() {
                    return match poller.stop().await {
                        Err(err) => Err(eyre!("poller stopped unexpectedly: {err}")),
                        Ok(()) => Err(eyre!("poller stopped unexpectedly")),
                    };
                }
                let published = updates.borrow_and_update().clone();
                if let Some(result) = published {
                    let previous = state.clone();
                    state.update(&result);
                    if state != previous {
                        println!("{state}");
                    }
                }
            }
        }
    }

    poller.stop().await?;
    Ok(())
}

use std::env;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use formats::{CONFIG_FILE_NAME, SceneConfig};
use patrol::{TwinEvent, TwinSession};
use runtime::Event;
use scene::{Severity, World};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless patrol and geofence twin")]
struct Args {
    /// Scene document (default: $TWIN_CONFIG, then assets/scene-config.json)
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Assemble the scene and run the patrols for a number of frames
    Run {
        /// Frames to simulate
        #[arg(long, default_value_t = 3600)]
        frames: u64,

        /// Start with the chase camera on the primary agent
        #[arg(long)]
        first_person: bool,

        /// Show the patrol track lines
        #[arg(long)]
        show_tracks: bool,

        /// Turn the skybox color filter on
        #[arg(long)]
        skybox_filter: bool,
    },

    /// Write the built-in scene document
    DumpConfig {
        /// Output file
        #[arg(long, default_value = CONFIG_FILE_NAME)]
        out: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(e) = real_main() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config_path = args.config.unwrap_or_else(|| {
        env::var("TWIN_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("assets").join(CONFIG_FILE_NAME))
    });

    match args.command.unwrap_or(Command::Run {
        frames: 3600,
        first_person: false,
        show_tracks: false,
        skybox_filter: false,
    }) {
        Command::Run {
            frames,
            first_person,
            show_tracks,
            skybox_filter,
        } => {
            let config = load_or_default(&config_path);
            run(config, frames, first_person, show_tracks, skybox_filter)
        }
        Command::DumpConfig { out } => {
            SceneConfig::default().save(&out)?;
            info!(path = %out.display(), "wrote built-in scene");
            Ok(())
        }
    }
}

fn load_or_default(path: &Path) -> SceneConfig {
    match SceneConfig::load(path) {
        Ok(config) => config,
        Err(err) => {
            warn!(path = %path.display(), %err, "falling back to the built-in scene");
            SceneConfig::default()
        }
    }
}

fn run(
    config: SceneConfig,
    frames: u64,
    first_person: bool,
    show_tracks: bool,
    skybox_filter: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = TwinSession::start(World::new(), config);
    info!(
        nodes = session.assembly().node_count(),
        agents = session.agents().count(),
        "scene ready"
    );

    if first_person && !session.is_first_person() {
        session.toggle_first_person()?;
    }
    if show_tracks {
        session.set_tracks_visible(true);
    }
    if skybox_filter {
        session.set_skybox_filter_enabled(true);
    }

    let mut laps = 0usize;
    for _ in 0..frames {
        session.update();
        for event in session.drain_events() {
            if matches!(event.payload, TwinEvent::LapCompleted { .. }) {
                laps += 1;
            }
            log_event(&event);
        }
        for note in session.scene_mut().drain_notifications() {
            match note.severity {
                Severity::Warning | Severity::Error => {
                    warn!(severity = %note.severity, "{}", note.message)
                }
                Severity::Info | Severity::Success => {
                    info!(severity = %note.severity, "{}", note.message)
                }
            }
        }
    }

    for agent in session.agents() {
        if let Some(t) = session.model_transform(agent) {
            info!(
                agent,
                x = t.position.x,
                y = t.position.y,
                z = t.position.z,
                "final position"
            );
        }
    }
    info!(frames, laps, "run finished");
    session.shutdown();
    Ok(())
}

fn log_event(event: &Event<TwinEvent>) {
    let frame = event.frame_index;
    match &event.payload {
        TwinEvent::Fence { agent, transition } => {
            info!(frame, agent = %agent, ?transition, "fence")
        }
        TwinEvent::PatrolToggled { agent, running } => {
            info!(frame, agent = %agent, running, "patrol toggled")
        }
        TwinEvent::LapCompleted { agent } => info!(frame, agent = %agent, "lap completed"),
        TwinEvent::FirstPersonChanged { enabled } => {
            info!(frame, enabled, "first person changed")
        }
        TwinEvent::TracksVisibilityChanged { visible } => {
            info!(frame, visible, "tracks visibility changed")
        }
        // The camera monitor already logs its samples.
        TwinEvent::CameraSampled { .. } => {}
    }
}

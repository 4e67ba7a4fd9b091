use color_eyre::{eyre::eyre, Result};
use padbridge::bridge::loopback::LoopbackBridge;
use padbridge::bridge::Surface;
use padbridge::controller::gamepad_input::{ForwarderSettings, GamepadInput};
use padbridge::emulation::EmulationSession;
use padbridge::overlay::{OverlayControlRegistry, Screen};
use padbridge::persistence::config_store::ConfigStore;
use padbridge::persistence::GlobalConfig;
use padbridge::InputContext;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

const PUMP_INTERVAL_MS: u64 = 4;
const DEFAULT_SURFACE: Surface = Surface {
    id: 1,
    width: 1920,
    height: 1080,
};

#[tokio::main]
async fn main() -> Result<()> {
    setup()?;

    let game_path = std::env::args().nth(1);

    let store = ConfigStore::default_location()?;
    let config = load_config(&store).await?;

    info!("Initializing gamepad input");
    let mut gamepads = GamepadInput::create(Some(ForwarderSettings::default()))
        .map_err(|e| eyre!("Failed to create gamepad input: {}", e))?
        .initialize();

    let bridge = Arc::new(LoopbackBridge::new());
    let screen = Screen::new(
        DEFAULT_SURFACE.width as f32,
        DEFAULT_SURFACE.height as f32,
    );
    let mut context = InputContext::new(
        bridge.clone(),
        screen,
        config.overlay.settings.clone(),
        config.overlay.controls.clone(),
    );
    context.rebuild_devices(&gamepads);
    info!(
        "{} controllers registered with the core",
        context.registered_devices().len()
    );

    let session = match &game_path {
        Some(path) => {
            let session = EmulationSession::new(bridge.clone(), path.clone());
            session
                .attach_surface(DEFAULT_SURFACE)
                .map_err(|e| eyre!("Failed to attach surface: {}", e))?;
            session
                .run(false, 0)
                .map_err(|e| eyre!("Failed to start emulation: {}", e))?;
            Some(session)
        }
        None => {
            info!("No game path given, forwarding input only");
            None
        }
    };

    let mut interval = tokio::time::interval(Duration::from_millis(PUMP_INTERVAL_MS));
    loop {
        tokio::select! {
            _ = interval.tick() => {
                let notices = gamepads.pump(context.devices(), bridge.as_ref());
                if !notices.is_empty() {
                    debug!("Pad notices: {:?}", notices);
                    context.rebuild_devices(&gamepads);
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown requested");
                break;
            }
        }
    }

    if let Some(session) = session {
        if let Err(e) = session.stop() {
            error!("Failed to stop emulation: {}", e);
        }
        if let Err(e) = session.join_worker() {
            error!("Failed to join emulation worker: {}", e);
        }
    }

    info!("Shutdown complete");
    Ok(())
}

/// Loads the config and writes it back when the overlay control list was repaired
async fn load_config(store: &ConfigStore) -> Result<GlobalConfig> {
    let mut config = store.load().await?;

    let outcome = OverlayControlRegistry::load(&mut config.overlay.controls);
    info!("Overlay controls: {:?}", outcome);
    if outcome.needs_persist() {
        store.save(&config).await?;
    }
    Ok(config)
}

fn setup() -> Result<()> {
    if std::env::var("RUST_LIB_BACKTRACE").is_err() {
        std::env::set_var("RUST_LIB_BACKTRACE", "0")
    }
    color_eyre::install()?;
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info")
    }
    setup_logging_env();
    Ok(())
}

fn setup_logging_env() {
    FmtSubscriber::builder()
        .with_env_filter(log_filter())
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .pretty()
        .init();
}

/// Filter from `RUST_LOG`, INFO when it is unset or invalid
fn log_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

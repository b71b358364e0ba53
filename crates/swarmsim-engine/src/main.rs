//! Simulator binary for Swarm Sim.
//!
//! Wires the simulation kernel to NATS and the operator API. The
//! simulation starts stopped; operators place agents and start it over
//! HTTP, while the fleet controller streams velocity commands over NATS.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `swarmsim-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Connect to NATS (optional; outbound messages are dropped without it)
//! 4. Create the simulation controller with its outbound sinks
//! 5. Subscribe to velocity commands
//! 6. Start the operator API server
//! 7. Wait for `Ctrl-C`, stop the simulation if running, exit

mod error;
mod fleet;
mod nats_bridge;

use std::path::Path;
use std::sync::Arc;

use swarmsim_core::config::{LogFormat, LoggingConfig, SimulationConfig};
use swarmsim_core::controller::SimulationController;
use swarmsim_core::fleet::{FleetMap, FleetRegistry, InMemoryFleetRegistry};
use swarmsim_core::sink::{MessageSink, NullSink};
use swarmsim_observer::{AppState, ServerConfig};
use swarmsim_types::{LeaderChanged, PositionSnapshot};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::fleet::PublishingFleetRegistry;

const CONFIG_PATH: &str = "swarmsim-config.yaml";

/// Application entry point for the simulator.
///
/// # Errors
///
/// Returns an error if configuration is invalid or the operator API
/// cannot be served.
#[tokio::main]
async fn main() -> Result<(), EngineError> {
    // 1. Load configuration.
    let (config, from_file) = load_config()?;

    // 2. Initialize structured logging.
    init_tracing(&config.logging);
    info!("swarmsim-engine starting");
    if !from_file {
        info!(path = CONFIG_PATH, "Config file not found, using defaults");
    }
    info!(
        integrator_hz = config.timing.integrator_hz,
        publisher_hz = config.timing.publisher_hz,
        nats_url = %config.infrastructure.nats_url,
        "Configuration loaded"
    );

    // 3. Connect to NATS.
    let nats = match async_nats::connect(&config.infrastructure.nats_url).await {
        Ok(client) => {
            info!(nats_url = %config.infrastructure.nats_url, "Connected to NATS");
            Some(client)
        }
        Err(e) => {
            warn!(
                nats_url = %config.infrastructure.nats_url,
                error = %e,
                "failed to connect to NATS, outbound messages will be dropped"
            );
            None
        }
    };

    // 4. Create the controller.
    let local_fleet = Arc::new(InMemoryFleetRegistry::new());
    let (positions, leader, fleet): (
        Arc<dyn MessageSink<PositionSnapshot>>,
        Arc<dyn MessageSink<LeaderChanged>>,
        Arc<dyn FleetRegistry>,
    ) = match &nats {
        Some(client) => {
            let subjects = &config.subjects;
            let (positions, _) = nats_bridge::outbound::<PositionSnapshot>(
                client.clone(),
                subjects.positions.clone(),
            );
            let (leader, _) =
                nats_bridge::outbound::<LeaderChanged>(client.clone(), subjects.leader.clone());
            let (fleet, _) =
                nats_bridge::outbound::<FleetMap>(client.clone(), subjects.fleet.clone());
            (
                Arc::new(positions),
                Arc::new(leader),
                Arc::new(PublishingFleetRegistry::new(
                    Arc::clone(&local_fleet),
                    Arc::new(fleet),
                )),
            )
        }
        None => (
            Arc::new(NullSink),
            Arc::new(NullSink),
            Arc::clone(&local_fleet) as Arc<dyn FleetRegistry>,
        ),
    };
    let controller = Arc::new(SimulationController::new(
        config.timing,
        positions,
        leader,
        fleet,
    ));
    info!("Simulation controller ready");

    // 5. Subscribe to velocity commands.
    if let Some(client) = &nats {
        nats_bridge::spawn_velocity_subscriber(
            client,
            config.subjects.velocity.clone(),
            controller.ingress().clone(),
        )
        .await?;
    }

    // 6. Start the operator API server.
    let server_config = ServerConfig {
        host: config.infrastructure.observer_host.clone(),
        port: config.infrastructure.observer_port,
    };
    let app_state = Arc::new(AppState::new(Arc::clone(&controller), local_fleet));
    let mut server = tokio::spawn(async move {
        swarmsim_observer::start_server(&server_config, app_state).await
    });

    // 7. Run until Ctrl-C or the server exits.
    let server_result = tokio::select! {
        signal = tokio::signal::ctrl_c() => {
            if let Err(e) = signal {
                warn!(error = %e, "failed to listen for Ctrl-C");
            }
            info!("Shutdown requested");
            server.abort();
            Ok(())
        }
        joined = &mut server => match joined {
            Ok(result) => result,
            Err(e) => {
                warn!(error = %e, "operator API task failed");
                Ok(())
            }
        },
    };

    if controller.store().is_running() {
        if let Err(e) = controller.stop().await {
            warn!(error = %e, "failed to stop simulation during shutdown");
        }
    }

    server_result?;
    info!("swarmsim-engine shutdown complete");
    Ok(())
}

/// Load configuration from [`CONFIG_PATH`], falling back to defaults when
/// the file is absent. The flag reports whether the file was read.
fn load_config() -> Result<(SimulationConfig, bool), EngineError> {
    let config_path = Path::new(CONFIG_PATH);
    if config_path.exists() {
        Ok((SimulationConfig::from_file(config_path)?, true))
    } else {
        let mut config = SimulationConfig::default();
        config.infrastructure.apply_env_overrides();
        Ok((config, false))
    }
}

/// Install the global subscriber. `RUST_LOG` wins over the configured level.
fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    match logging.format {
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init(),
    }
}

mod blackboard;   // shared drive controller behind a lock
mod server;       // one-command-per-connection TCP shell
mod settings;     // `config`-backed settings
mod surface;      // control surface payload

use anyhow::Context;
use settings::DriveSettings;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{self, EnvFilter};

use trundle_command::DriveController;
use trundle_drive::devices::sim::{SimPin, SimPwm};
use trundle_drive::{DrivePins, OutputDriver, SpinSettle};

/// Simulated outputs labelled with the configured GPIO numbers.
fn host_pins(drive: &DriveSettings) -> DrivePins<SimPwm, SimPin> {
    let pins = &drive.pins;
    let freq_hz = drive.pwm_frequency_hz;
    DrivePins {
        left_pwm: SimPwm::new(format!("GP{}", pins.left_pwm), freq_hz),
        right_pwm: SimPwm::new(format!("GP{}", pins.right_pwm), freq_hz),
        left_forward: SimPin::new(format!("GP{}", pins.left_forward)),
        left_reverse: SimPin::new(format!("GP{}", pins.left_reverse)),
        right_forward: SimPin::new(format!("GP{}", pins.right_forward)),
        right_reverse: SimPin::new(format!("GP{}", pins.right_reverse)),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    info!("Trundle drive endpoint starting...");

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| settings::DEFAULT_CONFIG_PATH.to_string());
    let settings = settings::load_config(&config_path).context("loading configuration")?;

    let drive = &settings.drive;
    info!(
        pwm_hz = drive.pwm_frequency_hz,
        settle_ms = drive.settle_ms,
        "Driving simulated outputs"
    );
    let driver = OutputDriver::new(host_pins(drive), SpinSettle::new(), drive.settle_time());
    let bb = blackboard::new(DriveController::new(driver));

    let network = settings.network.clone();
    let listener = TcpListener::bind((network.bind_address.as_str(), network.port))
        .await
        .with_context(|| format!("binding {}:{}", network.bind_address, network.port))?;

    tokio::select! {
        result = server::serve(listener, Arc::clone(&bb), network) => result?,
        signal = tokio::signal::ctrl_c() => {
            signal.context("waiting for shutdown signal")?;
            info!("Received shutdown signal");
        }
    }

    blackboard::park(&bb);
    let state = blackboard::snapshot(&bb);
    let station = bb.lock();
    info!(
        %state,
        commands = station.commands_handled,
        idle = ?station.last_cmd_ts.map(|ts| ts.elapsed()),
        "Trundle stopped"
    );
    Ok(())
}

use clap::Parser;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use gamepad_bridge::config::BridgeConfig;
use gamepad_bridge::control::{
    AcquisitionHandle, AcquisitionLoop, ControlState, EventDecoder, Publisher,
    SteeringRateLimiter,
};
use gamepad_bridge::device::Joystick;
use gamepad_bridge::transport::{ActuationCommand, Session, SessionConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let config = BridgeConfig::parse();
    setup(config.verbose)?;
    config
        .validate()
        .map_err(|err| eyre!("invalid configuration: {err}"))?;

    let joystick = Joystick::open(&config.device)?;

    let state = ControlState::new();
    let shutdown = CancellationToken::new();

    // Ctrl-C is the external shutdown signal: flag the shared state and let
    // both loops drain cooperatively.
    {
        let state = state.clone();
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("shutdown requested");
                state.set_error();
                shutdown.cancel();
            }
        });
    }

    let decoder = EventDecoder::new(&config);
    let acquisition =
        AcquisitionLoop::new(joystick, decoder, state.clone(), shutdown.clone());
    let acquisition_handle = AcquisitionHandle::spawn(acquisition)?;

    let limiter = SteeringRateLimiter::new(config.steering_max_rate, config.tick_period());
    let publisher = Publisher::new(state.clone(), limiter);

    let session_config = SessionConfig {
        broker: config.broker.clone(),
        session: config.session.clone(),
    };
    match Session::connect(&session_config).await {
        Ok(session) => {
            info!(
                freq = config.freq,
                session = %config.session,
                "session established, starting periodic publisher"
            );
            session.time_trigger(config.freq, || publisher.tick()).await;

            // Leave the consumer with a neutral command before shutdown.
            if let Err(err) = session.send(&ActuationCommand::stop()) {
                warn!(%err, "failed to send final stop command");
            }
        }
        // No commands are sent, but the device is still shut down cleanly.
        Err(err) => error!(%err, "failed to establish session"),
    }

    state.set_error();
    shutdown.cancel();
    acquisition_handle.join();
    info!("gamepad bridge stopped");

    Ok(())
}

fn setup(verbose: bool) -> Result<()> {
    color_eyre::install()?;

    let level = if verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .init();
    Ok(())
}

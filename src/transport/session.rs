//! Broker session and fixed-frequency trigger.
//!
//! Wraps the MQTT client behind the two capabilities the bridge consumes:
//! sending one command envelope, and invoking a callback at the control
//! frequency until it asks to stop.

use std::time::Duration;

use rumqttc::{AsyncClient, Event, Incoming, MqttOptions, QoS};
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use super::command::ActuationCommand;
use super::TransportError;

const KEEP_ALIVE: Duration = Duration::from_secs(5);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const CLIENT_QUEUE: usize = 100;

/// Connection parameters for one pub/sub session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Broker address as host:port.
    pub broker: String,
    /// Session identifier; selects the topic the commands are published on.
    pub session: String,
}

/// An established pub/sub session.
pub struct Session {
    client: AsyncClient,
    topic: String,
}

impl Session {
    /// Connects to the broker and spawns the connection event loop.
    ///
    /// The broker handshake must complete before this returns: a session
    /// that cannot be established queues no commands.
    pub async fn connect(config: &SessionConfig) -> Result<Self, TransportError> {
        let (host, port) = split_broker(&config.broker)?;

        let client_id = format!("gamepad-bridge-{}", config.session);
        let mut options = MqttOptions::new(client_id, host, port);
        options.set_keep_alive(KEEP_ALIVE);

        let (client, mut event_loop) = AsyncClient::new(options, CLIENT_QUEUE);

        // Wait for the broker to acknowledge the connection.
        let handshake = async {
            loop {
                match event_loop.poll().await {
                    Ok(Event::Incoming(Incoming::ConnAck(_))) => return Ok(()),
                    Ok(_) => continue,
                    Err(err) => return Err(err.to_string()),
                }
            }
        };
        match tokio::time::timeout(CONNECT_TIMEOUT, handshake).await {
            Ok(Ok(())) => {}
            Ok(Err(reason)) => {
                return Err(TransportError::Connect(config.broker.clone(), reason));
            }
            Err(_) => {
                return Err(TransportError::Connect(
                    config.broker.clone(),
                    "handshake timed out".to_string(),
                ));
            }
        }

        // Keep driving the protocol state machine; publishes stall without
        // this.
        tokio::spawn(async move {
            loop {
                if let Err(err) = event_loop.poll().await {
                    warn!(%err, "broker connection error");
                    tokio::time::sleep(Duration::from_secs(1)).await;
                }
            }
        });

        Ok(Self {
            client,
            topic: format!("actuation/{}", config.session),
        })
    }

    /// Queues one command envelope without blocking.
    ///
    /// A full client queue is an error: the control loop must keep ticking
    /// behind a stalled broker, so a command is dropped rather than waited
    /// on.
    pub fn send(&self, command: &ActuationCommand) -> Result<(), TransportError> {
        let payload = serde_json::to_vec(command)?;
        self.client
            .try_publish(&self.topic, QoS::AtMostOnce, false, payload)?;
        Ok(())
    }

    /// Invokes `tick` at `freq` Hz, publishing each returned command, until
    /// the callback's continuation flag is false.
    ///
    /// A tick that overruns is skipped rather than replayed; stale control
    /// commands are worse than missing ones.
    pub async fn time_trigger<F>(&self, freq: f32, mut tick: F)
    where
        F: FnMut() -> (ActuationCommand, bool),
    {
        let mut interval = tokio::time::interval(Duration::from_secs_f32(1.0 / freq));
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            interval.tick().await;
            let (command, keep_going) = tick();
            debug!(
                acceleration = command.acceleration,
                steering = command.steering,
                valid = command.valid,
                "publishing actuation command"
            );
            if let Err(err) = self.send(&command) {
                warn!(%err, "failed to publish command");
            }
            if !keep_going {
                return;
            }
        }
    }
}

fn split_broker(broker: &str) -> Result<(String, u16), TransportError> {
    let (host, port) = broker.rsplit_once(':').unwrap_or((broker, "1883"));
    if host.is_empty() {
        return Err(TransportError::InvalidBroker(
            broker.to_string(),
            "empty host".to_string(),
        ));
    }
    let port = port
        .parse::<u16>()
        .map_err(|err| TransportError::InvalidBroker(broker.to_string(), err.to_string()))?;
    Ok((host.to_string(), port))
}

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Test doubles shared by the integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use aqualogic_lib::connection::{BoxedTransport, Connector};
use aqualogic_lib::{
    ConnectionConfig, DecodeError, Decoder, Field, FieldValue, Session, StateChange,
    SupervisorEvent, SupervisorState, TransportError,
};
use parking_lot::Mutex;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, DuplexStream};
use tokio::sync::broadcast;
use tokio::time::Instant;
use tracing::Level;
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::Layer;

const DUPLEX_BUFFER: usize = 4096;

enum Step {
    Open(DuplexStream),
    Fail(TransportError),
}

#[derive(Default)]
struct Script {
    steps: VecDeque<Step>,
    attempts: Vec<Instant>,
}

/// Connector that plays back a scripted sequence of outcomes.
///
/// Once the script is exhausted every attempt is refused.
#[derive(Clone, Default)]
pub struct ScriptedConnector {
    script: Arc<Mutex<Script>>,
}

impl ScriptedConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful connection and returns the device side of it.
    pub fn push_open(&self) -> DuplexStream {
        let (client, device) = tokio::io::duplex(DUPLEX_BUFFER);
        self.script.lock().steps.push_back(Step::Open(client));
        device
    }

    /// Queues a failed connection.
    pub fn push_failure(&self, error: TransportError) {
        self.script.lock().steps.push_back(Step::Fail(error));
    }

    /// Number of connection attempts so far.
    pub fn attempts(&self) -> usize {
        self.script.lock().attempts.len()
    }

    /// Times of all connection attempts so far.
    pub fn attempt_times(&self) -> Vec<Instant> {
        self.script.lock().attempts.clone()
    }
}

impl Connector for ScriptedConnector {
    async fn connect(&self, config: &ConnectionConfig) -> Result<BoxedTransport, TransportError> {
        let mut script = self.script.lock();
        script.attempts.push(Instant::now());
        match script.steps.pop_front() {
            Some(Step::Open(stream)) => Ok(Box::new(stream)),
            Some(Step::Fail(error)) => Err(error),
            None => Err(TransportError::Refused(config.title())),
        }
    }
}

/// Decoder for a `field=value` line protocol.
///
/// `1`/`0` are switch states, numbers are sensor readings, anything else is
/// text. Commands are written back as `field=1` or `field=0`.
#[derive(Debug, Default)]
pub struct LineDecoder;

impl Decoder for LineDecoder {
    async fn process(
        &mut self,
        transport: BoxedTransport,
        session: &mut Session<'_>,
    ) -> Result<(), DecodeError> {
        let (reader, mut writer) = tokio::io::split(transport);
        let mut lines = BufReader::new(reader).lines();

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else {
                        return Ok(());
                    };
                    session.publish(parse_line(&line)?);
                }
                command = session.next_command() => {
                    let record = format!("{}={}\n", command.field(), u8::from(command.on()));
                    writer.write_all(record.as_bytes()).await?;
                    writer.flush().await?;
                }
            }
        }
    }
}

fn parse_line(line: &str) -> Result<StateChange, DecodeError> {
    let (key, raw) = line
        .split_once('=')
        .ok_or_else(|| DecodeError::Malformed(line.to_string()))?;
    let field: Field = key
        .parse()
        .map_err(|_| DecodeError::Malformed(line.to_string()))?;

    let value = match raw {
        "1" => FieldValue::Bool(true),
        "0" => FieldValue::Bool(false),
        other => other
            .parse::<f64>()
            .map_or_else(|_| FieldValue::Text(other.to_string()), FieldValue::Number),
    };
    Ok(StateChange::new(field, value))
}

/// Receives bus events until the given connection state is announced.
pub async fn wait_for_connection(
    events: &mut broadcast::Receiver<SupervisorEvent>,
    state: SupervisorState,
) {
    tokio::time::timeout(Duration::from_secs(60), async {
        loop {
            match events.recv().await {
                Ok(SupervisorEvent::ConnectionChanged { state: seen }) if seen == state => return,
                Ok(_) => {}
                Err(e) => panic!("event bus failed: {e}"),
            }
        }
    })
    .await
    .expect("connection state not reached");
}

/// Receives bus events until a change of `field` is announced.
pub async fn wait_for_change(
    events: &mut broadcast::Receiver<SupervisorEvent>,
    field: Field,
) -> StateChange {
    tokio::time::timeout(Duration::from_secs(60), async {
        loop {
            match events.recv().await {
                Ok(SupervisorEvent::StateChanged { change }) if change.field() == field => {
                    return change;
                }
                Ok(_) => {}
                Err(e) => panic!("event bus failed: {e}"),
            }
        }
    })
    .await
    .expect("field change not received")
}

type LogHook = Arc<dyn Fn(&str) + Send + Sync>;

/// Tracing layer recording every event's level and message.
///
/// An optional hook runs, outside the record lock, for every event. It lets
/// a test act at the exact moment the worker logs something.
#[derive(Clone, Default)]
pub struct LogCapture {
    records: Arc<Mutex<Vec<(Level, String)>>>,
    hook: Option<LogHook>,
}

impl LogCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `hook` with the message of every event.
    pub fn with_hook(mut self, hook: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.hook = Some(Arc::new(hook));
        self
    }

    /// Installs the layer for the current thread until the guard is dropped.
    ///
    /// Paused-clock tests run the worker on the test thread, so its events
    /// are captured too.
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        tracing::subscriber::set_default(tracing_subscriber::registry().with(self.clone()))
    }

    /// Returns true if an event with `message` was logged at `level`.
    pub fn contains(&self, level: Level, message: &str) -> bool {
        self.records
            .lock()
            .iter()
            .any(|(seen_level, seen)| *seen_level == level && seen == message)
    }

    /// Number of events logged with `message`.
    pub fn count(&self, message: &str) -> usize {
        self.records
            .lock()
            .iter()
            .filter(|(_, seen)| seen == message)
            .count()
    }
}

impl<S: tracing::Subscriber> Layer<S> for LogCapture {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        let message = visitor.0.unwrap_or_default();

        self.records
            .lock()
            .push((*event.metadata().level(), message.clone()));
        if let Some(hook) = &self.hook {
            hook(&message);
        }
    }
}

#[derive(Default)]
struct MessageVisitor(Option<String>);

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.0 = Some(format!("{value:?}"));
        }
    }
}

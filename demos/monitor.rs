// SPDX-License-Identifier: MPL-2.0

//! Test program: Supervise a panel connection and print every change.
//!
//! The panel protocol is not part of the library, so this program decodes a
//! simple `field=value` line protocol. Point it at a simulator such as
//! `nc -lk 2323` and type records like `lights=1` or `pool_temp=80`. Typing
//! `!lights` sends an on command for that output back to the peer.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example monitor -- socket <host> [port]
//! cargo run --example monitor -- serial <path>
//! ```
//!
//! # Example
//!
//! ```bash
//! RUST_LOG=debug cargo run --example monitor -- socket 127.0.0.1 2323
//! ```

use std::env;
use std::time::Duration;

use aqualogic_lib::connection::{BoxedTransport, probe};
use aqualogic_lib::{
    ConnectionConfig, ConnectionSupervisor, DecodeError, Decoder, Field, FieldValue, Protocol,
    Session, StateChange, Subscribable, SupervisorConfig,
};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

struct LineDecoder;

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
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    session.publish(parse(line)?);
                }
                command = session.next_command() => {
                    let record = format!("{}={}\n", command.field(), u8::from(command.on()));
                    writer.write_all(record.as_bytes()).await?;
                }
            }
        }
    }
}

fn parse(line: &str) -> Result<StateChange, DecodeError> {
    let malformed = || DecodeError::Malformed(line.to_string());
    let (key, raw) = line.split_once('=').ok_or_else(malformed)?;
    let field: Field = key.parse().map_err(|_| malformed())?;

    let value = if field.is_switchable() {
        FieldValue::Bool(matches!(raw, "1" | "on" | "true"))
    } else if let Ok(number) = raw.parse::<f64>() {
        FieldValue::Number(number)
    } else {
        FieldValue::Text(raw.to_string())
    };
    Ok(StateChange::new(field, value))
}

fn parse_args(args: &[String]) -> Option<ConnectionConfig> {
    let protocol: Protocol = args.get(1)?.parse().ok()?;
    let mut config = ConnectionConfig::default_for(protocol);
    match &mut config {
        ConnectionConfig::Socket { host, port } => {
            *host = args.get(2)?.clone();
            if let Some(raw) = args.get(3) {
                *port = raw.parse().ok()?;
            }
        }
        ConnectionConfig::Serial { path } => {
            if let Some(raw) = args.get(2) {
                path.clone_from(raw);
            }
        }
    }
    Some(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = env::args().collect();
    let Some(config) = parse_args(&args) else {
        eprintln!("Usage: {} socket <host> [port] | serial [path]", args[0]);
        eprintln!();
        eprintln!("Example:");
        eprintln!("  cargo run --example monitor -- socket 127.0.0.1 2323");
        std::process::exit(1);
    };
    config.validate()?;

    println!("Probing {config}...");
    match probe(&config).await {
        Ok(()) => println!("Device reachable"),
        Err(failure) => println!("Probe failed ({}), supervising anyway", failure.reason()),
    }

    let supervisor = ConnectionSupervisor::builder(config)
        .settings(SupervisorConfig::default().with_reconnect_interval(Duration::from_secs(5)))
        .build(|| LineDecoder);

    supervisor.on_connection_changed(|state| println!("[connection] {state}"));
    supervisor.on_state_changed(|change| {
        let unit = change.field().unit().unwrap_or_default();
        println!("[{}] {}{unit}", change.field().display_name(), change.value());
    });

    supervisor.start()?;

    let mut stdin = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            line = stdin.next_line() => {
                let Some(line) = line? else { break };
                let Some(key) = line.trim().strip_prefix('!') else { continue };
                match key.parse::<Field>() {
                    Ok(field) => {
                        if let Err(e) = supervisor.turn_on(field) {
                            eprintln!("Command failed: {e}");
                        }
                    }
                    Err(e) => eprintln!("{e}"),
                }
            }
        }
    }

    println!("Shutting down...");
    supervisor.shutdown();
    supervisor.wait_stopped().await;

    let snapshot = supervisor.snapshot();
    println!("Last known state ({} fields):", snapshot.len());
    for (field, value) in snapshot.iter() {
        println!("  {:<20} {value}", field.display_name());
    }

    Ok(())
}

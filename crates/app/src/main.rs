//! drawpad - line-oriented drawing core
//!
//! Reads `UiToCore` JSON messages from stdin, one per line, and writes
//! `CoreToUi` replies to stdout. Exports run as local tasks so paint commands
//! keep flowing while an export encodes.

use std::rc::Rc;
use std::sync::Arc;

use drawpad_export::ExportCoordinator;
use drawpad_ipc::{CoreToUi, UiToCore};
use painting::{Surface, SurfaceHandle};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod session;
mod sink;

use config::{AnyCapture, DrawpadConfig};
use session::Session;
use sink::DirectorySink;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = DrawpadConfig::from_env();
    info!(
        "Starting drawpad {}x{} with {:?} capture, writing to {}",
        config.canvas.width,
        config.canvas.height,
        config.capture_mode,
        config.export.output_dir.display()
    );

    let surface = match Surface::new(config.canvas.width, config.canvas.height) {
        Ok(surface) => surface,
        Err(e) => {
            error!("Cannot create surface: {}", e);
            std::process::exit(1);
        }
    };

    let sink = Arc::new(DirectorySink::new(&config.export.output_dir));
    let coordinator =
        match ExportCoordinator::new(AnyCapture::from(config.capture_mode), sink, &config.export) {
            Ok(coordinator) => coordinator,
            Err(e) => {
                error!("Invalid export settings: {}", e);
                std::process::exit(1);
            }
        };

    let session = Rc::new(Session::new(SurfaceHandle::new(surface), coordinator));
    tokio::task::LocalSet::new().run_until(run(session)).await;
}

async fn run(session: Rc<Session<AnyCapture, DirectorySink>>) {
    let (reply_tx, mut reply_rx) = mpsc::unbounded_channel::<CoreToUi>();

    let writer = tokio::task::spawn_local(async move {
        let mut stdout = tokio::io::stdout();
        while let Some(reply) = reply_rx.recv().await {
            let line = match reply.to_json() {
                Ok(line) => line,
                Err(e) => {
                    error!("Failed to serialize reply: {}", e);
                    continue;
                }
            };
            if let Err(e) = write_line(&mut stdout, &line).await {
                error!("Failed to write reply: {}", e);
                break;
            }
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                error!("Failed to read stdin: {}", e);
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let message = match UiToCore::from_json(&line) {
            Ok(message) => message,
            Err(e) => {
                warn!("Ignoring malformed message: {}", e);
                send_reply(
                    &reply_tx,
                    CoreToUi::Error {
                        code: "ipc".into(),
                        message: e.to_string(),
                    },
                );
                continue;
            }
        };

        match message {
            UiToCore::PaintCommand(_) => {
                for reply in session.dispatch(message).await {
                    send_reply(&reply_tx, reply);
                }
            }
            export => {
                let session = session.clone();
                let reply_tx = reply_tx.clone();
                tokio::task::spawn_local(async move {
                    for reply in session.dispatch(export).await {
                        send_reply(&reply_tx, reply);
                    }
                });
            }
        }
    }

    info!("Input closed, finishing pending exports");
    drop(reply_tx);
    if let Err(e) = writer.await {
        error!("Reply writer failed: {}", e);
    }
}

/// Queue a reply for the writer; fails only once the writer has stopped
fn send_reply(reply_tx: &mpsc::UnboundedSender<CoreToUi>, reply: CoreToUi) {
    if let Err(e) = reply_tx.send(reply) {
        debug!("Dropping reply, writer has stopped: {:?}", e.0);
    }
}

async fn write_line(stdout: &mut tokio::io::Stdout, line: &str) -> std::io::Result<()> {
    stdout.write_all(line.as_bytes()).await?;
    stdout.write_all(b"\n").await?;
    stdout.flush().await
}

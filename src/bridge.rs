//! Server bridge - pipes widget events over a line-oriented byte stream
//!
//! This module provides:
//! - One JSON frame per line in both directions
//! - A stdio binding so any server process can be attached with a pipe

use crate::actor::WidgetHandle;
use std::io;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Why a bridge stopped pumping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeExit {
    /// The server side closed its stream
    ServerClosed,
    /// The widget stopped emitting (link dropped or actor gone)
    WidgetClosed,
}

/// Pump frames until either side goes away.
///
/// Lines read from `reader` are handed to the widget as raw inbound frames;
/// frames produced by a `FrameLink` are written to `writer`, newline-terminated.
/// A line that is not UTF-8 is logged and skipped.
pub async fn pump<R, W>(
    mut reader: R,
    mut writer: W,
    handle: WidgetHandle,
    mut outbound: mpsc::UnboundedReceiver<String>,
) -> io::Result<BridgeExit>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buf = Vec::new();
    loop {
        tokio::select! {
            read = reader.read_until(b'\n', &mut buf) => {
                if read? == 0 {
                    info!("server stream closed");
                    return Ok(BridgeExit::ServerClosed);
                }
                let raw = std::mem::take(&mut buf);
                let line = match String::from_utf8(raw) {
                    Ok(line) => line,
                    Err(err) => {
                        warn!(bytes = err.as_bytes().len(), "dropping non-UTF-8 line from server");
                        continue;
                    }
                };
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                debug!(bytes = line.len(), "frame from server");
                if handle.deliver_frame(line).await.is_err() {
                    return Ok(BridgeExit::WidgetClosed);
                }
            }
            frame = outbound.recv() => match frame {
                Some(frame) => {
                    writer.write_all(frame.as_bytes()).await?;
                    writer.write_all(b"\n").await?;
                    writer.flush().await?;
                }
                None => return Ok(BridgeExit::WidgetClosed),
            },
        }
    }
}

/// Attach the widget to the process's stdin/stdout.
#[cfg(not(target_arch = "wasm32"))]
pub async fn run_stdio(
    handle: WidgetHandle,
    outbound: mpsc::UnboundedReceiver<String>,
) -> io::Result<BridgeExit> {
    let reader = tokio::io::BufReader::new(tokio::io::stdin());
    pump(reader, tokio::io::stdout(), handle, outbound).await
}

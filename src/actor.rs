//! Single-consumer event loop driving a [`ChatWidgetController`].
//!
//! Gestures, server events and expiring timers all funnel through one loop
//! and are applied strictly one at a time, so no handler ever observes
//! another half-finished.

use crate::config::WidgetConfig;
use crate::controller::{ChatWidgetController, Deferred, Effects, WidgetSnapshot};
use crate::dom::NodeId;
use crate::events::{InboundEvent, decode_frame};
use crate::link::ServerLink;
use futures::StreamExt;
use futures::future::{BoxFuture, FutureExt};
use futures::stream::FuturesUnordered;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::Instant;
use tracing::{debug, info, warn};

#[derive(Debug)]
pub enum WidgetCommand {
    /// Text typed into the input field.
    Input(String),
    ClickSend,
    KeyPress(String),
    ToggleChanged(bool),
    /// Submit text directly, bypassing the input field.
    Submit(String),
    Inbound(InboundEvent),
    /// Raw JSON frame straight off the socket.
    InboundFrame(String),
    Snapshot(oneshot::Sender<WidgetSnapshot>),
    Shutdown,
}

#[derive(Debug, thiserror::Error)]
pub enum WidgetError {
    #[error("Widget actor has stopped")]
    Stopped,
}

pub struct WidgetActor<L> {
    controller: ChatWidgetController,
    link: L,
    commands: mpsc::Receiver<WidgetCommand>,
    snapshots: watch::Sender<WidgetSnapshot>,
    timers: FuturesUnordered<BoxFuture<'static, NodeId>>,
}

impl<L: ServerLink> WidgetActor<L> {
    pub fn new(config: &WidgetConfig, link: L) -> (Self, WidgetHandle) {
        let controller = ChatWidgetController::new(config);
        let (tx, commands) = mpsc::channel(config.queue_capacity);
        let (snapshots, snapshot_rx) = watch::channel(controller.snapshot());
        let actor = Self {
            controller,
            link,
            commands,
            snapshots,
            timers: FuturesUnordered::new(),
        };
        let handle = WidgetHandle {
            tx,
            snapshots: snapshot_rx,
        };
        (actor, handle)
    }

    /// Runs until shutdown or until every handle is dropped.
    pub async fn run(mut self) {
        info!("chat widget started");
        loop {
            tokio::select! {
                biased;
                Some(node) = self.timers.next(), if !self.timers.is_empty() => {
                    if self.controller.expire(node) {
                        debug!(node = node.raw(), "transient node expired");
                    }
                    self.publish();
                }
                command = self.commands.recv() => match command {
                    None | Some(WidgetCommand::Shutdown) => break,
                    Some(command) => self.handle(command).await,
                },
            }
        }
        info!(pending_timers = self.timers.len(), "chat widget stopped");
    }

    async fn handle(&mut self, command: WidgetCommand) {
        let effects = match command {
            WidgetCommand::Input(value) => {
                self.controller.set_input(value);
                Effects::none()
            }
            WidgetCommand::ClickSend => self.controller.click_send(),
            WidgetCommand::KeyPress(key) => self.controller.key_press(&key),
            WidgetCommand::ToggleChanged(checked) => self.controller.flip_toggle(checked),
            WidgetCommand::Submit(text) => self.controller.submit_user_message(&text),
            WidgetCommand::Inbound(event) => self.controller.handle_inbound(event),
            WidgetCommand::InboundFrame(frame) => match decode_frame(&frame) {
                Ok(event) => self.controller.handle_inbound(event),
                Err(err) => {
                    warn!(error = %err, "dropping inbound frame");
                    Effects::none()
                }
            },
            WidgetCommand::Snapshot(reply) => {
                let _ = reply.send(self.controller.snapshot());
                return;
            }
            WidgetCommand::Shutdown => return,
        };
        self.apply(effects).await;
        self.publish();
    }

    async fn apply(&mut self, effects: Effects) {
        for event in effects.outbound {
            let name = event.name();
            if let Err(err) = self.link.emit(event).await {
                warn!(event = name, error = %err, "failed to emit event");
            }
        }
        for Deferred { after, node } in effects.deferred {
            let deadline = Instant::now() + after;
            self.timers.push(
                async move {
                    tokio::time::sleep_until(deadline).await;
                    node
                }
                .boxed(),
            );
        }
    }

    fn publish(&self) {
        self.snapshots.send_replace(self.controller.snapshot());
    }
}

/// Cloneable front door to a running [`WidgetActor`].
#[derive(Clone, Debug)]
pub struct WidgetHandle {
    tx: mpsc::Sender<WidgetCommand>,
    snapshots: watch::Receiver<WidgetSnapshot>,
}

impl WidgetHandle {
    pub async fn send(&self, command: WidgetCommand) -> Result<(), WidgetError> {
        self.tx.send(command).await.map_err(|_| WidgetError::Stopped)
    }

    pub async fn type_text(&self, text: impl Into<String>) -> Result<(), WidgetError> {
        self.send(WidgetCommand::Input(text.into())).await
    }

    pub async fn click_send(&self) -> Result<(), WidgetError> {
        self.send(WidgetCommand::ClickSend).await
    }

    pub async fn key_press(&self, key: impl Into<String>) -> Result<(), WidgetError> {
        self.send(WidgetCommand::KeyPress(key.into())).await
    }

    pub async fn toggle_reasoning(&self, checked: bool) -> Result<(), WidgetError> {
        self.send(WidgetCommand::ToggleChanged(checked)).await
    }

    pub async fn submit(&self, text: impl Into<String>) -> Result<(), WidgetError> {
        self.send(WidgetCommand::Submit(text.into())).await
    }

    pub async fn deliver(&self, event: InboundEvent) -> Result<(), WidgetError> {
        self.send(WidgetCommand::Inbound(event)).await
    }

    pub async fn deliver_frame(&self, frame: impl Into<String>) -> Result<(), WidgetError> {
        self.send(WidgetCommand::InboundFrame(frame.into())).await
    }

    /// Snapshot taken after every command queued before this call.
    pub async fn snapshot(&self) -> Result<WidgetSnapshot, WidgetError> {
        let (reply, rx) = oneshot::channel();
        self.send(WidgetCommand::Snapshot(reply)).await?;
        rx.await.map_err(|_| WidgetError::Stopped)
    }

    /// Most recently published snapshot, without a round trip.
    pub fn current(&self) -> WidgetSnapshot {
        self.snapshots.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<WidgetSnapshot> {
        self.snapshots.clone()
    }

    pub async fn shutdown(&self) -> Result<(), WidgetError> {
        self.send(WidgetCommand::Shutdown).await
    }
}

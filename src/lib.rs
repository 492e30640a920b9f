//! Reasoning-mode chat widget.
//!
//! The widget renders a message list, relays user input to a chat server as
//! named events, and restyles bot replies while the server reports reasoning
//! mode as enabled.
//!
//! ```rust,no_run
//! use reasonchat::{ChannelLink, WidgetActor, WidgetConfig};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let (link, mut outbound) = ChannelLink::new();
//! let (actor, handle) = WidgetActor::new(&WidgetConfig::load()?, link);
//! tokio::spawn(actor.run());
//!
//! handle.type_text("2+2?").await?;
//! handle.click_send().await?;
//! let request = outbound.recv().await;
//! # Ok(())
//! # }
//! ```
pub mod actor;
pub mod bridge;
pub mod config;
pub mod controller;
pub mod dom;
pub mod events;
pub mod link;
pub mod logging;
pub mod types;
#[cfg(feature = "dioxus")]
pub mod ui;

pub use actor::{WidgetActor, WidgetCommand, WidgetError, WidgetHandle};
pub use config::{ConfigError, WidgetConfig};
pub use controller::{ChatWidgetController, Deferred, Effects, WidgetSnapshot};
pub use events::{InboundEvent, OutboundEvent, WireError};
pub use link::{ChannelLink, FrameLink, LinkError, ServerLink};
pub use types::{DisplayMode, Message, Sender, UiState};

use crate::config::WidgetConfig;
use crate::dom::{NodeId, NodeKind, WidgetDom};
use crate::events::{InboundEvent, OutboundEvent};
use crate::types::{DisplayMode, Message, UiState};
use std::time::Duration;
use tracing::{debug, info};

const ENTER_KEY: &str = "Enter";

/// Removal of a transient node once `after` has elapsed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Deferred {
    pub after: Duration,
    pub node: NodeId,
}

/// What a handler asks the outside world to do.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Effects {
    pub outbound: Vec<OutboundEvent>,
    pub deferred: Vec<Deferred>,
}

impl Effects {
    pub fn none() -> Self {
        Self::default()
    }

    fn emit(event: OutboundEvent) -> Self {
        Self {
            outbound: vec![event],
            deferred: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.outbound.is_empty() && self.deferred.is_empty()
    }
}

/// Rendered state plus the flags needed to draw it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WidgetSnapshot {
    pub dom: WidgetDom,
    pub state: UiState,
}

/// Owns the widget DOM and its two flags. Every handler runs to completion
/// and reports side effects instead of performing them.
#[derive(Debug)]
pub struct ChatWidgetController {
    dom: WidgetDom,
    state: UiState,
    banner_ttl: Duration,
}

impl Default for ChatWidgetController {
    fn default() -> Self {
        Self::new(&WidgetConfig::default())
    }
}

impl ChatWidgetController {
    pub fn new(config: &WidgetConfig) -> Self {
        Self {
            dom: WidgetDom::default(),
            state: UiState::default(),
            banner_ttl: config.banner_ttl,
        }
    }

    pub fn dom(&self) -> &WidgetDom {
        &self.dom
    }

    pub fn state(&self) -> UiState {
        self.state
    }

    pub fn snapshot(&self) -> WidgetSnapshot {
        WidgetSnapshot {
            dom: self.dom.clone(),
            state: self.state,
        }
    }

    pub fn submit_user_message(&mut self, text: &str) -> Effects {
        let message = text.trim();
        if message.is_empty() {
            return Effects::none();
        }

        self.dom
            .list
            .append(NodeKind::Message(Message::user(message)));
        let effects = Effects::emit(OutboundEvent::SendMessage {
            message: message.to_string(),
        });
        self.dom.controls.input.clear();
        self.dom.list.append(NodeKind::TypingIndicator);
        self.set_loading(true);
        debug!(len = message.len(), "user message submitted");
        effects
    }

    /// The server owns the flag; only its acknowledgment changes local state.
    pub fn on_reasoning_toggle_changed(&mut self) -> Effects {
        debug!("reasoning toggle flipped");
        Effects::emit(OutboundEvent::ToggleReasoning)
    }

    pub fn on_reasoning_mode_acknowledged(&mut self, enabled: bool) -> Effects {
        self.state.reasoning_mode_enabled = enabled;
        let label = if enabled { "enabled" } else { "disabled" };
        info!(enabled, "reasoning mode acknowledged");
        let banner = self
            .dom
            .list
            .append(NodeKind::ModeBanner(format!("Reasoning mode {label}")));
        Effects {
            outbound: Vec::new(),
            deferred: vec![Deferred {
                after: self.banner_ttl,
                node: banner,
            }],
        }
    }

    pub fn on_bot_message_received(&mut self, text: &str) -> Effects {
        let cleared = self.dom.list.remove_typing_indicators();
        let display_mode = DisplayMode::for_reasoning(self.state.reasoning_mode_enabled);
        self.dom
            .list
            .append(NodeKind::Message(Message::bot(text, display_mode)));
        self.set_loading(false);
        debug!(cleared, ?display_mode, "bot reply rendered");
        Effects::none()
    }

    pub fn handle_inbound(&mut self, event: InboundEvent) -> Effects {
        match event {
            InboundEvent::ReasoningToggled { enabled } => self.on_reasoning_mode_acknowledged(enabled),
            InboundEvent::ReceiveMessage { message, .. } => self.on_bot_message_received(&message),
        }
    }

    /// Runs a deferred removal. The node may already be gone.
    pub fn expire(&mut self, node: NodeId) -> bool {
        self.dom.list.remove(node)
    }

    // Gestures. A browser drops input on disabled controls, and so do these.

    pub fn set_input(&mut self, value: impl Into<String>) {
        if !self.dom.controls.input_disabled {
            self.dom.controls.input = value.into();
        }
    }

    pub fn click_send(&mut self) -> Effects {
        if self.dom.controls.send_disabled {
            return Effects::none();
        }
        let text = self.dom.controls.input.clone();
        self.submit_user_message(&text)
    }

    pub fn key_press(&mut self, key: &str) -> Effects {
        if self.dom.controls.input_disabled || key != ENTER_KEY {
            return Effects::none();
        }
        let text = self.dom.controls.input.clone();
        self.submit_user_message(&text)
    }

    pub fn flip_toggle(&mut self, checked: bool) -> Effects {
        if self.dom.controls.toggle_disabled {
            return Effects::none();
        }
        self.dom.controls.toggle_checked = checked;
        self.on_reasoning_toggle_changed()
    }

    fn set_loading(&mut self, loading: bool) {
        self.state.loading = loading;
        self.dom.controls.set_loading(loading);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> ChatWidgetController {
        ChatWidgetController::default()
    }

    #[test]
    fn whitespace_submission_is_ignored() {
        let mut widget = controller();
        assert!(widget.submit_user_message("   \t\n").is_empty());
        assert!(widget.submit_user_message("").is_empty());
        assert!(widget.dom().list.is_empty());
        assert!(!widget.state().loading);
    }

    #[test]
    fn submit_renders_message_indicator_and_loading() {
        let mut widget = controller();
        widget.set_input("  hello ");
        let effects = widget.click_send();

        assert_eq!(
            effects.outbound,
            vec![OutboundEvent::SendMessage {
                message: "hello".into()
            }]
        );
        let list = &widget.dom().list;
        let users: Vec<_> = list.with_class("user-message").collect();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].text(), "hello");
        assert_eq!(list.typing_indicator_count(), 1);
        assert!(widget.state().loading);
        assert!(widget.dom().controls.input.is_empty());
        assert!(widget.dom().controls.send_busy);
    }

    #[test]
    fn toggle_does_not_change_mode_until_ack() {
        let mut widget = controller();
        let effects = widget.flip_toggle(true);
        assert_eq!(effects.outbound, vec![OutboundEvent::ToggleReasoning]);
        assert!(!widget.state().reasoning_mode_enabled);

        let effects = widget.on_reasoning_mode_acknowledged(true);
        assert!(widget.state().reasoning_mode_enabled);
        assert_eq!(effects.deferred.len(), 1);
        assert_eq!(effects.deferred[0].after, Duration::from_millis(3000));
        let banner = widget.dom().list.get(effects.deferred[0].node).unwrap();
        assert_eq!(banner.text(), "Reasoning mode enabled");
        assert!(banner.has_class("mode-change-message"));
    }

    #[test]
    fn ack_disabled_banner_text() {
        let mut widget = controller();
        let effects = widget.on_reasoning_mode_acknowledged(false);
        let node = effects.deferred[0].node;
        assert_eq!(widget.dom().list.get(node).unwrap().text(), "Reasoning mode disabled");
        assert!(widget.expire(node));
        assert!(!widget.expire(node));
    }

    #[test]
    fn reply_clears_every_indicator_and_loading() {
        let mut widget = controller();
        widget.submit_user_message("one");
        widget.submit_user_message("two");
        assert_eq!(widget.dom().list.typing_indicator_count(), 2);

        widget.on_bot_message_received("answer");
        assert_eq!(widget.dom().list.typing_indicator_count(), 0);
        assert!(!widget.state().loading);
        assert!(!widget.dom().controls.input_disabled);
    }

    #[test]
    fn gestures_on_disabled_controls_are_dropped() {
        let mut widget = controller();
        widget.set_input("first");
        widget.key_press(ENTER_KEY);
        widget.set_input("ignored");
        assert!(widget.dom().controls.input.is_empty());
        assert!(widget.click_send().is_empty());
        assert!(widget.key_press(ENTER_KEY).is_empty());
        assert!(widget.flip_toggle(true).is_empty());
    }

    #[test]
    fn only_enter_submits() {
        let mut widget = controller();
        widget.set_input("hi");
        assert!(widget.key_press("a").is_empty());
        assert_eq!(widget.key_press(ENTER_KEY).outbound.len(), 1);
    }

    #[test]
    fn reply_style_tracks_acknowledged_mode() {
        let mut widget = controller();
        widget.on_reasoning_mode_acknowledged(true);
        widget.submit_user_message("explain");
        widget.handle_inbound(InboundEvent::ReceiveMessage {
            message: "because".into(),
            sender: None,
        });
        let reply = widget.dom().list.with_class("bot-message").last().unwrap();
        assert!(reply.has_class("reasoning-mode-active"));
    }
}

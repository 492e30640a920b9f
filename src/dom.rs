//! In-memory model of the widget's DOM surface: the message list container
//! and the three input controls.

use crate::types::{DisplayMode, Message};
use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "node-{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    Message(Message),
    TypingIndicator,
    ModeBanner(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub kind: NodeKind,
}

impl Node {
    pub fn classes(&self) -> Vec<String> {
        match &self.kind {
            NodeKind::Message(msg) => {
                let mut classes = vec!["message".to_string(), format!("{}-message", msg.sender.as_str())];
                if msg.display_mode == DisplayMode::Reasoning {
                    classes.push("reasoning-mode-active".to_string());
                }
                classes
            }
            NodeKind::TypingIndicator => vec!["typing-indicator".to_string()],
            NodeKind::ModeBanner(_) => vec![
                "message".to_string(),
                "bot-message".to_string(),
                "mode-change-message".to_string(),
            ],
        }
    }

    pub fn class_attr(&self) -> String {
        self.classes().join(" ")
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes().iter().any(|c| c == class)
    }

    pub fn text(&self) -> &str {
        match &self.kind {
            NodeKind::Message(msg) => &msg.text,
            NodeKind::TypingIndicator => "",
            NodeKind::ModeBanner(text) => text,
        }
    }

    pub fn as_message(&self) -> Option<&Message> {
        match &self.kind {
            NodeKind::Message(msg) => Some(msg),
            _ => None,
        }
    }
}

/// The message list container. Grows without bound; nodes leave only
/// through `remove`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MessageList {
    nodes: Vec<Node>,
    next_id: u64,
    scroll_anchor: Option<NodeId>,
}

impl MessageList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        debug!(node = id.0, "append node");
        self.nodes.push(Node { id, kind });
        self.scroll_anchor = Some(id);
        id
    }

    /// Removing a node that is already gone does nothing.
    pub fn remove(&mut self, id: NodeId) -> bool {
        let before = self.nodes.len();
        self.nodes.retain(|node| node.id != id);
        let removed = self.nodes.len() != before;
        if removed {
            debug!(node = id.0, "remove node");
        }
        removed
    }

    pub fn remove_typing_indicators(&mut self) -> usize {
        let before = self.nodes.len();
        self.nodes
            .retain(|node| !matches!(node.kind, NodeKind::TypingIndicator));
        before - self.nodes.len()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn messages(&self) -> impl Iterator<Item = &Message> {
        self.nodes.iter().filter_map(Node::as_message)
    }

    pub fn typing_indicator_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|node| matches!(node.kind, NodeKind::TypingIndicator))
            .count()
    }

    pub fn with_class<'a>(&'a self, class: &'a str) -> impl Iterator<Item = &'a Node> + 'a {
        self.nodes.iter().filter(move |node| node.has_class(class))
    }

    /// Node the list was last scrolled to; every append scrolls to the bottom.
    pub fn scroll_anchor(&self) -> Option<NodeId> {
        self.scroll_anchor
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Controls {
    pub input: String,
    pub input_disabled: bool,
    pub send_disabled: bool,
    pub toggle_disabled: bool,
    pub send_busy: bool,
    pub toggle_checked: bool,
}

impl Controls {
    pub fn set_loading(&mut self, loading: bool) {
        self.input_disabled = loading;
        self.send_disabled = loading;
        self.toggle_disabled = loading;
        self.send_busy = loading;
    }

    pub fn send_button_class(&self) -> &'static str {
        if self.send_busy { "send-button loading" } else { "send-button" }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct WidgetDom {
    pub list: MessageList,
    pub controls: Controls,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_classes_match_sender() {
        let mut list = MessageList::new();
        let user = list.append(NodeKind::Message(Message::user("hi")));
        let bot = list.append(NodeKind::Message(Message::bot("yo", DisplayMode::Normal)));
        let deep = list.append(NodeKind::Message(Message::bot("hm", DisplayMode::Reasoning)));

        assert_eq!(list.get(user).unwrap().class_attr(), "message user-message");
        assert_eq!(list.get(bot).unwrap().class_attr(), "message bot-message");
        assert_eq!(
            list.get(deep).unwrap().class_attr(),
            "message bot-message reasoning-mode-active"
        );
    }

    #[test]
    fn remove_twice_is_noop() {
        let mut list = MessageList::new();
        let id = list.append(NodeKind::ModeBanner("Reasoning mode enabled".into()));
        assert!(list.remove(id));
        assert!(!list.remove(id));
        assert!(list.is_empty());
    }

    #[test]
    fn append_scrolls_to_bottom() {
        let mut list = MessageList::new();
        list.append(NodeKind::TypingIndicator);
        let last = list.append(NodeKind::TypingIndicator);
        assert_eq!(list.scroll_anchor(), Some(last));
        assert_eq!(list.typing_indicator_count(), 2);
        assert_eq!(list.remove_typing_indicators(), 2);
    }

    #[test]
    fn loading_disables_every_control() {
        let mut controls = Controls::default();
        controls.set_loading(true);
        assert!(controls.input_disabled && controls.send_disabled && controls.toggle_disabled);
        assert_eq!(controls.send_button_class(), "send-button loading");
        controls.set_loading(false);
        assert_eq!(controls, Controls::default());
    }
}

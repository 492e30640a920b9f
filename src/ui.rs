use crate::actor::{WidgetActor, WidgetError, WidgetHandle};
use crate::config::WidgetConfig;
use crate::controller::WidgetSnapshot;
use crate::dom::{Node, NodeKind};
use crate::link::FrameLink;
use dioxus::prelude::*;
use std::future::Future;
use tracing::{error, warn};

const WIDGET_CSS: &str = r#"
.chat-widget { display: flex; flex-direction: column; height: 100vh; }
.message-container { flex: 1; overflow-y: auto; padding: 1rem; }
.message { margin: 0.5rem 0; padding: 0.5rem 0.75rem; border-radius: 0.5rem; max-width: 80%; }
.user-message { margin-left: auto; background: #1f6feb; color: #ffffff; }
.bot-message { margin-right: auto; background: #161b22; color: #e6edf3; }
.reasoning-mode-active { border-left: 3px solid #ff3509; }
.mode-change-message { font-style: italic; opacity: 0.8; }
.message-timestamp { display: block; font-size: 0.7rem; opacity: 0.6; }
.typing-indicator span { display: inline-block; width: 6px; height: 6px; margin: 0 2px; border-radius: 50%; background: #9b9b9b; }
.composer { display: flex; gap: 0.5rem; padding: 0.75rem; align-items: center; }
.composer input[type=text] { flex: 1; }
.send-button.loading { opacity: 0.6; cursor: progress; }
"#;

/// Starts the actor and the server bridge, then renders the widget.
/// Expects the startup `WidgetConfig` as a root context.
#[component]
pub fn App() -> Element {
    let config = use_context::<WidgetConfig>();
    let handle = use_hook(move || start_widget(&config));
    use_context_provider(|| handle);

    rsx! {
        style { dangerous_inner_html: "{WIDGET_CSS}" }
        ChatWidget {}
    }
}

fn start_widget(config: &WidgetConfig) -> WidgetHandle {
    let (link, outbound) = FrameLink::new();
    let (actor, handle) = WidgetActor::new(config, link);
    spawn(actor.run());

    #[cfg(not(target_arch = "wasm32"))]
    {
        let bridge_handle = handle.clone();
        spawn(async move {
            if let Err(err) = crate::bridge::run_stdio(bridge_handle, outbound).await {
                error!(error = %err, "server bridge failed");
            }
        });
    }
    #[cfg(target_arch = "wasm32")]
    drop(outbound);

    handle
}

fn forward(gesture: impl Future<Output = Result<(), WidgetError>> + 'static) {
    spawn(async move {
        if let Err(err) = gesture.await {
            warn!(error = %err, "widget gesture dropped");
        }
    });
}

#[component]
fn ChatWidget() -> Element {
    let handle = use_context::<WidgetHandle>();
    let mut snapshot = use_signal(|| handle.current());

    let watcher = handle.clone();
    use_hook(move || {
        let mut updates = watcher.subscribe();
        spawn(async move {
            while updates.changed().await.is_ok() {
                let next: WidgetSnapshot = updates.borrow_and_update().clone();
                snapshot.set(next);
            }
        });
    });

    let current = snapshot();
    let controls = current.dom.controls.clone();
    let toggle_target = !controls.toggle_checked;

    let on_input = {
        let handle = handle.clone();
        move |ev: FormEvent| {
            let handle = handle.clone();
            forward(async move { handle.type_text(ev.value()).await })
        }
    };
    let on_key = {
        let handle = handle.clone();
        move |ev: KeyboardEvent| {
            let handle = handle.clone();
            let key = ev.key().to_string();
            forward(async move { handle.key_press(key).await })
        }
    };
    let on_send = {
        let handle = handle.clone();
        move |_| {
            let handle = handle.clone();
            forward(async move { handle.click_send().await })
        }
    };
    let on_toggle = {
        let handle = handle.clone();
        move |_| {
            let handle = handle.clone();
            forward(async move { handle.toggle_reasoning(toggle_target).await })
        }
    };

    rsx! {
        div { class: "chat-widget",
            div { id: "messageContainer", class: "message-container",
                for node in current.dom.list.nodes().iter().cloned() {
                    MessageNode { key: "{node.id}", node }
                }
            }
            div { class: "composer",
                label { class: "reasoning-toggle",
                    input {
                        id: "reasoningToggle",
                        r#type: "checkbox",
                        checked: controls.toggle_checked,
                        disabled: controls.toggle_disabled,
                        onchange: on_toggle,
                    }
                    "Reasoning"
                }
                input {
                    id: "userInput",
                    r#type: "text",
                    placeholder: "Type a message…",
                    value: "{controls.input}",
                    disabled: controls.input_disabled,
                    oninput: on_input,
                    onkeypress: on_key,
                }
                button {
                    id: "sendButton",
                    class: controls.send_button_class(),
                    r#type: "button",
                    disabled: controls.send_disabled,
                    onclick: on_send,
                    "Send"
                }
            }
        }
    }
}

#[component]
fn MessageNode(node: Node) -> Element {
    let class = node.class_attr();
    match &node.kind {
        NodeKind::TypingIndicator => rsx! {
            div { class: "{class}", span {} span {} span {} }
        },
        NodeKind::ModeBanner(text) => rsx! {
            div { class: "{class}", "{text}" }
        },
        NodeKind::Message(msg) => {
            let stamp = msg.timestamp_label();
            rsx! {
                div { class: "{class}",
                    "{msg.text}"
                    if let Some(ts) = stamp {
                        span { class: "message-timestamp", "{ts}" }
                    }
                }
            }
        }
    }
}

use crate::chat::thread::{ThreadKind, ThreadMessage, ThreadRef};
use serde::{Deserialize, Serialize};

/// Notification delivered by the inbound transport for a new message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundMessage {
    pub thread: ThreadRef,
    #[serde(default)]
    pub kind: ThreadKind,
    /// Whether the thread already had messages before this one.
    pub has_history: bool,
    pub message: ThreadMessage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpenSource {
    /// Conversation preview, list view or hidden menu.
    User,
    Inbound,
    Reload,
}

impl OpenSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Inbound => "inbound",
            Self::Reload => "reload",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatKey {
    Escape,
    Tab,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ChatEvent {
    WindowOpened {
        thread: ThreadRef,
        source: OpenSource,
    },
    WindowRefocused {
        thread: ThreadRef,
    },
    WindowClosed {
        thread: ThreadRef,
    },
    FoldChanged {
        thread: ThreadRef,
        folded: bool,
    },
    FocusMoved {
        from: Option<ThreadRef>,
        to: Option<ThreadRef>,
    },
    InboundReceived {
        thread: ThreadRef,
        opened: bool,
        separator: bool,
    },
    LayoutChanged {
        visible: usize,
        hidden: usize,
        hidden_menu: bool,
    },
    ViewportChanged {
        width: f32,
        is_mobile: bool,
    },
    HistoryLoaded {
        thread: ThreadRef,
        messages: usize,
    },
    HistoryFetchFailed {
        thread: ThreadRef,
        message: String,
    },
    DiscussOpened {
        closed_windows: usize,
    },
    DiscussClosed,
}

fn optional(thread: &Option<ThreadRef>) -> String {
    thread
        .as_ref()
        .map(ThreadRef::to_string)
        .unwrap_or_else(|| "-".to_string())
}

impl ChatEvent {
    pub fn to_log_line(&self) -> String {
        match self {
            Self::WindowOpened { thread, source } => {
                format!("window_opened thread={thread} source={}", source.as_str())
            }
            Self::WindowRefocused { thread } => format!("window_refocused thread={thread}"),
            Self::WindowClosed { thread } => format!("window_closed thread={thread}"),
            Self::FoldChanged { thread, folded } => {
                format!("fold_changed thread={thread} folded={folded}")
            }
            Self::FocusMoved { from, to } => {
                format!("focus_moved from={} to={}", optional(from), optional(to))
            }
            Self::InboundReceived {
                thread,
                opened,
                separator,
            } => format!("inbound_received thread={thread} opened={opened} separator={separator}"),
            Self::LayoutChanged {
                visible,
                hidden,
                hidden_menu,
            } => format!("layout_changed visible={visible} hidden={hidden} hidden_menu={hidden_menu}"),
            Self::ViewportChanged { width, is_mobile } => {
                format!("viewport_changed width={width} mobile={is_mobile}")
            }
            Self::HistoryLoaded { thread, messages } => {
                format!("history_loaded thread={thread} messages={messages}")
            }
            Self::HistoryFetchFailed { thread, message } => {
                format!("history_fetch_failed thread={thread} error={message}")
            }
            Self::DiscussOpened { closed_windows } => {
                format!("discuss_opened closed_windows={closed_windows}")
            }
            Self::DiscussClosed => "discuss_closed".to_string(),
        }
    }
}

/// Recent events, oldest first. Holds at most `capacity` entries; older
/// ones are dropped once a consumer stops draining.
#[derive(Debug, Clone)]
pub struct ChatEventLog {
    entries: Vec<ChatEvent>,
    capacity: usize,
}

impl Default for ChatEventLog {
    fn default() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }
}

impl ChatEventLog {
    pub const DEFAULT_CAPACITY: usize = 512;

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn entries(&self) -> &[ChatEvent] {
        &self.entries
    }

    pub fn push(&mut self, event: ChatEvent) {
        log::debug!("{}", event.to_log_line());
        if self.entries.len() == self.capacity {
            self.entries.remove(0);
        }
        self.entries.push(event);
    }

    /// Hands every buffered event to the caller, leaving the log empty.
    pub fn drain(&mut self) -> Vec<ChatEvent> {
        std::mem::take(&mut self.entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_lines_are_stable() {
        let thread = ThreadRef::channel(7);
        assert_eq!(
            ChatEvent::WindowOpened {
                thread: thread.clone(),
                source: OpenSource::Inbound
            }
            .to_log_line(),
            "window_opened thread=discuss.channel:7 source=inbound"
        );
        assert_eq!(
            ChatEvent::FocusMoved {
                from: Some(thread),
                to: None
            }
            .to_log_line(),
            "focus_moved from=discuss.channel:7 to=-"
        );
    }

    #[test]
    fn event_log_drops_oldest_past_capacity_and_drains() {
        let mut events = ChatEventLog::with_capacity(2);
        for closed_windows in 0..3 {
            events.push(ChatEvent::DiscussOpened { closed_windows });
        }
        assert_eq!(
            events.entries(),
            &[
                ChatEvent::DiscussOpened { closed_windows: 1 },
                ChatEvent::DiscussOpened { closed_windows: 2 },
            ]
        );

        let drained = events.drain();
        assert_eq!(drained.len(), 2);
        assert!(events.entries().is_empty());
    }

    #[test]
    fn inbound_notification_deserializes_with_default_kind() {
        let raw = r#"{
          "thread": {"model": "discuss.channel", "id": 3},
          "has_history": true,
          "message": {"id": 9, "author": "Bob", "body": "ping"}
        }"#;
        let inbound: InboundMessage =
            serde_json::from_str(raw).expect("notification should deserialize");
        assert_eq!(inbound.kind, ThreadKind::Chat);
        assert!(inbound.message.attachments.is_empty());
    }
}

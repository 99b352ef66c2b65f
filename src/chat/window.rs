use crate::chat::thread::{Attachment, ThreadMessage, ThreadRef, ThreadViewState};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatWindow {
    pub thread: ThreadRef,
    #[serde(default)]
    pub folded: bool,
    #[serde(default)]
    pub visible: bool,
    #[serde(default)]
    pub visible_index: Option<usize>,
    #[serde(default)]
    pub composer_draft: String,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    #[serde(default)]
    pub scroll_top: Option<u32>,
    #[serde(default)]
    pub show_new_message_separator: bool,
    /// Oldest message the user has not seen since the separator appeared.
    #[serde(default)]
    pub first_unread_message: Option<u64>,
    /// `None` until the first fetch succeeds.
    #[serde(default)]
    pub history: Option<Vec<ThreadMessage>>,
}

impl ChatWindow {
    pub fn new(thread: ThreadRef, folded: bool, view_state: ThreadViewState) -> Self {
        Self {
            thread,
            folded,
            visible: false,
            visible_index: None,
            composer_draft: view_state.composer_draft,
            attachments: view_state.attachments,
            scroll_top: view_state.scroll_top,
            show_new_message_separator: false,
            first_unread_message: None,
            history: None,
        }
    }

    pub fn view_state(&self) -> ThreadViewState {
        ThreadViewState {
            composer_draft: self.composer_draft.clone(),
            attachments: self.attachments.clone(),
            scroll_top: self.scroll_top,
        }
    }

    pub fn is_history_loaded(&self) -> bool {
        self.history.is_some()
    }

    /// Message list is rendered only for visible, unfolded windows.
    pub fn shows_messages(&self) -> bool {
        self.visible && !self.folded
    }

    pub fn needs_history(&self) -> bool {
        self.shows_messages() && !self.is_history_loaded()
    }

    pub(crate) fn set_slot(&mut self, visible_index: Option<usize>) {
        self.visible = visible_index.is_some();
        self.visible_index = visible_index;
    }

    /// Shows the separator above `message_id`, unless it already sits above
    /// an earlier unread message.
    pub(crate) fn mark_unread_from(&mut self, message_id: u64) {
        if !self.show_new_message_separator {
            self.show_new_message_separator = true;
            self.first_unread_message = Some(message_id);
        }
    }

    pub(crate) fn clear_unread(&mut self) {
        self.show_new_message_separator = false;
        self.first_unread_message = None;
    }

    pub(crate) fn append_message(&mut self, message: &ThreadMessage) {
        if let Some(history) = self.history.as_mut() {
            if !history.iter().any(|existing| existing.id == message.id) {
                history.push(message.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_state_round_trips_through_window() {
        let state = ThreadViewState {
            composer_draft: "half-written".to_string(),
            attachments: vec![Attachment::new("notes.pdf", "application/pdf")],
            scroll_top: Some(142),
        };
        let window = ChatWindow::new(ThreadRef::channel(1), false, state.clone());
        assert_eq!(window.view_state(), state);
        assert!(!window.visible);
        assert_eq!(window.visible_index, None);
    }

    #[test]
    fn messages_append_only_after_history_loaded() {
        let mut window = ChatWindow::new(ThreadRef::channel(1), false, ThreadViewState::default());
        let message = ThreadMessage {
            id: 1,
            author: "Bob".to_string(),
            body: "hi".to_string(),
            attachments: Vec::new(),
        };
        window.append_message(&message);
        assert!(window.history.is_none());

        window.history = Some(Vec::new());
        window.append_message(&message);
        window.append_message(&message);
        assert_eq!(window.history.as_ref().map(Vec::len), Some(1));
    }

    #[test]
    fn separator_stays_above_oldest_unread_message() {
        let mut window = ChatWindow::new(ThreadRef::channel(1), false, ThreadViewState::default());
        window.mark_unread_from(10);
        window.mark_unread_from(11);
        assert!(window.show_new_message_separator);
        assert_eq!(window.first_unread_message, Some(10));

        window.clear_unread();
        assert!(!window.show_new_message_separator);
        assert_eq!(window.first_unread_message, None);

        window.mark_unread_from(12);
        assert_eq!(window.first_unread_message, Some(12));
    }
}

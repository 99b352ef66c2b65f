use crate::chat::thread::{
    Attachment, FoldState, ThreadKind, ThreadMessage, ThreadRef, ThreadViewState,
};
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("unknown thread {0}")]
    UnknownThread(ThreadRef),
    #[error("message fetch failed for {thread}: {message}")]
    Fetch { thread: ThreadRef, message: String },
    #[error("message post failed for {thread}: {message}")]
    Post { thread: ThreadRef, message: String },
}

/// Server-side view of threads: fold flags, preserved window state and
/// message history.
pub trait ThreadRegistry {
    fn open_thread(&mut self, thread: &ThreadRef);

    fn close_thread(&mut self, thread: &ThreadRef);

    fn fold_state(&self, thread: &ThreadRef) -> FoldState;

    fn set_fold_state(&mut self, thread: &ThreadRef, state: FoldState);

    /// Threads pinned in the window bar, most recently opened first.
    fn pinned_threads(&self) -> Vec<(ThreadRef, FoldState)>;

    fn view_state(&self, thread: &ThreadRef) -> ThreadViewState;

    fn save_view_state(&mut self, thread: &ThreadRef, state: ThreadViewState);

    fn fetch_messages(&mut self, thread: &ThreadRef) -> Result<Vec<ThreadMessage>, RegistryError>;

    fn post_message(
        &mut self,
        thread: &ThreadRef,
        body: &str,
        attachments: &[Attachment],
    ) -> Result<ThreadMessage, RegistryError>;

    fn mark_seen(&mut self, _thread: &ThreadRef) {}

    /// Records a message pushed by the inbound transport.
    fn deliver(&mut self, _thread: &ThreadRef, _message: &ThreadMessage) {}

    fn thread_kind(&self, _thread: &ThreadRef) -> ThreadKind {
        ThreadKind::Chat
    }

    fn display_name(&self, thread: &ThreadRef) -> String {
        thread.to_string()
    }
}

#[derive(Debug, Clone, Default)]
struct ThreadRecord {
    name: String,
    kind: ThreadKind,
    fold_state: FoldState,
    view_state: ThreadViewState,
    messages: Vec<ThreadMessage>,
    seen_message_id: Option<u64>,
}

/// Registry kept entirely in memory.
#[derive(Debug, Default)]
pub struct InMemoryThreadRegistry {
    threads: BTreeMap<ThreadRef, ThreadRecord>,
    pin_order: Vec<ThreadRef>,
    failing_fetches: BTreeSet<ThreadRef>,
    fetch_log: Vec<ThreadRef>,
    next_message_id: u64,
    author: String,
}

impl InMemoryThreadRegistry {
    pub fn new(author: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            next_message_id: 1,
            ..Self::default()
        }
    }

    pub fn add_thread(&mut self, thread: ThreadRef, name: impl Into<String>, kind: ThreadKind) {
        self.threads.insert(
            thread,
            ThreadRecord {
                name: name.into(),
                kind,
                ..ThreadRecord::default()
            },
        );
    }

    pub fn push_message(&mut self, thread: &ThreadRef, author: &str, body: &str) -> Option<ThreadMessage> {
        let id = self.next_message_id;
        let record = self.threads.get_mut(thread)?;
        let message = ThreadMessage {
            id,
            author: author.to_string(),
            body: body.to_string(),
            attachments: Vec::new(),
        };
        record.messages.push(message.clone());
        self.next_message_id += 1;
        Some(message)
    }

    pub fn message_count(&self, thread: &ThreadRef) -> usize {
        self.threads
            .get(thread)
            .map(|record| record.messages.len())
            .unwrap_or(0)
    }

    pub fn has_unseen(&self, thread: &ThreadRef) -> bool {
        self.threads.get(thread).is_some_and(|record| {
            record.messages.last().map(|message| message.id) > record.seen_message_id
        })
    }

    /// Makes every later fetch for `thread` fail until cleared.
    pub fn fail_fetches_for(&mut self, thread: &ThreadRef, failing: bool) {
        if failing {
            self.failing_fetches.insert(thread.clone());
        } else {
            self.failing_fetches.remove(thread);
        }
    }

    pub fn fetch_log(&self) -> &[ThreadRef] {
        &self.fetch_log
    }

    pub fn thread_refs(&self) -> Vec<ThreadRef> {
        self.threads.keys().cloned().collect()
    }

    fn pin_front(&mut self, thread: &ThreadRef) {
        self.pin_order.retain(|pinned| pinned != thread);
        self.pin_order.insert(0, thread.clone());
    }

    fn record_mut(&mut self, thread: &ThreadRef) -> &mut ThreadRecord {
        self.threads.entry(thread.clone()).or_insert_with(|| ThreadRecord {
            name: thread.to_string(),
            ..ThreadRecord::default()
        })
    }
}

impl ThreadRegistry for InMemoryThreadRegistry {
    fn open_thread(&mut self, thread: &ThreadRef) {
        let record = self.record_mut(thread);
        if record.fold_state == FoldState::Closed {
            record.fold_state = FoldState::Open;
        }
        self.pin_front(thread);
    }

    fn close_thread(&mut self, thread: &ThreadRef) {
        self.record_mut(thread).fold_state = FoldState::Closed;
        self.pin_order.retain(|pinned| pinned != thread);
    }

    fn fold_state(&self, thread: &ThreadRef) -> FoldState {
        self.threads
            .get(thread)
            .map(|record| record.fold_state)
            .unwrap_or_default()
    }

    fn set_fold_state(&mut self, thread: &ThreadRef, state: FoldState) {
        self.record_mut(thread).fold_state = state;
        if state.is_pinned() {
            if !self.pin_order.contains(thread) {
                self.pin_front(thread);
            }
        } else {
            self.pin_order.retain(|pinned| pinned != thread);
        }
    }

    fn pinned_threads(&self) -> Vec<(ThreadRef, FoldState)> {
        self.pin_order
            .iter()
            .map(|thread| (thread.clone(), self.fold_state(thread)))
            .filter(|(_, state)| state.is_pinned())
            .collect()
    }

    fn view_state(&self, thread: &ThreadRef) -> ThreadViewState {
        self.threads
            .get(thread)
            .map(|record| record.view_state.clone())
            .unwrap_or_default()
    }

    fn save_view_state(&mut self, thread: &ThreadRef, state: ThreadViewState) {
        self.record_mut(thread).view_state = state;
    }

    fn fetch_messages(&mut self, thread: &ThreadRef) -> Result<Vec<ThreadMessage>, RegistryError> {
        self.fetch_log.push(thread.clone());
        if self.failing_fetches.contains(thread) {
            return Err(RegistryError::Fetch {
                thread: thread.clone(),
                message: "service unavailable".to_string(),
            });
        }
        self.threads
            .get(thread)
            .map(|record| record.messages.clone())
            .ok_or_else(|| RegistryError::UnknownThread(thread.clone()))
    }

    fn post_message(
        &mut self,
        thread: &ThreadRef,
        body: &str,
        attachments: &[Attachment],
    ) -> Result<ThreadMessage, RegistryError> {
        if !self.threads.contains_key(thread) {
            return Err(RegistryError::UnknownThread(thread.clone()));
        }
        if body.trim().is_empty() && attachments.is_empty() {
            return Err(RegistryError::Post {
                thread: thread.clone(),
                message: "message is empty".to_string(),
            });
        }
        let author = self.author.clone();
        let mut message = self
            .push_message(thread, &author, body)
            .ok_or_else(|| RegistryError::UnknownThread(thread.clone()))?;
        message.attachments = attachments.to_vec();
        if let Some(record) = self.threads.get_mut(thread) {
            if let Some(stored) = record.messages.last_mut() {
                stored.attachments = message.attachments.clone();
            }
            record.seen_message_id = Some(message.id);
        }
        Ok(message)
    }

    fn mark_seen(&mut self, thread: &ThreadRef) {
        if let Some(record) = self.threads.get_mut(thread) {
            record.seen_message_id = record.messages.last().map(|message| message.id);
        }
    }

    fn deliver(&mut self, thread: &ThreadRef, message: &ThreadMessage) {
        let record = self.record_mut(thread);
        if record.messages.iter().any(|existing| existing.id == message.id) {
            return;
        }
        record.messages.push(message.clone());
        self.next_message_id = self.next_message_id.max(message.id + 1);
    }

    fn thread_kind(&self, thread: &ThreadRef) -> ThreadKind {
        self.threads
            .get(thread)
            .map(|record| record.kind)
            .unwrap_or_default()
    }

    fn display_name(&self, thread: &ThreadRef) -> String {
        self.threads
            .get(thread)
            .map(|record| record.name.clone())
            .unwrap_or_else(|| thread.to_string())
    }
}

/// Shared handle so the host can keep inspecting a registry it handed to
/// the window manager.
impl<T: ThreadRegistry> ThreadRegistry for Rc<RefCell<T>> {
    fn open_thread(&mut self, thread: &ThreadRef) {
        self.borrow_mut().open_thread(thread);
    }

    fn close_thread(&mut self, thread: &ThreadRef) {
        self.borrow_mut().close_thread(thread);
    }

    fn fold_state(&self, thread: &ThreadRef) -> FoldState {
        self.borrow().fold_state(thread)
    }

    fn set_fold_state(&mut self, thread: &ThreadRef, state: FoldState) {
        self.borrow_mut().set_fold_state(thread, state);
    }

    fn pinned_threads(&self) -> Vec<(ThreadRef, FoldState)> {
        self.borrow().pinned_threads()
    }

    fn view_state(&self, thread: &ThreadRef) -> ThreadViewState {
        self.borrow().view_state(thread)
    }

    fn save_view_state(&mut self, thread: &ThreadRef, state: ThreadViewState) {
        self.borrow_mut().save_view_state(thread, state);
    }

    fn fetch_messages(&mut self, thread: &ThreadRef) -> Result<Vec<ThreadMessage>, RegistryError> {
        self.borrow_mut().fetch_messages(thread)
    }

    fn post_message(
        &mut self,
        thread: &ThreadRef,
        body: &str,
        attachments: &[Attachment],
    ) -> Result<ThreadMessage, RegistryError> {
        self.borrow_mut().post_message(thread, body, attachments)
    }

    fn mark_seen(&mut self, thread: &ThreadRef) {
        self.borrow_mut().mark_seen(thread);
    }

    fn deliver(&mut self, thread: &ThreadRef, message: &ThreadMessage) {
        self.borrow_mut().deliver(thread, message);
    }

    fn thread_kind(&self, thread: &ThreadRef) -> ThreadKind {
        self.borrow().thread_kind(thread)
    }

    fn display_name(&self, thread: &ThreadRef) -> String {
        self.borrow().display_name(thread)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> InMemoryThreadRegistry {
        let mut registry = InMemoryThreadRegistry::new("me");
        registry.add_thread(ThreadRef::channel(1), "Alice", ThreadKind::Chat);
        registry.add_thread(ThreadRef::channel(2), "general", ThreadKind::Channel);
        registry
    }

    #[test]
    fn open_and_close_track_pin_order() {
        let mut registry = registry();
        registry.open_thread(&ThreadRef::channel(1));
        registry.open_thread(&ThreadRef::channel(2));
        registry.set_fold_state(&ThreadRef::channel(1), FoldState::Folded);

        assert_eq!(
            registry.pinned_threads(),
            vec![
                (ThreadRef::channel(2), FoldState::Open),
                (ThreadRef::channel(1), FoldState::Folded),
            ]
        );

        registry.close_thread(&ThreadRef::channel(2));
        assert_eq!(registry.fold_state(&ThreadRef::channel(2)), FoldState::Closed);
        assert_eq!(registry.pinned_threads().len(), 1);
    }

    #[test]
    fn reopening_a_folded_thread_keeps_it_folded() {
        let mut registry = registry();
        let thread = ThreadRef::channel(1);
        registry.set_fold_state(&thread, FoldState::Folded);
        registry.open_thread(&thread);
        assert_eq!(registry.fold_state(&thread), FoldState::Folded);
    }

    #[test]
    fn failing_fetch_is_reported_and_logged() {
        let mut registry = registry();
        let thread = ThreadRef::channel(1);
        registry.fail_fetches_for(&thread, true);

        let error = registry
            .fetch_messages(&thread)
            .expect_err("fetch should fail");
        assert!(matches!(error, RegistryError::Fetch { .. }));
        assert_eq!(registry.fetch_log(), &[thread.clone()]);

        registry.fail_fetches_for(&thread, false);
        assert!(registry.fetch_messages(&thread).is_ok());
    }

    #[test]
    fn posting_marks_thread_seen() {
        let mut registry = registry();
        let thread = ThreadRef::channel(1);
        registry.push_message(&thread, "Alice", "hi");
        assert!(registry.has_unseen(&thread));

        let posted = registry
            .post_message(&thread, "hello", &[Attachment::new("a.txt", "text/plain")])
            .expect("post should succeed");
        assert_eq!(posted.attachments.len(), 1);
        assert!(!registry.has_unseen(&thread));
        assert_eq!(registry.message_count(&thread), 2);
    }

    #[test]
    fn empty_post_is_rejected() {
        let mut registry = registry();
        let error = registry
            .post_message(&ThreadRef::channel(1), "   ", &[])
            .expect_err("empty post should fail");
        assert!(matches!(error, RegistryError::Post { .. }));
    }

    #[test]
    fn delivered_messages_are_not_duplicated() {
        let mut registry = registry();
        let thread = ThreadRef::channel(2);
        let message = ThreadMessage {
            id: 40,
            author: "Bob".to_string(),
            body: "ping".to_string(),
            attachments: Vec::new(),
        };
        registry.deliver(&thread, &message);
        registry.deliver(&thread, &message);
        assert_eq!(registry.message_count(&thread), 1);

        let next = registry
            .post_message(&thread, "pong", &[])
            .expect("post should succeed");
        assert_eq!(next.id, 41);
    }

    #[test]
    fn post_to_unknown_thread_fails() {
        let mut registry = registry();
        let error = registry
            .post_message(&ThreadRef::channel(99), "x", &[])
            .expect_err("unknown thread should fail");
        assert_eq!(error, RegistryError::UnknownThread(ThreadRef::channel(99)));
    }
}

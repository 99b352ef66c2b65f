use crate::chat::device::{DeviceService, Viewport};
use crate::chat::layout::{compute_layout, LayoutMode, LayoutResult};
use crate::chat::registry::{RegistryError, ThreadRegistry};
use crate::chat::thread::{Attachment, FoldState, ThreadKind, ThreadMessage, ThreadRef};
use crate::chat::transport::InboundTransport;
use crate::chat::window::ChatWindow;
use crate::config::LayoutConfig;
use crate::event::{ChatEvent, ChatEventLog, ChatKey, InboundMessage, OpenSource};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ManagerError {
    #[error("no chat window open for {0}")]
    WindowNotOpen(ThreadRef),
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct WindowFrame {
    pub thread: ThreadRef,
    pub title: String,
    pub visible_index: usize,
    pub offset: f32,
    pub width: f32,
    pub folded: bool,
    pub focused: bool,
    pub show_separator: bool,
    /// Message the separator is drawn above.
    pub first_unread_message: Option<u64>,
    /// `None` while folded or while history is not loaded yet.
    pub messages: Option<Vec<ThreadMessage>>,
    pub composer_draft: String,
    pub attachments: Vec<Attachment>,
    pub scroll_top: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HiddenMenuEntry {
    pub thread: ThreadRef,
    pub title: String,
    pub unread: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HiddenMenuFrame {
    pub offset: f32,
    pub entries: Vec<HiddenMenuEntry>,
}

/// Snapshot handed to the view once a mutation has settled.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub revision: u64,
    pub mode: LayoutMode,
    pub windows: Vec<WindowFrame>,
    pub hidden_menu: Option<HiddenMenuFrame>,
    pub discuss_active: bool,
}

/// Owns the open chat windows and applies every transition to them.
///
/// Windows are kept most-recently-opened first; every structural change
/// recomputes the layout immediately, while history loading waits for the
/// next render pass.
pub struct ChatWindowManager {
    registry: Box<dyn ThreadRegistry>,
    device: Box<dyn DeviceService>,
    transport: Box<dyn InboundTransport>,
    config: LayoutConfig,
    windows: Vec<ChatWindow>,
    layout: LayoutResult,
    viewport: Viewport,
    focused: Option<ThreadRef>,
    discuss_active: bool,
    revision: u64,
    rendered_revision: u64,
    event_log: ChatEventLog,
}

impl ChatWindowManager {
    pub fn new(
        registry: Box<dyn ThreadRegistry>,
        device: Box<dyn DeviceService>,
        transport: Box<dyn InboundTransport>,
        config: LayoutConfig,
    ) -> Self {
        let viewport = device.viewport();
        Self {
            registry,
            device,
            transport,
            config,
            windows: Vec::new(),
            layout: LayoutResult::default(),
            viewport,
            focused: None,
            discuss_active: false,
            revision: 0,
            rendered_revision: 0,
            event_log: ChatEventLog::default(),
        }
    }

    pub fn windows(&self) -> &[ChatWindow] {
        &self.windows
    }

    pub fn window(&self, thread: &ThreadRef) -> Option<&ChatWindow> {
        self.windows.iter().find(|window| &window.thread == thread)
    }

    pub fn layout(&self) -> &LayoutResult {
        &self.layout
    }

    pub fn focused(&self) -> Option<&ThreadRef> {
        self.focused.as_ref()
    }

    pub fn is_discuss_active(&self) -> bool {
        self.discuss_active
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn events(&self) -> &[ChatEvent] {
        self.event_log.entries()
    }

    /// Takes the buffered events, e.g. once per frame for a diagnostics view.
    pub fn take_events(&mut self) -> Vec<ChatEvent> {
        self.event_log.drain()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// True when a mutation has not been through `next_render` yet.
    pub fn render_pending(&self) -> bool {
        self.revision != self.rendered_revision
    }

    fn index_of(&self, thread: &ThreadRef) -> Option<usize> {
        self.windows.iter().position(|window| &window.thread == thread)
    }

    fn require(&self, thread: &ThreadRef) -> Result<usize, ManagerError> {
        self.index_of(thread)
            .ok_or_else(|| ManagerError::WindowNotOpen(thread.clone()))
    }

    /// Opens `thread` at the front of the window list, or refocuses it when
    /// already open. Returns whether a new window was created.
    ///
    /// While discuss is active only a user open gets through, and it leaves
    /// discuss first.
    pub fn open_window(&mut self, thread: ThreadRef, source: OpenSource) -> bool {
        if self.discuss_active {
            if source != OpenSource::User {
                log::debug!("discuss is active, not opening {thread} ({})", source.as_str());
                return false;
            }
            self.close_discuss();
        }

        if let Some(index) = self.index_of(&thread) {
            if source == OpenSource::User {
                if !self.windows[index].visible {
                    let window = self.windows.remove(index);
                    self.windows.insert(0, window);
                    self.registry.open_thread(&thread);
                }
                if let Some(window) = self.windows.iter_mut().find(|w| w.thread == thread) {
                    if window.folded {
                        window.folded = false;
                        self.registry.set_fold_state(&thread, FoldState::Open);
                        self.event_log.push(ChatEvent::FoldChanged {
                            thread: thread.clone(),
                            folded: false,
                        });
                    }
                }
            }
            self.event_log.push(ChatEvent::WindowRefocused {
                thread: thread.clone(),
            });
            self.recompute();
            if source == OpenSource::User {
                self.set_focus(Some(thread));
            }
            return false;
        }

        let folded = match source {
            OpenSource::User => false,
            OpenSource::Inbound | OpenSource::Reload => {
                self.registry.fold_state(&thread) == FoldState::Folded
            }
        };
        self.registry.open_thread(&thread);
        if !folded {
            self.registry.set_fold_state(&thread, FoldState::Open);
        }
        let window = ChatWindow::new(thread.clone(), folded, self.registry.view_state(&thread));
        self.windows.insert(0, window);
        log::info!("opened chat window {thread} ({})", source.as_str());
        self.event_log.push(ChatEvent::WindowOpened {
            thread: thread.clone(),
            source,
        });
        self.recompute();
        if source == OpenSource::User {
            self.set_focus(Some(thread));
        }
        true
    }

    /// Close button: focus moves on only if the closed window held it.
    pub fn close_window(&mut self, thread: &ThreadRef) -> Result<(), ManagerError> {
        let transfer = self.focused.as_ref() == Some(thread);
        self.remove_window(thread, transfer)
    }

    fn remove_window(&mut self, thread: &ThreadRef, transfer_focus: bool) -> Result<(), ManagerError> {
        let index = self.require(thread)?;
        let window = self.windows.remove(index);
        self.registry.save_view_state(thread, window.view_state());
        self.registry.close_thread(thread);
        log::info!("closed chat window {thread}");
        self.event_log.push(ChatEvent::WindowClosed {
            thread: thread.clone(),
        });
        if self.focused.as_ref() == Some(thread) {
            self.move_focus(None);
        }
        self.recompute();

        if transfer_focus {
            let count = self.layout.visible.len();
            let next = window.visible_index.and_then(|index| {
                let start = if index < count { index } else { 0 };
                self.first_unfolded((0..count).map(|step| (start + step) % count))
            });
            if next.is_some() {
                self.set_focus(next);
            }
        }
        Ok(())
    }

    /// First visible, unfolded window among the given visible indices.
    fn first_unfolded(&self, mut order: impl Iterator<Item = usize>) -> Option<ThreadRef> {
        order.find_map(|visible_index| {
            let slot = self.layout.visible.get(visible_index)?;
            self.window(&slot.thread)
                .filter(|window| !window.folded)
                .map(|window| window.thread.clone())
        })
    }

    pub fn toggle_fold(&mut self, thread: &ThreadRef) -> Result<bool, ManagerError> {
        let index = self.require(thread)?;
        let folded = !self.windows[index].folded;
        self.set_folded(thread, folded)?;
        Ok(folded)
    }

    pub fn set_folded(&mut self, thread: &ThreadRef, folded: bool) -> Result<(), ManagerError> {
        let index = self.require(thread)?;
        if self.windows[index].folded == folded {
            return Ok(());
        }

        if folded {
            let state = self.windows[index].view_state();
            self.registry.save_view_state(thread, state);
            self.registry.set_fold_state(thread, FoldState::Folded);
            if self.focused.as_ref() == Some(thread) {
                self.move_focus(None);
            }
        } else {
            let saved = self.registry.view_state(thread);
            self.windows[index].scroll_top = saved.scroll_top;
            self.registry.set_fold_state(thread, FoldState::Open);
        }
        self.windows[index].folded = folded;
        self.event_log.push(ChatEvent::FoldChanged {
            thread: thread.clone(),
            folded,
        });
        self.recompute();
        Ok(())
    }

    /// Applies one inbound notification. Returns whether it opened a window.
    pub fn handle_inbound(&mut self, inbound: InboundMessage) -> bool {
        let InboundMessage {
            thread,
            kind,
            has_history,
            message,
        } = inbound;
        self.registry.deliver(&thread, &message);

        if let Some(index) = self.index_of(&thread) {
            let focused = self.focused.as_ref() == Some(&thread);
            let separator = has_history && !focused;
            let window = &mut self.windows[index];
            window.append_message(&message);
            if separator {
                window.mark_unread_from(message.id);
            }
            if focused {
                self.registry.mark_seen(&thread);
            }
            self.event_log.push(ChatEvent::InboundReceived {
                thread,
                opened: false,
                separator,
            });
            self.recompute();
            return false;
        }

        let pinned = self.registry.fold_state(&thread).is_pinned();
        let direct = kind == ThreadKind::Chat;
        if self.discuss_active || !(direct || pinned) {
            log::debug!("inbound message for {thread} left in thread list");
            self.event_log.push(ChatEvent::InboundReceived {
                thread,
                opened: false,
                separator: false,
            });
            return false;
        }

        self.open_window(thread.clone(), OpenSource::Inbound);
        if let Some(index) = self.index_of(&thread) {
            if has_history {
                self.windows[index].mark_unread_from(message.id);
            }
        }
        self.event_log.push(ChatEvent::InboundReceived {
            thread,
            opened: true,
            separator: has_history,
        });
        true
    }

    /// Applies every pending transport notification in arrival order.
    pub fn drain_inbound(&mut self) -> usize {
        let mut applied = 0;
        while let Some(inbound) = self.transport.try_next() {
            self.handle_inbound(inbound);
            applied += 1;
        }
        applied
    }

    /// Gives keyboard focus to a visible window's composer; this marks its
    /// messages as seen. Hidden and folded windows have no composer.
    pub fn focus_composer(&mut self, thread: &ThreadRef) -> Result<(), ManagerError> {
        let index = self.require(thread)?;
        if !self.windows[index].visible {
            log::debug!("ignoring focus request for hidden window {thread}");
            return Ok(());
        }
        if self.windows[index].folded {
            log::debug!("ignoring focus request for folded window {thread}");
            return Ok(());
        }
        self.set_focus(Some(thread.clone()));
        Ok(())
    }

    pub fn handle_key(&mut self, thread: &ThreadRef, key: ChatKey) -> Result<(), ManagerError> {
        match key {
            ChatKey::Escape => self.remove_window(thread, true),
            ChatKey::Tab => {
                let index = self.require(thread)?;
                let Some(current) = self.windows[index].visible_index else {
                    return Ok(());
                };
                // previous visible index, wrapping, skipping folded windows
                let count = self.layout.visible.len();
                let next =
                    self.first_unfolded((1..count).map(|step| (current + count - step) % count));
                if next.is_some() {
                    self.set_focus(next);
                }
                Ok(())
            }
        }
    }

    /// View-originated edits: these do not request a render.
    pub fn set_scroll_top(&mut self, thread: &ThreadRef, scroll_top: Option<u32>) -> Result<(), ManagerError> {
        let index = self.require(thread)?;
        self.windows[index].scroll_top = scroll_top;
        Ok(())
    }

    pub fn set_composer_draft(&mut self, thread: &ThreadRef, draft: impl Into<String>) -> Result<(), ManagerError> {
        let index = self.require(thread)?;
        self.windows[index].composer_draft = draft.into();
        Ok(())
    }

    pub fn add_attachment(&mut self, thread: &ThreadRef, attachment: Attachment) -> Result<(), ManagerError> {
        let index = self.require(thread)?;
        self.windows[index].attachments.push(attachment);
        Ok(())
    }

    pub fn remove_attachment(&mut self, thread: &ThreadRef, name: &str) -> Result<(), ManagerError> {
        let index = self.require(thread)?;
        self.windows[index]
            .attachments
            .retain(|attachment| attachment.name != name);
        Ok(())
    }

    /// Sends the composer content. On failure the draft stays in place.
    pub fn post_message(&mut self, thread: &ThreadRef) -> Result<ThreadMessage, ManagerError> {
        let index = self.require(thread)?;
        let body = self.windows[index].composer_draft.clone();
        let attachments = self.windows[index].attachments.clone();
        let message = match self.registry.post_message(thread, &body, &attachments) {
            Ok(message) => message,
            Err(err) => {
                log::warn!("failed to post to {thread}: {err}");
                return Err(err.into());
            }
        };

        let window = &mut self.windows[index];
        window.composer_draft.clear();
        window.attachments.clear();
        window.clear_unread();
        window.append_message(&message);
        let state = window.view_state();
        self.registry.save_view_state(thread, state);
        self.revision += 1;
        Ok(message)
    }

    /// Full-screen discuss takes over: every chat window is destroyed, their
    /// view state handed to the registry first.
    pub fn open_discuss(&mut self) {
        if self.discuss_active {
            return;
        }
        for window in &self.windows {
            self.registry.save_view_state(&window.thread, window.view_state());
        }
        let closed_windows = self.windows.len();
        self.windows.clear();
        self.move_focus(None);
        self.discuss_active = true;
        log::info!("discuss opened, {closed_windows} chat windows closed");
        self.event_log.push(ChatEvent::DiscussOpened { closed_windows });
        self.recompute();
    }

    /// Leaving discuss brings back the windows pinned in the registry.
    pub fn close_discuss(&mut self) {
        if !self.discuss_active {
            return;
        }
        self.discuss_active = false;
        self.event_log.push(ChatEvent::DiscussClosed);
        self.rebuild_from_registry();
    }

    /// Recreates windows from the registry's fold flags, as after a reload.
    /// Nothing is recreated while discuss is active.
    pub fn rebuild_from_registry(&mut self) {
        if self.discuss_active {
            log::debug!("discuss is active, chat windows stay closed");
            if !self.windows.is_empty() {
                self.windows.clear();
                self.move_focus(None);
                self.recompute();
            }
            return;
        }
        self.windows = self
            .registry
            .pinned_threads()
            .into_iter()
            .map(|(thread, state)| {
                let view_state = self.registry.view_state(&thread);
                ChatWindow::new(thread, state == FoldState::Folded, view_state)
            })
            .collect();
        self.move_focus(None);
        for window in &self.windows {
            self.event_log.push(ChatEvent::WindowOpened {
                thread: window.thread.clone(),
                source: OpenSource::Reload,
            });
        }
        log::info!("rebuilt {} chat windows from registry", self.windows.len());
        self.recompute();
    }

    pub fn apply_viewport(&mut self, viewport: Viewport) {
        if viewport == self.viewport {
            return;
        }
        self.viewport = viewport;
        self.event_log.push(ChatEvent::ViewportChanged {
            width: viewport.width,
            is_mobile: viewport.is_mobile,
        });
        self.recompute();
    }

    /// Reads the device service and applies any size or class change.
    pub fn sync_viewport(&mut self) {
        let viewport = self.device.viewport();
        self.apply_viewport(viewport);
    }

    /// The render boundary: runs deferred work (history of windows that
    /// became visible) and returns the settled frame.
    pub fn next_render(&mut self) -> RenderFrame {
        self.load_visible_histories();
        self.rendered_revision = self.revision;
        self.render_frame()
    }

    pub fn render_frame(&self) -> RenderFrame {
        let windows = self
            .layout
            .visible
            .iter()
            .filter_map(|slot| {
                let window = self.window(&slot.thread)?;
                Some(WindowFrame {
                    thread: slot.thread.clone(),
                    title: self.registry.display_name(&slot.thread),
                    visible_index: slot.visible_index,
                    offset: slot.offset,
                    width: slot.width,
                    folded: window.folded,
                    focused: self.focused.as_ref() == Some(&slot.thread),
                    show_separator: window.show_new_message_separator,
                    first_unread_message: window.first_unread_message,
                    messages: if window.folded {
                        None
                    } else {
                        window.history.clone()
                    },
                    composer_draft: window.composer_draft.clone(),
                    attachments: window.attachments.clone(),
                    scroll_top: window.scroll_top,
                })
            })
            .collect();

        let hidden_menu = self
            .layout
            .show_hidden_menu
            .then(|| HiddenMenuFrame {
                offset: self.layout.hidden_menu_offset.unwrap_or_default(),
                entries: self
                    .layout
                    .hidden
                    .iter()
                    .map(|thread| HiddenMenuEntry {
                        thread: thread.clone(),
                        title: self.registry.display_name(thread),
                        unread: self
                            .window(thread)
                            .is_some_and(|window| window.show_new_message_separator),
                    })
                    .collect(),
            });

        RenderFrame {
            revision: self.revision,
            mode: self.layout.mode,
            windows,
            hidden_menu,
            discuss_active: self.discuss_active,
        }
    }

    fn load_visible_histories(&mut self) {
        for index in 0..self.windows.len() {
            if !self.windows[index].needs_history() {
                continue;
            }
            let thread = self.windows[index].thread.clone();
            match self.registry.fetch_messages(&thread) {
                Ok(messages) => {
                    self.event_log.push(ChatEvent::HistoryLoaded {
                        thread,
                        messages: messages.len(),
                    });
                    self.windows[index].history = Some(messages);
                }
                Err(err) => {
                    log::warn!("history fetch for {thread} failed: {err}");
                    self.event_log.push(ChatEvent::HistoryFetchFailed {
                        thread,
                        message: err.to_string(),
                    });
                }
            }
        }
    }

    fn recompute(&mut self) {
        let order: Vec<ThreadRef> = self.windows.iter().map(|window| window.thread.clone()).collect();
        let layout = compute_layout(&order, self.viewport, &self.config);
        for window in &mut self.windows {
            let slot = layout.slot(&window.thread).map(|slot| slot.visible_index);
            window.set_slot(slot);
        }

        let focus_lost = self
            .focused
            .as_ref()
            .is_some_and(|thread| layout.slot(thread).is_none());
        if focus_lost {
            self.move_focus(None);
        }

        if layout != self.layout {
            self.event_log.push(ChatEvent::LayoutChanged {
                visible: layout.visible.len(),
                hidden: layout.hidden.len(),
                hidden_menu: layout.show_hidden_menu,
            });
        }
        self.layout = layout;
        self.revision += 1;
    }

    fn set_focus(&mut self, thread: Option<ThreadRef>) {
        if let Some(target) = &thread {
            if let Some(index) = self.index_of(target) {
                self.windows[index].clear_unread();
            }
            self.registry.mark_seen(target);
        }
        self.move_focus(thread);
    }

    fn move_focus(&mut self, thread: Option<ThreadRef>) {
        if self.focused == thread {
            return;
        }
        self.event_log.push(ChatEvent::FocusMoved {
            from: self.focused.clone(),
            to: thread.clone(),
        });
        self.focused = thread;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::device::FixedDevice;
    use crate::chat::registry::InMemoryThreadRegistry;
    use crate::chat::transport::NoInbound;

    fn manager(width: f32) -> ChatWindowManager {
        let mut registry = InMemoryThreadRegistry::new("me");
        for id in 1..=4 {
            registry.add_thread(ThreadRef::channel(id), format!("thread {id}"), ThreadKind::Chat);
        }
        ChatWindowManager::new(
            Box::new(registry),
            Box::new(FixedDevice::new(Viewport::desktop(width))),
            Box::new(NoInbound),
            LayoutConfig::default(),
        )
    }

    #[test]
    fn duplicate_open_refocuses_without_duplicating() {
        let mut manager = manager(1920.0);
        assert!(manager.open_window(ThreadRef::channel(1), OpenSource::User));
        assert!(manager.open_window(ThreadRef::channel(2), OpenSource::User));
        assert!(!manager.open_window(ThreadRef::channel(1), OpenSource::User));

        assert_eq!(manager.windows().len(), 2);
        assert_eq!(manager.focused(), Some(&ThreadRef::channel(1)));
        assert!(manager
            .events()
            .iter()
            .any(|event| matches!(event, ChatEvent::WindowRefocused { .. })));
    }

    #[test]
    fn opening_hidden_window_from_menu_brings_it_to_front() {
        let mut manager = manager(900.0);
        for id in 1..=3 {
            manager.open_window(ThreadRef::channel(id), OpenSource::User);
        }
        // most recent first: 3, 2 visible; 1 hidden
        assert_eq!(manager.layout().hidden_window_ids(), vec![ThreadRef::channel(1)]);

        manager.open_window(ThreadRef::channel(1), OpenSource::User);
        assert_eq!(
            manager.layout().visible_window_ids(),
            vec![ThreadRef::channel(1), ThreadRef::channel(3)]
        );
        assert_eq!(manager.layout().hidden_window_ids(), vec![ThreadRef::channel(2)]);
        assert_eq!(manager.focused(), Some(&ThreadRef::channel(1)));
    }

    #[test]
    fn operations_on_unknown_window_fail() {
        let mut manager = manager(1920.0);
        let missing = ThreadRef::channel(9);
        assert_eq!(
            manager.toggle_fold(&missing),
            Err(ManagerError::WindowNotOpen(missing.clone()))
        );
        assert!(manager.handle_key(&missing, ChatKey::Tab).is_err());
        assert!(manager.set_scroll_top(&missing, Some(1)).is_err());
    }

    #[test]
    fn mutations_request_a_render_until_next_render() {
        let mut manager = manager(1920.0);
        assert!(!manager.render_pending());

        manager.open_window(ThreadRef::channel(1), OpenSource::User);
        assert!(manager.render_pending());

        let frame = manager.next_render();
        assert!(!manager.render_pending());
        assert_eq!(frame.revision, manager.revision());
        assert_eq!(frame.windows.len(), 1);
        assert_eq!(frame.windows[0].title, "thread 1");
    }

    #[test]
    fn failed_post_keeps_draft() {
        let mut manager = manager(1920.0);
        let thread = ThreadRef::channel(1);
        manager.open_window(thread.clone(), OpenSource::User);

        let error = manager.post_message(&thread).expect_err("empty post should fail");
        assert!(matches!(error, ManagerError::Registry(RegistryError::Post { .. })));

        manager
            .set_composer_draft(&thread, "hello")
            .expect("window is open");
        manager
            .add_attachment(&thread, Attachment::new("a.png", "image/png"))
            .expect("window is open");
        manager
            .add_attachment(&thread, Attachment::new("draft.txt", "text/plain"))
            .expect("window is open");
        manager
            .remove_attachment(&thread, "draft.txt")
            .expect("window is open");
        assert_eq!(manager.window(&thread).map(|w| w.attachments.len()), Some(1));
        let posted = manager.post_message(&thread).expect("post should succeed");
        assert_eq!(posted.body, "hello");
        let window = manager.window(&thread).expect("window stays open");
        assert!(window.composer_draft.is_empty());
        assert!(window.attachments.is_empty());
    }

    #[test]
    fn taken_events_are_not_reported_twice() {
        let mut manager = manager(1920.0);
        manager.open_window(ThreadRef::channel(1), OpenSource::User);
        let first = manager.take_events();
        assert!(first
            .iter()
            .any(|event| matches!(event, ChatEvent::WindowOpened { .. })));
        assert!(manager.events().is_empty());

        manager
            .close_window(&ThreadRef::channel(1))
            .expect("window is open");
        let second = manager.take_events();
        assert!(!second
            .iter()
            .any(|event| matches!(event, ChatEvent::WindowOpened { .. })));
        assert!(second
            .iter()
            .any(|event| matches!(event, ChatEvent::WindowClosed { .. })));
    }

    #[test]
    fn closing_unfocused_window_keeps_focus() {
        let mut manager = manager(1920.0);
        manager.open_window(ThreadRef::channel(1), OpenSource::User);
        manager.open_window(ThreadRef::channel(2), OpenSource::User);
        manager
            .close_window(&ThreadRef::channel(1))
            .expect("window is open");
        assert_eq!(manager.focused(), Some(&ThreadRef::channel(2)));
    }
}

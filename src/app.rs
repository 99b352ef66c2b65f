use chat_dock::chat::view::ChatDockView;
use chat_dock::chat::{
    ChatWindowManager, InMemoryThreadRegistry, SharedViewport, ThreadKind, ThreadRef,
    ThreadRegistry, Viewport,
};
use chat_dock::event::OpenSource;
use chat_dock::theme::Theme;
use eframe::egui::{self, RichText, ScrollArea};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

pub struct ChatDockApp {
    manager: ChatWindowManager,
    view: ChatDockView,
    registry: Rc<RefCell<InMemoryThreadRegistry>>,
    viewport: SharedViewport,
    theme: Theme,
    visuals_applied: bool,
    diagnostics_log: Vec<String>,
}

const DIAGNOSTICS_LIMIT: usize = 500;

impl ChatDockApp {
    pub fn new(
        manager: ChatWindowManager,
        registry: Rc<RefCell<InMemoryThreadRegistry>>,
        viewport: SharedViewport,
        warnings: Vec<String>,
    ) -> Self {
        let mut app = Self {
            manager,
            view: ChatDockView::default(),
            registry,
            viewport,
            theme: Theme::default(),
            visuals_applied: false,
            diagnostics_log: Vec::new(),
        };
        for warning in warnings {
            app.log_diagnostic(format!("config warning: {warning}"));
        }
        app
    }

    fn timestamp() -> String {
        match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(duration) => duration.as_secs().to_string(),
            Err(_) => "0".to_string(),
        }
    }

    fn log_diagnostic(&mut self, message: impl Into<String>) {
        self.diagnostics_log
            .push(format!("[{}] {}", Self::timestamp(), message.into()));
        if self.diagnostics_log.len() > DIAGNOSTICS_LIMIT {
            let excess = self.diagnostics_log.len() - DIAGNOSTICS_LIMIT;
            self.diagnostics_log.drain(..excess);
        }
    }

    fn collect_events(&mut self) {
        for event in self.manager.take_events() {
            self.log_diagnostic(event.to_log_line());
        }
    }

    fn sync_viewport(&mut self, ctx: &egui::Context) {
        let width = ctx.screen_rect().width();
        let is_mobile = width < self.manager.config().small_viewport_width;
        self.viewport.set(Viewport { width, is_mobile });
        self.manager.sync_viewport();
    }

    fn render_top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.strong("Chat Dock");
                ui.separator();
                let layout = self.manager.layout();
                let viewport = self.manager.viewport();
                ui.label(
                    RichText::new(format!(
                        "{} visible / {} hidden @ {:.0}px{}",
                        layout.visible.len(),
                        layout.hidden.len(),
                        viewport.width,
                        if viewport.is_mobile { " (mobile)" } else { "" }
                    ))
                    .color(self.theme.text_muted),
                );
                ui.separator();
                let discuss = self.manager.is_discuss_active();
                if ui.selectable_label(discuss, "Discuss").clicked() {
                    if discuss {
                        self.manager.close_discuss();
                    } else {
                        self.manager.open_discuss();
                    }
                }
            });
        });
    }

    fn render_left_panel(&mut self, ctx: &egui::Context) {
        let threads: Vec<(ThreadRef, String, bool)> = {
            let registry = self.registry.borrow();
            let threads = registry
                .thread_refs()
                .into_iter()
                .map(|thread| {
                    let unseen = registry.has_unseen(&thread);
                    let name = match registry.thread_kind(&thread) {
                        ThreadKind::Channel => format!("# {}", registry.display_name(&thread)),
                        ThreadKind::Chat => registry.display_name(&thread),
                    };
                    (thread, name, unseen)
                })
                .collect();
            threads
        };

        egui::SidePanel::left("threads_panel")
            .resizable(true)
            .show(ctx, |ui| {
                ui.heading("Conversations");
                ui.separator();
                let mut clicked: Option<ThreadRef> = None;
                for (thread, name, unseen) in &threads {
                    let text = if *unseen {
                        RichText::new(format!("{name} *")).color(self.theme.unread_separator)
                    } else {
                        RichText::new(name)
                    };
                    if ui.button(text).clicked() {
                        clicked = Some(thread.clone());
                    }
                }
                if let Some(thread) = clicked {
                    self.manager.open_window(thread, OpenSource::User);
                }
            });
    }

    fn render_center_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            if self.manager.is_discuss_active() {
                ui.heading("Discuss");
                ui.label(
                    RichText::new("Chat windows are closed while discuss is open.")
                        .color(self.theme.text_muted),
                );
            } else {
                ui.heading("Workspace");
                ui.label(
                    RichText::new("Open a conversation from the list to dock it here.")
                        .color(self.theme.text_muted),
                );
            }

            ui.separator();
            egui::CollapsingHeader::new("Diagnostics")
                .default_open(false)
                .show(ui, |ui| {
                    ScrollArea::vertical()
                        .id_salt("diagnostics_log")
                        .max_height(160.0)
                        .stick_to_bottom(true)
                        .show(ui, |ui| {
                            for entry in &self.diagnostics_log {
                                ui.label(RichText::new(entry).size(12.0));
                            }
                        });
                });
        });
    }
}

impl eframe::App for ChatDockApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if !self.visuals_applied {
            self.theme.apply_visuals(ctx);
            self.visuals_applied = true;
        }

        self.sync_viewport(ctx);
        self.manager.drain_inbound();

        self.render_top_bar(ctx);
        self.render_left_panel(ctx);
        self.render_center_panel(ctx);

        let errors = self.view.show(ctx, &mut self.manager, &self.theme);
        for error in errors {
            self.log_diagnostic(format!("action failed: {error}"));
        }
        self.collect_events();

        ctx.request_repaint_after(Duration::from_millis(250));
    }
}

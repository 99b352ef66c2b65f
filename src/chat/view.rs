use crate::chat::layout::LayoutMode;
use crate::chat::manager::{ChatWindowManager, HiddenMenuFrame, RenderFrame, WindowFrame};
use crate::chat::thread::ThreadRef;
use crate::event::{ChatKey, OpenSource};
use crate::theme::Theme;
use eframe::egui::{self, Align, Align2, Key, Layout, Modifiers, RichText, ScrollArea};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq)]
enum ViewAction {
    ToggleFold(ThreadRef),
    Close(ThreadRef),
    Key(ThreadRef, ChatKey),
    Focus(ThreadRef),
    Draft(ThreadRef, String),
    Scroll(ThreadRef, u32),
    Post(ThreadRef),
    RemoveAttachment(ThreadRef, String),
    OpenHidden(ThreadRef),
}

/// Draws the docked chat windows and feeds user input back to the manager.
#[derive(Debug, Default)]
pub struct ChatDockView {
    mounted_lists: BTreeSet<ThreadRef>,
    last_focus: Option<ThreadRef>,
}

impl ChatDockView {
    /// Renders one frame. Returns error lines for the diagnostics panel.
    pub fn show(
        &mut self,
        ctx: &egui::Context,
        manager: &mut ChatWindowManager,
        theme: &Theme,
    ) -> Vec<String> {
        let frame = manager.next_render();
        if frame.discuss_active {
            self.mounted_lists.clear();
            self.last_focus = None;
            return Vec::new();
        }

        let focus_changed = manager.focused() != self.last_focus.as_ref();
        self.last_focus = manager.focused().cloned();

        let mut actions = Vec::new();
        let mut still_mounted = BTreeSet::new();
        for window in &frame.windows {
            self.show_window(
                ctx,
                &frame,
                window,
                theme,
                focus_changed,
                &mut still_mounted,
                &mut actions,
            );
        }
        self.mounted_lists = still_mounted;

        if let Some(menu) = &frame.hidden_menu {
            show_hidden_menu(ctx, menu, theme, &mut actions);
        }

        actions
            .into_iter()
            .filter_map(|action| apply(manager, action).err())
            .collect()
    }

    #[allow(clippy::too_many_arguments)]
    fn show_window(
        &self,
        ctx: &egui::Context,
        frame: &RenderFrame,
        window: &WindowFrame,
        theme: &Theme,
        focus_changed: bool,
        still_mounted: &mut BTreeSet<ThreadRef>,
        actions: &mut Vec<ViewAction>,
    ) {
        let thread = &window.thread;
        let height = match frame.mode {
            LayoutMode::Compact if !window.folded => ctx.screen_rect().height(),
            _ => theme.window_height,
        };

        egui::Area::new(egui::Id::new(("chat_window", thread.model.as_str(), thread.id)))
            .anchor(Align2::RIGHT_BOTTOM, egui::vec2(-window.offset, 0.0))
            .show(ctx, |ui| {
                ui.set_width(window.width);
                theme.chat_window_frame(window.focused).show(ui, |ui| {
                    ui.set_width(window.width);
                    theme.header_frame(window.focused).show(ui, |ui| {
                        ui.set_min_height(theme.header_height - 12.0);
                        ui.horizontal(|ui| {
                            let title = RichText::new(&window.title).strong().color(
                                if window.focused {
                                    theme.text_on_accent
                                } else {
                                    theme.text_primary
                                },
                            );
                            if ui.add(egui::Label::new(title).sense(egui::Sense::click())).clicked() {
                                actions.push(ViewAction::ToggleFold(thread.clone()));
                            }
                            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                                if ui.small_button("x").clicked() {
                                    actions.push(ViewAction::Close(thread.clone()));
                                }
                                let fold_label = if window.folded { "^" } else { "_" };
                                if ui.small_button(fold_label).clicked() {
                                    actions.push(ViewAction::ToggleFold(thread.clone()));
                                }
                            });
                        });
                    });

                    if window.folded {
                        return;
                    }

                    let list_height = (height - theme.header_height - 56.0).max(80.0);
                    match &window.messages {
                        None => {
                            ui.add_sized(
                                [window.width, list_height],
                                egui::Label::new(RichText::new("Loading...").color(theme.text_muted)),
                            );
                        }
                        Some(messages) => {
                            let mut area = ScrollArea::vertical()
                                .id_salt(("chat_messages", thread.model.as_str(), thread.id))
                                .max_height(list_height)
                                .min_scrolled_height(list_height)
                                .auto_shrink([false, false]);
                            if !self.mounted_lists.contains(thread) {
                                if let Some(scroll_top) = window.scroll_top {
                                    area = area.vertical_scroll_offset(scroll_top as f32);
                                }
                            }
                            let output = area.show(ui, |ui| {
                                let separator_at = window.show_separator.then(|| {
                                    window
                                        .first_unread_message
                                        .and_then(|id| {
                                            messages.iter().position(|message| message.id == id)
                                        })
                                        .unwrap_or(messages.len().saturating_sub(1))
                                });
                                for (index, message) in messages.iter().enumerate() {
                                    if separator_at == Some(index) {
                                        ui.separator();
                                        ui.label(
                                            RichText::new("New messages")
                                                .color(theme.unread_separator)
                                                .size(11.0),
                                        );
                                    }
                                    ui.label(
                                        RichText::new(&message.author)
                                            .color(theme.text_muted)
                                            .size(12.0),
                                    );
                                    ui.label(&message.body);
                                    for attachment in &message.attachments {
                                        ui.label(
                                            RichText::new(format!("[{}]", attachment.name))
                                                .color(theme.accent_primary)
                                                .size(12.0),
                                        );
                                    }
                                    ui.add_space(theme.spacing_4);
                                }
                            });
                            still_mounted.insert(thread.clone());
                            let offset = output.state.offset.y.max(0.0).round() as u32;
                            if window.scroll_top != Some(offset) && self.mounted_lists.contains(thread) {
                                actions.push(ViewAction::Scroll(thread.clone(), offset));
                            }
                        }
                    }

                    theme.composer_frame().show(ui, |ui| {
                        for attachment in &window.attachments {
                            ui.horizontal(|ui| {
                                ui.label(
                                    RichText::new(format!("attached: {}", attachment.name))
                                        .color(theme.text_muted)
                                        .size(11.0),
                                );
                                if ui.small_button("x").clicked() {
                                    actions.push(ViewAction::RemoveAttachment(
                                        thread.clone(),
                                        attachment.name.clone(),
                                    ));
                                }
                            });
                        }
                        let mut draft = window.composer_draft.clone();
                        let response = ui.add(
                            egui::TextEdit::singleline(&mut draft)
                                .desired_width(f32::INFINITY)
                                .hint_text("Message..."),
                        );
                        if window.focused && focus_changed && !response.has_focus() {
                            response.request_focus();
                        }
                        if response.gained_focus() && !window.focused {
                            actions.push(ViewAction::Focus(thread.clone()));
                        }
                        if response.changed() {
                            actions.push(ViewAction::Draft(thread.clone(), draft));
                        }
                        if response.has_focus()
                            && ui.input_mut(|input| input.consume_key(Modifiers::NONE, Key::Tab))
                        {
                            actions.push(ViewAction::Key(thread.clone(), ChatKey::Tab));
                        }
                        if response.lost_focus() {
                            if ui.input(|input| input.key_pressed(Key::Enter)) {
                                actions.push(ViewAction::Post(thread.clone()));
                            } else if ui.input(|input| input.key_pressed(Key::Escape)) {
                                actions.push(ViewAction::Key(thread.clone(), ChatKey::Escape));
                            }
                        }
                    });
                });
            });
    }
}

fn show_hidden_menu(
    ctx: &egui::Context,
    menu: &HiddenMenuFrame,
    theme: &Theme,
    actions: &mut Vec<ViewAction>,
) {
    egui::Area::new(egui::Id::new("chat_hidden_menu"))
        .anchor(Align2::RIGHT_BOTTOM, egui::vec2(-menu.offset, 0.0))
        .show(ctx, |ui| {
            theme.menu_frame().show(ui, |ui| {
                let unread = menu.entries.iter().filter(|entry| entry.unread).count();
                let mut label = format!("+{}", menu.entries.len());
                if unread > 0 {
                    label.push_str(&format!(" ({unread})"));
                }
                ui.menu_button(label, |ui| {
                    for entry in &menu.entries {
                        let text = if entry.unread {
                            RichText::new(&entry.title).color(theme.unread_separator)
                        } else {
                            RichText::new(&entry.title)
                        };
                        if ui.button(text).clicked() {
                            actions.push(ViewAction::OpenHidden(entry.thread.clone()));
                            ui.close_menu();
                        }
                    }
                });
            });
        });
}

fn apply(manager: &mut ChatWindowManager, action: ViewAction) -> Result<(), String> {
    let result = match action {
        ViewAction::ToggleFold(thread) => manager.toggle_fold(&thread).map(|_| ()),
        ViewAction::Close(thread) => manager.close_window(&thread),
        ViewAction::Key(thread, key) => manager.handle_key(&thread, key),
        ViewAction::Focus(thread) => manager.focus_composer(&thread),
        ViewAction::Draft(thread, draft) => manager.set_composer_draft(&thread, draft),
        ViewAction::Scroll(thread, offset) => manager.set_scroll_top(&thread, Some(offset)),
        ViewAction::Post(thread) => manager.post_message(&thread).map(|_| ()),
        ViewAction::RemoveAttachment(thread, name) => manager.remove_attachment(&thread, &name),
        ViewAction::OpenHidden(thread) => {
            manager.open_window(thread, OpenSource::User);
            Ok(())
        }
    };
    result.map_err(|err| {
        log::warn!("chat window action failed: {err}");
        err.to_string()
    })
}

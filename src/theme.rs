use eframe::egui::{self, Color32, CornerRadius, FontId, Frame, Margin, Stroke, TextStyle};

/// Colours and metrics for the dock and its floating chat windows.
#[derive(Debug, Clone)]
pub struct Theme {
    pub panel_fill: Color32,
    pub window_fill: Color32,
    pub header_fill: Color32,
    pub header_focused_fill: Color32,
    pub composer_fill: Color32,
    pub accent_primary: Color32,
    pub text_primary: Color32,
    pub text_muted: Color32,
    pub text_on_accent: Color32,
    pub border_subtle: Color32,
    pub unread_separator: Color32,
    pub spacing_4: f32,
    pub spacing_8: f32,
    pub window_radius: u8,
    pub menu_radius: u8,
    pub header_height: f32,
    pub window_height: f32,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            panel_fill: Color32::from_rgb(0x16, 0x1A, 0x20),
            window_fill: Color32::from_rgb(0x1C, 0x22, 0x2B),
            header_fill: Color32::from_rgb(0x22, 0x2A, 0x35),
            header_focused_fill: Color32::from_rgb(0x2F, 0x6E, 0xD8),
            composer_fill: Color32::from_rgb(0x16, 0x1A, 0x20),
            accent_primary: Color32::from_rgb(0x3B, 0x82, 0xF6),
            text_primary: Color32::from_rgb(0xE6, 0xED, 0xF3),
            text_muted: Color32::from_rgb(0x8B, 0x94, 0x9E),
            text_on_accent: Color32::from_rgb(0xF8, 0xFB, 0xFF),
            border_subtle: Color32::from_rgba_premultiplied(255, 255, 255, 13),
            unread_separator: Color32::from_rgb(0xF5, 0x9E, 0x0B),
            spacing_4: 4.0,
            spacing_8: 8.0,
            window_radius: 8,
            menu_radius: 12,
            header_height: 36.0,
            window_height: 400.0,
        }
    }
}

impl Theme {
    pub fn apply_visuals(&self, ctx: &egui::Context) {
        let mut visuals = egui::Visuals::dark();
        visuals.panel_fill = self.panel_fill;
        visuals.window_fill = self.window_fill;
        visuals.window_stroke = Stroke::NONE;
        visuals.override_text_color = Some(self.text_primary);
        visuals.widgets.inactive.bg_fill = self.window_fill;
        visuals.widgets.inactive.bg_stroke = Stroke::NONE;
        visuals.widgets.hovered.bg_fill = self.header_fill;
        visuals.widgets.active.bg_fill = self.header_focused_fill;
        visuals.selection.bg_fill = self.header_focused_fill;

        let mut style = (*ctx.style()).clone();
        style.visuals = visuals;
        style.spacing.item_spacing = egui::vec2(self.spacing_8, self.spacing_4);
        style.text_styles.insert(TextStyle::Heading, FontId::proportional(16.0));
        style.text_styles.insert(TextStyle::Body, FontId::proportional(14.0));
        style.text_styles.insert(TextStyle::Small, FontId::proportional(12.0));
        ctx.set_style(style);
    }

    fn top_corners(&self) -> CornerRadius {
        CornerRadius {
            nw: self.window_radius,
            ne: self.window_radius,
            sw: 0,
            se: 0,
        }
    }

    /// Outer frame of a docked window; the focused one gets an accent border.
    pub fn chat_window_frame(&self, focused: bool) -> Frame {
        let border = if focused {
            self.accent_primary
        } else {
            self.border_subtle
        };
        Frame::new()
            .fill(self.window_fill)
            .inner_margin(Margin::same(0))
            .corner_radius(self.top_corners())
            .stroke(Stroke::new(1.0, border))
            .shadow(egui::epaint::Shadow {
                offset: [0, 4],
                blur: 18,
                spread: 0,
                color: Color32::from_rgba_premultiplied(0, 0, 0, 40),
            })
    }

    pub fn header_frame(&self, focused: bool) -> Frame {
        let fill = if focused {
            self.header_focused_fill
        } else {
            self.header_fill
        };
        Frame::new()
            .fill(fill)
            .inner_margin(Margin::symmetric(self.spacing_8 as i8, 6))
            .corner_radius(self.top_corners())
    }

    pub fn composer_frame(&self) -> Frame {
        Frame::new()
            .fill(self.composer_fill)
            .inner_margin(Margin::symmetric(self.spacing_8 as i8, 6))
    }

    pub fn menu_frame(&self) -> Frame {
        Frame::new()
            .fill(self.header_fill)
            .inner_margin(Margin::same(self.spacing_8 as i8))
            .corner_radius(CornerRadius::same(self.menu_radius))
    }
}

use eframe::egui::{self, Color32, CornerRadius, FontId, Frame, Margin, Stroke, TextStyle};

#[derive(Debug, Clone)]
pub struct Theme {
    pub surface_0: Color32,
    pub surface_1: Color32,
    pub surface_2: Color32,
    pub accent_primary: Color32,
    pub accent_muted: Color32,
    pub success: Color32,
    pub warning: Color32,
    pub danger: Color32,
    pub text_primary: Color32,
    pub text_muted: Color32,
    pub border_subtle: Color32,
    pub selection_ring: Color32,
    pub spacing_8: f32,
    pub spacing_12: f32,
    pub radius_8: u8,
    pub radius_12: u8,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            surface_0: Color32::from_rgb(0xFB, 0xF7, 0xF2),
            surface_1: Color32::from_rgb(0xF5, 0xEF, 0xE8),
            surface_2: Color32::from_rgb(0xEF, 0xE6, 0xDC),
            accent_primary: Color32::from_rgb(0xC2, 0x5B, 0x6E),
            accent_muted: Color32::from_rgb(0xA8, 0x4B, 0x5D),
            success: Color32::from_rgb(0x3E, 0x8E, 0x5A),
            warning: Color32::from_rgb(0xB0, 0x72, 0x1E),
            danger: Color32::from_rgb(0xC0, 0x3A, 0x2E),
            text_primary: Color32::from_rgb(0x3A, 0x32, 0x2C),
            text_muted: Color32::from_rgb(0x8A, 0x7F, 0x74),
            border_subtle: Color32::from_rgba_premultiplied(58, 50, 44, 18),
            selection_ring: Color32::from_rgb(0xC2, 0x5B, 0x6E),
            spacing_8: 8.0,
            spacing_12: 12.0,
            radius_8: 8,
            radius_12: 12,
        }
    }
}

impl Theme {
    pub fn apply_visuals(&self, ctx: &egui::Context) {
        let mut visuals = egui::Visuals::light();
        visuals.panel_fill = self.surface_0;
        visuals.override_text_color = Some(self.text_primary);
        visuals.widgets.noninteractive.bg_fill = self.surface_1;
        visuals.widgets.noninteractive.weak_bg_fill = self.surface_1;
        visuals.widgets.noninteractive.fg_stroke.color = self.text_primary;
        visuals.widgets.inactive.bg_fill = self.surface_1;
        visuals.widgets.inactive.weak_bg_fill = self.surface_1;
        visuals.widgets.inactive.fg_stroke.color = self.text_primary;
        visuals.widgets.hovered.bg_fill = self.surface_2;
        visuals.widgets.hovered.fg_stroke.color = self.text_primary;
        visuals.widgets.active.bg_fill = self.accent_muted;
        visuals.widgets.open.bg_fill = self.surface_2;
        visuals.selection.bg_fill = self.accent_primary.gamma_multiply(0.25);
        visuals.selection.stroke = Stroke::new(1.0, self.selection_ring);
        visuals.hyperlink_color = self.accent_primary;
        visuals.window_fill = self.surface_0;
        visuals.window_corner_radius = CornerRadius::same(self.radius_12);

        let mut style = (*ctx.style()).clone();
        style.visuals = visuals;
        style.spacing.item_spacing = egui::vec2(8.0, 8.0);
        style.spacing.button_padding = egui::vec2(12.0, 6.0);
        style
            .text_styles
            .insert(TextStyle::Heading, FontId::proportional(17.0));
        style
            .text_styles
            .insert(TextStyle::Body, FontId::proportional(14.0));
        style
            .text_styles
            .insert(TextStyle::Monospace, FontId::monospace(13.0));
        style
            .text_styles
            .insert(TextStyle::Small, FontId::proportional(12.0));
        ctx.set_style(style);
    }

    pub fn card_frame(&self) -> Frame {
        Frame::new()
            .fill(self.surface_1)
            .inner_margin(Margin::same(self.spacing_12 as i8))
            .corner_radius(CornerRadius::same(self.radius_12))
            .stroke(Stroke::new(1.0, self.border_subtle))
    }

    pub fn composer_frame(&self) -> Frame {
        Frame::new()
            .fill(self.surface_1)
            .inner_margin(Margin::symmetric(self.spacing_12 as i8, 8))
            .corner_radius(CornerRadius::same(self.radius_8))
            .stroke(Stroke::new(1.0, self.border_subtle))
    }
}

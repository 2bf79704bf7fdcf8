use egui::{Color32, FontFamily, FontId, TextStyle, Visuals};

/// Konfigurera applikationens utseende
pub fn configure_style(ctx: &egui::Context, dark_mode: bool) {
    let mut style = (*ctx.style()).clone();

    style.text_styles = [
        (TextStyle::Heading, FontId::new(22.0, FontFamily::Proportional)),
        (TextStyle::Body, FontId::new(14.0, FontFamily::Proportional)),
        (TextStyle::Monospace, FontId::new(13.0, FontFamily::Monospace)),
        (TextStyle::Button, FontId::new(14.0, FontFamily::Proportional)),
        (TextStyle::Small, FontId::new(11.0, FontFamily::Proportional)),
    ]
    .into();

    style.spacing.item_spacing = egui::vec2(8.0, 6.0);
    style.spacing.button_padding = egui::vec2(10.0, 5.0);
    style.spacing.window_margin = egui::Margin::same(14.0);

    style.visuals = if dark_mode { dark_visuals() } else { light_visuals() };

    ctx.set_style(style);
}

/// Bakgrund för trädets rityta
pub fn canvas_background(dark_mode: bool) -> Color32 {
    if dark_mode {
        Colors::CANVAS_DARK
    } else {
        Colors::CANVAS_LIGHT
    }
}

fn dark_visuals() -> Visuals {
    let mut visuals = Visuals::dark();

    visuals.panel_fill = Color32::from_rgb(31, 41, 55);
    visuals.window_fill = Color32::from_rgb(17, 24, 39);
    visuals.extreme_bg_color = Color32::from_rgb(24, 24, 28);

    // Accentfärg (blå)
    visuals.selection.bg_fill = Color32::from_rgb(37, 99, 235);
    visuals.hyperlink_color = Color32::from_rgb(96, 165, 250);

    visuals
}

fn light_visuals() -> Visuals {
    let mut visuals = Visuals::light();

    visuals.panel_fill = Color32::from_rgb(243, 244, 246);
    visuals.window_fill = Color32::WHITE;
    visuals.extreme_bg_color = Color32::from_rgb(249, 250, 251);

    // Accentfärg (blå)
    visuals.selection.bg_fill = Color32::from_rgb(191, 219, 254);
    visuals.hyperlink_color = Color32::from_rgb(37, 99, 235);

    visuals
}

/// Färgpalett för applikationen
pub struct Colors;

impl Colors {
    // Primär
    pub const PRIMARY: Color32 = Color32::from_rgb(59, 130, 246);

    // Framgång
    pub const SUCCESS: Color32 = Color32::from_rgb(34, 197, 94);

    // Varning
    pub const WARNING: Color32 = Color32::from_rgb(234, 179, 8);

    // Fel
    pub const ERROR: Color32 = Color32::from_rgb(239, 68, 68);

    // Info
    pub const INFO: Color32 = Color32::from_rgb(59, 130, 246);

    // Text
    pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(107, 114, 128);
    pub const TEXT_MUTED: Color32 = Color32::from_rgb(156, 163, 175);

    // Ritytan
    pub const CANVAS_LIGHT: Color32 = Color32::WHITE;
    pub const CANVAS_DARK: Color32 = Color32::from_rgb(24, 24, 28);
}

/// Ikoner (Unicode)
pub struct Icons;

impl Icons {
    pub const PEOPLE: &'static str = "👥";
    pub const TREE: &'static str = "🌳";
    pub const ADD: &'static str = "➕";
    pub const EDIT: &'static str = "✏";
    pub const DELETE: &'static str = "🗑";
    pub const ARROW_LEFT: &'static str = "←";
    pub const IMPORT: &'static str = "📥";
    pub const EXPORT: &'static str = "📤";
    pub const RESET: &'static str = "⟲";
}

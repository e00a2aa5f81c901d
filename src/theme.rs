//! Dark theme for the frameless window.

use egui::{Color32, Context, Rounding, Stroke};

pub const WINDOW_BG: Color32 = Color32::from_rgb(0x1e, 0x1e, 0x1e);
pub const INPUT_BG: Color32 = Color32::from_rgb(0x2e, 0x2e, 0x2e);
pub const INPUT_STROKE: Color32 = Color32::from_rgb(0x3e, 0x3e, 0x3e);
pub const BUTTON_BG: Color32 = Color32::WHITE;
pub const BUTTON_FG: Color32 = WINDOW_BG;
// rgba(0, 255, 0, 128), premultiplied.
pub const PROGRESS_FILL: Color32 = Color32::from_rgba_premultiplied(0, 128, 0, 128);
pub const RESTART_GREEN: Color32 = Color32::from_rgb(0x00, 0xff, 0x00);
pub const MINIMIZE_GOLD: Color32 = Color32::from_rgb(0xff, 0xd7, 0x00);
pub const CLOSE_RED: Color32 = Color32::from_rgb(0xff, 0x00, 0x00);

pub fn apply(ctx: &Context) {
    let mut visuals = egui::Visuals::dark();
    visuals.panel_fill = WINDOW_BG;
    visuals.window_fill = INPUT_BG;
    visuals.window_rounding = Rounding::same(10.0);
    visuals.extreme_bg_color = INPUT_BG;
    visuals.override_text_color = Some(Color32::WHITE);
    visuals.widgets.noninteractive.bg_stroke = Stroke::new(1.0, INPUT_STROKE);
    for widget in [
        &mut visuals.widgets.inactive,
        &mut visuals.widgets.hovered,
        &mut visuals.widgets.active,
        &mut visuals.widgets.open,
    ] {
        widget.rounding = Rounding::same(5.0);
    }
    ctx.set_visuals(visuals);
}

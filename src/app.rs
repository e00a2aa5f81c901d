//! The frameless window: title bar, main controls, settings panel, dialogs.

use std::time::Duration;

use egui::{
    Align2, Color32, Margin, RichText, Rounding, Vec2, ViewportCommand,
};
use log::error;

use crate::cleaner::{self, CleanJob, CleanerEvent, CleanerHandle};
use crate::paths::AppPaths;
use crate::platform;
use crate::settings::Settings;
use crate::theme;

const TITLE_BAR_HEIGHT: f32 = 36.0;
const MAIN_BUTTON_SIZE: Vec2 = Vec2::new(350.0, 50.0);
const SETTINGS_BUTTON_SIZE: Vec2 = Vec2::new(50.0, 50.0);

/// A pending yes/no question, shown as a modal window.
enum Confirm {
    Clean,
    RemoveDirectory(String),
    Reset,
}

pub struct InsomniaApp {
    paths: AppPaths,
    settings: Settings,
    new_directory: String,
    show_settings: bool,
    cleaner: Option<CleanerHandle>,
    progress: f32,
    pending_errors: Vec<String>,
    confirm: Option<Confirm>,
    notice: Option<String>,
    icon: Option<egui::TextureHandle>,
}

impl InsomniaApp {
    pub fn new(cc: &eframe::CreationContext<'_>, paths: AppPaths) -> Self {
        theme::apply(&cc.egui_ctx);
        let settings = Settings::load(&paths);
        let icon = load_icon_texture(&cc.egui_ctx, &paths);
        Self {
            paths,
            settings,
            new_directory: String::new(),
            show_settings: false,
            cleaner: None,
            progress: 0.0,
            pending_errors: Vec::new(),
            confirm: None,
            notice: None,
            icon,
        }
    }

    fn save_settings(&self) {
        if let Err(err) = self.settings.save(&self.paths) {
            error!("could not save settings: {err}");
        }
    }

    fn start_clean(&mut self) {
        self.progress = 0.0;
        self.cleaner = Some(cleaner::spawn(CleanJob::from_settings(&self.settings)));
    }

    /// Drain worker events; on `Finished`, run the post-clean steps.
    fn pump_worker(&mut self) {
        let mut finished = false;
        if let Some(handle) = &self.cleaner {
            while let Ok(event) = handle.try_recv() {
                match event {
                    CleanerEvent::Progress(percent) => {
                        self.progress = f32::from(percent) / 100.0;
                    }
                    CleanerEvent::Error(message) => {
                        error!("{message}");
                        self.pending_errors.push(message);
                    }
                    CleanerEvent::Finished => finished = true,
                }
            }
        }
        if finished {
            if let Some(handle) = self.cleaner.take() {
                handle.join();
            }
            self.finish_clean();
        }
    }

    fn finish_clean(&mut self) {
        if self.settings.move_to_trash && self.settings.clear_recycle_bin {
            match platform::empty_recycle_bin() {
                Ok(()) => {
                    self.notice = Some(
                        "File cleanup has been completed and the recycle bin has been emptied."
                            .to_owned(),
                    );
                }
                Err(err) => {
                    self.pending_errors.push(format!(
                        "File cleanup completed, but there was an error emptying the recycle bin: {err:#}"
                    ));
                }
            }
        } else {
            self.notice = Some("File cleanup has been completed.".to_owned());
        }
    }

    fn title_bar(&mut self, ui: &mut egui::Ui, rect: egui::Rect) {
        let response = ui.interact(rect, egui::Id::new("title-bar"), egui::Sense::click_and_drag());
        if response.drag_started_by(egui::PointerButton::Primary) {
            ui.ctx().send_viewport_cmd(ViewportCommand::StartDrag);
        }
        ui.allocate_new_ui(
            egui::UiBuilder::new()
                .max_rect(rect)
                .layout(egui::Layout::left_to_right(egui::Align::Center)),
            |ui| {
                if let Some(icon) = &self.icon {
                    ui.add(egui::Image::new(icon).fit_to_exact_size(Vec2::splat(24.0)));
                }
                ui.label(RichText::new("Insomnia").strong().size(24.0));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.add(circle_button("×", theme::CLOSE_RED)).clicked() {
                        ui.ctx().send_viewport_cmd(ViewportCommand::Close);
                    }
                    if ui.add(circle_button("—", theme::MINIMIZE_GOLD)).clicked() {
                        ui.ctx().send_viewport_cmd(ViewportCommand::Minimized(true));
                    }
                    ui.scope(|ui| {
                        ui.style_mut().visuals.widgets.inactive.weak_bg_fill =
                            theme::RESTART_GREEN;
                        ui.style_mut().visuals.widgets.hovered.weak_bg_fill =
                            theme::RESTART_GREEN;
                        ui.menu_button(RichText::new("⟳").color(Color32::BLACK), |ui| {
                            if ui.button("Restart App").clicked() {
                                ui.close_menu();
                                match platform::restart_app() {
                                    Ok(()) => ui.ctx().send_viewport_cmd(ViewportCommand::Close),
                                    Err(err) => error!("could not restart: {err}"),
                                }
                            }
                            if ui.button("Restart Computer").clicked() {
                                ui.close_menu();
                                if let Err(err) = platform::restart_computer() {
                                    error!("could not restart the computer: {err:#}");
                                }
                            }
                        });
                    });
                });
            },
        );
    }

    fn body(&mut self, ui: &mut egui::Ui) {
        ui.add_space(16.0);
        ui.horizontal(|ui| {
            let row_width = MAIN_BUTTON_SIZE.x + SETTINGS_BUTTON_SIZE.x + 10.0;
            ui.add_space((ui.available_width() - row_width).max(0.0) / 2.0);

            let main_button = egui::Button::new(
                RichText::new("Remove Temp Files")
                    .color(theme::BUTTON_FG)
                    .strong(),
            )
            .fill(theme::BUTTON_BG)
            .rounding(Rounding::same(5.0))
            .min_size(MAIN_BUTTON_SIZE);
            if ui.add_enabled(self.cleaner.is_none(), main_button).clicked() {
                self.confirm = Some(Confirm::Clean);
            }

            let settings_button =
                egui::Button::new(RichText::new("⚙").color(theme::BUTTON_FG).size(24.0))
                    .fill(theme::BUTTON_BG)
                    .rounding(Rounding::same(5.0))
                    .min_size(SETTINGS_BUTTON_SIZE);
            if ui.add(settings_button).clicked() {
                self.show_settings = !self.show_settings;
            }
        });

        if self.cleaner.is_some() {
            ui.add_space(8.0);
            ui.add(
                egui::ProgressBar::new(self.progress)
                    .desired_width(ui.available_width())
                    .fill(theme::PROGRESS_FILL)
                    .show_percentage(),
            );
        }

        if self.show_settings {
            ui.add_space(10.0);
            ui.separator();
            egui::ScrollArea::vertical().show(ui, |ui| {
                self.settings_panel(ui);
            });
        }
    }

    fn settings_panel(&mut self, ui: &mut egui::Ui) {
        let mut dirty = false;
        dirty |= ui
            .checkbox(&mut self.settings.skip_errors, "Skip errors")
            .changed();
        dirty |= ui
            .checkbox(&mut self.settings.move_to_trash, "Move files to trash")
            .changed();
        dirty |= ui
            .checkbox(&mut self.settings.clear_recycle_bin, "Clear recycle bin after")
            .changed();

        ui.add_space(6.0);
        let mut all_enabled = self.settings.all_directories_enabled();
        if ui.checkbox(&mut all_enabled, "Toggle all directories").changed() {
            for enabled in self.settings.directories.values_mut() {
                *enabled = all_enabled;
            }
            dirty = true;
        }

        let mut to_remove = None;
        for (directory, enabled) in self.settings.directories.iter_mut() {
            ui.horizontal(|ui| {
                if ui
                    .small_button("🗑")
                    .on_hover_text("Remove from settings")
                    .clicked()
                {
                    to_remove = Some(directory.clone());
                }
                dirty |= ui.checkbox(enabled, directory.as_str()).changed();
            });
        }
        if let Some(directory) = to_remove {
            self.confirm = Some(Confirm::RemoveDirectory(directory));
        }

        ui.add_space(6.0);
        ui.horizontal(|ui| {
            ui.text_edit_singleline(&mut self.new_directory);
            if ui.button("Add").clicked() {
                let directory = self.new_directory.trim().to_owned();
                if !directory.is_empty() && !self.settings.directories.contains_key(&directory) {
                    self.settings.directories.insert(directory, true);
                    self.new_directory.clear();
                    dirty = true;
                }
            }
        });

        ui.add_space(6.0);
        if ui.button("Reset Settings").clicked() {
            self.confirm = Some(Confirm::Reset);
        }

        if dirty {
            self.save_settings();
        }
    }

    fn dialogs(&mut self, ctx: &egui::Context) {
        if let Some(confirm) = self.confirm.take() {
            let (title, text) = match &confirm {
                Confirm::Clean => (
                    "Confirm Optimization",
                    "Are you sure you want to delete files in the selected directories?".to_owned(),
                ),
                Confirm::RemoveDirectory(directory) => (
                    "Confirm Deletion",
                    format!("Are you sure you want to remove '{directory}' from settings?"),
                ),
                Confirm::Reset => (
                    "Confirm Reset",
                    "Are you sure you want to reset settings to default?".to_owned(),
                ),
            };
            let mut decision = None;
            egui::Window::new(title)
                .collapsible(false)
                .resizable(false)
                .anchor(Align2::CENTER_CENTER, Vec2::ZERO)
                .show(ctx, |ui| {
                    ui.label(text);
                    ui.add_space(6.0);
                    ui.horizontal(|ui| {
                        if ui.button("Yes").clicked() {
                            decision = Some(true);
                        }
                        if ui.button("No").clicked() {
                            decision = Some(false);
                        }
                    });
                });
            match decision {
                Some(true) => self.apply_confirmed(confirm),
                Some(false) => {}
                None => self.confirm = Some(confirm),
            }
            return;
        }

        if !self.pending_errors.is_empty() {
            let message = self.pending_errors[0].clone();
            let mut acknowledged = false;
            egui::Window::new("Error")
                .collapsible(false)
                .resizable(false)
                .anchor(Align2::CENTER_CENTER, Vec2::ZERO)
                .show(ctx, |ui| {
                    ui.label(message);
                    ui.add_space(6.0);
                    if ui.button("OK").clicked() {
                        acknowledged = true;
                    }
                });
            if acknowledged {
                self.pending_errors.remove(0);
            }
            return;
        }

        if let Some(notice) = self.notice.clone() {
            let mut acknowledged = false;
            egui::Window::new("Insomnia")
                .collapsible(false)
                .resizable(false)
                .anchor(Align2::CENTER_CENTER, Vec2::ZERO)
                .show(ctx, |ui| {
                    ui.label(notice);
                    ui.add_space(6.0);
                    if ui.button("OK").clicked() {
                        acknowledged = true;
                    }
                });
            if acknowledged {
                self.notice = None;
            }
        }
    }

    fn apply_confirmed(&mut self, confirm: Confirm) {
        match confirm {
            Confirm::Clean => self.start_clean(),
            Confirm::RemoveDirectory(directory) => {
                self.settings.directories.remove(&directory);
                self.save_settings();
            }
            Confirm::Reset => {
                self.settings = Settings::fetch_default(&self.paths);
                self.notice = Some("Settings have been reset to default.".to_owned());
            }
        }
    }
}

impl eframe::App for InsomniaApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.pump_worker();
        if self.cleaner.is_some() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        let frame = egui::Frame::none()
            .fill(theme::WINDOW_BG)
            .rounding(Rounding::same(10.0))
            .inner_margin(Margin::same(10.0));
        egui::CentralPanel::default().frame(frame).show(ctx, |ui| {
            let app_rect = ui.max_rect();
            let title_bar_rect = {
                let mut rect = app_rect;
                rect.max.y = rect.min.y + TITLE_BAR_HEIGHT;
                rect
            };
            self.title_bar(ui, title_bar_rect);

            let content_rect = {
                let mut rect = app_rect;
                rect.min.y = title_bar_rect.max.y;
                rect
            }
            .shrink(4.0);
            let mut content_ui = ui.new_child(egui::UiBuilder::new().max_rect(content_rect));
            self.body(&mut content_ui);
        });

        self.dialogs(ctx);
    }

    // The corners outside the rounded frame stay transparent.
    fn clear_color(&self, _visuals: &egui::Visuals) -> [f32; 4] {
        egui::Rgba::TRANSPARENT.to_array()
    }
}

fn circle_button(label: &str, fill: Color32) -> egui::Button<'static> {
    egui::Button::new(RichText::new(label.to_owned()).color(Color32::BLACK).strong())
        .fill(fill)
        .rounding(Rounding::same(12.0))
        .min_size(Vec2::splat(25.0))
}

fn load_icon_texture(ctx: &egui::Context, paths: &AppPaths) -> Option<egui::TextureHandle> {
    let image = image::open(paths.icon_file()).ok()?.into_rgba8();
    let size = [image.width() as usize, image.height() as usize];
    let pixels = egui::ColorImage::from_rgba_unmultiplied(size, image.as_raw());
    Some(ctx.load_texture("app-icon", pixels, egui::TextureOptions::LINEAR))
}

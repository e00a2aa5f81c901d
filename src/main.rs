#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use eframe::egui;
use log::warn;

use insomnia::{AppPaths, InsomniaApp, logging, platform, updater};

fn main() -> Result<(), eframe::Error> {
    let paths = AppPaths::resolve();
    if let Err(err) = paths.ensure_tree() {
        eprintln!("could not create {}: {err}", paths.root.display());
    }
    if let Err(err) = logging::init(&paths) {
        eprintln!("could not install the logger: {err}");
    }

    // Deleting out of system temp directories needs admin rights; relaunch
    // through UAC and let the elevated process take over.
    if std::env::var_os("INSOMNIA_NO_ELEVATE").is_none() && !platform::is_elevated() {
        match platform::relaunch_elevated() {
            Ok(()) => return Ok(()),
            Err(err) => warn!("continuing without elevation: {err:#}"),
        }
    }

    if let Err(err) = updater::run(&paths) {
        warn!("self-update failed: {err:#}");
    }

    let mut viewport = egui::ViewportBuilder::default()
        .with_inner_size([500.0, 400.0])
        .with_decorations(false)
        .with_transparent(true)
        .with_resizable(false);
    if let Some(icon) = load_window_icon(&paths) {
        viewport = viewport.with_icon(icon);
    }
    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        "Insomnia",
        options,
        Box::new(move |cc| Ok(Box::new(InsomniaApp::new(cc, paths)))),
    )
}

fn load_window_icon(paths: &AppPaths) -> Option<egui::IconData> {
    let image = image::open(paths.icon_file()).ok()?.into_rgba8();
    let (width, height) = image.dimensions();
    Some(egui::IconData {
        rgba: image.into_raw(),
        width,
        height,
    })
}

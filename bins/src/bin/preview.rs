// SPDX-License-Identifier: GPL-3.0-or-later

//!
//! The spell cards preview window
//!

use clap::Parser;
use eframe::egui::{self, ScrollArea, ViewportBuilder};
use simplelog::{
    ColorChoice, CombinedLogger, ConfigBuilder, LevelFilter, TermLogger, TerminalMode,
};
use spellcards_core::{DesignConfig, Spell};
use spellcards_renderer::SpellCardPreviewEgui;
use spellcards_repository::{
    Config, RepositoryError, load_design_or_default, load_spells_if_exists,
};
use std::path::PathBuf;

#[macro_use]
extern crate log;
extern crate simplelog;

const WINDOW_WIDTH: f32 = 1100.0;
const WINDOW_HEIGHT: f32 = 600.0;

/// Preview window args using [clap]
#[derive(Parser, Debug)]
#[command(version, about = "Spell cards: preview the card design")]
struct PreviewArgs {
    /// Use this config file instead of the default one
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log more
    #[arg(long, short)]
    verbose: bool,
}

impl PreviewArgs {
    fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }

    fn load_config(&self) -> Result<Config, RepositoryError> {
        match &self.config {
            Some(path) => Config::load_from_path(path),
            None => Config::ensure_setup(),
        }
    }
}

/// Shows preview cards for the configured design & preview spells
struct PreviewApp {
    config: Config,
    design: DesignConfig,
    spells: Vec<Spell>,
    preview: SpellCardPreviewEgui,
    error: Option<String>,
}

impl PreviewApp {
    fn new(ctx: &egui::Context, config: Config) -> Self {
        let preview = SpellCardPreviewEgui::new(ctx).with_assets_dir(config.assets_dir.clone());
        let mut app = Self {
            config,
            design: DesignConfig::default(),
            spells: Vec::new(),
            preview,
            error: None,
        };
        app.reload();
        app
    }

    /// Re-read the design & preview spells from disk
    fn reload(&mut self) {
        info!("Reloading the design and preview spells");
        self.design = load_design_or_default(&self.config.design_path);
        match load_spells_if_exists(&self.config.preview_spells_path) {
            Ok(spells) => {
                self.spells = spells;
                self.error = None;
            }
            Err(error) => {
                warn!("Couldn't load the preview spells: {error}");
                self.spells.clear();
                self.error = Some(error.to_string());
            }
        }
    }
}

impl eframe::App for PreviewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("Reload").clicked() {
                    self.reload();
                }
                ui.label(format!("Design: {}", self.config.design_path.display()));
            });
        });
        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(error) = &self.error {
                ui.colored_label(egui::Color32::RED, error);
            }
            if self.spells.is_empty() {
                ui.label("No preview spells to show");
                return;
            }
            ScrollArea::horizontal().show(ui, |ui| {
                self.preview.draw(ui, &self.design, &self.spells);
            });
        });
    }
}

/// Entry point for the preview window
fn main() -> Result<(), eframe::Error> {
    let args = PreviewArgs::parse();

    // Setup logging
    let config_log = ConfigBuilder::new()
        .add_filter_allow_str("spellcards")
        .build();

    if let Err(error) = CombinedLogger::init(vec![TermLogger::new(
        args.log_level(),
        config_log,
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]) {
        eprintln!("Error setting up logging: {error}");
    }

    let config = match args.load_config() {
        Ok(config) => config,
        Err(error) => {
            eprintln!("Error loading config: {error}");
            std::process::exit(1);
        }
    };

    // Setup the main window's default options
    let options = eframe::NativeOptions {
        viewport: ViewportBuilder::default().with_inner_size([WINDOW_WIDTH, WINDOW_HEIGHT]),
        ..Default::default()
    };

    info!("Launching preview");

    eframe::run_native(
        "Spell cards preview",
        options,
        Box::new(|cc| Ok(Box::new(PreviewApp::new(&cc.egui_ctx, config)))),
    )
}

#[cfg(test)]
mod test {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn quiet_by_default() {
        let args = PreviewArgs::parse_from(["preview"]);
        assert_eq!(args.log_level(), LevelFilter::Info);
        assert!(args.config.is_none());

        let args = PreviewArgs::parse_from(["preview", "-v"]);
        assert_eq!(args.log_level(), LevelFilter::Debug);
    }

    #[test]
    fn config_from_path() {
        let dir = TempDir::new("spellcards").unwrap();
        let path = dir.path().join("config.json");
        Config::in_dir(dir.path()).save_to_path(&path).unwrap();

        let path_arg = path.to_string_lossy().to_string();
        let args = PreviewArgs::parse_from(["preview", "--config", path_arg.as_str()]);
        let config = args.load_config().unwrap();
        assert_eq!(config.design_path, dir.path().join("design.json"));

        let args = PreviewArgs::parse_from(["preview", "--config", "/nonexistent/config.json"]);
        assert!(args.load_config().is_err());
    }
}

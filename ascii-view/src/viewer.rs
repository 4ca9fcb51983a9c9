//! Interactive ASCII tree viewer built with eframe/egui.
//!
//! This module defines [`Viewer`], which owns the generation parameters
//! and the latest rendering, and implements [`eframe::App`] to collect
//! parameters and show the composited picture.

use ascii_core::{
    AsciiTree, Config, GrassConfig, Preset, Rendering, export,
    layer::Grid,
};
use eframe::App;
use std::path::PathBuf;

/// Main application state for the viewer.
///
/// Any parameter change is applied by regenerating from scratch; there is
/// no partial re-render.
///
/// ### Fields
/// - `preset` - Shaping profile used for the next generation.
/// - `cfg` - Generation configuration (size, depth limit, strictness).
/// - `seed` - Seed of the next generation; the same seed redraws the same tree.
/// - `grass_enabled` / `grass` - Whether and how to add the ground layer.
///
/// - `picture` - Composited output of the last successful generation.
/// - `text` - `picture` as display text.
/// - `stats` - Node, silhouette and coverage counts for the status bar.
///
/// - `last_error` - Message of the last failed generation or export.
/// - `last_export` - Path of the last exported file.
pub struct Viewer {
    preset: Preset,
    cfg: Config,
    seed: u64,
    grass_enabled: bool,
    grass: GrassConfig,

    picture: Option<Grid<char>>,
    text: String,
    stats: Stats,

    last_error: Option<String>,
    last_export: Option<PathBuf>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
struct Stats {
    nodes: usize,
    silhouette_points: usize,
    covered: usize,
}

impl Viewer {
    /// Creates a viewer showing an oak grown from a random seed.
    pub fn new() -> Self {
        let mut viewer = Self {
            preset: Preset::default(),
            cfg: Config::default(),
            seed: rand::random(),
            grass_enabled: true,
            grass: GrassConfig::default(),
            picture: None,
            text: String::new(),
            stats: Stats::default(),
            last_error: None,
            last_export: None,
        };
        viewer.regenerate();
        viewer
    }

    /// Configuration the next generation will run with.
    fn effective_config(&self) -> Config {
        Config {
            seed: Some(self.seed),
            grass: self.grass_enabled.then(|| self.grass.clone()),
            ..self.cfg.clone()
        }
    }

    fn generate(&self) -> ascii_core::Result<Rendering> {
        AsciiTree::from_preset(self.preset, self.effective_config())?.generate()
    }

    /// Regenerates the picture from the current parameters.
    ///
    /// On failure the previous picture stays on screen and the error is
    /// shown in the status bar.
    fn regenerate(&mut self) {
        match self.generate() {
            Ok(rendering) => {
                let picture = rendering.picture();
                self.text = rendering.to_text();
                self.stats = Stats {
                    nodes: rendering.tree.len(),
                    silhouette_points: rendering.silhouette.len(),
                    covered: picture.count_filled(),
                };
                self.picture = Some(picture);
                self.last_error = None;
            }
            Err(e) => {
                tracing::warn!(error = %e, "generation failed");
                self.last_error = Some(e.to_string());
            }
        }
    }

    /// Picks a new random seed and regenerates.
    fn reroll(&mut self) {
        self.seed = rand::random();
        self.regenerate();
    }

    /// Writes the current picture under `trees/` with a timestamped name.
    fn export(&mut self) {
        let Some(picture) = &self.picture else {
            return;
        };
        match export::export(picture, None, false) {
            Ok(path) => {
                self.last_export = Some(path);
                self.last_error = None;
            }
            Err(e) => {
                tracing::warn!(error = %e, "export failed");
                self.last_error = Some(e.to_string());
            }
        }
    }

    /// Helper to draw a labeled `usize` [`egui::DragValue`].
    fn labeled_drag_usize(
        ui: &mut egui::Ui,
        label: &str,
        value: &mut usize,
        range: std::ops::RangeInclusive<usize>,
        speed: f64,
    ) -> bool {
        ui.horizontal(|ui| {
            ui.label(label);
            ui.add(egui::DragValue::new(value).range(range).speed(speed))
                .changed()
        })
        .inner
    }

    /// Helper to draw a labeled `u32` [`egui::DragValue`].
    fn labeled_drag_u32(
        ui: &mut egui::Ui,
        label: &str,
        value: &mut u32,
        range: std::ops::RangeInclusive<u32>,
        speed: f64,
    ) -> bool {
        ui.horizontal(|ui| {
            ui.label(label);
            ui.add(egui::DragValue::new(value).range(range).speed(speed))
                .changed()
        })
        .inner
    }

    /// Builds the top panel UI (generate, reroll, export).
    fn ui_top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("⟳ Generate").clicked() {
                    self.regenerate();
                }

                if ui.button("🎲 New seed").clicked() {
                    self.reroll();
                }

                ui.separator();

                if ui
                    .add_enabled(self.picture.is_some(), egui::Button::new("💾 Export"))
                    .clicked()
                {
                    self.export();
                }
            });
        });
    }

    /// Builds the bottom status bar (counts, export path, errors).
    fn ui_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(format!("covered = {}", self.stats.covered));
                ui.label(format!("silhouette = {}", self.stats.silhouette_points));
                ui.label(format!("nodes = {}", self.stats.nodes));
                ui.separator();
                if let Some(err) = &self.last_error {
                    ui.colored_label(egui::Color32::LIGHT_RED, err);
                } else if let Some(path) = &self.last_export {
                    ui.label(format!("saved {}", path.display()));
                }
            });
        });
    }

    /// Builds the right-hand configuration panel.
    fn ui_config_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("config_panel")
            .resizable(true)
            .default_width(220.0)
            .show(ctx, |ui| {
                ui.heading("Config");
                let mut changed = false;

                ui.separator();
                egui::ComboBox::from_label("preset")
                    .selected_text(self.preset.name())
                    .show_ui(ui, |ui| {
                        for preset in Preset::ALL {
                            changed |= ui
                                .selectable_value(&mut self.preset, preset, preset.name())
                                .changed();
                        }
                    });

                ui.separator();
                ui.label("Size");
                changed |= Self::labeled_drag_usize(ui, "rows:", &mut self.cfg.size.0, 1..=200, 1.0);
                changed |= Self::labeled_drag_usize(ui, "cols:", &mut self.cfg.size.1, 1..=400, 1.0);

                ui.separator();
                ui.label("Growth");
                ui.horizontal(|ui| {
                    ui.label("seed:");
                    changed |= ui.add(egui::DragValue::new(&mut self.seed)).changed();
                });
                changed |= Self::labeled_drag_usize(
                    ui,
                    "max_depth:",
                    &mut self.cfg.max_depth,
                    1..=1024,
                    1.0,
                );
                changed |= ui
                    .checkbox(&mut self.cfg.enforce_offset_count, "strict offsets")
                    .changed();

                ui.separator();
                changed |= ui.checkbox(&mut self.grass_enabled, "Grass").changed();
                ui.add_enabled_ui(self.grass_enabled, |ui| {
                    changed |= Self::labeled_drag_u32(
                        ui,
                        "max_height:",
                        &mut self.grass.max_height,
                        0..=50,
                        0.2,
                    );
                    changed |= Self::labeled_drag_usize(
                        ui,
                        "smoothing:",
                        &mut self.grass.iterations,
                        0..=50,
                        0.2,
                    );
                });

                ui.separator();
                if ui.button("Reset cfg to default").clicked() {
                    self.cfg = Config::default();
                    self.grass = GrassConfig::default();
                    changed = true;
                }

                if changed {
                    self.regenerate();
                }
            });
    }

    /// Builds the central panel showing the picture in a monospace font.
    fn ui_central_panel(&self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::both().show(ui, |ui| {
                ui.label(egui::RichText::new(&self.text).monospace());
            });
        });
    }
}

impl Default for Viewer {
    fn default() -> Self {
        Self::new()
    }
}

impl App for Viewer {
    /// eframe callback that builds all UI panels for each frame.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ui_top_panel(ctx);
        self.ui_status_bar(ctx);
        self.ui_config_panel(ctx);
        self.ui_central_panel(ctx);
    }
}

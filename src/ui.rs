use egui_plot::{Line, PlotPoints};

use crate::grid::Cell;
use crate::simulation::{Command, Param, RuleConfig, RuleKind};
use crate::stats::Stats;

/// Everything the UI can ask of the application in one frame: engine
/// commands plus app-level actions that never reach the engine.
#[derive(Debug, Default)]
pub struct UiActions {
    pub commands: Vec<Command>,
    pub toggle_pause: bool,
    pub step_once: bool,
    pub reset_camera: bool,
}

/// Persistent state for the egui overlay.
pub struct UiState {
    pub show_sidebar: bool,
    pub show_stats: bool,
    /// Brush block radius (side = 2r + 1).
    pub brush_radius: u32,
    /// What the left mouse button paints.
    pub brush_material: Cell,
    /// Density used by the Randomize button.
    pub density: f64,
}

impl UiState {
    pub fn new() -> Self {
        Self {
            show_sidebar: true,
            show_stats: true,
            brush_radius: 1,
            brush_material: Cell::Alive,
            density: 0.2,
        }
    }
}

impl Default for UiState {
    fn default() -> Self {
        Self::new()
    }
}

/// Draw the overlay and collect whatever the user triggered.
pub fn draw_ui(
    ctx: &egui::Context,
    state: &mut UiState,
    running: bool,
    generation: u64,
    config: &RuleConfig,
    stats: &Stats,
    grid_width: u32,
    grid_height: u32,
) -> UiActions {
    let mut actions = UiActions::default();

    // ── Top menu bar ──
    egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
        egui::menu::bar(ui, |ui| {
            ui.menu_button("Simulation", |ui| {
                let label = if running { "⏸ Pause" } else { "▶ Resume" };
                if ui.button(label).clicked() {
                    actions.toggle_pause = true;
                    ui.close_menu();
                }
                if ui.add_enabled(!running, egui::Button::new("→ Step")).clicked() {
                    actions.step_once = true;
                    ui.close_menu();
                }
                ui.separator();
                if ui.button("🎲 Randomize").clicked() {
                    actions.commands.push(Command::Randomize(state.density));
                    ui.close_menu();
                }
                if ui.button("🗑 Clear").clicked() {
                    actions.commands.push(Command::Clear);
                    ui.close_menu();
                }
            });

            ui.menu_button("View", |ui| {
                if ui.button("🏠 Reset View (H)").clicked() {
                    actions.reset_camera = true;
                    ui.close_menu();
                }
                ui.separator();
                ui.checkbox(&mut state.show_sidebar, "Show Sidebar");
                ui.checkbox(&mut state.show_stats, "Show Stats Panel");
            });
        });
    });

    // ── Left sidebar ──
    if state.show_sidebar {
        egui::SidePanel::left("sidebar")
            .default_width(230.0)
            .show(ctx, |ui| {
                ui.heading("GroveLife");
                ui.separator();

                ui.label(format!(
                    "Status: {}",
                    if running { "▶ Running" } else { "⏸ Paused" }
                ));
                ui.label(format!("Generation: {generation}"));
                ui.label(format!("Grid: {grid_width} × {grid_height}"));
                ui.separator();

                // ── Game of Life rule ──
                let mut life_enabled = config.life.enabled;
                if ui.checkbox(&mut life_enabled, "Game of Life").changed() {
                    actions.commands.push(Command::ToggleRule(RuleKind::Life));
                }
                param_slider(
                    ui,
                    &mut actions,
                    config,
                    Param::ConversionChance,
                    "Tree conversion",
                );
                param_slider(
                    ui,
                    &mut actions,
                    config,
                    Param::SurvivalChance,
                    "Survival gate",
                );
                ui.separator();

                // ── Tree rule ──
                let mut tree_enabled = config.tree.enabled;
                if ui.checkbox(&mut tree_enabled, "Tree Growth").changed() {
                    actions.commands.push(Command::ToggleRule(RuleKind::Tree));
                }
                param_slider(ui, &mut actions, config, Param::SpreadChance, "Spread chance");
                param_slider(
                    ui,
                    &mut actions,
                    config,
                    Param::SpontaneousChance,
                    "Spontaneous",
                );
                param_slider(ui, &mut actions, config, Param::SpreadRadius, "Spread radius");
                ui.separator();

                // ── Brush ──
                ui.label("Brush");
                ui.add(egui::Slider::new(&mut state.brush_radius, 0..=10).text("Radius"));
                ui.horizontal(|ui| {
                    ui.radio_value(&mut state.brush_material, Cell::Alive, "Alive");
                    ui.radio_value(&mut state.brush_material, Cell::Tree, "Tree");
                });
                ui.label("Left paints, right erases");
                ui.separator();

                // ── Randomize density ──
                ui.add(egui::Slider::new(&mut state.density, 0.0..=1.0).text("Fill density"));
                ui.separator();

                // ── Quick stats ──
                ui.label(format!("Alive: {}", stats.latest_alive()));
                ui.label(format!("Trees: {}", stats.latest_trees()));
                ui.label(format!("Occupancy: {:.1}%", stats.latest_density() * 100.0));
                ui.label(format!("Ticks/sec: {:.0}", stats.tick_rate()));
            });
    }

    // ── Bottom stats panel with plot ──
    if state.show_stats {
        egui::TopBottomPanel::bottom("stats_panel")
            .default_height(160.0)
            .show(ctx, |ui| {
                ui.label("Population History");

                let alive = Line::new(PlotPoints::new(stats.alive_history())).name("Alive");
                let trees = Line::new(PlotPoints::new(stats.tree_history())).name("Trees");

                egui_plot::Plot::new("pop_plot")
                    .height(120.0)
                    .allow_drag(false)
                    .allow_zoom(false)
                    .allow_scroll(false)
                    .show_axes(true)
                    .show(ui, |plot_ui| {
                        plot_ui.line(alive);
                        plot_ui.line(trees);
                    });
            });
    }

    actions
}

/// Slider bound to one rule parameter; emits a clamped SetParam on change.
fn param_slider(
    ui: &mut egui::Ui,
    actions: &mut UiActions,
    config: &RuleConfig,
    param: Param,
    label: &str,
) {
    let (lo, hi) = param.range();
    let mut value = config.get(param);
    let slider = if param == Param::SpreadRadius {
        egui::Slider::new(&mut value, lo..=hi).integer().text(label)
    } else {
        egui::Slider::new(&mut value, lo..=hi).text(label)
    };
    if ui.add(slider).changed() {
        actions.commands.push(Command::SetParam(param, value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ui_state_initializes_defaults() {
        let state = UiState::new();
        assert!(state.show_sidebar);
        assert!(state.show_stats);
        assert_eq!(state.brush_radius, 1);
        assert_eq!(state.brush_material, Cell::Alive);
    }

    #[test]
    fn ui_actions_default_is_empty() {
        let actions = UiActions::default();
        assert!(actions.commands.is_empty());
        assert!(!actions.toggle_pause);
        assert!(!actions.step_once);
    }
}

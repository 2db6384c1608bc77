mod app;
mod camera;
mod grid;
mod kernel;
mod renderer;
mod sampler;
mod simulation;
mod stats;
mod ui;

use winit::event_loop::EventLoop;

fn main() {
    env_logger::init();

    log::info!("GroveLife - Game of Life crossed with tree growth");
    log::info!("Controls:");
    log::info!("  Space       - Pause / Resume");
    log::info!("  Right Arrow - Step (when paused)");
    log::info!("  Left Mouse  - Paint (brush material from sidebar)");
    log::info!("  Right Mouse - Erase");
    log::info!("  Middle Drag - Pan");
    log::info!("  Scroll      - Zoom at cursor");
    log::info!("  H           - Reset view");
    log::info!("  R           - Randomize grid");
    log::info!("  C           - Clear grid");
    log::info!("  Escape      - Quit");
    log::info!("  Use the menu bar and sidebar for rule parameters.");

    let event_loop = EventLoop::new().expect("Failed to create event loop");
    let mut app = app::App::new();
    event_loop.run_app(&mut app).expect("Event loop error");
}

//! Application entry point for the ASCII tree viewer.
//!
//! This binary sets up logging and eframe/egui and delegates all
//! interactive logic and rendering to [`Viewer`] from the `viewer` module.

mod viewer;

use tracing_subscriber::EnvFilter;
use viewer::Viewer;

/// Starts the native eframe application.
///
/// ### Returns
/// - `Ok(())` if the application runs to completion without errors.
/// - `Err` if eframe fails to create the native window or event loop.
fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("ascii_core=info,ascii_view=info")),
        )
        .init();

    let options = eframe::NativeOptions::default();

    eframe::run_native(
        "ASCII Tree",
        options,
        Box::new(|_cc| Ok(Box::new(Viewer::new()))),
    )
}

//! Desktop dashboard with egui/eframe

mod app;
pub mod components;
mod state;
mod theme;

pub use app::ReceptionistApp;
pub use state::{DashboardState, RecordTab, Selection};
pub use theme::Theme;

use crate::audio::AudioBackend;
use crate::config::AppConfig;

/// Devices used for live calls
#[cfg(feature = "audio-io")]
fn default_audio_backend() -> Box<dyn AudioBackend> {
    Box::new(crate::audio::CpalBackend)
}

#[cfg(not(feature = "audio-io"))]
fn default_audio_backend() -> Box<dyn AudioBackend> {
    Box::new(crate::audio::UnavailableBackend)
}

/// Run the dashboard until the window is closed
pub fn run(config: AppConfig) -> eframe::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 820.0])
            .with_min_inner_size([720.0, 520.0])
            .with_title("Heritage Cafe Receptionist"),
        ..Default::default()
    };

    eframe::run_native(
        "Heritage Cafe Receptionist",
        options,
        Box::new(move |cc| {
            let app = ReceptionistApp::new(cc, config, default_audio_backend())?;
            Ok(Box::new(app))
        }),
    )
}

use diagrams_core::{DiagramHost, Layout, PollOutcome};
use eframe::egui;
use std::path::PathBuf;
use std::time::Duration;

mod notifications;
mod rendering;
mod windows;

use notifications::NotificationHandler;

pub use rendering::export_view;

#[derive(Debug, Clone)]
pub struct GuiConfig {
    pub title: String,
    pub width: f32,
    pub height: f32,
    /// Directory that "Export PNG" writes into.
    pub export_dir: PathBuf,
}

impl Default for GuiConfig {
    fn default() -> Self {
        Self {
            title: "Reactor Diagrams".to_string(),
            width: 1280.0,
            height: 720.0,
            export_dir: PathBuf::from("."),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum GuiError {
    #[error("gui error: {0}")]
    Gui(String),
    #[error("export failed: {0}")]
    Export(String),
}

/// Runs the diagram host window until the user closes it.
///
/// `host` must already be wired to a running producer; every UI frame polls
/// it and refreshes the open diagrams when a new tick arrived.
pub fn run_gui(config: GuiConfig, layout: Layout, host: DiagramHost) -> Result<(), GuiError> {
    let mut options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([config.width, config.height]),
        ..Default::default()
    };
    // NOTE: Vsync generates hangs and lag on occluded windows.
    options.vsync = false;

    let title = config.title.clone();
    eframe::run_native(
        &title,
        options,
        Box::new(move |cc| {
            cc.egui_ctx.set_visuals(if layout.display.dark_theme {
                egui::Visuals::dark()
            } else {
                egui::Visuals::light()
            });
            Box::new(GuiApp::new(config, layout, host))
        }),
    )
    .map_err(|err| GuiError::Gui(err.to_string()))
}

struct GuiApp {
    config: GuiConfig,
    layout: Layout,
    host: DiagramHost,
    notification_handler: NotificationHandler,
    status: String,
}

impl GuiApp {
    fn new(config: GuiConfig, layout: Layout, host: DiagramHost) -> Self {
        Self {
            config,
            layout,
            host,
            notification_handler: NotificationHandler::new(),
            status: "Waiting for data".to_string(),
        }
    }

    fn poll_host(&mut self) {
        match self.host.poll() {
            PollOutcome::Idle => {}
            PollOutcome::Updated { tick, report } => {
                self.status = format!("tick {} at {:.2} s", tick.tick, tick.time_s);
                for (name, err) in report.failed {
                    self.notification_handler
                        .show_info(&format!("Update failed: {name}"), &err.to_string());
                }
            }
            PollOutcome::ProducerStopped => {
                self.status = "Producer stopped".to_string();
                self.notification_handler
                    .show_info("Producer stopped", "No new values will arrive.");
            }
        }
    }

    fn repaint_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.layout.display.refresh_hz.max(1.0))
    }
}

impl eframe::App for GuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_host();
        self.notification_handler.cleanup_old_notifications();

        self.render_diagram_list(ctx);
        self.render_central_panel(ctx);
        self.render_diagram_windows(ctx);
        self.render_notifications(ctx);

        ctx.request_repaint_after(self.repaint_interval());
    }
}

//! Side panel with the layout's diagrams and one `egui::Window` per open frame.

use super::*;
use crate::notifications::NOTIFICATION_TTL;
use crate::rendering::render_view;
use diagrams_core::{OpenOutcome, PlotName, PlotView};

const EXPORT_SIZE: (u32, u32) = (1200, 700);

fn window_id(name: &PlotName) -> egui::Id {
    egui::Id::new(("diagram_window", name.as_str()))
}

fn export_file_name(title: &str) -> String {
    let stem: String = title
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("{stem}.png")
}

impl GuiApp {
    pub(super) fn render_diagram_list(&mut self, ctx: &egui::Context) {
        let mut to_open = None;
        egui::SidePanel::left("diagram_list")
            .resizable(false)
            .default_width(220.0)
            .show(ctx, |ui| {
                ui.heading("Diagrams");
                ui.separator();
                if self.layout.diagrams.is_empty() {
                    ui.label("No diagrams in layout");
                }
                for (idx, diagram) in self.layout.diagrams.iter().enumerate() {
                    let name = diagram.plot_name();
                    let is_open = self.host.registry().contains(&name);
                    if ui.selectable_label(is_open, name.as_str()).clicked() {
                        to_open = Some(idx);
                    }
                }
                ui.separator();
                ui.label(&self.status);
            });
        if let Some(idx) = to_open {
            self.open_diagram(idx);
        }
    }

    fn open_diagram(&mut self, idx: usize) {
        let Some(config) = self.layout.diagrams.get(idx) else {
            return;
        };
        match self.host.open(config) {
            Ok(OpenOutcome::Opened(name)) => {
                // Show data right away instead of waiting for the next tick.
                if let Some(frame) = self.host.registry_mut().get_mut(&name) {
                    if let Err(err) = frame.update_plots() {
                        log::warn!("first update of {name} failed: {err}");
                    }
                }
            }
            Ok(OpenOutcome::Reused(_)) => {}
            Err(err) => {
                self.notification_handler
                    .show_info(&format!("Cannot open {}", config.plot_name()), &err.to_string());
            }
        }
    }

    pub(super) fn render_central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let registry = self.host.registry();
            ui.label(format!("{} diagram window(s) open", registry.len()));
            if !self.host.producer_connected() {
                ui.colored_label(egui::Color32::from_rgb(220, 122, 95), "Producer stopped");
            }
        });
    }

    pub(super) fn render_diagram_windows(&mut self, ctx: &egui::Context) {
        for name in self.host.registry_mut().take_focus_requests() {
            ctx.move_to_top(egui::LayerId::new(egui::Order::Middle, window_id(&name)));
        }

        let mut closed = Vec::new();
        let mut exports: Vec<PlotView> = Vec::new();
        for name in self.host.registry().names() {
            let Some(view) = self.host.registry().get(&name).map(|frame| frame.view()) else {
                continue;
            };
            let mut open = true;
            egui::Window::new(name.as_str())
                .id(window_id(&name))
                .open(&mut open)
                .default_size([480.0, 320.0])
                .show(ctx, |ui| {
                    ui.horizontal(|ui| {
                        if ui.button("Export PNG").clicked() {
                            exports.push(view.clone());
                        }
                    });
                    render_view(ui, &format!("plot_{name}"), &view);
                });
            if !open {
                closed.push(name);
            }
        }

        for name in closed {
            self.host.registry_mut().close(&name);
        }
        for view in exports {
            self.export(&view);
        }
    }

    fn export(&mut self, view: &PlotView) {
        let path = self.config.export_dir.join(export_file_name(&view.title));
        let (width, height) = EXPORT_SIZE;
        match export_view(view, &path, width, height, self.layout.display.dark_theme) {
            Ok(()) => self
                .notification_handler
                .show_info("Export", &format!("Saved {}", path.display())),
            Err(err) => self.notification_handler.show_info("Export", &err.to_string()),
        }
    }

    pub(super) fn render_notifications(&mut self, ctx: &egui::Context) {
        if self.notification_handler.is_empty() {
            return;
        }
        let max_width = 360.0;
        let x = ctx.screen_rect().max.x - 10.0;
        let mut y = ctx.screen_rect().min.y + 12.0;
        for (idx, notification) in self.notification_handler.recent().enumerate() {
            egui::Area::new(egui::Id::new(("diagram_toast", idx)))
                .order(egui::Order::Foreground)
                .interactable(false)
                .pivot(egui::Align2::RIGHT_TOP)
                .fixed_pos(egui::pos2(x, y))
                .show(ctx, |ui| {
                    egui::Frame::popup(ui.style())
                        .fill(egui::Color32::from_rgba_premultiplied(20, 20, 20, 220))
                        .rounding(egui::Rounding::same(6.0))
                        .show(ui, |ui| {
                            ui.set_max_width(max_width);
                            ui.label(egui::RichText::new(&notification.title).strong().size(14.0));
                            ui.label(egui::RichText::new(&notification.message).size(13.0));
                        });
                });
            y += 62.0;
        }
        ctx.request_repaint_after(NOTIFICATION_TTL / 10);
    }
}

#[cfg(test)]
mod tests {
    use super::export_file_name;

    #[test]
    fn export_file_name_replaces_separators() {
        assert_eq!(export_file_name("LoopTemp#1"), "LoopTemp_1.png");
        assert_eq!(export_file_name("Rod position#0"), "Rod_position_0.png");
    }
}

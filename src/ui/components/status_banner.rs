//! Status indicators: recording, loading, and the error banner

use crate::session::{InteractionController, SessionSnapshot};
use egui::{self, RichText};
use std::sync::Arc;

pub struct StatusBanner<'a> {
    controller: &'a Arc<InteractionController>,
    snapshot: &'a SessionSnapshot,
}

impl<'a> StatusBanner<'a> {
    pub fn new(controller: &'a Arc<InteractionController>, snapshot: &'a SessionSnapshot) -> Self {
        Self {
            controller,
            snapshot,
        }
    }

    pub fn show(self, ui: &mut egui::Ui) {
        if self.snapshot.capture.is_recording() {
            ui.horizontal(|ui| {
                // Pulsing dot while the microphone is live
                let t = ui.ctx().input(|i| i.time);
                let pulse = ((t * 3.0).sin() * 0.5 + 0.5) as f32;
                let color = egui::Color32::from_rgb(220, 60, 60).gamma_multiply(0.5 + pulse * 0.5);
                ui.label(RichText::new("●").color(color));
                ui.label("Recording… click stop when you're done");
                ui.ctx().request_repaint();
            });
            ui.add_space(4.0);
        }

        if self.snapshot.phase.is_loading() {
            ui.horizontal(|ui| {
                ui.add(egui::Spinner::new());
                ui.label("Drawing your coloring page…");
            });
            ui.add_space(4.0);
        }

        if let Some(message) = &self.snapshot.error_message {
            egui::Frame::none()
                .fill(egui::Color32::from_rgb(70, 30, 30))
                .rounding(6.0)
                .inner_margin(8.0)
                .show(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.label(
                            RichText::new(message).color(egui::Color32::from_rgb(255, 200, 200)),
                        );
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if ui.small_button("✕").clicked() {
                                self.controller.dismiss_error();
                            }
                        });
                    });
                });
            ui.add_space(4.0);
        }
    }
}

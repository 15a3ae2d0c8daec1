//! Result panel: the generated page with download and reset actions

use crate::session::{InteractionController, SessionSnapshot};
use egui::{self, RichText};
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::warn;

pub struct ResultPanel<'a> {
    controller: &'a Arc<InteractionController>,
    runtime: &'a Handle,
    snapshot: &'a SessionSnapshot,
}

impl<'a> ResultPanel<'a> {
    pub fn new(
        controller: &'a Arc<InteractionController>,
        runtime: &'a Handle,
        snapshot: &'a SessionSnapshot,
    ) -> Self {
        Self {
            controller,
            runtime,
            snapshot,
        }
    }

    pub fn show(self, ui: &mut egui::Ui) {
        if !self.snapshot.phase.is_showing_result() {
            return;
        }
        let Some(page) = &self.snapshot.result else {
            return;
        };

        ui.add_space(8.0);
        egui::Frame::none()
            .fill(ui.visuals().faint_bg_color)
            .rounding(8.0)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.heading("Here's your coloring page!");
                ui.label(RichText::new(format!("\"{}\"", page.prompt)).italics());
                ui.add_space(4.0);
                ui.label(RichText::new(describe_reference(&page.image)).weak());
                ui.add_space(8.0);

                ui.horizontal(|ui| {
                    if ui.button("⬇ Download").clicked() {
                        let controller = self.controller.clone();
                        self.runtime.spawn(async move {
                            if let Err(err) = controller.download_result().await {
                                warn!("download failed: {}", err);
                            }
                        });
                    }

                    if ui.button("🔄 Create Another").clicked() {
                        self.controller.reset();
                    }
                });
            });
    }
}

/// Compact description of an image reference; inline data URLs can run to
/// hundreds of kilobytes and are not worth printing.
fn describe_reference(reference: &str) -> String {
    if reference.starts_with("data:") {
        format!("inline image ({} KB)", reference.len() / 1024)
    } else {
        reference.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_hosted_reference() {
        assert_eq!(describe_reference("https://x/1.png"), "https://x/1.png");
    }

    #[test]
    fn test_describe_inline_reference() {
        let reference = format!("data:image/png;base64,{}", "A".repeat(4096));
        assert!(describe_reference(&reference).starts_with("inline image ("));
    }
}

//! Main application struct and eframe integration

use crate::session::{InteractionController, SessionEvent};
use crate::ui::components::{ExampleCards, InputBar, ResultPanel, StatusBanner};
use crossbeam_channel::Receiver;
use egui::{self, CentralPanel, RichText, TopBottomPanel};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;

/// Main Scribble application
pub struct ScribbleApp {
    /// Session controller, shared with spawned operations
    controller: Arc<InteractionController>,
    /// Runtime handle for spawning controller operations
    runtime: Handle,
    /// Presentation notifications from the controller
    events: Receiver<SessionEvent>,
    /// Scroll request latched from a reset
    scroll_to_top: bool,
}

impl ScribbleApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        controller: Arc<InteractionController>,
        runtime: Handle,
    ) -> Self {
        cc.egui_ctx.set_visuals(egui::Visuals::light());

        let events = controller.event_receiver();
        Self {
            controller,
            runtime,
            events,
            scroll_to_top: false,
        }
    }

    fn drain_events(&mut self) {
        for event in self.events.try_iter() {
            if event == SessionEvent::ScrollToTop {
                self.scroll_to_top = true;
            }
        }
    }

    fn show_header(&self, ctx: &egui::Context) {
        TopBottomPanel::top("header")
            .frame(egui::Frame::none().inner_margin(12.0))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(RichText::new("Scribble").size(20.0).strong());
                    ui.label(RichText::new("Coloring Page Maker").size(14.0).weak());
                });
            });
    }

    fn show_content(&mut self, ctx: &egui::Context) {
        CentralPanel::default().show(ctx, |ui| {
            let mut scroll_area = egui::ScrollArea::vertical();
            if std::mem::take(&mut self.scroll_to_top) {
                scroll_area = scroll_area.vertical_scroll_offset(0.0);
            }

            scroll_area.show(ui, |ui| {
                let snapshot = self.controller.state().snapshot();

                ui.add_space(8.0);
                InputBar::new(&self.controller, &self.runtime).show(ui);
                ui.add_space(8.0);
                ExampleCards::new(&self.controller).show(ui);
                ui.add_space(8.0);
                StatusBanner::new(&self.controller, &snapshot).show(ui);
                ResultPanel::new(&self.controller, &self.runtime, &snapshot).show(ui);
            });
        });
    }
}

impl eframe::App for ScribbleApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_events();
        self.show_header(ctx);
        self.show_content(ctx);

        // Background operations mutate state outside the frame loop
        ctx.request_repaint_after(Duration::from_millis(100));
    }
}

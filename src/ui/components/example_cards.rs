//! Clickable example prompts
//!
//! Selecting a card fills the input field without submitting.

use crate::session::InteractionController;
use egui::{self, RichText};
use std::sync::Arc;

/// Starter ideas shown beneath the input bar
pub const EXAMPLE_PROMPTS: &[&str] = &[
    "A friendly dragon reading a book",
    "A dolphin playing basketball underwater",
    "A castle made of candy",
    "A rocket ship visiting the moon",
];

pub struct ExampleCards<'a> {
    controller: &'a Arc<InteractionController>,
}

impl<'a> ExampleCards<'a> {
    pub fn new(controller: &'a Arc<InteractionController>) -> Self {
        Self { controller }
    }

    pub fn show(self, ui: &mut egui::Ui) {
        ui.label(RichText::new("Need an idea? Try one of these:").weak());
        ui.add_space(4.0);

        ui.horizontal_wrapped(|ui| {
            for example in EXAMPLE_PROMPTS {
                if ui.button(*example).clicked() {
                    self.controller.select_example(example);
                }
            }
        });
    }
}

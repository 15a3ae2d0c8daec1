//! Input bar component
//!
//! Provides the prompt input, generate button, and voice toggle.

use crate::session::InteractionController;
use egui::{self, Key, RichText};
use std::sync::Arc;
use tokio::runtime::Handle;

/// Input bar for typed and spoken prompts
pub struct InputBar<'a> {
    controller: &'a Arc<InteractionController>,
    runtime: &'a Handle,
}

impl<'a> InputBar<'a> {
    pub fn new(controller: &'a Arc<InteractionController>, runtime: &'a Handle) -> Self {
        Self {
            controller,
            runtime,
        }
    }

    pub fn show(self, ui: &mut egui::Ui) {
        let snapshot = self.controller.state().snapshot();
        let is_loading = snapshot.phase.is_loading();
        let is_recording = snapshot.capture.is_recording();

        ui.horizontal(|ui| {
            // Text input; the draft lives in session state so transcription
            // and example selection can fill it in
            let mut draft = snapshot.prompt_draft.clone();
            let available_width = ui.available_width() - 180.0;

            let text_edit = egui::TextEdit::singleline(&mut draft)
                .hint_text("What would you like to color?")
                .desired_width(available_width)
                .margin(egui::Margin::symmetric(12.0, 8.0));

            let response = ui.add_enabled(!is_loading, text_edit);
            if response.changed() {
                self.controller.state().write().set_draft(draft.clone());
            }

            // Enter submits, Shift+Enter does not
            if response.has_focus() {
                let enter_pressed = ui.input(|i| i.key_pressed(Key::Enter));
                let shift_held = ui.input(|i| i.modifiers.shift);
                if enter_pressed && !shift_held {
                    self.submit();
                }
            }

            let generate = egui::Button::new(RichText::new("Create!").strong());
            if ui.add_enabled(!is_loading, generate).clicked() {
                self.submit();
            }

            let (voice_icon, voice_tooltip) = if is_recording {
                ("⏹", "Click to Stop")
            } else {
                ("🎤", "Or Click to Speak")
            };
            let voice = egui::Button::new(RichText::new(voice_icon).size(18.0));
            let voice_response = ui.add_enabled(!is_loading, voice);
            if voice_response.clicked() {
                let controller = self.controller.clone();
                self.runtime.spawn(async move {
                    controller.toggle_voice_capture().await;
                });
            }
            voice_response.on_hover_text(voice_tooltip);
        });
    }

    fn submit(&self) {
        let controller = self.controller.clone();
        let prompt = controller.state().prompt_draft();
        self.runtime.spawn(async move {
            controller.submit_prompt(&prompt).await;
        });
    }
}

//! Interaction controller for the coloring-page maker
//!
//! Mediates between user input, the two remote services, and presentation
//! state. The presentation layer invokes the named operations below and
//! renders from [`SharedSessionState`]; the controller never reaches into
//! presentation internals beyond emitting [`SessionEvent`] notifications.

use crate::audio::{self, AudioCapture};
use crate::remote::{download, GenerationService, TranscriptionService};
use crate::session::config::SessionConfig;
use crate::session::state::{SessionEvent, SharedSessionState};
use crate::{Result, ScribbleError};
use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Shown when a submission is empty after trimming
pub const EMPTY_PROMPT_MESSAGE: &str = "Please enter an idea or click an example!";

/// Shown for transport failures and service errors without a message
pub const GENERIC_FAILURE_MESSAGE: &str = "Oops! Something went wrong. Please try again.";

/// Shown when transcription fails for any reason
pub const AUDIO_FAILURE_MESSAGE: &str =
    "Could not understand the audio. Please try again or type your idea.";

/// Shown when the microphone cannot be acquired
pub const MICROPHONE_FAILURE_MESSAGE: &str =
    "Could not access microphone. Please check permissions.";

/// Fixed file name for downloaded pages
pub const DOWNLOAD_FILE_NAME: &str = "my-coloring-page.png";

/// An active capture session's chunk stream
struct CaptureSession {
    chunk_rx: Receiver<Vec<f32>>,
    sample_rate: u32,
}

struct CaptureSlot {
    device: Box<dyn AudioCapture>,
    session: Option<CaptureSession>,
}

/// Session-scope controller owning all interaction state
pub struct InteractionController {
    config: SessionConfig,
    state: SharedSessionState,
    generator: Arc<dyn GenerationService>,
    transcriber: Arc<dyn TranscriptionService>,
    capture: Mutex<CaptureSlot>,
    http: reqwest::Client,
    event_tx: Sender<SessionEvent>,
    event_rx: Receiver<SessionEvent>,
    error_timer: Mutex<Option<JoinHandle<()>>>,
}

impl InteractionController {
    /// Create a controller wired to the real services and microphone
    pub fn new(config: SessionConfig) -> Result<Self> {
        let generator = Arc::new(crate::remote::HttpGenerationClient::new(&config.remote)?);
        let transcriber = Arc::new(crate::remote::HttpTranscriptionClient::new(&config.remote)?);

        #[cfg(feature = "audio-io")]
        let capture: Box<dyn AudioCapture> = Box::new(crate::audio::MicrophoneInput::new());
        #[cfg(not(feature = "audio-io"))]
        let capture: Box<dyn AudioCapture> = Box::new(crate::audio::capture::DisabledCapture);

        Self::with_services(config, generator, transcriber, capture)
    }

    /// Create a controller with explicit service and capture implementations
    pub fn with_services(
        config: SessionConfig,
        generator: Arc<dyn GenerationService>,
        transcriber: Arc<dyn TranscriptionService>,
        capture: Box<dyn AudioCapture>,
    ) -> Result<Self> {
        config.validate()?;
        let http = config.remote.build_client()?;
        let (event_tx, event_rx) = unbounded();

        Ok(Self {
            config,
            state: SharedSessionState::new(),
            generator,
            transcriber,
            capture: Mutex::new(CaptureSlot {
                device: capture,
                session: None,
            }),
            http,
            event_tx,
            event_rx,
            error_timer: Mutex::new(None),
        })
    }

    /// Get the shared session state for rendering and assertions
    pub fn state(&self) -> &SharedSessionState {
        &self.state
    }

    /// Get a receiver for presentation notifications
    pub fn event_receiver(&self) -> Receiver<SessionEvent> {
        self.event_rx.clone()
    }

    /// Submit a prompt for generation.
    ///
    /// Empty submissions never reach the service. Completions are fenced by
    /// request id so a superseded call cannot overwrite newer state.
    pub async fn submit_prompt(&self, raw_prompt: &str) {
        let prompt = raw_prompt.trim().to_string();
        if prompt.is_empty() {
            debug!("rejecting empty prompt");
            self.show_error(EMPTY_PROMPT_MESSAGE);
            return;
        }

        let request = Uuid::new_v4();
        self.state.write().begin_generation(request);
        self.emit(SessionEvent::StateChanged);
        info!(prompt = %prompt, "requesting coloring page");

        match self.generator.generate(&prompt).await {
            Ok(image) => {
                let mut state = self.state.write();
                if !state.is_current_request(request) {
                    debug!("discarding superseded generation result");
                    return;
                }
                state.show_result(image, prompt);
                drop(state);
                self.emit(SessionEvent::StateChanged);
            }
            Err(err) => {
                {
                    let mut state = self.state.write();
                    if !state.is_current_request(request) {
                        debug!("discarding superseded generation failure");
                        return;
                    }
                    state.in_flight = None;
                    state.finish_loading();
                }
                error!("generation failed: {}", err);
                let message = match &err {
                    ScribbleError::ServiceError(message) => message.clone(),
                    _ => GENERIC_FAILURE_MESSAGE.to_string(),
                };
                self.show_error(&message);
            }
        }
    }

    /// Toggle voice capture.
    ///
    /// Starting acquires the microphone; stopping releases it, assembles the
    /// recording into a WAV payload, and hands it to
    /// [`transcribe_and_generate`](Self::transcribe_and_generate).
    pub async fn toggle_voice_capture(&self) {
        if self.state.read().capture.is_recording() {
            self.stop_capture().await;
        } else {
            self.start_capture();
        }
    }

    fn start_capture(&self) {
        let mut slot = self.capture.lock();
        if slot.session.is_some() {
            warn!("Capture already active");
            return;
        }

        let (chunk_tx, chunk_rx) = unbounded();
        match slot.device.start(chunk_tx) {
            Ok(sample_rate) => {
                debug!(sample_rate, "capture session started");
                slot.session = Some(CaptureSession {
                    chunk_rx,
                    sample_rate,
                });
                drop(slot);
                self.state.write().start_capture();
                self.emit(SessionEvent::StateChanged);
            }
            Err(err) => {
                warn!("microphone unavailable: {}", err);
                drop(slot);
                self.show_error(MICROPHONE_FAILURE_MESSAGE);
            }
        }
    }

    async fn stop_capture(&self) {
        let session = {
            let mut slot = self.capture.lock();
            // Release the device before touching the audio; stop() blocks
            // until every chunk of the take is in the channel
            if let Err(err) = slot.device.stop() {
                error!("failed to stop capture cleanly: {}", err);
            }
            slot.session.take()
        };

        self.state.write().finish_capture();
        self.emit(SessionEvent::StateChanged);

        let Some(session) = session else {
            warn!("no capture session to stop");
            return;
        };

        let mut samples = Vec::new();
        while let Ok(chunk) = session.chunk_rx.try_recv() {
            samples.extend_from_slice(&chunk);
        }
        debug!(samples = samples.len(), "assembled recording");

        match audio::encode_wav(&samples, session.sample_rate) {
            Ok(payload) => self.transcribe_and_generate(payload).await,
            Err(err) => {
                error!("failed to encode recording: {}", err);
                self.show_error(AUDIO_FAILURE_MESSAGE);
            }
        }
    }

    /// Transcribe a recording, then submit the transcript as the next prompt.
    pub async fn transcribe_and_generate(&self, audio_payload: Vec<u8>) {
        self.state.write().begin_transcription();
        self.emit(SessionEvent::StateChanged);
        info!(bytes = audio_payload.len(), "transcribing recording");

        match self.transcriber.transcribe(audio_payload).await {
            Ok(text) => {
                info!(text = %text, "transcription complete");
                {
                    let mut state = self.state.write();
                    state.set_draft(text.clone());
                    state.finish_loading();
                }
                self.emit(SessionEvent::StateChanged);
                // The transcript becomes the next prompt submission
                self.submit_prompt(&text).await;
            }
            Err(err) => {
                error!("transcription failed: {}", err);
                self.state.write().finish_loading();
                self.show_error(AUDIO_FAILURE_MESSAGE);
            }
        }
    }

    /// Save the displayed page under [`DOWNLOAD_FILE_NAME`].
    ///
    /// Controller state is not touched; failures are reported to the caller.
    pub async fn download_result(&self) -> Result<PathBuf> {
        let Some(page) = self.state.read().result.clone() else {
            return Err(ScribbleError::NoResult);
        };

        let path = self.config.download_dir.join(DOWNLOAD_FILE_NAME);
        download::save_image(&self.http, &page.image, &path).await?;
        Ok(path)
    }

    /// Start a fresh session without restarting the application
    pub fn reset(&self) {
        self.cancel_error_timer();
        self.state.write().reset();
        self.emit(SessionEvent::StateChanged);
        self.emit(SessionEvent::ScrollToTop);
    }

    /// Put an example prompt into the input field without submitting
    pub fn select_example(&self, example: &str) {
        self.state.write().set_draft(example);
        self.emit(SessionEvent::StateChanged);
    }

    /// Hide the error banner ahead of the auto-hide timeout
    pub fn dismiss_error(&self) {
        self.cancel_error_timer();
        self.state.write().clear_error();
        self.emit(SessionEvent::StateChanged);
    }

    fn show_error(&self, message: &str) {
        let seq = self.state.write().show_error(message.to_string());
        self.arm_error_timer(seq);
        self.emit(SessionEvent::Error(message.to_string()));
        self.emit(SessionEvent::StateChanged);
    }

    /// Schedule the banner auto-hide, replacing any pending timer.
    ///
    /// The timer checks the banner sequence number before hiding so a stale
    /// task can never dismiss a newer banner.
    fn arm_error_timer(&self, seq: u64) {
        let state = self.state.clone();
        let event_tx = self.event_tx.clone();
        let delay = self.config.error_autohide;

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut s = state.write();
            if s.error_seq != seq || s.error_message.is_none() {
                return;
            }
            s.clear_error();
            drop(s);
            let _ = event_tx.send(SessionEvent::StateChanged);
        });

        if let Some(previous) = self.error_timer.lock().replace(handle) {
            previous.abort();
        }
    }

    fn cancel_error_timer(&self) {
        if let Some(timer) = self.error_timer.lock().take() {
            timer.abort();
        }
    }

    fn emit(&self, event: SessionEvent) {
        let _ = self.event_tx.send(event);
    }
}

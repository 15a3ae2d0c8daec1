//! Session state for the coloring-page maker
//!
//! This module provides the thread-safe shared state that can be accessed by:
//! - **Controller**: writes state changes as operations progress
//! - **UI**: reads state for rendering, invokes controller operations
//! - **Tests**: read state for assertions
//!
//! The design separates:
//! - **State**: shared data that can be queried synchronously
//! - **Events**: notifications for presentation updates (repaint, scroll)

use parking_lot::RwLock;
use std::sync::Arc;
use uuid::Uuid;

/// Which presentation elements are visible.
///
/// The phases are mutually exclusive; `Loading` may overlap an active
/// recording, which is tracked separately in [`CaptureState`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UiPhase {
    /// Nothing in flight, awaiting input
    #[default]
    Idle,
    /// A remote call is in progress
    Loading,
    /// A generated page is on display
    ShowingResult,
    /// An error banner is on display
    ShowingError,
}

impl UiPhase {
    pub fn is_idle(&self) -> bool {
        matches!(self, UiPhase::Idle)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, UiPhase::Loading)
    }

    pub fn is_showing_result(&self) -> bool {
        matches!(self, UiPhase::ShowingResult)
    }

    pub fn is_showing_error(&self) -> bool {
        matches!(self, UiPhase::ShowingError)
    }
}

impl std::fmt::Display for UiPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UiPhase::Idle => write!(f, "Idle"),
            UiPhase::Loading => write!(f, "Loading"),
            UiPhase::ShowingResult => write!(f, "ShowingResult"),
            UiPhase::ShowingError => write!(f, "ShowingError"),
        }
    }
}

/// Voice capture state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CaptureState {
    /// Microphone not in use
    #[default]
    Idle,
    /// Actively recording audio from the microphone
    Recording,
}

impl CaptureState {
    pub fn is_recording(&self) -> bool {
        matches!(self, CaptureState::Recording)
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, CaptureState::Idle)
    }
}

impl std::fmt::Display for CaptureState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CaptureState::Idle => write!(f, "Idle"),
            CaptureState::Recording => write!(f, "Recording"),
        }
    }
}

/// A generated coloring page on display
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedPage {
    /// Image reference: a hosted URL or an inline `data:` URL
    pub image: String,
    /// The prompt the page was generated from
    pub prompt: String,
}

/// Single mutable session record, lifetime = application lifetime
#[derive(Clone, Debug, Default)]
pub struct SessionState {
    /// Presentation phase
    pub phase: UiPhase,
    /// Voice capture state
    pub capture: CaptureState,
    /// Editable prompt input
    pub prompt_draft: String,
    /// Last submitted or transcribed prompt
    pub current_prompt: Option<String>,
    /// Last generated page
    pub result: Option<GeneratedPage>,
    /// Error banner text (at most one at a time)
    pub error_message: Option<String>,
    /// Banner generation counter, bumped on every new banner
    pub error_seq: u64,
    /// Latest generation request; stale completions must not write state
    pub in_flight: Option<Uuid>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an immutable snapshot of current state
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase,
            capture: self.capture,
            prompt_draft: self.prompt_draft.clone(),
            current_prompt: self.current_prompt.clone(),
            result: self.result.clone(),
            error_message: self.error_message.clone(),
        }
    }

    // === State transitions ===

    /// Enter `Loading` for a generation request
    pub fn begin_generation(&mut self, request: Uuid) {
        self.phase = UiPhase::Loading;
        self.error_message = None;
        self.in_flight = Some(request);
    }

    /// Enter `Loading` for a transcription call
    pub fn begin_transcription(&mut self) {
        self.phase = UiPhase::Loading;
        self.error_message = None;
    }

    /// Check whether `request` is still the latest generation request
    pub fn is_current_request(&self, request: Uuid) -> bool {
        self.in_flight == Some(request)
    }

    /// Store a generated page and show it
    pub fn show_result(&mut self, image: String, prompt: String) {
        self.current_prompt = Some(prompt.clone());
        self.result = Some(GeneratedPage { image, prompt });
        self.phase = UiPhase::ShowingResult;
        self.in_flight = None;
    }

    /// Show an error banner, replacing any previous one.
    ///
    /// Returns the banner sequence number for auto-hide fencing.
    pub fn show_error(&mut self, message: String) -> u64 {
        self.error_seq += 1;
        self.error_message = Some(message);
        self.phase = UiPhase::ShowingError;
        self.error_seq
    }

    /// Leave `Loading` without a result (e.g. before chaining operations)
    pub fn finish_loading(&mut self) {
        if self.phase.is_loading() {
            self.phase = UiPhase::Idle;
        }
    }

    /// Hide the error banner.
    ///
    /// Leaving `ShowingError` restores the result view when a page is still
    /// available, matching what the user saw before the error.
    pub fn clear_error(&mut self) {
        self.error_message = None;
        if self.phase.is_showing_error() {
            self.phase = if self.result.is_some() {
                UiPhase::ShowingResult
            } else {
                UiPhase::Idle
            };
        }
    }

    /// Begin a voice capture session
    pub fn start_capture(&mut self) {
        self.capture = CaptureState::Recording;
    }

    /// End the voice capture session
    pub fn finish_capture(&mut self) {
        self.capture = CaptureState::Idle;
    }

    /// Set the prompt input field without submitting
    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.prompt_draft = text.into();
    }

    /// Start a fresh session: clear input, result, and error
    pub fn reset(&mut self) {
        self.prompt_draft.clear();
        self.current_prompt = None;
        self.result = None;
        self.error_message = None;
        self.phase = UiPhase::Idle;
        self.in_flight = None;
    }
}

/// Immutable snapshot of session state
///
/// Used for rendering without holding locks.
#[derive(Clone, Debug)]
pub struct SessionSnapshot {
    pub phase: UiPhase,
    pub capture: CaptureState,
    pub prompt_draft: String,
    pub current_prompt: Option<String>,
    pub result: Option<GeneratedPage>,
    pub error_message: Option<String>,
}

/// Thread-safe shared session state
#[derive(Clone)]
pub struct SharedSessionState {
    inner: Arc<RwLock<SessionState>>,
}

impl Default for SharedSessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedSessionState {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(SessionState::new())),
        }
    }

    /// Get a read lock on the state
    pub fn read(&self) -> parking_lot::RwLockReadGuard<'_, SessionState> {
        self.inner.read()
    }

    /// Get a write lock on the state
    pub fn write(&self) -> parking_lot::RwLockWriteGuard<'_, SessionState> {
        self.inner.write()
    }

    /// Get a snapshot of current state (no lock held after return)
    pub fn snapshot(&self) -> SessionSnapshot {
        self.inner.read().snapshot()
    }

    // === Convenience read methods ===

    pub fn phase(&self) -> UiPhase {
        self.inner.read().phase
    }

    pub fn is_recording(&self) -> bool {
        self.inner.read().capture.is_recording()
    }

    pub fn is_loading(&self) -> bool {
        self.inner.read().phase.is_loading()
    }

    pub fn prompt_draft(&self) -> String {
        self.inner.read().prompt_draft.clone()
    }

    pub fn current_prompt(&self) -> Option<String> {
        self.inner.read().current_prompt.clone()
    }

    pub fn result(&self) -> Option<GeneratedPage> {
        self.inner.read().result.clone()
    }

    pub fn error_message(&self) -> Option<String> {
        self.inner.read().error_message.clone()
    }
}

/// Notifications emitted for the presentation layer
///
/// State should be queried from [`SharedSessionState`] rather than
/// reconstructed from events.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    /// State has changed (trigger a repaint)
    StateChanged,
    /// An error banner was shown
    Error(String),
    /// The view should scroll back to the top
    ScrollToTop,
}

//! End-to-end controller tests with scripted services
//!
//! These drive the named operations the way the input layer does and assert
//! on the shared session state, so the whole interaction flow is covered
//! without a backend or a microphone.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use crossbeam_channel::Sender;
use scribble::audio::AudioCapture;
use scribble::remote::{GenerationService, TranscriptionService};
use scribble::session::controller::{
    AUDIO_FAILURE_MESSAGE, DOWNLOAD_FILE_NAME, EMPTY_PROMPT_MESSAGE, GENERIC_FAILURE_MESSAGE,
    MICROPHONE_FAILURE_MESSAGE,
};
use scribble::session::{InteractionController, SessionConfig, SessionEvent};
use scribble::{Result, ScribbleError};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

struct MockGenerator {
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
    responses: Mutex<VecDeque<Result<String>>>,
}

impl MockGenerator {
    fn with_response(response: Result<String>) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
            responses: Mutex::new(VecDeque::from([response])),
        })
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerationService for MockGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok("https://x/default.png".to_string()))
    }
}

/// Generator that blocks until released, for observing `Loading`
struct GatedGenerator {
    started: Arc<Notify>,
    release: Arc<Notify>,
    response: Result<String>,
}

impl GatedGenerator {
    fn new(response: Result<String>) -> (Arc<Self>, Arc<Notify>, Arc<Notify>) {
        let started = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        let generator = Arc::new(Self {
            started: started.clone(),
            release: release.clone(),
            response,
        });
        (generator, started, release)
    }
}

#[async_trait]
impl GenerationService for GatedGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        self.started.notify_one();
        self.release.notified().await;
        self.response.clone()
    }
}

struct MockTranscriber {
    calls: AtomicUsize,
    payloads: Mutex<Vec<Vec<u8>>>,
    responses: Mutex<VecDeque<Result<String>>>,
}

impl MockTranscriber {
    fn with_response(response: Result<String>) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            payloads: Mutex::new(Vec::new()),
            responses: Mutex::new(VecDeque::from([response])),
        })
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn payloads(&self) -> Vec<Vec<u8>> {
        self.payloads.lock().unwrap().clone()
    }
}

#[async_trait]
impl TranscriptionService for MockTranscriber {
    async fn transcribe(&self, audio_wav: Vec<u8>) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.payloads.lock().unwrap().push(audio_wav);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok("a friendly dragon".to_string()))
    }
}

/// Scripted capture device delivering canned chunks on start
struct MockCapture {
    chunks: Vec<Vec<f32>>,
    fail_start: bool,
    starts: Arc<AtomicUsize>,
    stops: Arc<AtomicUsize>,
}

impl MockCapture {
    fn new(chunks: Vec<Vec<f32>>) -> (Self, Arc<AtomicUsize>, Arc<AtomicUsize>) {
        let starts = Arc::new(AtomicUsize::new(0));
        let stops = Arc::new(AtomicUsize::new(0));
        let capture = Self {
            chunks,
            fail_start: false,
            starts: starts.clone(),
            stops: stops.clone(),
        };
        (capture, starts, stops)
    }

    fn denied() -> (Self, Arc<AtomicUsize>, Arc<AtomicUsize>) {
        let (mut capture, starts, stops) = Self::new(Vec::new());
        capture.fail_start = true;
        (capture, starts, stops)
    }
}

impl AudioCapture for MockCapture {
    fn start(&mut self, chunk_tx: Sender<Vec<f32>>) -> Result<u32> {
        if self.fail_start {
            return Err(ScribbleError::MicrophoneError("permission denied".into()));
        }
        self.starts.fetch_add(1, Ordering::SeqCst);
        for chunk in &self.chunks {
            chunk_tx.send(chunk.clone()).unwrap();
        }
        Ok(16000)
    }

    fn stop(&mut self) -> Result<()> {
        self.stops.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn is_capturing(&self) -> bool {
        false
    }
}

fn controller(
    generator: Arc<dyn GenerationService>,
    transcriber: Arc<dyn TranscriptionService>,
    capture: MockCapture,
) -> Arc<InteractionController> {
    controller_with(SessionConfig::default(), generator, transcriber, capture)
}

fn controller_with(
    config: SessionConfig,
    generator: Arc<dyn GenerationService>,
    transcriber: Arc<dyn TranscriptionService>,
    capture: MockCapture,
) -> Arc<InteractionController> {
    Arc::new(
        InteractionController::with_services(config, generator, transcriber, Box::new(capture))
            .unwrap(),
    )
}

#[tokio::test]
async fn empty_prompt_never_reaches_the_service() {
    let generator = MockGenerator::with_response(Ok("https://x/1.png".into()));
    let transcriber = MockTranscriber::with_response(Ok("unused".into()));
    let (capture, _, _) = MockCapture::new(Vec::new());
    let controller = controller(generator.clone(), transcriber, capture);

    controller.submit_prompt("").await;
    controller.submit_prompt("   \t  ").await;

    assert_eq!(generator.call_count(), 0);
    let state = controller.state().snapshot();
    assert!(state.phase.is_showing_error());
    assert_eq!(state.error_message.as_deref(), Some(EMPTY_PROMPT_MESSAGE));
}

#[tokio::test]
async fn successful_generation_shows_the_result() {
    let generator = MockGenerator::with_response(Ok("https://x/1.png".into()));
    let transcriber = MockTranscriber::with_response(Ok("unused".into()));
    let (capture, _, _) = MockCapture::new(Vec::new());
    let controller = controller(generator.clone(), transcriber, capture);

    controller.submit_prompt("a friendly dragon").await;

    assert_eq!(generator.call_count(), 1);
    let state = controller.state().snapshot();
    assert!(state.phase.is_showing_result());
    let page = state.result.expect("result should be set");
    assert_eq!(page.image, "https://x/1.png");
    assert_eq!(page.prompt, "a friendly dragon");
    assert_eq!(state.current_prompt.as_deref(), Some("a friendly dragon"));
    assert!(state.error_message.is_none());
}

#[tokio::test]
async fn prompt_is_trimmed_before_submission() {
    let generator = MockGenerator::with_response(Ok("https://x/1.png".into()));
    let transcriber = MockTranscriber::with_response(Ok("unused".into()));
    let (capture, _, _) = MockCapture::new(Vec::new());
    let controller = controller(generator.clone(), transcriber, capture);

    controller.submit_prompt("  a castle  ").await;

    assert_eq!(generator.prompts(), vec!["a castle".to_string()]);
    let state = controller.state().snapshot();
    assert_eq!(state.current_prompt.as_deref(), Some("a castle"));
}

#[tokio::test]
async fn loading_is_visible_during_the_call_and_cleared_after() {
    let (generator, started, release) = GatedGenerator::new(Ok("https://x/1.png".into()));
    let transcriber = MockTranscriber::with_response(Ok("unused".into()));
    let (capture, _, _) = MockCapture::new(Vec::new());
    let controller = controller(generator, transcriber, capture);

    let task = {
        let controller = controller.clone();
        tokio::spawn(async move { controller.submit_prompt("a friendly dragon").await })
    };

    started.notified().await;
    assert!(controller.state().is_loading());

    release.notify_one();
    task.await.unwrap();

    assert!(!controller.state().is_loading());
    assert!(controller.state().phase().is_showing_result());
}

#[tokio::test]
async fn loading_is_cleared_on_failure_too() {
    let (generator, started, release) =
        GatedGenerator::new(Err(ScribbleError::TransportError("boom".into())));
    let transcriber = MockTranscriber::with_response(Ok("unused".into()));
    let (capture, _, _) = MockCapture::new(Vec::new());
    let controller = controller(generator, transcriber, capture);

    let task = {
        let controller = controller.clone();
        tokio::spawn(async move { controller.submit_prompt("a friendly dragon").await })
    };

    started.notified().await;
    assert!(controller.state().is_loading());

    release.notify_one();
    task.await.unwrap();

    assert!(!controller.state().is_loading());
    let state = controller.state().snapshot();
    assert!(state.phase.is_showing_error());
    assert_eq!(state.error_message.as_deref(), Some(GENERIC_FAILURE_MESSAGE));
}

#[tokio::test]
async fn service_error_message_is_shown_verbatim() {
    let generator =
        MockGenerator::with_response(Err(ScribbleError::ServiceError("rate limited".into())));
    let transcriber = MockTranscriber::with_response(Ok("unused".into()));
    let (capture, _, _) = MockCapture::new(Vec::new());
    let controller = controller(generator, transcriber, capture);

    controller.submit_prompt("a friendly dragon").await;

    let state = controller.state().snapshot();
    assert!(state.phase.is_showing_error());
    assert_eq!(state.error_message.as_deref(), Some("rate limited"));
}

#[tokio::test]
async fn voice_roundtrip_transcribes_once_and_releases_the_microphone_once() {
    let generator = MockGenerator::with_response(Ok("https://x/dragon.png".into()));
    let transcriber = MockTranscriber::with_response(Ok("a friendly dragon".into()));
    let (capture, starts, stops) = MockCapture::new(vec![vec![0.1; 160], vec![0.2; 160]]);
    let controller = controller(generator.clone(), transcriber.clone(), capture);

    controller.toggle_voice_capture().await;
    assert!(controller.state().is_recording());
    assert_eq!(starts.load(Ordering::SeqCst), 1);

    controller.toggle_voice_capture().await;
    assert!(!controller.state().is_recording());
    assert_eq!(stops.load(Ordering::SeqCst), 1);

    assert_eq!(transcriber.call_count(), 1);
    let payloads = transcriber.payloads();
    assert!(!payloads[0].is_empty());
    assert_eq!(&payloads[0][0..4], b"RIFF");

    // The transcript became the next prompt submission
    assert_eq!(generator.prompts(), vec!["a friendly dragon".to_string()]);
    let state = controller.state().snapshot();
    assert!(state.phase.is_showing_result());
    assert_eq!(state.current_prompt.as_deref(), Some("a friendly dragon"));
    assert_eq!(state.prompt_draft, "a friendly dragon");
}

#[tokio::test]
async fn microphone_denial_keeps_capture_off() {
    let generator = MockGenerator::with_response(Ok("https://x/1.png".into()));
    let transcriber = MockTranscriber::with_response(Ok("unused".into()));
    let (capture, _, stops) = MockCapture::denied();
    let controller = controller(generator, transcriber, capture);

    controller.toggle_voice_capture().await;

    assert!(!controller.state().is_recording());
    assert_eq!(stops.load(Ordering::SeqCst), 0);
    let state = controller.state().snapshot();
    assert_eq!(
        state.error_message.as_deref(),
        Some(MICROPHONE_FAILURE_MESSAGE)
    );
}

#[tokio::test]
async fn failed_transcription_shows_the_audio_message_and_keeps_the_draft() {
    let generator = MockGenerator::with_response(Ok("https://x/1.png".into()));
    let transcriber =
        MockTranscriber::with_response(Err(ScribbleError::ServiceError("bad audio".into())));
    let (capture, _, _) = MockCapture::new(vec![vec![0.1; 160]]);
    let controller = controller(generator.clone(), transcriber, capture);

    controller.select_example("previous words");
    controller.toggle_voice_capture().await;
    controller.toggle_voice_capture().await;

    let state = controller.state().snapshot();
    assert_eq!(state.prompt_draft, "previous words");
    assert_eq!(state.error_message.as_deref(), Some(AUDIO_FAILURE_MESSAGE));
    assert!(!state.phase.is_loading());
    assert_eq!(generator.call_count(), 0);
}

#[tokio::test]
async fn error_banner_auto_hides_after_the_timeout() {
    let config = SessionConfig::default().with_error_autohide(Duration::from_millis(50));
    let generator = MockGenerator::with_response(Ok("https://x/1.png".into()));
    let transcriber = MockTranscriber::with_response(Ok("unused".into()));
    let (capture, _, _) = MockCapture::new(Vec::new());
    let controller = controller_with(config, generator, transcriber, capture);

    controller.submit_prompt("").await;
    assert!(controller.state().error_message().is_some());

    tokio::time::sleep(Duration::from_millis(150)).await;

    assert!(controller.state().error_message().is_none());
    assert!(controller.state().phase().is_idle());
}

#[tokio::test]
async fn a_newer_error_restarts_the_auto_hide_timer() {
    let config = SessionConfig::default().with_error_autohide(Duration::from_millis(200));
    let generator =
        MockGenerator::with_response(Err(ScribbleError::ServiceError("first".into())));
    let transcriber = MockTranscriber::with_response(Ok("unused".into()));
    let (capture, _, _) = MockCapture::new(Vec::new());
    let controller = controller_with(config, generator, transcriber, capture);

    controller.submit_prompt("a friendly dragon").await;
    assert_eq!(controller.state().error_message().as_deref(), Some("first"));

    tokio::time::sleep(Duration::from_millis(120)).await;
    controller.submit_prompt("").await;
    assert_eq!(
        controller.state().error_message().as_deref(),
        Some(EMPTY_PROMPT_MESSAGE)
    );

    // The first banner's deadline passes; the newer banner must survive it
    tokio::time::sleep(Duration::from_millis(120)).await;
    assert_eq!(
        controller.state().error_message().as_deref(),
        Some(EMPTY_PROMPT_MESSAGE)
    );

    tokio::time::sleep(Duration::from_millis(150)).await;
    assert!(controller.state().error_message().is_none());
}

#[tokio::test]
async fn dismissing_an_error_restores_the_result_view() {
    let generator = MockGenerator::with_response(Ok("https://x/1.png".into()));
    let transcriber = MockTranscriber::with_response(Ok("unused".into()));
    let (capture, _, _) = MockCapture::new(Vec::new());
    let controller = controller(generator, transcriber, capture);

    controller.submit_prompt("a friendly dragon").await;
    controller.submit_prompt("").await;
    assert!(controller.state().phase().is_showing_error());

    controller.dismiss_error();

    let state = controller.state().snapshot();
    assert!(state.error_message.is_none());
    assert!(state.phase.is_showing_result());
}

#[tokio::test]
async fn superseded_generation_cannot_overwrite_the_newer_result() {
    let (slow_generator, started, release) = GatedGenerator::new(Ok("https://x/slow.png".into()));
    let transcriber = MockTranscriber::with_response(Ok("unused".into()));
    let (capture, _, _) = MockCapture::new(Vec::new());
    let controller = controller(slow_generator, transcriber, capture);

    let slow_task = {
        let controller = controller.clone();
        tokio::spawn(async move { controller.submit_prompt("slow idea").await })
    };
    started.notified().await;

    // A second submission arrives while the first is still in flight; only
    // the newer request may write the result, whichever resolves last
    let fast_task = {
        let controller = controller.clone();
        tokio::spawn(async move { controller.submit_prompt("fast idea").await })
    };
    started.notified().await;
    release.notify_one();
    release.notify_one();
    fast_task.await.unwrap();
    slow_task.await.unwrap();

    let state = controller.state().snapshot();
    assert!(state.phase.is_showing_result());
    assert_eq!(state.current_prompt.as_deref(), Some("fast idea"));
}

#[tokio::test]
async fn select_example_populates_the_input_without_submitting() {
    let generator = MockGenerator::with_response(Ok("https://x/1.png".into()));
    let transcriber = MockTranscriber::with_response(Ok("unused".into()));
    let (capture, _, _) = MockCapture::new(Vec::new());
    let controller = controller(generator.clone(), transcriber, capture);

    controller.select_example("A castle made of candy");

    assert_eq!(controller.state().prompt_draft(), "A castle made of candy");
    assert_eq!(generator.call_count(), 0);
    assert!(controller.state().phase().is_idle());
}

#[tokio::test]
async fn reset_starts_a_fresh_session_and_scrolls_to_top() {
    let generator = MockGenerator::with_response(Ok("https://x/1.png".into()));
    let transcriber = MockTranscriber::with_response(Ok("unused".into()));
    let (capture, _, _) = MockCapture::new(Vec::new());
    let controller = controller(generator, transcriber, capture);
    let events = controller.event_receiver();

    controller.submit_prompt("a friendly dragon").await;
    controller.reset();

    let state = controller.state().snapshot();
    assert!(state.prompt_draft.is_empty());
    assert!(state.result.is_none());
    assert!(state.phase.is_idle());

    let received: Vec<_> = events.try_iter().collect();
    assert!(received.contains(&SessionEvent::ScrollToTop));
}

#[tokio::test]
async fn download_saves_the_page_under_the_fixed_name() {
    let dir = tempfile::tempdir().unwrap();
    let reference = format!("data:image/png;base64,{}", STANDARD.encode(b"page-bytes"));
    let config = SessionConfig::default().with_download_dir(dir.path());
    let generator = MockGenerator::with_response(Ok(reference));
    let transcriber = MockTranscriber::with_response(Ok("unused".into()));
    let (capture, _, _) = MockCapture::new(Vec::new());
    let controller = controller_with(config, generator, transcriber, capture);

    controller.submit_prompt("a friendly dragon").await;

    let path = controller.download_result().await.unwrap();
    assert_eq!(path.file_name().unwrap().to_str().unwrap(), DOWNLOAD_FILE_NAME);
    assert_eq!(std::fs::read(&path).unwrap(), b"page-bytes");

    // Download leaves the session state untouched
    assert!(controller.state().phase().is_showing_result());
}

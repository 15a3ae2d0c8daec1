pub mod capture;
pub mod wav;

pub use capture::AudioCapture;
#[cfg(feature = "audio-io")]
pub use capture::MicrophoneInput;
pub use wav::encode_wav;

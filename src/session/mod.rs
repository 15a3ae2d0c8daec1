pub mod config;
pub mod controller;
pub mod state;

pub use config::SessionConfig;
pub use controller::InteractionController;
pub use state::{
    CaptureState, GeneratedPage, SessionEvent, SessionSnapshot, SessionState, SharedSessionState,
    UiPhase,
};

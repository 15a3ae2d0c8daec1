use anyhow::Result;
use eframe::egui;
use scribble::session::{InteractionController, SessionConfig};
use scribble::ui::ScribbleApp;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scribble=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Scribble coloring page maker");

    let runtime = tokio::runtime::Runtime::new()?;
    let handle = runtime.handle().clone();

    let controller = Arc::new(InteractionController::new(SessionConfig::default())?);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([520.0, 680.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Scribble",
        options,
        Box::new(move |cc| Ok(Box::new(ScribbleApp::new(cc, controller, handle)))),
    )
    .map_err(|e| anyhow::anyhow!("failed to start UI: {e}"))?;

    Ok(())
}

// Config file, loaded once at startup
pub mod config;

// Error types for config, storage and paint export
pub mod error;

// Pointer gestures and window chrome interaction
#[path = "inputHandler/mod.rs"]
pub mod input_handler;

// Paint canvas: tools, raster, undo, export
pub mod paint;

// Desktop shell: icons, taskbar, start menu, content, terminal host
pub mod shell;

// Window manager state
pub mod state;

// Key-value layout store and export files
pub mod storage;

// Tauri command surface over the window manager
#[cfg(feature = "webview")]
pub mod commands;

use config::DesktopConfig;
use tracing::info;

/// Run the desktop in the terminal until the user quits
pub async fn run(config: DesktopConfig) -> anyhow::Result<()> {
    info!(
        "[Shell] Starting desktop (data dir {})",
        config.data_dir.display()
    );
    shell::tui::run(config).await?;
    info!("[Shell] Desktop closed");
    Ok(())
}

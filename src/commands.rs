// Tauri commands exposing the window manager to a webview frontend.
// Every mutation emits an event so the frontend can re-render from the payload.

use serde_json::Value;
use std::sync::Mutex;
use tauri::{AppHandle, Builder, Emitter, Runtime, State};

use crate::config::DesktopConfig;
use crate::state::geometry::{Position, Size};
use crate::state::window::WindowState;
use crate::state::WindowManager;

fn emit_changed<R: Runtime>(app: &AppHandle<R>, window: Option<&WindowState>) -> Result<(), String> {
    if let Some(window) = window {
        app.emit("window-state-changed", window.clone())
            .map_err(|e| e.to_string())?;
    }
    Ok(())
}

#[tauri::command]
fn open_window<R: Runtime>(
    id: String,
    title: String,
    component_key: String,
    props: Option<Value>,
    size: Option<Size>,
    app: AppHandle<R>,
    state: State<'_, Mutex<WindowManager>>,
) -> Result<WindowState, String> {
    let mut manager = state.lock().map_err(|e| e.to_string())?;
    let existed = manager.get(&id).is_some();
    let window = manager
        .open_window(&id, &title, &component_key, props, size)
        .clone();

    let event = if existed {
        "window-state-changed"
    } else {
        "window-opened"
    };
    app.emit(event, window.clone()).map_err(|e| e.to_string())?;
    Ok(window)
}

#[tauri::command]
fn close_window<R: Runtime>(
    id: String,
    app: AppHandle<R>,
    state: State<'_, Mutex<WindowManager>>,
) -> Result<(), String> {
    let mut manager = state.lock().map_err(|e| e.to_string())?;
    if manager.close_window(&id).is_some() {
        app.emit("window-closed", id).map_err(|e| e.to_string())?;
    }
    Ok(())
}

#[tauri::command]
fn focus_window<R: Runtime>(
    id: String,
    app: AppHandle<R>,
    state: State<'_, Mutex<WindowManager>>,
) -> Result<(), String> {
    let mut manager = state.lock().map_err(|e| e.to_string())?;
    emit_changed(&app, manager.focus_window(&id))
}

#[tauri::command]
fn minimize_window<R: Runtime>(
    id: String,
    app: AppHandle<R>,
    state: State<'_, Mutex<WindowManager>>,
) -> Result<(), String> {
    let mut manager = state.lock().map_err(|e| e.to_string())?;
    emit_changed(&app, manager.minimize_window(&id))
}

#[tauri::command]
fn restore_window<R: Runtime>(
    id: String,
    app: AppHandle<R>,
    state: State<'_, Mutex<WindowManager>>,
) -> Result<(), String> {
    let mut manager = state.lock().map_err(|e| e.to_string())?;
    emit_changed(&app, manager.restore_window(&id))
}

#[tauri::command]
fn maximize_window<R: Runtime>(
    id: String,
    app: AppHandle<R>,
    state: State<'_, Mutex<WindowManager>>,
) -> Result<(), String> {
    let mut manager = state.lock().map_err(|e| e.to_string())?;
    emit_changed(&app, manager.maximize_window(&id))
}

#[tauri::command]
fn move_window<R: Runtime>(
    id: String,
    position: Position,
    app: AppHandle<R>,
    state: State<'_, Mutex<WindowManager>>,
) -> Result<(), String> {
    let mut manager = state.lock().map_err(|e| e.to_string())?;
    emit_changed(&app, manager.move_window(&id, position))
}

#[tauri::command]
fn resize_window<R: Runtime>(
    id: String,
    size: Size,
    app: AppHandle<R>,
    state: State<'_, Mutex<WindowManager>>,
) -> Result<(), String> {
    let mut manager = state.lock().map_err(|e| e.to_string())?;
    emit_changed(&app, manager.resize_window(&id, size))
}

#[tauri::command]
fn list_windows(state: State<'_, Mutex<WindowManager>>) -> Result<Vec<WindowState>, String> {
    let manager = state.lock().map_err(|e| e.to_string())?;
    Ok(manager.windows().to_vec())
}

/// Manage a fresh window manager and install the commands on `builder`
pub fn register<R: Runtime>(builder: Builder<R>, config: &DesktopConfig) -> Builder<R> {
    builder
        .manage(Mutex::new(WindowManager::new(config)))
        .invoke_handler(tauri::generate_handler![
            open_window,
            close_window,
            focus_window,
            minimize_window,
            restore_window,
            maximize_window,
            move_window,
            resize_window,
            list_windows,
        ])
}

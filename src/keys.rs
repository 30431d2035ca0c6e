use crate::app::App;
use crate::state::app_state::Focus;
use crate::state::messages::NetworkRequest;
use crossterm::event::KeyCode::Char;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::error;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

pub async fn handle_key_bindings(
    key_event: KeyEvent,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
) {
    let mut guard = app.lock().await;

    // Overlays swallow all input until closed.
    if guard.state.alert.is_some() {
        if matches!(key_event.code, KeyCode::Enter | KeyCode::Esc) {
            guard.dismiss_alert();
        }
        return;
    }

    if guard.state.popup.is_some() {
        match key_event.code {
            KeyCode::Esc | Char('c') | Char('q') => guard.close_popup(),
            Char('j') | KeyCode::Down => guard.scroll_popup(true),
            Char('k') | KeyCode::Up => guard.scroll_popup(false),
            _ => {}
        }
        return;
    }

    if guard.state.form.editing {
        match (key_event.code, key_event.modifiers) {
            (Char('c'), KeyModifiers::CONTROL) => quit(),
            (KeyCode::Enter | KeyCode::Esc, _) => guard.stop_editing(),
            (KeyCode::Tab | KeyCode::Down, _) => guard.state.form.select_next(),
            (KeyCode::BackTab | KeyCode::Up, _) => guard.state.form.select_prev(),
            (KeyCode::Backspace, _) => guard.state.form.pop_char(),
            (Char(c), _) => guard.state.form.push_char(c),
            _ => {}
        }
        return;
    }

    let mut fetch = false;

    match (guard.state.focus, key_event.code, key_event.modifiers) {
        // Quit
        (_, Char('q'), _) | (_, Char('c'), KeyModifiers::CONTROL) => quit(),

        // Fetch
        (_, KeyCode::F(5), _) | (_, Char('r'), KeyModifiers::CONTROL) => fetch = true,
        (Focus::Form, KeyCode::Enter, _) => fetch = true,

        (_, KeyCode::Tab, _) => guard.toggle_focus(),

        // Form navigation
        (Focus::Form, Char('j') | KeyCode::Down, _) => guard.state.form.select_next(),
        (Focus::Form, Char('k') | KeyCode::Up, _) => guard.state.form.select_prev(),
        (Focus::Form, Char('i') | Char('e'), _) => guard.start_editing(),

        // Tree navigation
        (Focus::Tree, Char('j') | KeyCode::Down, _) => guard.state.tree.cursor_down(),
        (Focus::Tree, Char('k') | KeyCode::Up, _) => guard.state.tree.cursor_up(),
        (Focus::Tree, Char('g') | KeyCode::Home, _) => guard.state.tree.cursor_first(),
        (Focus::Tree, Char('G') | KeyCode::End, _) => guard.state.tree.cursor_last(),
        (Focus::Tree, KeyCode::Enter | Char(' '), _) => guard.activate_selected(),
        (Focus::Tree, Char('o'), _) => guard.set_all_expanded(true),
        (Focus::Tree, Char('O'), _) => guard.set_all_expanded(false),

        // Global
        (_, Char('f'), _) => guard.toggle_full_screen(),
        (_, Char('"'), _) => guard.toggle_show_logs(),

        _ => {}
    }

    drop(guard);
    if fetch {
        request_fetch(app, network_requests).await;
    }
}

/// Start a fetch from the current form, unless one is already running.
pub async fn request_fetch(app: &Arc<Mutex<App>>, network_requests: &mpsc::Sender<NetworkRequest>) {
    let Some(request) = app.lock().await.begin_fetch() else {
        return;
    };

    let request_id = request.request_id();
    if let Err(e) = network_requests.send(request).await {
        error!("Failed to send network request: {e}");
        app.lock().await.on_fetch_failed(request_id, e.to_string());
    }
}

fn quit() {
    crate::cleanup_terminal();
    std::process::exit(0);
}

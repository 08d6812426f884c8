use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use log::debug;
use tokio::sync::oneshot;

use crate::server::core::ServerState;

/// Upgrade to a WebSocket that receives a single `reload` message
pub async fn livereload_handler(ws: WebSocketUpgrade, State(state): State<ServerState>) -> Response {
    let reload = state.hub.subscribe();
    ws.on_upgrade(move |socket| wait_for_reload(socket, reload))
}

async fn wait_for_reload(mut socket: WebSocket, reload: oneshot::Receiver<()>) {
    if reload.await.is_err() {
        return;
    }

    if let Err(e) = socket.send(Message::Text("reload".into())).await {
        debug!("Live reload client went away: {}", e);
        return;
    }
    let _ = socket.send(Message::Close(None)).await;
}

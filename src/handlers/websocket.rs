use futures_util::sink::SinkExt;
use futures_util::stream::StreamExt;
use log::{error, info};
use std::convert::Infallible;
use tokio::sync::mpsc;
use warp::ws::{Message, WebSocket};
use warp::Filter;

use crate::constants::{OUTBOUND_QUEUE_CAPACITY, WS_PATH};
use crate::core::server::SharedServerManager;
use crate::core::session::run_session;

/// The single WebSocket endpoint. Any origin is accepted.
pub fn ws_route(
    server: SharedServerManager,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    warp::path(WS_PATH)
        .and(warp::path::end())
        .and(warp::ws())
        .and(with_server(server))
        .map(|ws: warp::ws::Ws, server: SharedServerManager| {
            ws.on_upgrade(move |socket| handle_ws_client(socket, server))
        })
}

// Helper function to include the shared world in the request
fn with_server(
    server: SharedServerManager,
) -> impl Filter<Extract = (SharedServerManager,), Error = Infallible> + Clone {
    warp::any().map(move || server.clone())
}

// Handle a WebSocket connection
pub async fn handle_ws_client(ws: WebSocket, server: SharedServerManager) {
    let (mut ws_tx, ws_rx) = ws.split();
    let (tx, mut rx) = mpsc::channel::<Message>(OUTBOUND_QUEUE_CAPACITY);

    // Forward broadcasts to the socket; ends once the registry drops its sender
    tokio::task::spawn(async move {
        while let Some(message) = rx.recv().await {
            if let Err(e) = ws_tx.send(message).await {
                error!("Failed to send WebSocket message: {}", e);
                break;
            }
        }
        let _ = ws_tx.close().await;
    });

    match run_session(ws_rx, tx, server).await {
        Ok(report) => info!(
            "Session for player {} closed ({} applied, {} rejected)",
            report.player_id, report.messages_applied, report.messages_rejected
        ),
        Err(e) => error!("Session terminated with error: {}", e),
    }
}

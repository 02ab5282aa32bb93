//! Background connection to the chat backend.
//!
//! A single worker thread owns the WebSocket so the render loop never blocks.
//! Commands go in over a channel, completed replies come back tagged with the
//! request id they answer. One request is in flight at a time by construction:
//! the worker reads frames until the current request terminates before it
//! picks up the next command.
use std::net::TcpStream;
use std::thread;
use std::time::Duration;

use bevy::log::{debug, info, warn};
use bevy::prelude::*;
use crossbeam_channel::{unbounded, Receiver, Sender};
use tungstenite::{connect, stream::MaybeTlsStream, Message, WebSocket};

use crate::dialogue::{
    errors::ChatError,
    types::{ChatPayload, ChatRequestId, NpcReply, WireFrame},
};

const DEFAULT_WS_URL: &str = "ws://localhost:8000/ws/chat";
const DEFAULT_HTTP_URL: &str = "http://localhost:8000";
const RESET_MEMORY_PATH: &str = "/reset-memory";

/// A backend that stops streaming mid-reply must not wedge the worker; a read
/// past this deadline fails the request and later commands stay viable.
const READ_TIMEOUT: Duration = Duration::from_secs(30);

type SocketReply = (ChatRequestId, Result<NpcReply, ChatError>);

enum SocketCommand {
    Send {
        request_id: ChatRequestId,
        npc_id: &'static str,
        message: String,
    },
    Reset,
}

/// Handle to the chat worker thread.
#[derive(Resource)]
pub struct ChatSocket {
    commands: Sender<SocketCommand>,
    replies: Receiver<SocketReply>,
    reset_acks: Receiver<()>,
}

impl ChatSocket {
    /// Reads backend URLs from the environment and starts the worker.
    pub fn spawn() -> Self {
        let ws_url =
            std::env::var("GAME_API_WS_URL").unwrap_or_else(|_| DEFAULT_WS_URL.to_string());
        let http_url =
            std::env::var("GAME_API_HTTP_URL").unwrap_or_else(|_| DEFAULT_HTTP_URL.to_string());

        let (command_tx, command_rx) = unbounded();
        let (reply_tx, reply_rx) = unbounded();
        let (ack_tx, ack_rx) = unbounded();

        let builder = thread::Builder::new().name("chat-socket".to_string());
        if let Err(err) =
            builder.spawn(move || run_worker(ws_url, http_url, command_rx, reply_tx, ack_tx))
        {
            warn!("Failed to start chat worker thread: {}", err);
        }

        Self {
            commands: command_tx,
            replies: reply_rx,
            reset_acks: ack_rx,
        }
    }

    pub fn send_chat(&self, request_id: ChatRequestId, npc_id: &'static str, message: String) {
        let command = SocketCommand::Send {
            request_id,
            npc_id,
            message,
        };
        if self.commands.send(command).is_err() {
            warn!("Chat worker is gone; request #{} dropped", request_id.value());
        }
    }

    pub fn request_reset(&self) {
        if self.commands.send(SocketCommand::Reset).is_err() {
            warn!("Chat worker is gone; memory reset dropped");
        }
    }

    /// Non-blocking poll for the next completed reply.
    pub fn try_recv(&self) -> Option<SocketReply> {
        self.replies.try_recv().ok()
    }

    /// True once a pending memory reset has been acknowledged by the backend.
    pub fn try_recv_reset_ack(&self) -> bool {
        self.reset_acks.try_recv().is_ok()
    }
}

type Socket = WebSocket<MaybeTlsStream<TcpStream>>;

fn run_worker(
    ws_url: String,
    http_url: String,
    commands: Receiver<SocketCommand>,
    replies: Sender<SocketReply>,
    reset_acks: Sender<()>,
) {
    let mut socket: Option<Socket> = None;
    let http = reqwest::blocking::Client::new();

    while let Ok(command) = commands.recv() {
        match command {
            SocketCommand::Send {
                request_id,
                npc_id,
                message,
            } => {
                let result = send_and_await(&mut socket, &ws_url, npc_id, message);
                if result.is_err() {
                    // The connection state is suspect after any failure.
                    socket = None;
                }
                if replies.send((request_id, result)).is_err() {
                    break;
                }
            }
            SocketCommand::Reset => {
                let url = format!("{}{}", http_url, RESET_MEMORY_PATH);
                match http.post(&url).send() {
                    Ok(response) if response.status().is_success() => {
                        info!("Backend NPC memory reset");
                        let _ = reset_acks.send(());
                    }
                    Ok(response) => {
                        warn!("Memory reset rejected with status {}", response.status());
                    }
                    Err(err) => warn!("Memory reset request failed: {}", err),
                }
            }
        }
    }
}

fn send_and_await(
    socket: &mut Option<Socket>,
    ws_url: &str,
    npc_id: &'static str,
    message: String,
) -> Result<NpcReply, ChatError> {
    if socket.is_none() {
        let (connected, _response) =
            connect(ws_url).map_err(|err| ChatError::connect(err.to_string()))?;
        if let MaybeTlsStream::Plain(stream) = connected.get_ref() {
            if let Err(err) = stream.set_read_timeout(Some(READ_TIMEOUT)) {
                warn!("Could not set backend read timeout: {}", err);
            }
        }
        info!("Connected to chat backend at {}", ws_url);
        *socket = Some(connected);
    }
    let ws = socket.as_mut().ok_or(ChatError::SocketClosed)?;

    let payload = ChatPayload {
        npc_id: npc_id.to_string(),
        message,
    };
    let text = serde_json::to_string(&payload).map_err(|err| ChatError::protocol(err.to_string()))?;
    ws.send(Message::Text(text))
        .map_err(|_| ChatError::SocketClosed)?;

    loop {
        let frame = match ws.read() {
            Ok(Message::Text(text)) => serde_json::from_str::<WireFrame>(&text)
                .map_err(|err| ChatError::protocol(err.to_string()))?,
            Ok(Message::Close(_)) => return Err(ChatError::SocketClosed),
            Ok(_) => continue,
            Err(_) => return Err(ChatError::SocketClosed),
        };

        if let Some(error) = frame.error {
            return Err(ChatError::backend(error));
        }
        if frame.is_terminal() {
            return Ok(NpcReply::from_terminal_frame(frame));
        }
        if let Some(chunk) = &frame.chunk {
            debug!("chat chunk ({} bytes)", chunk.len());
        }
    }
}

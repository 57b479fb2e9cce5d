//! Shared helpers for the server integration tests.
#![allow(dead_code)]

use std::{net::SocketAddr, sync::Arc, time::Duration};

use duet_server::{
    config::ServerConfig,
    domain::ParticipantId,
    infrastructure::{
        dto::websocket::{ClientCommand, ServerEvent},
        repository::InMemoryStore,
    },
    ui::{AppState, Server},
};
use futures_util::{SinkExt, StreamExt};
use tokio::{net::TcpListener, sync::oneshot, task::JoinHandle};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

pub const EVENT_TIMEOUT: Duration = Duration::from_secs(3);

pub fn participant(id: &str) -> ParticipantId {
    ParticipantId::new(id.to_string()).unwrap()
}

/// In-process server bound to an ephemeral port
pub struct TestServer {
    pub addr: SocketAddr,
    pub store: Arc<InMemoryStore>,
    shutdown: Option<oneshot::Sender<()>>,
    handle: JoinHandle<()>,
}

impl TestServer {
    pub async fn start() -> Self {
        let store = Arc::new(InMemoryStore::new());
        let state = AppState::with_store(store.clone(), &ServerConfig::default());
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (shutdown, signal) = oneshot::channel::<()>();

        let handle = tokio::spawn(async move {
            Server::new(state)
                .serve(listener, async {
                    let _ = signal.await;
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            store,
            shutdown: Some(shutdown),
            handle,
        }
    }

    pub fn ws_url(&self, participant_id: Option<&str>) -> String {
        match participant_id {
            Some(id) => format!("ws://{}/ws?participant_id={}", self.addr, id),
            None => format!("ws://{}/ws", self.addr),
        }
    }

    pub fn http_url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        self.handle.abort();
    }
}

/// WebSocket client speaking the JSON command / event protocol
pub struct WsClient {
    stream: WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>,
}

impl WsClient {
    pub async fn connect(url: &str) -> Self {
        let (stream, _) = connect_async(url).await.unwrap();
        Self { stream }
    }

    pub async fn send(&mut self, command: &ClientCommand) {
        let json = serde_json::to_string(command).unwrap();
        self.stream.send(Message::Text(json.into())).await.unwrap();
    }

    /// Next event, failing the test after `EVENT_TIMEOUT`
    pub async fn next_event(&mut self) -> ServerEvent {
        loop {
            let frame = tokio::time::timeout(EVENT_TIMEOUT, self.stream.next())
                .await
                .expect("timed out waiting for a server event")
                .expect("connection closed")
                .unwrap();
            if let Message::Text(text) = frame {
                return serde_json::from_str(text.as_str()).unwrap();
            }
        }
    }

    /// Skip events until one satisfies `predicate`
    pub async fn wait_for<F>(&mut self, predicate: F) -> ServerEvent
    where
        F: Fn(&ServerEvent) -> bool,
    {
        loop {
            let event = self.next_event().await;
            if predicate(&event) {
                return event;
            }
        }
    }

    /// Skip events until a status event with `status`
    pub async fn wait_for_status(&mut self, status: &str) -> ServerEvent {
        self.wait_for(
            |event| matches!(event, ServerEvent::Status { status: s, .. } if s == status),
        )
        .await
    }

    /// Skip events until a message list with exactly `texts`
    pub async fn wait_for_messages(&mut self, texts: &[&str]) -> ServerEvent {
        self.wait_for(|event| match event {
            ServerEvent::Messages { messages, .. } => messages
                .iter()
                .map(|m| m.text.as_str())
                .eq(texts.iter().copied()),
            _ => false,
        })
        .await
    }

    pub async fn close(mut self) {
        let _ = self.stream.close(None).await;
    }
}

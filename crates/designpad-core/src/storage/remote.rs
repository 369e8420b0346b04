//! Remote design store over a WebSocket (native only).
//!
//! Each backend call is one JSON request answered by one JSON response with
//! the same `id`. Calls are serialized over a single connection.

use super::{BoxFuture, DesignBackend, DesignInfo, PersistenceError, PersistenceResult};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::net::TcpStream;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use tungstenite::stream::MaybeTlsStream;
use tungstenite::{Message, WebSocket, connect};
use url::Url;

/// Requests sent to the store.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum RpcRequest<'a> {
    SaveDesign { id: u64, name: &'a str, payload: &'a str },
    LoadDesign { id: u64, name: &'a str },
    ListDesigns { id: u64 },
    DeleteDesign { id: u64, name: &'a str },
    GetDesignVersion { id: u64, name: &'a str },
}

/// Responses received from the store.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum RpcResponse {
    Ok {
        id: u64,
        #[serde(default)]
        result: serde_json::Value,
    },
    Error { id: u64, message: String },
}

impl RpcResponse {
    fn id(&self) -> u64 {
        match self {
            RpcResponse::Ok { id, .. } | RpcResponse::Error { id, .. } => *id,
        }
    }
}

/// A listing entry as stores send it: either a record or a
/// `(name, saved_at, version)` tuple.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ListEntry {
    Record(DesignInfo),
    Tuple(String, i64, u64),
}

impl From<ListEntry> for DesignInfo {
    fn from(entry: ListEntry) -> Self {
        match entry {
            ListEntry::Record(info) => info,
            ListEntry::Tuple(name, saved_at, version) => DesignInfo { name, saved_at, version },
        }
    }
}

/// Backend talking to a remote store over `ws://` or `wss://`.
pub struct RemoteBackend {
    url: String,
    socket: Mutex<WebSocket<MaybeTlsStream<TcpStream>>>,
    next_id: AtomicU64,
}

impl RemoteBackend {
    /// Connect to a remote store. Blocks until the handshake completes.
    pub fn connect(url: &str) -> PersistenceResult<Self> {
        validate_url(url)?;
        log::info!("Connecting to design store at {}", url);
        let (socket, response) =
            connect(url).map_err(|e| PersistenceError::Transport(format!("Failed to connect: {}", e)))?;
        log::info!("Design store connected, status: {}", response.status());
        Ok(Self {
            url: url.to_string(),
            socket: Mutex::new(socket),
            next_id: AtomicU64::new(1),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Save and return the stored version. Stores that acknowledge a save
    /// with an empty result are asked for the version afterwards.
    fn save(&self, name: &str, payload: &str) -> PersistenceResult<u64> {
        let id = self.next_id();
        let acked: Option<u64> = self.call(&RpcRequest::SaveDesign { id, name, payload }, id)?;
        if let Some(version) = acked {
            return Ok(version);
        }

        let id = self.next_id();
        let version: Option<u64> = self.call(&RpcRequest::GetDesignVersion { id, name }, id)?;
        version.ok_or_else(|| {
            PersistenceError::Transport(format!("Store reported no version for '{}' after saving", name))
        })
    }

    /// Send one request and wait for its response.
    fn call<T: DeserializeOwned>(&self, request: &RpcRequest<'_>, id: u64) -> PersistenceResult<T> {
        let text = serde_json::to_string(request).map_err(|e| PersistenceError::Serialization(e.to_string()))?;
        let mut socket = self
            .socket
            .lock()
            .map_err(|e| PersistenceError::Transport(format!("Lock error: {}", e)))?;

        log::debug!("RPC -> {}", text);
        socket
            .send(Message::Text(text))
            .map_err(|e| PersistenceError::Transport(format!("Send failed: {}", e)))?;

        loop {
            let message = socket
                .read()
                .map_err(|e| PersistenceError::Transport(format!("Receive failed: {}", e)))?;
            match message {
                Message::Text(txt) => {
                    log::debug!("RPC <- {}", txt);
                    let response: RpcResponse = serde_json::from_str(&txt)
                        .map_err(|e| PersistenceError::Serialization(format!("Bad response: {}", e)))?;
                    if response.id() != id {
                        log::warn!("Ignoring response for request {}", response.id());
                        continue;
                    }
                    return decode_result(response);
                }
                // Pings are answered by tungstenite itself on the next read.
                Message::Close(_) => {
                    return Err(PersistenceError::Transport("Connection closed by server".to_string()));
                }
                _ => {}
            }
        }
    }
}

impl Drop for RemoteBackend {
    fn drop(&mut self) {
        if let Ok(mut socket) = self.socket.lock() {
            let _ = socket.close(None);
        }
    }
}

fn validate_url(url: &str) -> PersistenceResult<()> {
    let parsed = Url::parse(url).map_err(|e| PersistenceError::Validation(format!("Invalid URL: {}", e)))?;
    if parsed.scheme() != "ws" && parsed.scheme() != "wss" {
        return Err(PersistenceError::Validation(format!(
            "Invalid WebSocket URL scheme: {}",
            parsed.scheme()
        )));
    }
    Ok(())
}

fn decode_result<T: DeserializeOwned>(response: RpcResponse) -> PersistenceResult<T> {
    match response {
        RpcResponse::Ok { result, .. } => serde_json::from_value(result)
            .map_err(|e| PersistenceError::Serialization(format!("Unexpected result: {}", e))),
        RpcResponse::Error { message, .. } => Err(PersistenceError::Transport(message)),
    }
}

fn decode_list(entries: Vec<ListEntry>) -> Vec<DesignInfo> {
    entries.into_iter().map(DesignInfo::from).collect()
}

impl DesignBackend for RemoteBackend {
    fn save_design(&self, name: &str, payload: &str) -> BoxFuture<'_, PersistenceResult<u64>> {
        let name = name.to_string();
        let payload = payload.to_string();
        Box::pin(async move { self.save(&name, &payload) })
    }

    fn load_design(&self, name: &str) -> BoxFuture<'_, PersistenceResult<Option<String>>> {
        let name = name.to_string();
        Box::pin(async move {
            let id = self.next_id();
            self.call(&RpcRequest::LoadDesign { id, name: &name }, id)
        })
    }

    fn list_designs(&self) -> BoxFuture<'_, PersistenceResult<Vec<DesignInfo>>> {
        Box::pin(async move {
            let id = self.next_id();
            self.call(&RpcRequest::ListDesigns { id }, id).map(decode_list)
        })
    }

    fn delete_design(&self, name: &str) -> BoxFuture<'_, PersistenceResult<bool>> {
        let name = name.to_string();
        Box::pin(async move {
            let id = self.next_id();
            self.call(&RpcRequest::DeleteDesign { id, name: &name }, id)
        })
    }

    fn design_version(&self, name: &str) -> BoxFuture<'_, PersistenceResult<Option<u64>>> {
        let name = name.to_string();
        Box::pin(async move {
            let id = self.next_id();
            self.call(&RpcRequest::GetDesignVersion { id, name: &name }, id)
        })
    }
}

//! The local request channel.
//!
//! A named local stream socket carrying one message per connection: the
//! UTF-16 little-endian encoding of a workspace id with no length prefix
//! and no terminator. The server reads until end-of-stream; the response
//! is the disconnect itself. The socket lives in the per-user runtime
//! directory.

use restora_core::utils::paths;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::io::AsyncReadExt;
use tokio::net::{UnixListener, UnixStream};
use tracing::{debug, warn};

/// Errors surfaced by the request channel.
#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("channel I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The payload was not valid UTF-16LE.
    #[error("invalid request encoding: {0}")]
    InvalidEncoding(String),

    /// The socket path is occupied by something that is not a socket.
    #[error("socket path {0:?} is occupied by a non-socket file")]
    PathOccupied(PathBuf),
}

/// Encodes a workspace id as UTF-16LE bytes.
pub fn encode_workspace_id(workspace_id: &str) -> Vec<u8> {
    workspace_id
        .encode_utf16()
        .flat_map(|unit| unit.to_le_bytes())
        .collect()
}

/// Decodes a UTF-16LE payload back into a workspace id.
pub fn decode_workspace_id(payload: &[u8]) -> Result<String, ChannelError> {
    if payload.len() % 2 != 0 {
        return Err(ChannelError::InvalidEncoding(format!(
            "odd payload length {}",
            payload.len()
        )));
    }
    let units: Vec<u16> = payload
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    String::from_utf16(&units)
        .map_err(|e| ChannelError::InvalidEncoding(e.to_string()))
}

/// Resolves the socket path for a configured socket name.
pub fn socket_path(socket_name: &str) -> PathBuf {
    paths::runtime_dir().join(socket_name)
}

/// Server end of the request channel.
pub struct RequestChannel {
    listener: UnixListener,
    path: PathBuf,
}

impl RequestChannel {
    /// Binds the channel at `path`, replacing a stale socket left behind
    /// by a previous instance.
    pub fn bind(path: &Path) -> Result<Self, ChannelError> {
        if path.exists() {
            let metadata = std::fs::metadata(path)?;
            if metadata.is_dir() {
                return Err(ChannelError::PathOccupied(path.to_path_buf()));
            }
            std::fs::remove_file(path)?;
        }
        let listener = UnixListener::bind(path)?;
        debug!(path = %path.display(), "request channel bound");
        Ok(RequestChannel {
            listener,
            path: path.to_path_buf(),
        })
    }

    /// The path the channel is bound at.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Waits for the next request and returns the decoded workspace id.
    ///
    /// Reads a single connection to end-of-stream and drops it, which is
    /// the only response the protocol defines.
    pub async fn recv(&self) -> Result<String, ChannelError> {
        let (mut stream, _addr) = self.listener.accept().await?;
        let mut payload = Vec::new();
        stream.read_to_end(&mut payload).await?;
        let workspace_id = decode_workspace_id(&payload)?;
        debug!(%workspace_id, "request received");
        Ok(workspace_id)
    }
}

impl Drop for RequestChannel {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %self.path.display(), error = %e, "failed to remove socket");
            }
        }
    }
}

/// Sends a single workspace-id request to the server listening at `path`.
///
/// The write half is shut down after the payload so the server observes
/// end-of-stream; the function returns once the server disconnects.
pub async fn send_request(path: &Path, workspace_id: &str) -> Result<(), ChannelError> {
    use tokio::io::AsyncWriteExt;

    let mut stream = UnixStream::connect(path).await?;
    stream.write_all(&encode_workspace_id(workspace_id)).await?;
    stream.shutdown().await?;

    // Drain until the server hangs up; the disconnect is the ack.
    let mut sink = [0u8; 16];
    loop {
        match stream.read(&mut sink).await {
            Ok(0) => break,
            Ok(_) => continue,
            Err(e) => return Err(ChannelError::Io(e)),
        }
    }
    Ok(())
}

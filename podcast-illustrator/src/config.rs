use std::net::SocketAddr;
use std::path::PathBuf;

/// Runtime settings shared by the server and its handlers.
#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub upload_dir: PathBuf,
    /// Request body limit, applies to the whole multipart body.
    pub max_upload_bytes: usize,
    /// Reported by `/api/health`.
    pub platform: String,
}

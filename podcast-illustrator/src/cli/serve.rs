use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::{signal, sync::watch};

use crate::config::Config;
use crate::uploads::UploadStore;
use crate::util::logging::{self, LogFormat};

#[derive(Parser, Debug)]
pub struct ServeCommand {
    /// Address to bind
    #[arg(long, env = "LISTEN_HOST", default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub host: IpAddr,

    /// HTTP server port
    #[arg(short, long, env = "PORT", default_value = "5000")]
    pub port: u16,

    /// Directory for uploaded files (a temporary directory when unset)
    #[arg(long, env = "UPLOAD_DIR")]
    pub upload_dir: Option<PathBuf>,

    /// Maximum request body size in MiB
    #[arg(long, env = "MAX_UPLOAD_MB", default_value = "200")]
    pub max_upload_mb: usize,

    /// Platform name reported by the health endpoint
    #[arg(long, env = "PLATFORM", default_value = "railway")]
    pub platform: String,

    /// Log output format
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

impl ServeCommand {
    pub async fn run(self) -> Result<()> {
        logging::init(self.log_format);

        // Keep the temp dir alive until shutdown so it is removed afterwards
        let (upload_dir, temp_dir) = match &self.upload_dir {
            Some(dir) => {
                tokio::fs::create_dir_all(dir)
                    .await
                    .with_context(|| format!("creating upload dir {}", dir.display()))?;
                (dir.clone(), None)
            }
            None => {
                let temp_dir = tempfile::Builder::new()
                    .prefix("podcast-illustrator-")
                    .tempdir()
                    .context("creating temporary upload dir")?;
                (temp_dir.path().to_path_buf(), Some(temp_dir))
            }
        };

        let config = Arc::new(Config {
            addr: SocketAddr::new(self.host, self.port),
            upload_dir,
            max_upload_bytes: self.max_upload_mb.saturating_mul(1024 * 1024),
            platform: self.platform,
        });
        let uploads = Arc::new(UploadStore::new(config.upload_dir.clone()));

        tracing::info!(
            addr = %config.addr,
            upload_dir = %config.upload_dir.display(),
            max_upload_bytes = config.max_upload_bytes,
            "starting server"
        );

        let listener = crate::server::bind(config.addr).await?;
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let mut server_handle = tokio::spawn(crate::server::run_server(
            listener,
            Arc::clone(&config),
            uploads,
            shutdown_rx,
        ));

        tokio::select! {
            res = wait_for_shutdown_signal() => {
                res?;
                tracing::info!("shutting down");
                let _ = shutdown_tx.send(true);
                server_handle.await.context("server task panicked")??;
            }
            res = &mut server_handle => {
                res.context("server task panicked")?.context("server stopped")?;
            }
        }

        drop(temp_dir);

        tracing::info!("done");
        Ok(())
    }
}

/// Resolve on Ctrl+C, or on SIGTERM where available (container stop).
async fn wait_for_shutdown_signal() -> Result<()> {
    #[cfg(unix)]
    {
        let mut terminate = signal::unix::signal(signal::unix::SignalKind::terminate())?;
        tokio::select! {
            res = signal::ctrl_c() => res?,
            _ = terminate.recv() => {}
        }
    }

    #[cfg(not(unix))]
    signal::ctrl_c().await?;

    Ok(())
}

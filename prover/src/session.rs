use crate::{ProvingToolchain, Result};
use std::sync::Arc;
use std::time::Instant;
use tokio::runtime::Handle;
use tracing::{info, warn};

/// Scoped access to a ready toolchain.
///
/// `open` waits for the readiness signal and [`close`](Self::close) awaits
/// [`ProvingToolchain::shutdown`]. A session dropped without being closed
/// schedules the shutdown on the current runtime instead; either way the
/// toolchain is shut down at most once.
pub struct ToolchainSession<T: ProvingToolchain> {
    toolchain: Arc<T>,
    closed: bool,
}

impl<T: ProvingToolchain> ToolchainSession<T> {
    pub async fn open(toolchain: T) -> Result<Self> {
        let started = Instant::now();
        toolchain.ready().await?;
        info!("🔌 Proving toolchain ready after {:?}", started.elapsed());
        Ok(Self {
            toolchain: Arc::new(toolchain),
            closed: false,
        })
    }

    pub fn toolchain(&self) -> &T {
        &self.toolchain
    }

    /// Shut the toolchain down and wait until it has released its resources.
    pub async fn close(mut self) {
        self.closed = true;
        info!("🔌 Shutting down proving toolchain");
        self.toolchain.shutdown().await;
    }
}

impl<T: ProvingToolchain> Drop for ToolchainSession<T> {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        match Handle::try_current() {
            Ok(handle) => {
                warn!("⚠️  Session dropped without close, shutting down in background");
                let toolchain = Arc::clone(&self.toolchain);
                handle.spawn(async move { toolchain.shutdown().await });
            }
            Err(_) => warn!("⚠️  No async runtime available, toolchain was not shut down"),
        }
    }
}

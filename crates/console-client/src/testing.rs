//! Test utilities for console-client
//!
//! Provides an in-process server harness and a navigator that records
//! legacy console redirects instead of performing them.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::net::TcpListener;
use url::Url;

use crate::navigation::Navigator;
use crate::{ConsoleClient, Result};

/// Navigator that remembers every URL it was asked to open
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    urls: Mutex<Vec<Url>>,
}

impl RecordingNavigator {
    /// URLs navigated to, in order
    pub fn urls(&self) -> Vec<Url> {
        self.urls.lock().clone()
    }

    /// Number of navigations so far
    pub fn count(&self) -> usize {
        self.urls.lock().len()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, url: &Url) {
        self.urls.lock().push(url.clone());
    }
}

/// A test server that automatically shuts down when dropped
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: ConsoleClient,
    pub navigator: Arc<RecordingNavigator>,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
    handle: Option<tokio::task::JoinHandle<()>>,
}

impl TestServer {
    /// Create a new test server from an axum Router
    ///
    /// # Example
    ///
    /// ```ignore
    /// use axum::{routing::get, Json, Router};
    /// use console_client::testing::TestServer;
    ///
    /// let router = Router::new().route(
    ///     "/console-api/registrars",
    ///     get(|| async { Json(serde_json::json!([])) }),
    /// );
    /// let server = TestServer::start(router).await?;
    ///
    /// let registrars = server.client.fetch_registrars().await?;
    /// ```
    pub async fn start<S>(router: axum::Router<S>) -> Result<Self>
    where
        S: Clone + Send + Sync + 'static,
        axum::Router<S>: Into<axum::Router>,
    {
        Self::start_with_timeout(router, Duration::from_secs(5), Duration::from_secs(2)).await
    }

    /// Create a new test server with custom timeouts
    pub async fn start_with_timeout<S>(
        router: axum::Router<S>,
        timeout: Duration,
        connect_timeout: Duration,
    ) -> Result<Self>
    where
        S: Clone + Send + Sync + 'static,
        axum::Router<S>: Into<axum::Router>,
    {
        // Bind to any available port
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

        let router: axum::Router = router.into();

        // Spawn the server
        let handle = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .ok();
        });

        // Give server a moment to start
        tokio::time::sleep(Duration::from_millis(10)).await;

        let navigator = Arc::new(RecordingNavigator::default());
        let base_url = format!("http://{}", addr);
        let client = ConsoleClient::with_config(&base_url, timeout, connect_timeout)?
            .with_navigator(navigator.clone());

        Ok(Self {
            addr,
            client,
            navigator,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        })
    }

    /// Shutdown the server gracefully
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        // Send shutdown signal if not already done
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        // Abort the task if still running
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_navigator() {
        let navigator = RecordingNavigator::default();
        let url = Url::parse("http://127.0.0.1:8080/registrar").unwrap();
        navigator.navigate(&url);
        navigator.navigate(&url);
        assert_eq!(navigator.count(), 2);
        assert_eq!(navigator.urls(), vec![url.clone(), url]);
    }
}

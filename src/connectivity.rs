//! Connectivity tracking.
//!
//! [`ConnectivityMonitor`] holds the current connected/disconnected state and
//! broadcasts transitions over a `tokio::sync::watch` channel.
//! [`NetworkProbe`] feeds it by checking whether the API host accepts TCP
//! connections.

use log::{debug, info, warn};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::constants::PROBE_TIMEOUT_MS;

/// Current connectivity state plus change notifications.
#[derive(Debug)]
pub struct ConnectivityMonitor {
    sender: watch::Sender<bool>,
}

impl ConnectivityMonitor {
    pub fn new(initially_connected: bool) -> Self {
        let (sender, _) = watch::channel(initially_connected);
        Self { sender }
    }

    /// Immediate poll of the last known state.
    pub fn is_connected(&self) -> bool {
        *self.sender.borrow()
    }

    /// Record the latest observation. Subscribers are only woken on change.
    pub fn set_connected(&self, connected: bool) {
        let changed = self.sender.send_if_modified(|current| {
            if *current == connected {
                false
            } else {
                *current = connected;
                true
            }
        });

        if changed {
            if connected {
                info!("🌐 Connectivity restored");
            } else {
                warn!("📴 Connectivity lost");
            }
        }
    }

    /// Receiver notified on every connectivity transition.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.sender.subscribe()
    }
}

impl Default for ConnectivityMonitor {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Reachability check against a `host:port` pair.
#[derive(Clone, Debug)]
pub struct NetworkProbe {
    address: String,
    timeout: Duration,
}

impl NetworkProbe {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            timeout: Duration::from_millis(PROBE_TIMEOUT_MS),
        }
    }

    /// Probe the host serving `url`, using the scheme's default port when none is given.
    pub fn for_url(url: &reqwest::Url) -> anyhow::Result<Self> {
        let host = url
            .host_str()
            .ok_or_else(|| anyhow::anyhow!("URL '{url}' has no host"))?;
        let port = url
            .port_or_known_default()
            .ok_or_else(|| anyhow::anyhow!("URL '{url}' has no port"))?;

        Ok(Self::new(format!("{host}:{port}")))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// Whether a TCP connection to the target succeeds within the timeout.
    pub async fn check(&self) -> bool {
        match tokio::time::timeout(self.timeout, TcpStream::connect(&self.address)).await {
            Ok(Ok(_)) => true,
            Ok(Err(e)) => {
                debug!("Probe to {} failed: {e}", self.address);
                false
            }
            Err(_) => {
                debug!("Probe to {} timed out", self.address);
                false
            }
        }
    }

    /// Check once and publish the result.
    pub async fn refresh(&self, monitor: &ConnectivityMonitor) -> bool {
        let connected = self.check().await;
        monitor.set_connected(connected);
        connected
    }

    /// Poll the target every `interval` and publish each observation.
    pub fn spawn(self, monitor: std::sync::Arc<ConnectivityMonitor>, interval: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                self.refresh(&monitor).await;
            }
        })
    }
}

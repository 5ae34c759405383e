//! Active health checking.
//!
//! # Responsibilities
//! - Periodically check every configured node with `HEAD /`
//! - Update node health based on results

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time;

use crate::hosts::HostProvider;
use crate::http::executor::RequestExecutor;
use crate::protocol::requests::ping_endpoint;

pub struct HealthMonitor {
    hosts: Arc<dyn HostProvider>,
    executor: RequestExecutor,
    interval: Duration,
}

impl HealthMonitor {
    pub fn new(hosts: Arc<dyn HostProvider>, executor: RequestExecutor, interval: Duration) -> Self {
        Self {
            hosts,
            executor,
            interval,
        }
    }

    /// Run on a background task until [`MonitorHandle::shutdown`] is called.
    pub fn spawn(self) -> MonitorHandle {
        let (shutdown, rx) = broadcast::channel(1);
        let task = tokio::spawn(self.run(rx));
        MonitorHandle { shutdown, task }
    }

    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(
            interval_secs = self.interval.as_secs(),
            nodes = self.hosts.nodes().len(),
            "Health monitor starting"
        );

        let mut ticker = time::interval(self.interval);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.check_all().await;
                }
                _ = shutdown.recv() => {
                    tracing::info!("Health monitor received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }

    /// Check every node once.
    pub async fn check_all(&self) {
        let endpoint = ping_endpoint();

        for node in self.hosts.nodes() {
            let healthy = match self.executor.execute(node, &endpoint).await {
                Ok(response) => {
                    let success = response.status.is_success();
                    if !success {
                        tracing::warn!(node = %node, status = %response.status, "Health check failed: non-success status");
                    }
                    success
                }
                Err(e) => {
                    tracing::warn!(node = %node, error = %e, "Health check failed: connection error");
                    false
                }
            };

            if healthy {
                self.hosts.mark_success(node);
            } else {
                self.hosts.mark_failure(node);
            }
        }
    }
}

/// Owns a running [`HealthMonitor`] task.
pub struct MonitorHandle {
    shutdown: broadcast::Sender<()>,
    task: JoinHandle<()>,
}

impl MonitorHandle {
    /// Signal the monitor to stop and wait for it to finish.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(());
        if let Err(e) = self.task.await {
            tracing::error!(error = %e, "Health monitor task failed");
        }
    }
}

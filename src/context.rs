//! Application context and dependency injection
//!
//! This module provides a centralized container for the services shared by the HTTP handlers.
//! Everything is created once during startup and accessed through this context.

use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::XcatServer;
use crate::monitor::metrics_collector::MetricsCollector;
use crate::utils::xcat_client::XcatRequester;

/// Connection settings for the xCAT server and the zHCP node
#[derive(Debug, Clone)]
pub struct XcatSettings {
    pub zhcpnode: String,
    pub username: String,
    pub password: String,
    /// Server address as given on the command line (`host.domain[:port]`)
    pub server: String,
    /// CA certificate; TLS verification is disabled without one
    pub cert: Option<PathBuf>,
}

/// Application context holding all singleton instances
#[derive(Clone)]
pub struct AppContext {
    /// Parsed xCAT server address
    server: XcatServer,

    /// Metrics collector - queries xCAT for every scrape
    metrics_collector: Arc<MetricsCollector<XcatRequester>>,
}

impl AppContext {
    /// Create a new application context from validated settings
    ///
    /// This should be called once during startup before creating the HTTP server.
    pub fn new(settings: XcatSettings) -> Result<Self> {
        tracing::info!("Initializing application context");

        if settings.zhcpnode.trim().is_empty() {
            return Err(anyhow::anyhow!("zhcpnode missing"));
        }

        let server: XcatServer = settings.server.parse()?;

        let requester = XcatRequester::new(
            &settings.zhcpnode,
            settings.username,
            settings.password,
            &server,
            settings.cert.as_deref(),
        )?;
        tracing::info!(
            url = requester.url(),
            tls_verify = settings.cert.is_some(),
            "xCAT requester initialized"
        );

        let metrics_collector = Arc::new(MetricsCollector::new(settings.zhcpnode, requester));
        tracing::info!("Metrics collector initialized");

        Ok(AppContext {
            server,
            metrics_collector,
        })
    }

    /// Get reference to the xCAT server address
    pub fn server(&self) -> &XcatServer {
        &self.server
    }

    /// Get reference to the metrics collector
    pub fn metrics_collector(&self) -> &Arc<MetricsCollector<XcatRequester>> {
        &self.metrics_collector
    }
}

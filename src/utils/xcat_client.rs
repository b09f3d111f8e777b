use crate::config::{self, XcatServer};
use anyhow::{Context, Result};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Certificate, Client};
use std::future::Future;
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// SMAPI queries issued through `smcli` on the zHCP node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum XcatQuery {
    PageInfo,
    SpoolInfo,
    CpuMemoryInfo,
    /// `-q 1`: volume definitions, `-e 1`: volume entries
    DiskDefinition,
    /// `-q 2`: free extents, `-e 1`: volume entries
    DiskFree,
}

impl XcatQuery {
    /// Command line passed to `smcli`
    pub fn command(self) -> &'static str {
        match self {
            XcatQuery::PageInfo => "System_Page_Utilization_Query -T ZHCP",
            XcatQuery::SpoolInfo => "System_Spool_Utilization_Query -T ZHCP",
            XcatQuery::CpuMemoryInfo => {
                "System_Performance_Information_Query -T ZHCP -k DETAILED_CPU=SHOW=NO"
            }
            XcatQuery::DiskDefinition => "Image_Volume_Space_Query_DM -T ZHCP -q 1 -e 1",
            XcatQuery::DiskFree => "Image_Volume_Space_Query_DM -T ZHCP -q 2 -e 1",
        }
    }

    /// Short name for log events
    pub fn name(self) -> &'static str {
        match self {
            XcatQuery::PageInfo => "page",
            XcatQuery::SpoolInfo => "spool",
            XcatQuery::CpuMemoryInfo => "cpu_memory",
            XcatQuery::DiskDefinition => "disk_def",
            XcatQuery::DiskFree => "disk_free",
        }
    }
}

/// Body of a `dsh` request running `query`
pub fn request_body(query: XcatQuery) -> String {
    format!(r#"["command=smcli {}"]"#, query.command())
}

/// Source of raw xCAT responses
///
/// Implementations return the response text, or an empty string when the request failed.
/// A single attempt is made per call.
pub trait QueryClient: Send + Sync {
    fn send_request(&self, query: XcatQuery) -> impl Future<Output = String> + Send;
}

/// Sends SMAPI queries to xCAT over HTTPS
pub struct XcatRequester {
    client: Client,
    url: String,
    username: String,
    password: String,
}

impl XcatRequester {
    /// Create a requester for a zHCP node
    ///
    /// Without a certificate file TLS verification is disabled. With one, that certificate is
    /// the only trusted root and verification stays on.
    pub fn new(
        zhcpnode: &str,
        username: String,
        password: String,
        server: &XcatServer,
        cert: Option<&Path>,
    ) -> Result<Self> {
        let builder = Client::builder().timeout(REQUEST_TIMEOUT);

        let builder = match cert {
            Some(path) => {
                let pem = std::fs::read(path)
                    .with_context(|| format!("failed to read certificate {}", path.display()))?;
                let certificate = Certificate::from_pem(&pem)
                    .with_context(|| format!("invalid certificate {}", path.display()))?;
                builder
                    .tls_built_in_root_certs(false)
                    .add_root_certificate(certificate)
            }
            None => builder.danger_accept_invalid_certs(true),
        };

        let client = builder.build().context("failed to create HTTP client")?;

        Ok(XcatRequester {
            client,
            url: config::dsh_url(server, zhcpnode),
            username,
            password,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl QueryClient for XcatRequester {
    async fn send_request(&self, query: XcatQuery) -> String {
        info!(query = query.name(), "Sending a request to xCAT");

        let result = self
            .client
            .put(&self.url)
            .query(&[
                ("userName", self.username.as_str()),
                ("password", self.password.as_str()),
                ("format", "json"),
            ])
            .header(CONTENT_TYPE, "text/plain")
            .body(request_body(query))
            .send()
            .await;

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                warn!(
                    query = query.name(),
                    timeout = e.is_timeout(),
                    error = %e,
                    "Failed to send the request"
                );
                return String::new();
            }
        };

        info!(
            query = query.name(),
            status = %response.status(),
            "Response status"
        );

        match response.text().await {
            Ok(text) => text,
            Err(e) => {
                warn!(query = query.name(), error = %e, "Failed to read the response body");
                String::new()
            }
        }
    }
}

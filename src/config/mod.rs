use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::str::FromStr;

// HTTP endpoint paths
pub const METRICS_URL: &str = "/metrics";
pub const REPORTS_URL: &str = "/reports";

// Prefix of every exported metric name
pub const METRIC_PREFIX: &str = "zvm";

// xCAT web services listen on HTTPS by default
pub const DEFAULT_XCAT_PORT: u16 = 443;

static SERVER_ADDRESS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<addr>[a-zA-Z0-9][a-zA-Z0-9\-]*(\.[a-zA-Z0-9][a-zA-Z0-9\-]*)+)(:(?P<port>\d+))?$",
    )
    .expect("Invalid server address regex")
});

/// Address of the xCAT management server, `host.domain[:port]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XcatServer {
    pub addr: String,
    pub port: u16,
}

impl FromStr for XcatServer {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let captures = SERVER_ADDRESS
            .captures(s)
            .ok_or_else(|| anyhow::anyhow!("invalid xCAT server address: {}", s))?;

        let port = match captures.name("port") {
            Some(port) => port
                .as_str()
                .parse::<u16>()
                .with_context(|| format!("invalid xCAT server port in {}", s))?,
            None => DEFAULT_XCAT_PORT,
        };

        Ok(XcatServer {
            addr: captures["addr"].to_string(),
            port,
        })
    }
}

impl fmt::Display for XcatServer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.addr, self.port)
    }
}

// Get the xCAT dsh endpoint for a zHCP node
pub fn dsh_url(server: &XcatServer, zhcpnode: &str) -> String {
    format!(
        "https://{}:{}/xcatws/nodes/{}/dsh",
        server.addr, server.port, zhcpnode
    )
}

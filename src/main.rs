mod config;
mod context;
mod monitor;
mod server;
mod utils;

use anyhow::{Context, Result};
use clap::Parser;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const APP_NAME: &str = "zvm-exporter";
const VERSION: &str = env!("CARGO_PKG_VERSION");
const DEFAULT_LISTEN_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 9110;
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Parser, Debug)]
#[command(
    name = APP_NAME,
    version = VERSION,
    about = "zVM Exporter for Prometheus",
    long_about = "zVM Exporter for Prometheus. Queries xCAT for the page, spool, CPU/memory and disk volume reports of a zHCP node and exposes them as gauges"
)]
struct Args {
    /// Name of the zHCP node
    #[arg(long, env = "ZVM_EXPORTER_ZHCPNODE", help = "Name of the zHCP node")]
    zhcpnode: String,

    /// User name to connect to xCAT with
    #[arg(long, env = "ZVM_EXPORTER_USERNAME", help = "User name to connect to xCAT with")]
    username: String,

    /// Password to connect to xCAT with
    #[arg(
        long,
        env = "ZVM_EXPORTER_PASSWORD",
        hide_env_values = true,
        help = "Password to connect to xCAT with"
    )]
    password: String,

    /// Address of the xCAT server
    #[arg(
        long,
        env = "ZVM_EXPORTER_SERVER",
        help = "Address of the xCAT server, host.domain[:port] (port defaults to 443)"
    )]
    server: String,

    /// SSL certificate file
    #[arg(
        long,
        env = "ZVM_EXPORTER_CERT",
        help = "SSL cert file. If not provided, SSL verification is disabled"
    )]
    cert: Option<PathBuf>,

    /// Port on which to expose metrics
    #[arg(
        short,
        long,
        env = "ZVM_EXPORTER_PORT",
        default_value_t = DEFAULT_PORT,
        help = "Port on which to expose metrics"
    )]
    port: u16,

    /// Address on which to expose metrics
    #[arg(
        long,
        env = "ZVM_EXPORTER_LISTEN_HOST",
        default_value = DEFAULT_LISTEN_HOST,
        help = "Address on which to expose metrics"
    )]
    listen_host: String,

    /// Log level
    #[arg(
        long,
        env = "RUST_LOG",
        default_value = DEFAULT_LOG_LEVEL,
        help = "Log level (trace/debug/info/warn/error)"
    )]
    log_level: String,

    /// Output log file
    #[arg(
        short = 'f',
        long,
        help = "Output log file. If not provided, logs will not be output to file"
    )]
    logfile: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize logging
    if let Err(e) = init_logging(&args.log_level, args.logfile.as_deref()) {
        eprintln!("Failed to initialize logging: {:#}", e);
        return;
    }

    let listen_address = format!("{}:{}", args.listen_host, args.port);

    // Log startup information
    info!(
        app = APP_NAME,
        version = VERSION,
        listen_address = %listen_address,
        zhcpnode = %args.zhcpnode,
        server = %args.server,
        log_level = %args.log_level,
        "announcement"
    );

    let settings = context::XcatSettings {
        zhcpnode: args.zhcpnode,
        username: args.username,
        password: args.password,
        server: args.server,
        cert: args.cert,
    };

    let app_context = match context::AppContext::new(settings) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Failed to initialize application context: {:#}", e);
            return;
        }
    };

    // Start HTTP server
    tracing::debug!(listen_address = %listen_address, "Starting HTTP server");
    if let Err(e) = server::start_server(&listen_address, app_context).await {
        tracing::error!(error = %e, "Server error");
    }
}

/// Initialize the logging system
///
/// Logs always go to stderr; with a log file they are appended there as well, without colors.
fn init_logging(log_level: &str, log_file: Option<&Path>) -> Result<()> {
    let env_filter = match log_level {
        "trace" => EnvFilter::new("trace"),
        "debug" => EnvFilter::new("debug"),
        "info" => EnvFilter::new("info"),
        "warn" => EnvFilter::new("warn"),
        "error" => EnvFilter::new("error"),
        _ => EnvFilter::new("info"),
    };

    let file_layer = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_thread_ids(true),
        )
        .with(file_layer)
        .with(env_filter)
        .init();

    Ok(())
}

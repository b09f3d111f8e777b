pub mod prometheus_format;
pub mod report_parser;
pub mod xcat_client;

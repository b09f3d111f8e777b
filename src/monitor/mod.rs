pub mod domains;
pub mod metrics_collector;

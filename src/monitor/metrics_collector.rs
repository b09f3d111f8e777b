//! Metrics collector - queries xCAT and turns the reports into gauges
//!
//! Responsibilities:
//! - Send the five SMAPI queries for the zHCP node, one attempt each
//! - Parse the responses into records (page, spool, cpu/memory, disk)
//! - Build gauge families from the static domain tables
//!
//! Every scrape starts from scratch: nothing is kept between calls to [`MetricsCollector::collect`].

use super::domains::{DomainSpec, DISK, PAGE, SPOOL, SYSTEM};
use crate::utils::prometheus_format::GaugeFamily;
use crate::utils::report_parser::{self, MetricRecord, ReportRecord, VolumeRecord};
use crate::utils::xcat_client::{QueryClient, XcatQuery};
use serde::Serialize;
use std::time::Instant;
use tracing::{debug, info};

/// Label carrying the zHCP node name on every sample
pub const HOST_LABEL: &str = "host";

/// Parsed reports of one scrape
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Reports {
    pub page: Vec<MetricRecord>,
    pub spool: Vec<MetricRecord>,
    pub system: Vec<MetricRecord>,
    pub disk: Vec<VolumeRecord>,
}

impl Reports {
    /// Gauge families of all domains, page first and disk last
    pub fn build_metrics(&self, zhcpnode: &str) -> Vec<GaugeFamily> {
        let mut families = build_metrics(&PAGE, zhcpnode, &self.page);
        families.extend(build_metrics(&SPOOL, zhcpnode, &self.spool));
        families.extend(build_metrics(&SYSTEM, zhcpnode, &self.system));
        families.extend(build_metrics(&DISK, zhcpnode, &self.disk));
        families
    }
}

/// Collects the z/VM reports of one zHCP node on demand
pub struct MetricsCollector<C> {
    zhcpnode: String,
    client: C,
}

impl<C: QueryClient> MetricsCollector<C> {
    pub fn new(zhcpnode: String, client: C) -> Self {
        MetricsCollector { zhcpnode, client }
    }

    pub fn zhcpnode(&self) -> &str {
        &self.zhcpnode
    }

    /// Query, parse and build the gauge families for one scrape
    pub async fn collect(&self) -> Vec<GaugeFamily> {
        let cycle_start = Instant::now();
        info!(zhcpnode = %self.zhcpnode, "Starting metric collection");

        let reports = self.collect_reports().await;
        let families = reports.build_metrics(&self.zhcpnode);

        info!(
            families = families.len(),
            duration_ms = cycle_start.elapsed().as_millis(),
            "Metric collection completed"
        );
        families
    }

    /// Query and parse all four domains concurrently
    pub async fn collect_reports(&self) -> Reports {
        let (page, spool, system, disk) = futures::join!(
            self.query_page(),
            self.query_spool(),
            self.query_cpu_memory(),
            self.query_disk()
        );

        Reports {
            page,
            spool,
            system,
            disk,
        }
    }

    async fn query_lines(&self, query: XcatQuery) -> Vec<String> {
        let response = self.client.send_request(query).await;
        report_parser::extract(&response)
    }

    async fn query_page(&self) -> Vec<MetricRecord> {
        let lines = self.query_lines(XcatQuery::PageInfo).await;
        let records = report_parser::parse_colon(&self.zhcpnode, &lines);
        debug!(domain = PAGE.namespace, records = ?records, "Parsed report");
        records
    }

    async fn query_spool(&self) -> Vec<MetricRecord> {
        let lines = self.query_lines(XcatQuery::SpoolInfo).await;
        let records = report_parser::parse_colon(&self.zhcpnode, &lines);
        debug!(domain = SPOOL.namespace, records = ?records, "Parsed report");
        records
    }

    async fn query_cpu_memory(&self) -> Vec<MetricRecord> {
        let lines = self.query_lines(XcatQuery::CpuMemoryInfo).await;
        let records = report_parser::parse_equals(&self.zhcpnode, &lines);
        debug!(domain = SYSTEM.namespace, records = ?records, "Parsed report");
        records
    }

    async fn query_disk(&self) -> Vec<VolumeRecord> {
        // The join only starts once both reports are in
        let (def_lines, free_lines) = futures::join!(
            self.query_lines(XcatQuery::DiskDefinition),
            self.query_lines(XcatQuery::DiskFree)
        );
        let records = report_parser::parse_disk(&self.zhcpnode, &def_lines, &free_lines);
        debug!(domain = DISK.namespace, records = ?records, "Parsed report");
        records
    }
}

/// Build the gauge families of one domain from its parsed records
///
/// A domain whose records carry no data yields no families at all, so a failed query shows up
/// as absent metrics rather than zeros. Fields that are missing from a record or hold text
/// produce no sample.
pub fn build_metrics<R: ReportRecord>(
    domain: &DomainSpec,
    zhcpnode: &str,
    records: &[R],
) -> Vec<GaugeFamily> {
    if records.iter().all(ReportRecord::is_empty) {
        debug!(domain = domain.namespace, "No report data, skipping metrics");
        return Vec::new();
    }

    let label_names: Vec<String> = std::iter::once(HOST_LABEL)
        .chain(domain.labels.iter().copied())
        .map(String::from)
        .collect();

    domain
        .metrics
        .iter()
        .map(|def| {
            let mut family =
                GaugeFamily::new(domain.metric_name(def), def.help, label_names.clone());

            for record in records {
                let Some(value) = record.field(def.field).and_then(|v| v.as_f64()) else {
                    debug!(
                        domain = domain.namespace,
                        field = def.field,
                        "Field missing or not numeric, skipping sample"
                    );
                    continue;
                };

                let mut label_values = vec![zhcpnode.to_string()];
                label_values.extend(domain.labels.iter().map(|label| {
                    record
                        .field(label)
                        .map(|v| v.to_string())
                        .unwrap_or_default()
                }));
                family.add_sample(label_values, value);
            }

            family
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::prometheus_format::PrometheusFormat;
    use crate::utils::report_parser::fixtures::*;
    use crate::utils::report_parser::FieldValue;
    use std::collections::HashMap;

    /// Answers every query with a captured xCAT response, or "" for unknown queries
    struct FixtureClient {
        responses: HashMap<XcatQuery, &'static str>,
    }

    impl FixtureClient {
        fn all() -> Self {
            let responses = HashMap::from([
                (XcatQuery::PageInfo, PAGE_DATA),
                (XcatQuery::SpoolInfo, SPOOL_DATA),
                (XcatQuery::CpuMemoryInfo, CPU_MEMORY_DATA),
                (XcatQuery::DiskDefinition, DISK_DEF_DATA),
                (XcatQuery::DiskFree, DISK_FREE_DATA),
            ]);
            FixtureClient { responses }
        }

        fn without(query: XcatQuery) -> Self {
            let mut client = Self::all();
            client.responses.remove(&query);
            client
        }

        fn empty() -> Self {
            FixtureClient {
                responses: HashMap::new(),
            }
        }
    }

    impl QueryClient for FixtureClient {
        async fn send_request(&self, query: XcatQuery) -> String {
            self.responses
                .get(&query)
                .map(|response| response.to_string())
                .unwrap_or_default()
        }
    }

    fn family<'a>(families: &'a [GaugeFamily], name: &str) -> &'a GaugeFamily {
        families
            .iter()
            .find(|f| f.name == name)
            .unwrap_or_else(|| panic!("missing family {}", name))
    }

    fn names(families: &[GaugeFamily]) -> Vec<&str> {
        families.iter().map(|f| f.name.as_str()).collect()
    }

    #[tokio::test]
    async fn test_collect_page() {
        let collector = MetricsCollector::new(NODE.to_string(), FixtureClient::all());
        let reports = collector.collect_reports().await;
        let families = build_metrics(&PAGE, NODE, &reports.page);

        assert_eq!(
            names(&families),
            vec!["zvm_page_allocated_total", "zvm_page_used_total"]
        );
        let allocated = family(&families, "zvm_page_allocated_total");
        assert_eq!(allocated.label_names, vec!["host"]);
        assert_eq!(allocated.samples.len(), 1);
        assert_eq!(allocated.samples[0].label_values, vec!["zhcpos2"]);
        assert_eq!(allocated.samples[0].value, 93920.0);
    }

    #[tokio::test]
    async fn test_collect_spool() {
        let collector = MetricsCollector::new(NODE.to_string(), FixtureClient::all());
        let reports = collector.collect_reports().await;
        let families = build_metrics(&SPOOL, NODE, &reports.spool);

        assert_eq!(
            names(&families),
            vec!["zvm_spool_allocated_total", "zvm_spool_used_total"]
        );
        assert_eq!(family(&families, "zvm_spool_used_total").samples[0].value, 4837.0);
    }

    #[tokio::test]
    async fn test_collect_cpu_memory() {
        let collector = MetricsCollector::new(NODE.to_string(), FixtureClient::all());
        let reports = collector.collect_reports().await;
        let families = build_metrics(&SYSTEM, NODE, &reports.system);

        assert_eq!(
            names(&families),
            vec![
                "zvm_system_cpu_count",
                "zvm_system_cpu_in_use",
                "zvm_system_memory_in_use",
                "zvm_system_memory_total"
            ]
        );
        assert_eq!(family(&families, "zvm_system_cpu_count").samples[0].value, 32.0);
        assert_eq!(
            family(&families, "zvm_system_cpu_in_use").samples[0].value,
            0.02125
        );
    }

    #[tokio::test]
    async fn test_collect_disk() {
        let collector = MetricsCollector::new(NODE.to_string(), FixtureClient::all());
        let reports = collector.collect_reports().await;
        let families = build_metrics(&DISK, NODE, &reports.disk);

        assert_eq!(
            names(&families),
            vec!["zvm_disk_status", "zvm_disk_space_total", "zvm_disk_space_free"]
        );

        let free = family(&families, "zvm_disk_space_free");
        assert_eq!(free.label_names, vec!["host", "volume"]);
        assert_eq!(free.samples.len(), 3);
        let by_volume: HashMap<&str, f64> = free
            .samples
            .iter()
            .map(|s| (s.label_values[1].as_str(), s.value))
            .collect();
        assert_eq!(by_volume["OS2P01"], 58843.0);
        assert_eq!(by_volume["OS2P02"], 65519.0);
        assert_eq!(by_volume["OS2P03"], 0.0);

        let status = family(&families, "zvm_disk_status");
        let free_volumes: Vec<&str> = status
            .samples
            .iter()
            .filter(|s| s.value == 1.0)
            .map(|s| s.label_values[1].as_str())
            .collect();
        assert_eq!(free_volumes, vec!["OS2P02"]);
    }

    #[tokio::test]
    async fn test_collect_all_domains() {
        let collector = MetricsCollector::new(NODE.to_string(), FixtureClient::all());
        let families = collector.collect().await;
        assert_eq!(families.len(), 11);

        let output = families.to_prometheus_format();
        assert!(output.contains("zvm_page_allocated_total{host=\"zhcpos2\"} 93920\n"));
        assert!(output.contains("zvm_system_cpu_in_use{host=\"zhcpos2\"} 0.02125\n"));
        assert!(output.contains("zvm_disk_status{host=\"zhcpos2\",volume=\"OS2P02\"} 1\n"));
    }

    #[tokio::test]
    async fn test_failed_queries_yield_no_metrics() {
        let collector = MetricsCollector::new(NODE.to_string(), FixtureClient::empty());
        let reports = collector.collect_reports().await;
        assert_eq!(reports.page, vec![MetricRecord::new()]);
        assert_eq!(reports.system, vec![MetricRecord::new()]);
        assert!(reports.disk.is_empty());
        assert!(collector.collect().await.is_empty());
    }

    #[tokio::test]
    async fn test_one_failed_disk_query_drops_only_disk() {
        let collector = MetricsCollector::new(
            NODE.to_string(),
            FixtureClient::without(XcatQuery::DiskFree),
        );
        let families = collector.collect().await;
        assert_eq!(families.len(), 8);
        assert!(families.iter().all(|f| !f.name.starts_with("zvm_disk_")));
    }

    #[tokio::test]
    async fn test_collect_is_repeatable() {
        let collector = MetricsCollector::new(NODE.to_string(), FixtureClient::all());
        let first = collector.collect_reports().await;
        let second = collector.collect_reports().await;
        assert_eq!(first.page, second.page);
        assert_eq!(first.system, second.system);
        assert_eq!(first.disk.len(), second.disk.len());
    }

    #[test]
    fn test_build_metrics_skips_missing_and_text_fields() {
        let mut record = MetricRecord::new();
        record.insert("total_allocated".to_string(), FieldValue::Text("n/a".to_string()));
        record.insert("available_percentage".to_string(), FieldValue::Int(3));

        let families = build_metrics(&PAGE, NODE, &[record]);
        assert_eq!(families.len(), 2);
        assert!(families.iter().all(|f| f.samples.is_empty()));
    }

    #[test]
    fn test_build_metrics_empty_records() {
        assert!(build_metrics(&PAGE, NODE, &[MetricRecord::new()]).is_empty());
        let no_volumes: Vec<VolumeRecord> = Vec::new();
        assert!(build_metrics(&DISK, NODE, &no_volumes).is_empty());
    }

    #[tokio::test]
    async fn test_reports_serialize_to_json() {
        let collector = MetricsCollector::new(NODE.to_string(), FixtureClient::all());
        let reports = collector.collect_reports().await;
        let json = serde_json::to_value(&reports).unwrap();

        assert_eq!(json["page"][0]["total_allocated"], 93920);
        assert_eq!(json["system"][0]["cpu_average_use"], 0.02125);
        assert_eq!(json["disk"].as_array().unwrap().len(), 3);
    }
}

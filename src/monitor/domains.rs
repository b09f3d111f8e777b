//! Static description of the exported metrics, one table per report domain

use crate::config::METRIC_PREFIX;

/// One exported gauge: record field -> metric name and help text
#[derive(Debug, Clone, Copy)]
pub struct MetricDef {
    pub field: &'static str,
    pub name: &'static str,
    pub help: &'static str,
}

/// Exported metrics of one report domain
#[derive(Debug, Clone, Copy)]
pub struct DomainSpec {
    /// Middle part of the metric names (`zvm_<namespace>_<name>`)
    pub namespace: &'static str,
    pub metrics: &'static [MetricDef],
    /// Record fields exported as labels, after the `host` label
    pub labels: &'static [&'static str],
}

impl DomainSpec {
    pub fn metric_name(&self, def: &MetricDef) -> String {
        format!("{}_{}_{}", METRIC_PREFIX, self.namespace, def.name)
    }
}

pub const PAGE: DomainSpec = DomainSpec {
    namespace: "page",
    metrics: &[
        MetricDef {
            field: "total_allocated",
            name: "allocated_total",
            help: "The total number of pages allocated for paging use on the system",
        },
        MetricDef {
            field: "total_used",
            name: "used_total",
            help: "The total number of pages in use for paging on the system",
        },
    ],
    labels: &[],
};

pub const SPOOL: DomainSpec = DomainSpec {
    namespace: "spool",
    metrics: &[
        MetricDef {
            field: "total_allocated",
            name: "allocated_total",
            help: "The total number of pages allocated for spool use on the system",
        },
        MetricDef {
            field: "total_used",
            name: "used_total",
            help: "The total number of pages in use for spool on the system",
        },
    ],
    labels: &[],
};

pub const SYSTEM: DomainSpec = DomainSpec {
    namespace: "system",
    metrics: &[
        MetricDef {
            field: "cpu_count",
            name: "cpu_count",
            help: "The total number of CPU cores",
        },
        MetricDef {
            field: "cpu_average_use",
            name: "cpu_in_use",
            help: "The average amount of CPU used (0.0-1.0)",
        },
        MetricDef {
            field: "memory_in_use",
            name: "memory_in_use",
            help: "Memory in use",
        },
        MetricDef {
            field: "memory_total",
            name: "memory_total",
            help: "Total available memory",
        },
    ],
    labels: &[],
};

pub const DISK: DomainSpec = DomainSpec {
    namespace: "disk",
    metrics: &[
        MetricDef {
            field: "status",
            name: "status",
            help: "Usage status of the volume (1: free, 0: used)",
        },
        MetricDef {
            field: "space_total",
            name: "space_total",
            help: "Size of the total disk space defined for the volume",
        },
        MetricDef {
            field: "space_free",
            name: "space_free",
            help: "Size of the free disk space of the volume",
        },
    ],
    labels: &["volume"],
};

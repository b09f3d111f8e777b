//! Gauge families and their Prometheus text exposition

/// Content type of the Prometheus text exposition format
pub const EXPOSITION_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Trait for converting metrics to Prometheus text format
pub trait PrometheusFormat {
    fn to_prometheus_format(&self) -> String;
}

/// Represents a single gauge metric with its samples
#[derive(Clone, Debug, PartialEq)]
pub struct GaugeFamily {
    /// Full metric name (e.g., "zvm_page_allocated_total")
    pub name: String,
    /// Metric help/description
    pub help: String,
    /// Label names shared by every sample, in output order
    pub label_names: Vec<String>,
    /// Samples for this metric
    pub samples: Vec<GaugeSample>,
}

/// Single sample of a gauge, label values in the order of the family's label names
#[derive(Clone, Debug, PartialEq)]
pub struct GaugeSample {
    pub label_values: Vec<String>,
    pub value: f64,
}

impl GaugeFamily {
    pub fn new(name: impl Into<String>, help: impl Into<String>, label_names: Vec<String>) -> Self {
        GaugeFamily {
            name: name.into(),
            help: help.into(),
            label_names,
            samples: Vec::new(),
        }
    }

    pub fn add_sample(&mut self, label_values: Vec<String>, value: f64) {
        self.samples.push(GaugeSample {
            label_values,
            value,
        });
    }
}

/// Escape label values for Prometheus format
fn escape_label_value(value: &str) -> String {
    let mut result = String::new();
    for ch in value.chars() {
        match ch {
            '\\' => result.push_str("\\\\"),
            '"' => result.push_str("\\\""),
            '\n' => result.push_str("\\n"),
            _ => result.push(ch),
        }
    }
    result
}

/// HELP text only escapes backslash and newline
fn escape_help(help: &str) -> String {
    help.replace('\\', "\\\\").replace('\n', "\\n")
}

fn format_value(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value == f64::INFINITY {
        "+Inf".to_string()
    } else if value == f64::NEG_INFINITY {
        "-Inf".to_string()
    } else {
        value.to_string()
    }
}

impl PrometheusFormat for GaugeFamily {
    fn to_prometheus_format(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("# HELP {} {}\n", self.name, escape_help(&self.help)));
        output.push_str(&format!("# TYPE {} gauge\n", self.name));

        for sample in &self.samples {
            output.push_str(&self.name);

            if !self.label_names.is_empty() {
                let labels: Vec<String> = self
                    .label_names
                    .iter()
                    .zip(&sample.label_values)
                    .map(|(name, value)| format!("{}=\"{}\"", name, escape_label_value(value)))
                    .collect();
                output.push('{');
                output.push_str(&labels.join(","));
                output.push('}');
            }

            output.push(' ');
            output.push_str(&format_value(sample.value));
            output.push('\n');
        }

        output
    }
}

impl PrometheusFormat for [GaugeFamily] {
    fn to_prometheus_format(&self) -> String {
        self.iter().map(|family| family.to_prometheus_format()).collect()
    }
}

//! Metrics — the collector's own Prometheus exporter fragment.

use crate::helpers::listen_on_all_local_interfaces_address;
use crate::spec::Collector;

/// Component id of the Vector exporter sink.
pub const METRICS_SINK_ID: &str = "prometheus_output";

/// Expose the collector's internal metrics on every local interface.
pub fn render_metrics_exporter(collector: Collector, port: u16) -> String {
    let addr = listen_on_all_local_interfaces_address();
    let mut b = String::new();
    match collector {
        Collector::Vector => {
            b.push_str(&format!("[sinks.{}]\n", METRICS_SINK_ID));
            b.push_str("type = \"prometheus_exporter\"\n");
            b.push_str("inputs = [\"internal_metrics\"]\n");
            b.push_str(&format!("address = \"{}:{}\"\n", addr, port));
            b.push_str("default_namespace = \"collector\"\n");
        }
        Collector::Fluentd => {
            // in_prometheus takes a bare host, without IPv6 brackets.
            let bind = addr.trim_start_matches('[').trim_end_matches(']');
            b.push_str("<source>\n");
            b.push_str("  @type prometheus\n");
            b.push_str(&format!("  bind {}\n", bind));
            b.push_str(&format!("  port {}\n", port));
            b.push_str("</source>\n");
        }
    }
    b
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_exporter() {
        let conf = render_metrics_exporter(Collector::Vector, 24231);
        let addr = listen_on_all_local_interfaces_address();
        let table: toml::Table = toml::from_str(&conf).expect("valid toml");
        let sink = &table["sinks"][METRICS_SINK_ID];
        assert_eq!(sink["type"].as_str(), Some("prometheus_exporter"));
        assert_eq!(sink["address"].as_str(), Some(format!("{}:24231", addr).as_str()));
    }

    #[test]
    fn test_fluentd_exporter_strips_brackets() {
        let conf = render_metrics_exporter(Collector::Fluentd, 24231);
        let bind_line = conf
            .lines()
            .find(|l| l.trim_start().starts_with("bind "))
            .expect("bind line");
        assert!(bind_line == "  bind ::" || bind_line == "  bind 0.0.0.0", "{}", bind_line);
        assert!(conf.contains("  port 24231\n"));
        assert!(conf.starts_with("<source>\n") && conf.ends_with("</source>\n"));
    }
}

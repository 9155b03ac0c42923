//! Event Streams compiler.

use crate::config::{Config, EventStreams};
use crate::tf::block::{Attrs, TfValue, resource};
use crate::tf::util::{kebab_name, rg_id_ref, snake_case, tf_block, tf_done};

/// Convert a throughput (`150MB/s`) or storage size (`2TB`) into the numeric
/// megabyte figure the provider expects. Terabytes scale by 1024; anything
/// without a leading number becomes 0.
fn parameter_number(value: &str) -> i64 {
    let digits: String = value.chars().take_while(char::is_ascii_digit).collect();
    let number = digits.parse::<i64>().unwrap_or(0);
    if value.to_ascii_uppercase().contains("TB") {
        number * 1024
    } else {
        number
    }
}

/// Compile one Event Streams instance. Enterprise plans carry throughput,
/// storage, allowlist parameters, and longer timeouts.
pub fn format_event_streams(es: &EventStreams, config: &Config) -> String {
    let enterprise = es.plan.contains("enterprise");
    let mut attrs = Attrs::new();
    attrs
        .add("name", kebab_name(&[&es.name]))
        .add("service", TfValue::str("messagehub"))
        .add("plan", TfValue::str(&es.plan))
        .add("location", TfValue::expr("var.region"))
        .add(
            "resource_group_id",
            rg_id_ref(es.resource_group.as_deref(), config),
        );
    if enterprise {
        let mut parameters: Vec<(String, TfValue)> = Vec::new();
        if let Some(endpoints) = es.endpoints.as_deref() {
            parameters.push(("service-endpoints".to_string(), TfValue::str(endpoints)));
        }
        if let Some(throughput) = es.throughput.as_deref() {
            parameters.push((
                "throughput".to_string(),
                TfValue::str(parameter_number(throughput).to_string()),
            ));
        }
        if let Some(storage) = es.storage_size.as_deref() {
            parameters.push((
                "storage_size".to_string(),
                TfValue::str(parameter_number(storage).to_string()),
            ));
        }
        if let Some(allowlist) = &es.private_ip_allowlist {
            parameters.push((
                "private_ip_allowlist".to_string(),
                TfValue::str(format!(
                    "[{}]",
                    allowlist
                        .iter()
                        .map(|ip| ip.as_str())
                        .collect::<Vec<_>>()
                        .join(",")
                )),
            ));
        }
        if !parameters.is_empty() {
            attrs.add("parameters", TfValue::Map(parameters));
        }
        attrs.add(
            "timeouts",
            TfValue::Block(vec![
                ("create".to_string(), TfValue::str("3h")),
                ("update".to_string(), TfValue::str("1h")),
                ("delete".to_string(), TfValue::str("1h")),
            ]),
        );
    }
    attrs.add(
        "tags",
        TfValue::Lines(config.options.tags.iter().map(TfValue::str).collect()),
    );
    resource(
        "ibm_resource_instance",
        &format!("{}_es", snake_case(&es.name)),
        &attrs,
    )
}

/// Compile the `event_streams.tf` file body.
pub fn event_streams_tf(config: &Config) -> String {
    let body: String = config
        .event_streams
        .iter()
        .map(|es| format_event_streams(es, config))
        .collect();
    tf_done(&(tf_block("event streams", &body) + "\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enterprise_plan_converts_units() {
        assert_eq!(parameter_number("150MB/s"), 150);
        assert_eq!(parameter_number("2TB"), 2048);
        assert_eq!(parameter_number("garbage"), 0);
    }

    #[test]
    fn enterprise_plan_adds_parameters_and_timeouts() {
        let es = EventStreams {
            name: "event-streams".to_string(),
            plan: "enterprise-3nodes-2tb".to_string(),
            resource_group: None,
            endpoints: Some("private".to_string()),
            throughput: Some("150MB/s".to_string()),
            storage_size: Some("2TB".to_string()),
            private_ip_allowlist: Some(vec!["10.0.0.0/32".to_string(), "10.0.0.1/32".to_string()]),
        };
        let rendered = format_event_streams(&es, &Config::empty());
        assert!(rendered.contains("throughput           = \"150\""));
        assert!(rendered.contains("storage_size         = \"2048\""));
        assert!(rendered.contains("private_ip_allowlist = \"[10.0.0.0/32,10.0.0.1/32]\""));
        assert!(rendered.contains("create = \"3h\""));
    }

    #[test]
    fn standard_plan_is_minimal() {
        let es = EventStreams {
            name: "es".to_string(),
            plan: "standard".to_string(),
            resource_group: None,
            endpoints: None,
            throughput: None,
            storage_size: None,
            private_ip_allowlist: None,
        };
        let rendered = format_event_streams(&es, &Config::empty());
        assert!(!rendered.contains("parameters"));
        assert!(!rendered.contains("timeouts"));
    }
}

//! Flow log compiler: one collector per VPC with a bucket attached, plus
//! the authorization letting collectors write into object storage.

use crate::config::{Config, Vpc};
use crate::tf::block::{Attrs, TfValue, resource};
use crate::tf::util::{rg_id_ref, snake_case, tf_block, tf_done, vpc_module_ref};

fn policy_symbol(cos: &str) -> String {
    format!("flow_logs_to_{}_object_storage_policy", snake_case(cos))
}

/// Authorization letting flow log collectors write to one COS instance.
pub fn format_flow_logs_authorization(cos: &str, config: &Config) -> String {
    let use_data = config
        .object_storage_instance(cos)
        .is_some_and(|instance| instance.use_data);
    let data_prefix = if use_data { "data." } else { "" };
    let mut attrs = Attrs::new();
    attrs
        .add("source_service_name", TfValue::str("is"))
        .add("source_resource_type", TfValue::str("flow-log-collector"))
        .add("target_service_name", TfValue::str("cloud-object-storage"))
        .add(
            "target_resource_instance_id",
            TfValue::expr(format!(
                "{data_prefix}ibm_resource_instance.{}_object_storage.guid",
                snake_case(cos)
            )),
        )
        .add(
            "description",
            TfValue::str("Allow flow logs write access to COS instance"),
        )
        .add("roles", TfValue::Lines(vec![TfValue::str("Writer")]));
    resource("ibm_iam_authorization_policy", &policy_symbol(cos), &attrs)
}

/// Compile one VPC's flow log collector.
pub fn format_flow_log_collector(vpc: &Vpc, config: &Config) -> Option<String> {
    let cos = vpc.cos.as_deref()?;
    let bucket = vpc.bucket.as_deref()?;
    let mut attrs = Attrs::new();
    attrs
        .add(
            "name",
            TfValue::str(format!("${{var.prefix}}-{}-vpc-logs", vpc.name)),
        )
        .add("target", vpc_module_ref(&vpc.name, "id"))
        .add("active", TfValue::Bool(true))
        .add(
            "storage_bucket",
            TfValue::expr(format!(
                "ibm_cos_bucket.{}_object_storage_{}_bucket.bucket_name",
                snake_case(cos),
                snake_case(bucket)
            )),
        )
        .add(
            "resource_group",
            rg_id_ref(vpc.resource_group.as_deref(), config),
        )
        .add(
            "tags",
            TfValue::Lines(config.options.tags.iter().map(TfValue::str).collect()),
        )
        .add(
            "depends_on",
            TfValue::Lines(vec![TfValue::expr(format!(
                "ibm_iam_authorization_policy.{}",
                policy_symbol(cos)
            ))]),
        );
    Some(resource(
        "ibm_is_flow_log",
        &format!("{}_flow_log_collector", snake_case(&vpc.name)),
        &attrs,
    ))
}

/// Compile the `flow_logs.tf` file. `None` when no VPC has a bucket.
pub fn flow_logs_tf(config: &Config) -> Option<String> {
    let mut seen_cos: Vec<&str> = Vec::new();
    let mut auth_body = String::new();
    let mut collector_body = String::new();
    for vpc in &config.vpcs {
        if let Some(collector) = format_flow_log_collector(vpc, config) {
            collector_body += &collector;
            let cos = vpc.cos.as_deref().unwrap_or_default();
            if !seen_cos.contains(&cos) {
                seen_cos.push(cos);
                auth_body += &format_flow_logs_authorization(cos, config);
            }
        }
    }
    if collector_body.is_empty() {
        return None;
    }
    let tf = tf_block("flow logs authorizations", &auth_body)
        + "\n"
        + &tf_block("flow logs", &collector_body)
        + "\n";
    Some(tf_done(&tf))
}

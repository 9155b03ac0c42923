//! Observability compiler: Activity Tracker target/route/instance, LogDNA,
//! Sysdig, and the archive resources that bridge logs into object storage.

use crate::config::{Atracker, Config, Logdna, Sysdig};
use crate::tf::block::{Attrs, TfValue, labelled_block, resource};
use crate::tf::util::{rg_id_ref, snake_case, tf_block, tf_done};

fn tags(config: &Config) -> TfValue {
    TfValue::Lines(config.options.tags.iter().map(TfValue::str).collect())
}

fn cos_instance_expr(config: &Config, cos: &str, attr: &str) -> TfValue {
    let data_prefix = match config.object_storage_instance(cos) {
        Some(instance) if instance.use_data => "data.",
        _ => "",
    };
    TfValue::expr(format!(
        "{data_prefix}ibm_resource_instance.{}_object_storage.{attr}",
        snake_case(cos)
    ))
}

fn bucket_expr(cos: &str, bucket: &str, attr: &str) -> TfValue {
    TfValue::expr(format!(
        "ibm_cos_bucket.{}_object_storage_{}_bucket.{attr}",
        snake_case(cos),
        snake_case(bucket)
    ))
}

fn cos_key_expr(cos: &str, key: &str, attr: &str) -> TfValue {
    TfValue::expr(format!(
        "ibm_resource_key.{}_object_storage_key_{}.{attr}",
        snake_case(cos),
        snake_case(key)
    ))
}

/// Compile the Activity Tracker COS target.
pub fn format_atracker_target(atracker: &Atracker, config: &Config) -> String {
    let mut endpoint = Attrs::new();
    endpoint.add(
        "endpoint",
        TfValue::str("s3.private.${var.region}.cloud-object-storage.appdomain.cloud"),
    );
    if let Some(cos) = atracker.target_name.as_deref() {
        endpoint.add("target_crn", cos_instance_expr(config, cos, "crn"));
        if let Some(bucket) = atracker.bucket.as_deref() {
            endpoint.add("bucket", bucket_expr(cos, bucket, "bucket_name"));
        }
        if let Some(key) = atracker.cos_key.as_deref() {
            endpoint.add("api_key", cos_key_expr(cos, key, "credentials.apikey"));
        }
    }
    let mut attrs = Attrs::new();
    attrs
        .add(
            "name",
            TfValue::str(format!("${{var.prefix}}-{}-cos-target", atracker.name)),
        )
        .add("region", TfValue::expr("var.region"))
        .add("target_type", TfValue::str("cloud_object_storage"))
        .add("cos_endpoint", TfValue::Block(endpoint.into_vec()));
    resource(
        "ibm_atracker_target",
        &format!("{}_cos_target", snake_case(&atracker.name)),
        &attrs,
    )
}

/// Compile the Activity Tracker account route.
pub fn format_atracker_route(atracker: &Atracker, _config: &Config) -> String {
    let mut rules = Attrs::new();
    rules
        .add(
            "target_ids",
            TfValue::List(vec![TfValue::expr(format!(
                "ibm_atracker_target.{}_cos_target.id",
                snake_case(&atracker.name)
            ))]),
        )
        .add(
            "locations",
            TfValue::str_list(atracker.locations.iter().map(String::as_str)),
        );
    let mut attrs = Attrs::new();
    attrs
        .add(
            "name",
            TfValue::str(format!("${{var.prefix}}-{}-route", atracker.name)),
        )
        .add("rules", TfValue::Block(rules.into_vec()));
    resource(
        "ibm_atracker_route",
        &format!("{}_route", snake_case(&atracker.name)),
        &attrs,
    )
}

fn format_service_instance(
    symbol: &str,
    name: TfValue,
    service: &str,
    plan: Option<&str>,
    resource_group: Option<&str>,
    default_receiver: bool,
    config: &Config,
) -> String {
    let mut attrs = Attrs::new();
    attrs
        .add("name", name)
        .add("resource_group_id", rg_id_ref(resource_group, config))
        .add("service", TfValue::str(service))
        .add("plan", TfValue::str(plan.unwrap_or("lite")))
        .add("location", TfValue::expr("var.region"))
        .add("service_endpoints", TfValue::str("private"))
        .add("tags", tags(config));
    if default_receiver {
        attrs.add(
            "parameters",
            TfValue::Map(vec![(
                "default_receiver".to_string(),
                TfValue::Bool(true),
            )]),
        );
    }
    resource("ibm_resource_instance", symbol, &attrs)
}

fn format_service_key(symbol: &str, name: TfValue, role: &str, config: &Config) -> String {
    let mut attrs = Attrs::new();
    attrs
        .add("name", name)
        .add(
            "resource_instance_id",
            TfValue::expr(format!("ibm_resource_instance.{symbol}.id")),
        )
        .add("role", TfValue::str(role))
        .add("tags", tags(config));
    resource("ibm_resource_key", &format!("{symbol}_key"), &attrs)
}

fn format_logdna_provider(alias: &str, key_symbol: &str) -> String {
    let mut attrs = Attrs::new();
    attrs
        .add("alias", TfValue::str(alias))
        .add(
            "servicekey",
            TfValue::expr(format!(
                "ibm_resource_key.{key_symbol}.credentials[\"service_key\"]"
            )),
        )
        .add(
            "url",
            TfValue::str("https://api.${var.region}.logging.cloud.ibm.com"),
        );
    labelled_block("provider", &["logdna"], &attrs)
}

fn format_logdna_archive(
    symbol: &str,
    alias: &str,
    cos: &str,
    bucket: &str,
    config: &Config,
) -> String {
    let mut ibm_config = Attrs::new();
    ibm_config
        .add("apikey", TfValue::expr("var.ibmcloud_api_key"))
        .add("bucket", bucket_expr(cos, bucket, "bucket_name"))
        .add("endpoint", bucket_expr(cos, bucket, "s3_endpoint_private"))
        .add("resourceinstanceid", cos_instance_expr(config, cos, "id"));
    let mut attrs = Attrs::new();
    attrs
        .add("provider", TfValue::expr(format!("logdna.{alias}")))
        .add("integration", TfValue::str("ibm"))
        .add("ibm_config", TfValue::Block(ibm_config.into_vec()));
    resource("logdna_archive", symbol, &attrs)
}

/// True when the LogDNA provider is needed for log archiving.
pub fn logdna_archive_enabled(logdna: &Logdna) -> bool {
    logdna.enabled && logdna.archive && logdna.cos.is_some() && logdna.bucket.is_some()
}

/// True when the LogDNA provider is needed for Activity Tracker archiving.
pub fn atracker_archive_enabled(atracker: &Atracker) -> bool {
    atracker.enabled
        && atracker.instance
        && atracker.archive
        && atracker.target_name.is_some()
        && atracker.bucket.is_some()
}

/// Compile the `observability.tf` file. `None` when Activity Tracker,
/// LogDNA, and Sysdig are all disabled.
pub fn observability_tf(config: &Config) -> Option<String> {
    let atracker = &config.atracker;
    let logdna = &config.logdna;
    let sysdig: &Sysdig = &config.sysdig;
    if !atracker.enabled && !logdna.enabled && !sysdig.enabled {
        return None;
    }
    let mut tf = String::new();
    if atracker.enabled {
        let mut body = format_atracker_target(atracker, config);
        if atracker.add_route {
            body += &format_atracker_route(atracker, config);
        }
        tf += &(tf_block("activity tracker", &body) + "\n");
    }
    if atracker.enabled && atracker.instance {
        let symbol = snake_case(&atracker.name);
        let mut body = format_service_instance(
            &symbol,
            TfValue::str(format!("${{var.prefix}}-${{var.region}}-{}", atracker.name)),
            "logdnaat",
            atracker.plan.as_deref(),
            atracker.resource_group.as_deref(),
            false,
            config,
        );
        body += &format_service_key(
            &symbol,
            TfValue::str(format!(
                "${{var.prefix}}-${{var.region}}-{}-key",
                atracker.name
            )),
            "Manager",
            config,
        );
        tf += &(tf_block("atracker instance", &body) + "\n");
    }
    if logdna.enabled {
        let mut body = format_service_instance(
            "logdna",
            TfValue::str("${var.prefix}-logdna"),
            "logdna",
            logdna.plan.as_deref(),
            logdna.resource_group.as_deref(),
            true,
            config,
        );
        body += &format_service_key(
            "logdna",
            TfValue::str("${var.prefix}-logdna-key"),
            &logdna.role,
            config,
        );
        tf += &(tf_block("logdna instance", &body) + "\n");
    }
    // Archive resources need the logdna provider; each enabled archive gets
    // its own provider alias.
    let mut archive_body = String::new();
    if logdna_archive_enabled(logdna) {
        archive_body += &format_logdna_provider("logdna", "logdna_key");
        archive_body += &format_logdna_archive(
            "logdna_archive",
            "logdna",
            logdna.cos.as_deref().unwrap_or_default(),
            logdna.bucket.as_deref().unwrap_or_default(),
            config,
        );
    }
    if atracker_archive_enabled(atracker) {
        let key_symbol = format!("{}_key", snake_case(&atracker.name));
        archive_body += &format_logdna_provider("atracker", &key_symbol);
        archive_body += &format_logdna_archive(
            &format!("{}_archive", snake_case(&atracker.name)),
            "atracker",
            atracker.target_name.as_deref().unwrap_or_default(),
            atracker.bucket.as_deref().unwrap_or_default(),
            config,
        );
    }
    if !archive_body.is_empty() {
        tf += &(tf_block("logdna resources", &archive_body) + "\n");
    }
    if sysdig.enabled {
        let mut body = format_service_instance(
            "sysdig",
            TfValue::str("${var.prefix}-sysdig"),
            "sysdig-monitor",
            sysdig.plan.as_deref(),
            sysdig.resource_group.as_deref(),
            true,
            config,
        );
        body += &format_service_key(
            "sysdig",
            TfValue::str("${var.prefix}-sysdig-key"),
            "Manager",
            config,
        );
        tf += &(tf_block("sysdig instance", &body) + "\n");
    }
    Some(tf_done(&tf))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn observability_config() -> Config {
        let mut config = Config::empty();
        config.options.tags = vec!["slz".to_string(), "landing-zone".to_string()];
        config.resource_groups.push(crate::config::ResourceGroup {
            name: "service-rg".to_string(),
            use_data: false,
            use_prefix: true,
        });
        config.logdna = Logdna {
            enabled: true,
            plan: Some("lite".to_string()),
            resource_group: Some("service-rg".to_string()),
            platform_logs: true,
            role: "Manager".to_string(),
            cos: Some("cos".to_string()),
            bucket: Some("atracker".to_string()),
            archive: true,
        };
        config
    }

    #[test]
    fn logdna_instance_matches_expected_layout() {
        let config = observability_config();
        let tf = observability_tf(&config).unwrap();
        let expected_instance = r#"
resource "ibm_resource_instance" "logdna" {
  name              = "${var.prefix}-logdna"
  resource_group_id = ibm_resource_group.service_rg.id
  service           = "logdna"
  plan              = "lite"
  location          = var.region
  service_endpoints = "private"
  tags = [
    "slz",
    "landing-zone"
  ]
  parameters = {
    default_receiver = true
  }
}
"#;
        assert!(tf.contains(expected_instance.trim_start_matches('\n')));
    }

    #[test]
    fn archive_emits_provider_and_archive_resource() {
        let config = observability_config();
        let tf = observability_tf(&config).unwrap();
        assert!(tf.contains("provider \"logdna\" {"));
        assert!(tf.contains(
            "servicekey = ibm_resource_key.logdna_key.credentials[\"service_key\"]"
        ));
        assert!(tf.contains("resource \"logdna_archive\" \"logdna_archive\" {"));
        assert!(tf.contains(
            "bucket             = ibm_cos_bucket.cos_object_storage_atracker_bucket.bucket_name"
        ));
    }

    #[test]
    fn all_disabled_omits_the_file() {
        let config = Config::empty();
        assert_eq!(observability_tf(&config), None);
    }
}

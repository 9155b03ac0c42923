//! Security and Compliance Center compiler: account settings, posture
//! credential, collector, and scope.

use crate::config::{Config, Scc};
use crate::tf::block::{Attrs, TfValue, resource};
use crate::tf::util::{kebab_case, tf_block, tf_done};

/// Compile SCC account location settings.
pub fn format_scc_account_settings(scc: &Scc, _config: &Config) -> String {
    let mut attrs = Attrs::new();
    attrs.add(
        "location",
        TfValue::Block(vec![(
            "location_id".to_string(),
            TfValue::str(&scc.location),
        )]),
    );
    resource("ibm_scc_account_settings", "ibm_scc_account_settings_instance", &attrs)
}

/// Compile the posture credential holding the platform API key.
pub fn format_scc_credential(scc: &Scc, _config: &Config) -> String {
    let mut attrs = Attrs::new();
    attrs
        .add("description", TfValue::opt_str(scc.credential_description.as_deref()))
        .add("enabled", TfValue::Bool(true))
        .add("name", TfValue::str(kebab_case(&scc.name)))
        .add("type", TfValue::str("ibm_cloud"))
        .add("purpose", TfValue::str("discovery_fact_collection_remediation"))
        .add(
            "display_fields",
            TfValue::Block(vec![(
                "ibm_api_key".to_string(),
                TfValue::expr("var.ibmcloud_api_key"),
            )]),
        )
        .add(
            "group",
            TfValue::Block(vec![
                ("id".to_string(), TfValue::opt_str(scc.id.as_deref())),
                (
                    "passphrase".to_string(),
                    TfValue::opt_str(scc.passphrase.as_deref()),
                ),
            ]),
        );
    resource("ibm_scc_posture_credential", "scc_credential", &attrs)
}

/// Compile the posture collector.
pub fn format_scc_collector(scc: &Scc, _config: &Config) -> String {
    let mut attrs = Attrs::new();
    attrs
        .add(
            "description",
            TfValue::opt_str(scc.collector_description.as_deref()),
        )
        .add("is_public", TfValue::Bool(scc.is_public))
        .add("managed_by", TfValue::str("ibm"))
        .add("name", TfValue::str("${var.prefix}-scc-collector"));
    resource("ibm_scc_posture_collector", "collector", &attrs)
}

/// Compile the posture scope tying collector and credential together.
pub fn format_scc_scope(scc: &Scc, _config: &Config) -> String {
    let mut attrs = Attrs::new();
    attrs
        .add(
            "collector_ids",
            TfValue::List(vec![TfValue::expr(
                "ibm_scc_posture_collector.collector.id",
            )]),
        )
        .add(
            "credential_id",
            TfValue::expr("ibm_scc_posture_credential.scc_credential.id"),
        )
        .add("credential_type", TfValue::str("ibm"))
        .add("description", TfValue::opt_str(scc.scope_description.as_deref()))
        .add("name", TfValue::str("${var.prefix}-scc-scope"));
    resource("ibm_scc_posture_scope", "scc_scope", &attrs)
}

/// Compile the `scc.tf` file. `None` when SCC is not enabled.
pub fn scc_tf(config: &Config) -> Option<String> {
    let scc = &config.scc;
    if !scc.enable {
        return None;
    }
    let body = format_scc_account_settings(scc, config)
        + &format_scc_credential(scc, config)
        + &format_scc_collector(scc, config)
        + &format_scc_scope(scc, config);
    Some(tf_done(
        &(tf_block("security and compliance center", &body) + "\n"),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scc() -> Scc {
        Scc {
            enable: true,
            name: "scc-posture-credential".to_string(),
            location: "us".to_string(),
            is_public: true,
            collector_description: Some("scc collector".to_string()),
            scope_description: Some("scc scope".to_string()),
            credential_description: Some("scc posture credential description".to_string()),
            id: Some("scc_group_id".to_string()),
            passphrase: Some("scc_group_passphrase".to_string()),
        }
    }

    #[test]
    fn disabled_scc_omits_file() {
        assert!(scc_tf(&Config::empty()).is_none());
    }

    #[test]
    fn enabled_scc_renders_all_four_resources() {
        let mut config = Config::empty();
        config.scc = scc();
        let tf = scc_tf(&config).unwrap();
        assert!(tf.contains("resource \"ibm_scc_account_settings\""));
        assert!(tf.contains("resource \"ibm_scc_posture_credential\""));
        assert!(tf.contains("resource \"ibm_scc_posture_collector\""));
        assert!(tf.contains("resource \"ibm_scc_posture_scope\""));
        assert!(tf.contains("collector_ids   = [ibm_scc_posture_collector.collector.id]"));
    }
}

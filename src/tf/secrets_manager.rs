//! Secrets Manager compiler: KMS authorization, instances, and secrets.

use crate::config::{Config, SecretsManager, SmSecret};
use crate::tf::block::{Attrs, TfValue, resource};
use crate::tf::util::{
    encryption_key_ref, kms_instance_ref, rg_id_ref, snake_case, tf_block, tf_done,
};

fn instance_symbol(sm: &SecretsManager) -> String {
    format!("secrets_manager_{}", snake_case(&sm.name))
}

/// Authorization letting a Secrets Manager instance read its KMS keys.
pub fn format_sm_authorization(kms: &str, config: &Config) -> String {
    let mut attrs = Attrs::new();
    attrs
        .add("source_service_name", TfValue::str("secrets-manager"))
        .add(
            "description",
            TfValue::str("Allow Secrets Manager instance to read from KMS instance"),
        )
        .add("target_service_name", TfValue::str("kms"))
        .add(
            "target_resource_instance_id",
            kms_instance_ref(kms, "guid", config),
        )
        .add("roles", TfValue::Lines(vec![TfValue::str("Reader")]));
    resource(
        "ibm_iam_authorization_policy",
        &format!("secrets_manager_to_{}_kms_policy", snake_case(kms)),
        &attrs,
    )
}

/// Compile a Secrets Manager instance.
pub fn format_secrets_manager(sm: &SecretsManager, config: &Config) -> String {
    let mut attrs = Attrs::new();
    attrs
        .add(
            "name",
            TfValue::str(format!("${{var.prefix}}-{}", sm.name)),
        )
        .add("location", TfValue::expr("var.region"))
        .add("plan", TfValue::str("standard"))
        .add("service", TfValue::str("secrets-manager"))
        .add(
            "resource_group_id",
            rg_id_ref(sm.resource_group.as_deref(), config),
        );
    if sm.kms.is_some() && sm.encryption_key.is_some() {
        attrs.add(
            "parameters",
            TfValue::Map(vec![(
                "kms_key".to_string(),
                encryption_key_ref(sm.kms.as_deref(), sm.encryption_key.as_deref(), "crn"),
            )]),
        );
    }
    attrs.add(
        "timeouts",
        TfValue::Block(vec![
            ("create".to_string(), TfValue::str("1h")),
            ("delete".to_string(), TfValue::str("1h")),
        ]),
    );
    attrs.add(
        "tags",
        TfValue::Lines(config.options.tags.iter().map(TfValue::str).collect()),
    );
    if let Some(kms) = sm.kms.as_deref() {
        attrs.add(
            "depends_on",
            TfValue::Lines(vec![TfValue::expr(format!(
                "ibm_iam_authorization_policy.secrets_manager_to_{}_kms_policy",
                snake_case(kms)
            ))]),
        );
    }
    resource("ibm_resource_instance", &instance_symbol(sm), &attrs)
}

/// Compile one secret. `kv` secrets read their payload from a COS resource
/// key; `imported` certificates arrive through a sensitive variable.
pub fn format_secret(secret: &SmSecret, sm: &SecretsManager, _config: &Config) -> String {
    let symbol = format!(
        "{}_{}",
        instance_symbol(sm),
        snake_case(&secret.name)
    );
    let mut attrs = Attrs::new();
    attrs
        .add(
            "name",
            TfValue::str(format!("${{var.prefix}}-{}", secret.name)),
        )
        .add(
            "instance_id",
            TfValue::expr(format!(
                "ibm_resource_instance.{}.guid",
                instance_symbol(sm)
            )),
        )
        .add("region", TfValue::expr("var.region"));
    attrs.add_if("description", secret.description.as_deref(), TfValue::str);
    if secret.secret_type == "imported" {
        attrs.add(
            "certificate",
            TfValue::expr(format!("var.{}_data", snake_case(&secret.name))),
        );
        return resource("ibm_sm_imported_certificate", &symbol, &attrs);
    }
    if let (Some(instance), Some(credentials)) = (
        secret.credential_instance.as_deref(),
        secret.credentials.as_deref(),
    ) {
        attrs.add(
            "data",
            TfValue::Map(vec![(
                "credentials".to_string(),
                TfValue::expr(format!(
                    "ibm_resource_key.{}_object_storage_key_{}.credentials.apikey",
                    snake_case(instance),
                    snake_case(credentials)
                )),
            )]),
        );
    }
    resource("ibm_sm_kv_secret", &symbol, &attrs)
}

/// Compile the `secrets_manager.tf` file body.
pub fn secrets_manager_tf(config: &Config) -> String {
    let mut tf = String::new();
    let mut seen_kms: Vec<&str> = Vec::new();
    let mut auth_body = String::new();
    for sm in &config.secrets_manager {
        if let Some(kms) = sm.kms.as_deref()
            && !seen_kms.contains(&kms)
        {
            seen_kms.push(kms);
            auth_body += &format_sm_authorization(kms, config);
        }
    }
    if !auth_body.is_empty() {
        tf += &(tf_block("key management authorizations", &auth_body) + "\n");
    }
    let mut body = String::new();
    for sm in &config.secrets_manager {
        body += &format_secrets_manager(sm, config);
        for secret in &sm.secrets {
            body += &format_secret(secret, sm, config);
        }
    }
    tf += &(tf_block("secrets manager instances", &body) + "\n");
    tf_done(&tf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn test_config() -> Config {
        let mut config = Config::empty();
        config.options.tags = vec!["slz".to_string(), "landing-zone".to_string()];
        config.resource_groups.push(crate::config::ResourceGroup {
            name: "service-rg".to_string(),
            use_data: false,
            use_prefix: true,
        });
        config.key_management.push(crate::config::KeyManagement {
            name: "kms".to_string(),
            resource_group: Some("service-rg".to_string()),
            use_data: false,
            use_hs_crypto: false,
            authorize_vpc_reader_role: false,
            keys: Vec::new(),
        });
        config.secrets_manager.push(SecretsManager {
            name: "secrets-manager".to_string(),
            resource_group: Some("service-rg".to_string()),
            kms: Some("kms".to_string()),
            encryption_key: Some("key".to_string()),
            secrets: Vec::new(),
        });
        config
    }

    #[test]
    fn instance_carries_kms_parameters_and_dependency() {
        let config = test_config();
        let actual = format_secrets_manager(&config.secrets_manager[0], &config);
        let expected = r#"
resource "ibm_resource_instance" "secrets_manager_secrets_manager" {
  name              = "${var.prefix}-secrets-manager"
  location          = var.region
  plan              = "standard"
  service           = "secrets-manager"
  resource_group_id = ibm_resource_group.service_rg.id
  parameters = {
    kms_key = ibm_kms_key.kms_key_key.crn
  }
  timeouts {
    create = "1h"
    delete = "1h"
  }
  tags = [
    "slz",
    "landing-zone"
  ]
  depends_on = [
    ibm_iam_authorization_policy.secrets_manager_to_kms_kms_policy
  ]
}
"#;
        assert_eq!(actual, expected);
    }

    #[test]
    fn imported_secret_reads_certificate_variable() {
        let config = test_config();
        let secret = SmSecret {
            name: "imported-cert".to_string(),
            secrets_manager: Some("secrets-manager".to_string()),
            secret_type: "imported".to_string(),
            description: None,
            credentials: None,
            credential_instance: None,
        };
        let rendered = format_secret(&secret, &config.secrets_manager[0], &config);
        assert!(rendered.contains("resource \"ibm_sm_imported_certificate\""));
        assert!(rendered.contains("certificate = var.imported_cert_data"));
    }
}

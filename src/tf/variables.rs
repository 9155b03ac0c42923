//! Root `variables.tf` compiler.
//!
//! Always declares the platform API key, region, and prefix. Each managed
//! SSH key adds a sensitive public-key variable (imported keys do not), and
//! each imported Secrets Manager certificate adds a sensitive payload
//! variable - the variable set is derived from the document, never fixed.

use crate::config::Config;
use crate::tf::block::{Attrs, TfValue, labelled_block};
use crate::tf::util::{snake_case, tf_block, tf_done, title_case};
use crate::tf::vpc::{prefix_validation, region_validation};

/// Compile the root `variables.tf`.
pub fn variables_tf(config: &Config) -> String {
    let mut body = String::new();

    let mut api_key = Attrs::new();
    api_key
        .add(
            "description",
            TfValue::str("The IBM Cloud platform API key needed to deploy IAM enabled resources."),
        )
        .add("type", TfValue::expr("string"))
        .add("sensitive", TfValue::Bool(true));
    body += &labelled_block("variable", &["ibmcloud_api_key"], &api_key);

    let mut region = Attrs::new();
    region
        .add(
            "description",
            TfValue::str("IBM Cloud Region where resources will be provisioned"),
        )
        .add("type", TfValue::expr("string"))
        .add("default", TfValue::str(&config.options.region))
        .add("validation", region_validation());
    body += &labelled_block("variable", &["region"], &region);

    let mut prefix = Attrs::new();
    prefix
        .add(
            "description",
            TfValue::str("Name prefix that will be prepended to named resources"),
        )
        .add("type", TfValue::expr("string"))
        .add("default", TfValue::str(&config.options.prefix))
        .add("validation", prefix_validation());
    body += &labelled_block("variable", &["prefix"], &prefix);

    let mut tags = Attrs::new();
    tags.add("description", TfValue::str("List of tags"))
        .add("type", TfValue::expr("list(string)"))
        .add(
            "default",
            TfValue::str_list(config.options.tags.iter().map(String::as_str)),
        );
    body += &labelled_block("variable", &["tags"], &tags);

    for key in config.ssh_keys.iter().filter(|key| !key.use_data) {
        let mut attrs = Attrs::new();
        attrs
            .add(
                "description",
                TfValue::str(format!(
                    "Public SSH Key Value for {} SSH Key",
                    title_case(&key.name)
                )),
            )
            .add("type", TfValue::expr("string"))
            .add("sensitive", TfValue::Bool(true))
            .add(
                "default",
                TfValue::opt_str(key.public_key.as_deref()),
            )
            .add(
                "validation",
                TfValue::Block(vec![
                    (
                        "error_message".to_string(),
                        TfValue::str("Public SSH Key must be a valid ssh rsa public key."),
                    ),
                    (
                        "condition".to_string(),
                        TfValue::expr(format!(
                            "var.{0}_public_key == null || can(regex(\"ssh-rsa AAAA[0-9A-Za-z+/]+[=]{{0,3}} ?([^@]+@[^@]+)?\", var.{0}_public_key))",
                            snake_case(&key.name)
                        )),
                    ),
                ]),
            );
        let label = format!("{}_public_key", snake_case(&key.name));
        body += &labelled_block("variable", &[label.as_str()], &attrs);
    }

    for sm in &config.secrets_manager {
        for secret in sm.secrets.iter().filter(|s| s.secret_type == "imported") {
            let mut attrs = Attrs::new();
            attrs
                .add(
                    "description",
                    TfValue::str("PEM encoded contents of your imported certificate"),
                )
                .add("type", TfValue::expr("string"))
                .add("sensitive", TfValue::Bool(true));
            let label = format!("{}_data", snake_case(&secret.name));
            body += &labelled_block("variable", &[label.as_str()], &attrs);
        }
    }

    tf_done(&(tf_block("variables", &body) + "\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn managed_ssh_key_declares_a_variable() {
        let mut config = Config::empty();
        config.ssh_keys.push(crate::config::SshKey {
            name: "ssh-key".to_string(),
            public_key: Some("public-key".to_string()),
            resource_group: None,
            use_data: false,
        });
        let rendered = variables_tf(&config);
        assert!(rendered.contains("variable \"ssh_key_public_key\" {"));
        assert!(rendered.contains("Public SSH Key Value for Ssh Key SSH Key"));
    }

    #[test]
    fn imported_ssh_key_declares_no_variable() {
        let mut config = Config::empty();
        config.ssh_keys.push(crate::config::SshKey {
            name: "imported".to_string(),
            public_key: None,
            resource_group: None,
            use_data: true,
        });
        let rendered = variables_tf(&config);
        assert!(!rendered.contains("imported_public_key"));
        // The three base variables remain.
        assert!(rendered.contains("variable \"ibmcloud_api_key\" {"));
        assert!(rendered.contains("variable \"region\" {"));
        assert!(rendered.contains("variable \"prefix\" {"));
    }

    #[test]
    fn imported_certificate_declares_payload_variable() {
        let mut config = Config::empty();
        config.secrets_manager.push(crate::config::SecretsManager {
            name: "sm".to_string(),
            resource_group: None,
            kms: None,
            encryption_key: None,
            secrets: vec![crate::config::SmSecret {
                name: "imported-cert".to_string(),
                secrets_manager: Some("sm".to_string()),
                secret_type: "imported".to_string(),
                description: None,
                credentials: None,
                credential_instance: None,
            }],
        });
        assert!(variables_tf(&config).contains("variable \"imported_cert_data\" {"));
    }
}

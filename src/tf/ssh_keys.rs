//! SSH key compiler.
//!
//! Managed keys take their material from a sensitive variable declared in
//! the root `variables.tf`; imported keys (`use_data`) resolve through a
//! data source under the same symbolic name, so consumers reference either
//! mode identically.

use crate::config::{Config, SshKey};
use crate::tf::block::{Attrs, TfValue, data, resource};
use crate::tf::util::{kebab_name, rg_id_ref, snake_case, tf_block, tf_done};

/// Compile one SSH key.
pub fn format_ssh_key(key: &SshKey, config: &Config) -> String {
    let mut attrs = Attrs::new();
    if key.use_data {
        attrs.add("name", TfValue::str(&key.name));
        return data("ibm_is_ssh_key", &snake_case(&key.name), &attrs);
    }
    attrs
        .add("name", kebab_name(&[&key.name]))
        .add(
            "public_key",
            TfValue::expr(format!("var.{}_public_key", snake_case(&key.name))),
        )
        .add(
            "resource_group",
            rg_id_ref(key.resource_group.as_deref(), config),
        )
        .add(
            "tags",
            TfValue::Lines(config.options.tags.iter().map(TfValue::str).collect()),
        );
    resource("ibm_is_ssh_key", &snake_case(&key.name), &attrs)
}

/// Compile the `ssh_keys.tf` file body.
pub fn ssh_keys_tf(config: &Config) -> String {
    let body: String = config
        .ssh_keys
        .iter()
        .map(|key| format_ssh_key(key, config))
        .collect();
    tf_done(&(tf_block("ssh keys", &body) + "\n"))
}

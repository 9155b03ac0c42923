//! Resource group compiler.

use crate::config::{Config, ResourceGroup};
use crate::tf::block::{Attrs, TfValue, data, resource};
use crate::tf::util::{kebab_name, snake_case, tf_block, tf_done};

/// Compile one resource group: a managed resource, or a data source lookup
/// when the group is imported (`use_data`). Both share the same symbolic
/// name so downstream references do not care which mode is active.
pub fn format_resource_group(rg: &ResourceGroup, _config: &Config) -> String {
    let mut attrs = Attrs::new();
    if rg.use_data {
        attrs.add("name", TfValue::str(&rg.name));
        data("ibm_resource_group", &snake_case(&rg.name), &attrs)
    } else {
        if rg.use_prefix {
            attrs.add("name", kebab_name(&[&rg.name]));
        } else {
            attrs.add("name", TfValue::str(&rg.name));
        }
        resource("ibm_resource_group", &snake_case(&rg.name), &attrs)
    }
}

/// Compile the `resource_groups.tf` file.
pub fn resource_groups_tf(config: &Config) -> String {
    let body: String = config
        .resource_groups
        .iter()
        .map(|rg| format_resource_group(rg, config))
        .collect();
    tf_done(&(tf_block("resource groups", &body) + "\n"))
}

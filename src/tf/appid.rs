//! AppID compiler: identity instances and their resource keys.

use crate::config::{AppId, AppIdKey, Config};
use crate::tf::block::{Attrs, TfValue, data, resource};
use crate::tf::util::{kebab_name, rg_id_ref, snake_case, tf_block, tf_done, tf_ref};

/// Compile an AppID instance (managed or data source).
pub fn format_appid(appid: &AppId, config: &Config) -> String {
    let mut attrs = Attrs::new();
    if appid.use_data {
        attrs
            .add("name", TfValue::str(&appid.name))
            .add(
                "resource_group_id",
                rg_id_ref(appid.resource_group.as_deref(), config),
            );
        return data("ibm_resource_instance", &snake_case(&appid.name), &attrs);
    }
    attrs
        .add("name", kebab_name(&[&appid.name]))
        .add("service", TfValue::str("appid"))
        .add("plan", TfValue::str("graduated-tier"))
        .add("location", TfValue::expr("var.region"))
        .add(
            "resource_group_id",
            rg_id_ref(appid.resource_group.as_deref(), config),
        )
        .add(
            "tags",
            TfValue::Lines(config.options.tags.iter().map(TfValue::str).collect()),
        );
    resource("ibm_resource_instance", &snake_case(&appid.name), &attrs)
}

/// Compile one resource key bound to an AppID instance.
pub fn format_appid_key(key: &AppIdKey, appid: &AppId, config: &Config) -> String {
    let mut attrs = Attrs::new();
    attrs
        .add("name", kebab_name(&[&key.appid, &key.name]))
        .add(
            "resource_instance_id",
            tf_ref("ibm_resource_instance", &key.appid, "id", appid.use_data),
        )
        .add("role", TfValue::str("Writer"))
        .add(
            "tags",
            TfValue::Lines(config.options.tags.iter().map(TfValue::str).collect()),
        );
    resource(
        "ibm_resource_key",
        &format!("{}_key_{}", snake_case(&key.appid), snake_case(&key.name)),
        &attrs,
    )
}

/// Compile the `appid.tf` file body.
pub fn appid_tf(config: &Config) -> String {
    let mut body = String::new();
    for appid in &config.appid {
        body += &format_appid(appid, config);
        for key in &appid.keys {
            body += &format_appid_key(key, appid, config);
        }
    }
    tf_done(&(tf_block("appid", &body) + "\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_symbol_follows_parent_name() {
        let appid = AppId {
            name: "default".to_string(),
            use_data: false,
            resource_group: None,
            keys: vec![AppIdKey {
                appid: "default".to_string(),
                name: "test".to_string(),
            }],
        };
        let rendered = format_appid_key(&appid.keys[0], &appid, &Config::empty());
        assert!(rendered.contains("resource \"ibm_resource_key\" \"default_key_test\" {"));
        assert!(rendered.contains("resource_instance_id = ibm_resource_instance.default.id"));
    }

    #[test]
    fn data_mode_keys_reference_the_data_source() {
        let appid = AppId {
            name: "imported".to_string(),
            use_data: true,
            resource_group: None,
            keys: vec![AppIdKey {
                appid: "imported".to_string(),
                name: "k".to_string(),
            }],
        };
        let rendered = format_appid_key(&appid.keys[0], &appid, &Config::empty());
        assert!(rendered.contains("data.ibm_resource_instance.imported.id"));
    }
}

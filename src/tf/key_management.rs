//! Key management compiler: service instances, key rings, encryption keys,
//! rotation policies, and the block-storage authorization.

use crate::config::{Config, KeyManagement, KmsKey};
use crate::tf::block::{Attrs, TfValue, data, resource};
use crate::tf::util::{kebab_name, rg_id_ref, snake_case, tf_block, tf_done, tf_ref};

/// Compile the key management service instance (Key Protect, or Hyper
/// Protect Crypto when `use_hs_crypto` is set). Imported instances render a
/// data source under the same symbolic name.
pub fn format_kms_instance(kms: &KeyManagement, config: &Config) -> String {
    let service = if kms.use_hs_crypto { "hs-crypto" } else { "kms" };
    let mut attrs = Attrs::new();
    if kms.use_data {
        attrs
            .add("name", TfValue::str(&kms.name))
            .add("resource_group_id", rg_id_ref(kms.resource_group.as_deref(), config));
        return data("ibm_resource_instance", &snake_case(&kms.name), &attrs);
    }
    attrs
        .add("name", kebab_name(&[&kms.name]))
        .add("service", TfValue::str(service))
        .add("plan", TfValue::str("tiered-pricing"))
        .add("location", TfValue::expr("var.region"))
        .add("resource_group_id", rg_id_ref(kms.resource_group.as_deref(), config))
        .add("service_endpoints", TfValue::str("public-and-private"))
        .add(
            "tags",
            TfValue::Lines(config.options.tags.iter().map(TfValue::str).collect()),
        );
    resource("ibm_resource_instance", &snake_case(&kms.name), &attrs)
}

/// Authorization letting VPC block storage read encryption keys.
pub fn format_kms_authorization(kms: &KeyManagement, _config: &Config) -> String {
    let mut attrs = Attrs::new();
    attrs
        .add("source_service_name", TfValue::str("server-protect"))
        .add("target_service_name", TfValue::str("kms"))
        .add(
            "target_resource_instance_id",
            instance_ref(kms, "guid"),
        )
        .add("description", TfValue::str("Allow block storage volumes to be encrypted by KMS instance"))
        .add("roles", TfValue::Lines(vec![TfValue::str("Reader")]));
    resource(
        "ibm_iam_authorization_policy",
        &format!("{}_server_protect_policy", snake_case(&kms.name)),
        &attrs,
    )
}

/// Compile one key ring.
pub fn format_key_ring(ring: &str, kms: &KeyManagement, _config: &Config) -> String {
    let mut attrs = Attrs::new();
    attrs
        .add("key_ring_id", kebab_name(&[ring]))
        .add("instance_id", instance_ref(kms, "guid"));
    resource(
        "ibm_kms_key_rings",
        &format!("{}_{}_ring", snake_case(&kms.name), snake_case(ring)),
        &attrs,
    )
}

/// Compile one encryption key.
pub fn format_kms_key(key: &KmsKey, kms: &KeyManagement, _config: &Config) -> String {
    let mut attrs = Attrs::new();
    attrs
        .add("instance_id", instance_ref(kms, "guid"))
        .add("key_name", kebab_name(&[&key.name]))
        .add("standard_key", TfValue::Bool(!key.root_key));
    attrs.add_if("key_ring_id", key.key_ring.as_deref(), |ring| {
        TfValue::expr(format!(
            "ibm_kms_key_rings.{}_{}_ring.key_ring_id",
            snake_case(&kms.name),
            snake_case(ring)
        ))
    });
    attrs.add_if("force_delete", key.force_delete, TfValue::Bool);
    attrs.add_if("endpoint_type", key.endpoint.as_deref(), TfValue::str);
    if key.dual_auth_delete {
        attrs.add("dual_auth_delete_enabled", TfValue::Bool(true));
    }
    resource("ibm_kms_key", &key_symbol(kms, key), &attrs)
}

/// Compile the rotation policy for one key.
pub fn format_kms_key_policy(key: &KmsKey, kms: &KeyManagement, _config: &Config) -> String {
    let mut attrs = Attrs::new();
    attrs
        .add("instance_id", instance_ref(kms, "guid"))
        .add(
            "key_id",
            TfValue::expr(format!("ibm_kms_key.{}.key_id", key_symbol(kms, key))),
        )
        .add(
            "rotation",
            TfValue::Block(vec![(
                "interval_month".to_string(),
                TfValue::Int(i64::from(key.rotation)),
            )]),
        );
    resource(
        "ibm_kms_key_policies",
        &format!("{}_policy", key_symbol(kms, key)),
        &attrs,
    )
}

/// Compile the `key_management.tf` file body for every instance.
pub fn kms_tf(config: &Config) -> String {
    let mut tf = String::new();
    for kms in &config.key_management {
        let mut body = format_kms_instance(kms, config);
        if kms.authorize_vpc_reader_role {
            body += &format_kms_authorization(kms, config);
        }
        let mut seen_rings: Vec<&str> = Vec::new();
        for key in &kms.keys {
            if let Some(ring) = key.key_ring.as_deref()
                && !seen_rings.contains(&ring)
            {
                seen_rings.push(ring);
                body += &format_key_ring(ring, kms, config);
            }
        }
        for key in &kms.keys {
            body += &format_kms_key(key, kms, config);
            body += &format_kms_key_policy(key, kms, config);
        }
        tf += &(tf_block(&format!("{} key management", kms.name), &body) + "\n");
    }
    tf_done(&tf)
}

fn key_symbol(kms: &KeyManagement, key: &KmsKey) -> String {
    format!("{}_{}_key", snake_case(&kms.name), snake_case(&key.name))
}

fn instance_ref(kms: &KeyManagement, attr: &str) -> TfValue {
    tf_ref("ibm_resource_instance", &kms.name, attr, kms.use_data)
}

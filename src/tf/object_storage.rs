//! Object storage compiler: service instances, random suffixes, buckets,
//! resource keys, and the COS-to-KMS authorization.

use crate::config::{Config, CosBucket, CosKey, ObjectStorage};
use crate::tf::block::{Attrs, TfValue, data, resource};
use crate::tf::util::{kms_instance_ref, rg_id_ref, snake_case, tf_block, tf_done};

/// Symbolic name of a COS instance: `<name>_object_storage`.
pub fn cos_symbol(cos: &ObjectStorage) -> String {
    format!("{}_object_storage", snake_case(&cos.name))
}

/// Symbolic name of a bucket: `<cos>_object_storage_<bucket>_bucket`.
pub fn bucket_symbol(cos: &ObjectStorage, bucket: &CosBucket) -> String {
    format!("{}_{}_bucket", cos_symbol(cos), snake_case(&bucket.name))
}

/// Symbolic name of a resource key: `<cos>_object_storage_key_<key>`.
pub fn cos_key_symbol(cos: &ObjectStorage, key: &CosKey) -> String {
    format!("{}_key_{}", cos_symbol(cos), snake_case(&key.name))
}

/// Authorization letting a COS instance read keys from its KMS instance.
pub fn format_cos_authorization(kms_name: &str, config: &Config) -> String {
    let mut attrs = Attrs::new();
    attrs
        .add("source_service_name", TfValue::str("cloud-object-storage"))
        .add("target_service_name", TfValue::str("kms"))
        .add(
            "target_resource_instance_id",
            kms_instance_ref(kms_name, "guid", config),
        )
        .add(
            "description",
            TfValue::str("Allow COS instance to read from KMS instance"),
        )
        .add("roles", TfValue::Lines(vec![TfValue::str("Reader")]));
    resource(
        "ibm_iam_authorization_policy",
        &format!("cos_to_{}_kms_policy", snake_case(kms_name)),
        &attrs,
    )
}

/// Random suffix appended to bucket and key names at apply time.
pub fn format_random_suffix(cos: &ObjectStorage) -> String {
    let mut attrs = Attrs::new();
    attrs
        .add("length", TfValue::Int(8))
        .add("special", TfValue::Bool(false))
        .add("upper", TfValue::Bool(false));
    resource(
        "random_string",
        &format!("{}_random_suffix", cos_symbol(cos)),
        &attrs,
    )
}

/// Compile a COS service instance (managed or data source).
pub fn format_cos_instance(cos: &ObjectStorage, config: &Config) -> String {
    let mut attrs = Attrs::new();
    if cos.use_data {
        attrs
            .add("name", TfValue::str(&cos.name))
            .add("service", TfValue::str("cloud-object-storage"));
        return data("ibm_resource_instance", &cos_symbol(cos), &attrs);
    }
    attrs
        .add("name", TfValue::str(instance_name(cos)))
        .add("service", TfValue::str("cloud-object-storage"))
        .add("plan", TfValue::str(&cos.plan))
        .add("location", TfValue::str("global"))
        .add(
            "resource_group_id",
            rg_id_ref(cos.resource_group.as_deref(), config),
        )
        .add(
            "tags",
            TfValue::Lines(config.options.tags.iter().map(TfValue::str).collect()),
        );
    resource("ibm_resource_instance", &cos_symbol(cos), &attrs)
}

/// Compile one bucket, encrypted with the parent instance's KMS key.
pub fn format_cos_bucket(bucket: &CosBucket, cos: &ObjectStorage, config: &Config) -> String {
    let mut attrs = Attrs::new();
    attrs
        .add(
            "bucket_name",
            TfValue::str(format!(
                "{}-{}{}",
                "${var.prefix}",
                crate::tf::util::kebab_case(&format!("{} {}", cos.name, bucket.name)),
                suffix_interpolation(cos)
            )),
        )
        .add(
            "resource_instance_id",
            instance_id_ref(cos),
        )
        .add("storage_class", TfValue::str(&bucket.storage_class))
        .add("endpoint_type", TfValue::str(&bucket.endpoint))
        .add("force_delete", TfValue::Bool(true))
        .add("region_location", TfValue::expr("var.region"));
    attrs.add_if(
        "key_protect",
        cos.kms.as_deref().zip(bucket.kms_key.as_deref()),
        |(kms, key)| crate::tf::util::encryption_key_ref(Some(kms), Some(key), "crn"),
    );
    if let Some(kms) = cos.kms.as_deref() {
        attrs.add(
            "depends_on",
            TfValue::Lines(vec![TfValue::expr(format!(
                "ibm_iam_authorization_policy.cos_to_{}_kms_policy",
                snake_case(kms)
            ))]),
        );
    }
    resource("ibm_cos_bucket", &bucket_symbol(cos, bucket), &attrs)
}

/// Compile one resource key bound to a COS instance.
pub fn format_cos_key(key: &CosKey, cos: &ObjectStorage, config: &Config) -> String {
    let mut attrs = Attrs::new();
    attrs
        .add(
            "name",
            TfValue::str(format!(
                "{}-{}{}",
                "${var.prefix}",
                crate::tf::util::kebab_case(&format!("{} key {}", cos.name, key.name)),
                suffix_interpolation(cos)
            )),
        )
        .add("resource_instance_id", instance_id_ref(cos))
        .add("role", TfValue::str(&key.role))
        .add(
            "tags",
            TfValue::Lines(config.options.tags.iter().map(TfValue::str).collect()),
        );
    if key.enable_hmac {
        attrs.add(
            "parameters",
            TfValue::Map(vec![("HMAC".to_string(), TfValue::Bool(true))]),
        );
    }
    resource("ibm_resource_key", &cos_key_symbol(cos, key), &attrs)
}

/// Compile the `object_storage.tf` file body.
pub fn cos_tf(config: &Config) -> String {
    let mut tf = String::new();
    // One authorization per distinct KMS instance referenced by any COS
    // instance, emitted before the instances that depend on it.
    let mut seen_kms: Vec<&str> = Vec::new();
    let mut auth_body = String::new();
    for cos in &config.object_storage {
        if let Some(kms) = cos.kms.as_deref()
            && !seen_kms.contains(&kms)
        {
            seen_kms.push(kms);
            auth_body += &format_cos_authorization(kms, config);
        }
    }
    if !auth_body.is_empty() {
        tf += &(tf_block("key management authorizations", &auth_body) + "\n");
    }
    for cos in &config.object_storage {
        let mut body = String::new();
        if cos.use_random_suffix && !cos.use_data {
            body += &format_random_suffix(cos);
        }
        body += &format_cos_instance(cos, config);
        for bucket in &cos.buckets {
            body += &format_cos_bucket(bucket, cos, config);
        }
        for key in &cos.keys {
            body += &format_cos_key(key, cos, config);
        }
        tf += &(tf_block(&format!("{} object storage", cos.name), &body) + "\n");
    }
    tf_done(&tf)
}

fn instance_name(cos: &ObjectStorage) -> String {
    format!(
        "{}-{}-object-storage{}",
        "${var.prefix}",
        crate::tf::util::kebab_case(&cos.name),
        suffix_interpolation(cos)
    )
}

fn suffix_interpolation(cos: &ObjectStorage) -> String {
    if cos.use_random_suffix && !cos.use_data {
        format!("-${{random_string.{}_random_suffix.result}}", cos_symbol(cos))
    } else {
        String::new()
    }
}

fn instance_id_ref(cos: &ObjectStorage) -> TfValue {
    let data_prefix = if cos.use_data { "data." } else { "" };
    TfValue::expr(format!("{data_prefix}ibm_resource_instance.{}.id", cos_symbol(cos)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn test_config() -> Config {
        let mut config = Config::empty();
        config.options.tags = vec!["hello".to_string(), "world".to_string()];
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
            authorize_vpc_reader_role: true,
            keys: Vec::new(),
        });
        config.object_storage.push(ObjectStorage {
            name: "cos".to_string(),
            resource_group: Some("service-rg".to_string()),
            kms: Some("kms".to_string()),
            plan: "standard".to_string(),
            use_data: false,
            use_random_suffix: false,
            buckets: vec![CosBucket {
                name: "management-bucket".to_string(),
                storage_class: "standard".to_string(),
                kms_key: Some("key".to_string()),
                endpoint: "public".to_string(),
            }],
            keys: vec![CosKey {
                name: "cos-bind-key".to_string(),
                role: "Writer".to_string(),
                enable_hmac: false,
            }],
        });
        config
    }

    #[test]
    fn formats_cos_bucket_with_encryption_and_dependency() {
        let config = test_config();
        let cos = &config.object_storage[0];
        let actual = format_cos_bucket(&cos.buckets[0], cos, &config);
        let expected = r#"
resource "ibm_cos_bucket" "cos_object_storage_management_bucket_bucket" {
  bucket_name          = "${var.prefix}-cos-management-bucket"
  resource_instance_id = ibm_resource_instance.cos_object_storage.id
  storage_class        = "standard"
  endpoint_type        = "public"
  force_delete         = true
  region_location      = var.region
  key_protect          = ibm_kms_key.kms_key_key.crn
  depends_on = [
    ibm_iam_authorization_policy.cos_to_kms_kms_policy
  ]
}
"#;
        assert_eq!(actual, expected);
    }

    #[test]
    fn random_suffix_threads_through_names() {
        let mut config = test_config();
        config.object_storage[0].use_random_suffix = true;
        let cos = &config.object_storage[0];
        let rendered = format_cos_instance(cos, &config);
        assert!(rendered.contains(
            "\"${var.prefix}-cos-object-storage-${random_string.cos_object_storage_random_suffix.result}\""
        ));
    }

    #[test]
    fn key_symbol_matches_reference_convention() {
        let config = test_config();
        let cos = &config.object_storage[0];
        assert_eq!(
            cos_key_symbol(cos, &cos.keys[0]),
            "cos_object_storage_key_cos_bind_key"
        );
    }
}

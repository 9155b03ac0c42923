//! Provider dependency manifest (`versions.tf`).
//!
//! The provider set is computed by scanning document flags, never
//! hardcoded: the `random` provider appears only when an object storage
//! instance wants random suffixes, and the `logdna` provider only when log
//! or activity-tracker archiving is active, with its configuration aliases
//! matching whichever archives are enabled.

use crate::config::Config;
use crate::tf::block::{Attrs, TfValue, bare_block};
use crate::tf::observability::{atracker_archive_enabled, logdna_archive_enabled};
use crate::tf::util::{tf_block, tf_done};

const IBM_PROVIDER_VERSION: &str = "~>1.56.1";
const LOGDNA_PROVIDER_VERSION: &str = ">= 1.14.2";
const RANDOM_PROVIDER_VERSION: &str = ">=1.0.0";

fn terraform_block(config: &Config, include_optional: bool) -> String {
    let mut providers: Vec<(String, TfValue)> = vec![(
        "ibm".to_string(),
        TfValue::Map(vec![
            ("source".to_string(), TfValue::str("IBM-Cloud/ibm")),
            ("version".to_string(), TfValue::str(IBM_PROVIDER_VERSION)),
        ]),
    )];
    if include_optional {
        if config
            .object_storage
            .iter()
            .any(|cos| cos.use_random_suffix && !cos.use_data)
        {
            providers.push((
                "random".to_string(),
                TfValue::Map(vec![
                    ("source".to_string(), TfValue::str("hashicorp/random")),
                    ("version".to_string(), TfValue::str(RANDOM_PROVIDER_VERSION)),
                ]),
            ));
        }
        let mut aliases = Vec::new();
        if logdna_archive_enabled(&config.logdna) {
            aliases.push(TfValue::expr("logdna.logdna"));
        }
        if atracker_archive_enabled(&config.atracker) {
            aliases.push(TfValue::expr("logdna.atracker"));
        }
        if !aliases.is_empty() {
            providers.push((
                "logdna".to_string(),
                TfValue::Map(vec![
                    ("source".to_string(), TfValue::str("logdna/logdna")),
                    ("version".to_string(), TfValue::str(LOGDNA_PROVIDER_VERSION)),
                    ("configuration_aliases".to_string(), TfValue::List(aliases)),
                ]),
            ));
        }
    }
    let mut attrs = Attrs::new();
    attrs
        .add("required_providers", TfValue::Block(providers))
        .add("required_version", TfValue::str(">=1.3"));
    bare_block("terraform", &attrs)
}

/// Compile the root `versions.tf`.
pub fn versions_tf(config: &Config) -> String {
    tf_done(&(tf_block("terraform providers", &terraform_block(config, true)) + "\n"))
}

/// Compile the per-VPC module `versions.tf` (IBM provider only - modules
/// never talk to the optional providers).
pub fn module_versions_tf() -> String {
    tf_done(
        &(tf_block(
            "terraform providers",
            &terraform_block(&Config::empty(), false),
        ) + "\n"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn base_manifest_has_only_ibm_provider() {
        let actual = versions_tf(&Config::empty());
        let expected = r#"##############################################################################
# Terraform Providers
##############################################################################

terraform {
  required_providers {
    ibm = {
      source  = "IBM-Cloud/ibm"
      version = "~>1.56.1"
    }
  }
  required_version = ">=1.3"
}

##############################################################################
"#;
        assert_eq!(actual, expected);
    }

    #[test]
    fn archive_flags_add_logdna_provider_with_matching_aliases() {
        let mut config = Config::empty();
        config.logdna.enabled = true;
        config.logdna.archive = true;
        config.logdna.cos = Some("cos".to_string());
        config.logdna.bucket = Some("bucket".to_string());
        let rendered = versions_tf(&config);
        assert!(rendered.contains("configuration_aliases = [logdna.logdna]"));

        config.atracker.enabled = true;
        config.atracker.instance = true;
        config.atracker.archive = true;
        config.atracker.target_name = Some("cos".to_string());
        config.atracker.bucket = Some("bucket".to_string());
        let rendered = versions_tf(&config);
        assert!(rendered.contains("configuration_aliases = [logdna.logdna,logdna.atracker]"));
    }

    #[test]
    fn random_suffix_adds_random_provider() {
        let mut config = Config::empty();
        config.object_storage.push(crate::config::ObjectStorage {
            name: "cos".to_string(),
            resource_group: None,
            kms: None,
            plan: "standard".to_string(),
            use_data: false,
            use_random_suffix: true,
            buckets: Vec::new(),
            keys: Vec::new(),
        });
        assert!(versions_tf(&config).contains("hashicorp/random"));
        assert!(!module_versions_tf().contains("hashicorp/random"));
    }
}

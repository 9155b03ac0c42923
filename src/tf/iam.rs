//! IAM account settings compiler.

use crate::config::{Config, IamAccountSettings};
use crate::tf::block::{Attrs, TfValue, resource};
use crate::tf::util::{tf_block, tf_done};

/// Compile the account-wide IAM settings resource. Only fields the operator
/// set are emitted; the provider leaves the rest untouched.
pub fn format_iam_account_settings(iam: &IamAccountSettings, _config: &Config) -> String {
    let mut attrs = Attrs::new();
    attrs.add_if("mfa", iam.mfa.as_deref(), TfValue::str);
    attrs.add_if(
        "allowed_ip_addresses",
        iam.allowed_ip_addresses.as_deref(),
        TfValue::str,
    );
    attrs.add("include_history", TfValue::Bool(iam.include_history));
    attrs.add_if("if_match", iam.if_match.as_deref(), TfValue::str);
    attrs.add_if(
        "max_sessions_per_identity",
        iam.max_sessions_per_identity,
        |v| TfValue::Int(i64::from(v)),
    );
    attrs.add_if(
        "restrict_create_service_id",
        iam.restrict_create_service_id.as_deref(),
        TfValue::str,
    );
    attrs.add_if(
        "restrict_create_platform_apikey",
        iam.restrict_create_platform_apikey.as_deref(),
        TfValue::str,
    );
    attrs.add_if(
        "session_expiration_in_seconds",
        iam.session_expiration_in_seconds,
        |v| TfValue::Int(i64::from(v)),
    );
    attrs.add_if(
        "session_invalidation_in_seconds",
        iam.session_invalidation_in_seconds,
        |v| TfValue::Int(i64::from(v)),
    );
    resource("ibm_iam_account_settings", "iam_account_settings", &attrs)
}

/// Compile the `iam_account_settings.tf` file. `None` when not enabled.
pub fn iam_tf(config: &Config) -> Option<String> {
    if !config.iam_account_settings.enable {
        return None;
    }
    let body = format_iam_account_settings(&config.iam_account_settings, config);
    Some(tf_done(&(tf_block("iam account settings", &body) + "\n")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_set_fields_are_emitted() {
        let iam = IamAccountSettings {
            enable: true,
            mfa: Some("NONE".to_string()),
            allowed_ip_addresses: Some("1.2.3.4,5.6.7.8".to_string()),
            max_sessions_per_identity: Some(2),
            ..IamAccountSettings::default()
        };
        let rendered = format_iam_account_settings(&iam, &Config::empty());
        assert!(rendered.contains("mfa                       = \"NONE\""));
        assert!(rendered.contains("max_sessions_per_identity = 2"));
        assert!(!rendered.contains("session_expiration_in_seconds"));
    }

    #[test]
    fn disabled_settings_omit_the_file() {
        assert!(iam_tf(&Config::empty()).is_none());
    }
}

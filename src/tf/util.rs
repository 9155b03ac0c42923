//! Shared formatting utilities: identifier normalization, banner comments,
//! cross-resource reference builders, and zone extraction.

use crate::config::Config;
use crate::tf::block::TfValue;

/// Width of the `#` banner used around every logical section.
pub const BANNER: &str =
    "##############################################################################";

/// Lowercase and collapse every run of non-alphanumeric characters to a
/// single underscore. Used for every symbolic resource identifier.
pub fn snake_case(name: &str) -> String {
    collapse(name, '_')
}

/// Lowercase and collapse every run of non-alphanumeric characters to a
/// single hyphen. Used for provisioned (human-visible) names.
pub fn kebab_case(name: &str) -> String {
    collapse(name, '-')
}

fn collapse(name: &str, separator: char) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_separator = false;
    for ch in name.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_separator && !out.is_empty() {
                out.push(separator);
            }
            pending_separator = false;
            out.push(ch.to_ascii_lowercase());
        } else {
            pending_separator = true;
        }
    }
    out
}

/// Capitalize the first letter of each word; words split on spaces, hyphens,
/// and underscores. Existing capitals are preserved, so `management VPC`
/// becomes `Management VPC`.
pub fn title_case(name: &str) -> String {
    name.split(|c: char| c == ' ' || c == '-' || c == '_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Wrap a section of rendered resources in a banner comment.
///
/// The body is expected to start with a newline (every rendered block does),
/// which yields the blank line after the banner.
pub fn tf_block(title: &str, body: &str) -> String {
    format!("{BANNER}\n# {}\n{BANNER}\n{body}\n{BANNER}\n", title_case(title))
}

/// Finish a file assembled from `tf_block(..) + "\n"` sections by removing
/// the final separator newline.
pub fn tf_done(text: &str) -> String {
    text.strip_suffix('\n').unwrap_or(text).to_string()
}

/// Extract the zone from a name that conventionally ends in a zone digit.
///
/// Strips everything except the trailing character when that character is an
/// ASCII digit; otherwise returns the input unchanged. This matches the
/// original naming convention exactly, including its behavior on
/// non-conforming names (`subnet` stays `subnet`, `tier-12` becomes `2`) -
/// deterministic, if surprising, and covered by tests rather than
/// special-cased.
pub fn zone_digit(name: &str) -> String {
    match name.chars().last() {
        Some(last) if last.is_ascii_digit() => last.to_string(),
        _ => name.to_string(),
    }
}

/// Sort subnet names by their trailing zone digit, then lexically.
/// Keeps replica expansion deterministic regardless of input order.
pub fn az_sort(names: &mut [String]) {
    names.sort_by(|a, b| zone_digit(a).cmp(&zone_digit(b)).then_with(|| a.cmp(b)));
}

/// Compose a `region-zone` string: `"${var.region}-2"`.
pub fn composed_zone(zone: impl std::fmt::Display) -> TfValue {
    TfValue::str(format!("${{var.region}}-{zone}"))
}

/// A kebab-cased provisioned name with the variable prefix:
/// `"${var.prefix}-management-vpc"`.
pub fn kebab_name(parts: &[&str]) -> TfValue {
    let joined = parts
        .iter()
        .map(|part| kebab_case(part))
        .collect::<Vec<_>>()
        .join("-");
    TfValue::str(format!("${{var.prefix}}-{joined}"))
}

/// Reference another resource's attribute:
/// `ibm_is_ssh_key.ssh_key.id`, or the `data.` form when the referenced
/// entity is imported rather than managed.
pub fn tf_ref(tf_type: &str, name: &str, attr: &str, use_data: bool) -> TfValue {
    let data_prefix = if use_data { "data." } else { "" };
    TfValue::expr(format!("{data_prefix}{tf_type}.{}.{attr}", snake_case(name)))
}

/// Resource group id reference, branching on the group's `use_data` flag so
/// imported groups resolve through a data source. A dangling reference
/// renders as `null` - the validation layer, not the compiler, decides
/// whether the document is complete.
pub fn rg_id_ref(name: Option<&str>, config: &Config) -> TfValue {
    match name.and_then(|name| config.resource_group(name)) {
        Some(rg) => tf_ref("ibm_resource_group", &rg.name, "id", rg.use_data),
        None => TfValue::Null,
    }
}

/// Module-scoped resource group id reference (`var.<rg>_id`), used inside
/// per-VPC modules where groups arrive as variables.
pub fn rg_var_ref(name: Option<&str>) -> TfValue {
    match name {
        Some(name) => TfValue::expr(format!("var.{}_id", snake_case(name))),
        None => TfValue::Null,
    }
}

/// Reference an output of a VPC module: `module.management_vpc.crn`.
pub fn vpc_module_ref(vpc: &str, output: &str) -> TfValue {
    TfValue::expr(format!("module.{}_vpc.{output}", snake_case(vpc)))
}

/// Reference a subnet or security group id exported by its VPC module.
pub fn vpc_output_ref(vpc: &str, entity: &str) -> TfValue {
    vpc_module_ref(vpc, &format!("{}_id", snake_case(entity)))
}

/// Reference an encryption key attribute:
/// `ibm_kms_key.kms_vsi_volume_key_key.crn`.
pub fn encryption_key_ref(kms: Option<&str>, key: Option<&str>, attr: &str) -> TfValue {
    match (kms, key) {
        (Some(kms), Some(key)) => TfValue::expr(format!(
            "ibm_kms_key.{}_{}_key.{attr}",
            snake_case(kms),
            snake_case(key)
        )),
        _ => TfValue::Null,
    }
}

/// Reference a key management instance attribute, branching on `use_data`.
pub fn kms_instance_ref(name: &str, attr: &str, config: &Config) -> TfValue {
    let use_data = config
        .key_management_instance(name)
        .is_some_and(|kms| kms.use_data);
    tf_ref("ibm_resource_instance", name, attr, use_data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snake_case_collapses_runs() {
        assert_eq!(snake_case("slz-management--rg"), "slz_management_rg");
        assert_eq!(snake_case("Management VPC"), "management_vpc");
    }

    #[test]
    fn title_case_preserves_existing_capitals() {
        assert_eq!(title_case("management VPC"), "Management VPC");
        assert_eq!(title_case("transit-gateway transit gateway"), "Transit Gateway Transit Gateway");
    }

    #[test]
    fn zone_digit_takes_trailing_digit() {
        assert_eq!(zone_digit("vsi-zone-2"), "2");
        assert_eq!(zone_digit("tier-12"), "2");
    }

    #[test]
    fn zone_digit_passes_through_names_without_trailing_digit() {
        // Unspecified-but-deterministic: non-conforming names come back
        // unchanged instead of raising.
        assert_eq!(zone_digit("subnet"), "subnet");
        assert_eq!(zone_digit(""), "");
    }

    #[test]
    fn az_sort_orders_by_zone() {
        let mut names = vec![
            "vsi-zone-3".to_string(),
            "vsi-zone-1".to_string(),
            "vsi-zone-2".to_string(),
        ];
        az_sort(&mut names);
        assert_eq!(names, ["vsi-zone-1", "vsi-zone-2", "vsi-zone-3"]);
    }

    #[test]
    fn tf_block_wraps_with_banner_and_title() {
        let body = "\nresource \"x\" \"y\" {\n}\n";
        let block = tf_block("management VPC", body);
        assert!(block.starts_with(BANNER));
        assert!(block.contains("# Management VPC\n"));
        assert!(block.ends_with(&format!("{BANNER}\n")));
    }

    #[test]
    fn rg_id_ref_branches_on_use_data() {
        let mut config = Config::empty();
        config.resource_groups.push(crate::config::ResourceGroup {
            name: "imported-rg".to_string(),
            use_data: true,
            use_prefix: false,
        });
        assert_eq!(
            rg_id_ref(Some("imported-rg"), &config),
            TfValue::expr("data.ibm_resource_group.imported_rg.id")
        );
        assert_eq!(rg_id_ref(Some("missing"), &config), TfValue::Null);
    }
}

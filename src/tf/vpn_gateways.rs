//! VPN gateway compiler.

use crate::config::{Config, VpnGateway};
use crate::tf::block::{Attrs, TfValue, resource};
use crate::tf::util::{rg_id_ref, snake_case, tf_block, tf_done, vpc_output_ref};

/// Compile one VPN gateway onto its subnet.
pub fn format_vpn_gateway(gateway: &VpnGateway, config: &Config) -> String {
    let vpc = gateway.vpc.as_deref().unwrap_or_default();
    let mut attrs = Attrs::new();
    attrs
        .add(
            "name",
            TfValue::str(format!(
                "${{var.prefix}}-{}-{}",
                crate::tf::util::kebab_case(vpc),
                crate::tf::util::kebab_case(&gateway.name)
            )),
        )
        .add(
            "subnet",
            match gateway.subnet.as_deref() {
                Some(subnet) => vpc_output_ref(vpc, subnet),
                None => TfValue::Null,
            },
        )
        .add(
            "resource_group",
            rg_id_ref(gateway.resource_group.as_deref(), config),
        );
    if gateway.policy_mode {
        attrs.add("mode", TfValue::str("policy"));
    }
    attrs
        .add(
            "tags",
            TfValue::Lines(config.options.tags.iter().map(TfValue::str).collect()),
        )
        .add(
            "timeouts",
            TfValue::Block(vec![("delete".to_string(), TfValue::str("1h"))]),
        );
    resource(
        "ibm_is_vpn_gateway",
        &format!("{}_{}_vpn_gw", snake_case(vpc), snake_case(&gateway.name)),
        &attrs,
    )
}

/// Compile the `vpn_gateways.tf` file body.
pub fn vpn_tf(config: &Config) -> String {
    let body: String = config
        .vpn_gateways
        .iter()
        .map(|gateway| format_vpn_gateway(gateway, config))
        .collect();
    tf_done(&(tf_block("VPN gateways", &body) + "\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn formats_vpn_gateway() {
        let mut config = Config::empty();
        config.options.tags = vec!["hello".to_string(), "world".to_string()];
        config.resource_groups.push(crate::config::ResourceGroup {
            name: "management-rg".to_string(),
            use_data: false,
            use_prefix: true,
        });
        let gateway = VpnGateway {
            name: "management-gateway".to_string(),
            vpc: Some("management".to_string()),
            subnet: Some("vpn-zone-1".to_string()),
            resource_group: Some("management-rg".to_string()),
            policy_mode: false,
        };
        let actual = format_vpn_gateway(&gateway, &config);
        let expected = r#"
resource "ibm_is_vpn_gateway" "management_management_gateway_vpn_gw" {
  name           = "${var.prefix}-management-management-gateway"
  subnet         = module.management_vpc.vpn_zone_1_id
  resource_group = ibm_resource_group.management_rg.id
  tags = [
    "hello",
    "world"
  ]
  timeouts {
    delete = "1h"
  }
}
"#;
        assert_eq!(actual, expected);
    }
}

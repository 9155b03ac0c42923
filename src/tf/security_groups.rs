//! Security group compiler. Groups are VPC-scoped and compiled into the
//! owning VPC's module directory.

use crate::config::{Config, SecurityGroup, SgRule};
use crate::tf::block::{Attrs, TfValue, resource};
use crate::tf::util::{rg_var_ref, snake_case, tf_block, tf_done};

/// Symbolic name of a security group: `<name>_sg`.
pub fn sg_symbol(sg: &SecurityGroup) -> String {
    format!("{}_sg", snake_case(&sg.name))
}

/// Compile one security group.
pub fn format_security_group(sg: &SecurityGroup, _config: &Config) -> String {
    let mut attrs = Attrs::new();
    attrs
        .add(
            "name",
            TfValue::str(format!("${{var.prefix}}-{}", sg.name)),
        )
        .add(
            "vpc",
            TfValue::expr(format!("ibm_is_vpc.{}_vpc.id", snake_case(&sg.vpc))),
        )
        .add("resource_group", rg_var_ref(sg.resource_group.as_deref()))
        .add("tags", TfValue::expr("var.tags"));
    resource("ibm_is_security_group", &sg_symbol(sg), &attrs)
}

/// Compile one security group rule. At most one protocol block is emitted;
/// security group rules carry no source ports.
pub fn format_sg_rule(rule: &SgRule, _config: &Config) -> String {
    let mut attrs = Attrs::new();
    attrs
        .add(
            "group",
            TfValue::expr(format!(
                "ibm_is_security_group.{}_sg.id",
                snake_case(&rule.sg)
            )),
        )
        .add("remote", TfValue::str(&rule.source))
        .add("direction", TfValue::str(&rule.direction));
    if rule.icmp.is_set() {
        attrs.add(
            "icmp",
            TfValue::Block(vec![
                ("type".to_string(), TfValue::opt_int(rule.icmp.icmp_type)),
                ("code".to_string(), TfValue::opt_int(rule.icmp.code)),
            ]),
        );
    } else if rule.tcp.is_set() {
        attrs.add("tcp", port_block(&rule.tcp));
    } else if rule.udp.is_set() {
        attrs.add("udp", port_block(&rule.udp));
    }
    resource(
        "ibm_is_security_group_rule",
        &format!("{}_sg_rule_{}", snake_case(&rule.sg), snake_case(&rule.name)),
        &attrs,
    )
}

fn port_block(spec: &crate::config::PortSpec) -> TfValue {
    TfValue::Block(vec![
        ("port_min".to_string(), TfValue::opt_int(spec.port_min)),
        ("port_max".to_string(), TfValue::opt_int(spec.port_max)),
    ])
}

/// Compile one security group's module file (`sg_<name>.tf`).
pub fn sg_module_file(sg: &SecurityGroup, config: &Config) -> String {
    let mut body = format_security_group(sg, config);
    for rule in &sg.rules {
        body += &format_sg_rule(rule, config);
    }
    tf_done(&(tf_block(&format!("{} security group", sg.name), &body) + "\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sg() -> SecurityGroup {
        SecurityGroup {
            name: "management-vpe".to_string(),
            vpc: "management".to_string(),
            resource_group: Some("management-rg".to_string()),
            rules: vec![SgRule {
                name: "allow-ibm-tcp-443-outbound".to_string(),
                sg: "management-vpe".to_string(),
                vpc: "management".to_string(),
                direction: "outbound".to_string(),
                source: "161.26.0.0/16".to_string(),
                icmp: Default::default(),
                tcp: crate::config::PortSpec {
                    port_min: Some(443),
                    port_max: Some(443),
                    source_port_min: None,
                    source_port_max: None,
                },
                udp: Default::default(),
            }],
        }
    }

    #[test]
    fn formats_group_and_rule() {
        let actual = sg_module_file(&sg(), &Config::empty());
        let expected = r#"##############################################################################
# Management Vpe Security Group
##############################################################################

resource "ibm_is_security_group" "management_vpe_sg" {
  name           = "${var.prefix}-management-vpe"
  vpc            = ibm_is_vpc.management_vpc.id
  resource_group = var.management_rg_id
  tags           = var.tags
}

resource "ibm_is_security_group_rule" "management_vpe_sg_rule_allow_ibm_tcp_443_outbound" {
  group     = ibm_is_security_group.management_vpe_sg.id
  remote    = "161.26.0.0/16"
  direction = "outbound"
  tcp {
    port_min = 443
    port_max = 443
  }
}

##############################################################################
"#;
        assert_eq!(actual, expected);
    }
}

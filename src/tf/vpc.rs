//! VPC compiler and per-VPC module assembly.
//!
//! Every VPC becomes a reusable module directory (`<name>_vpc/`): the VPC,
//! its address prefixes, public gateways and subnets in `main.tf`, one file
//! per ACL and per VPC-scoped security group, one file per routing table,
//! plus module `variables.tf`, `outputs.tf`, and `versions.tf`. Resource
//! groups arrive as module variables (`var.<rg>_id`), so module text never
//! references root-level resource group resources directly.

use crate::config::{Acl, AclRule, AddressPrefix, Config, PublicGateway, Subnet, Vpc};
use crate::tf::block::{Attrs, TfValue, labelled_block, resource};
use crate::tf::security_groups::sg_module_file;
use crate::tf::routing_tables::rt_module_file;
use crate::tf::util::{rg_var_ref, snake_case, tf_block, tf_done};
use crate::tf::versions::module_versions_tf;
use std::collections::BTreeMap;

/// Symbolic name of a VPC: `<name>_vpc`.
pub fn vpc_symbol(vpc: &Vpc) -> String {
    format!("{}_vpc", snake_case(&vpc.name))
}

fn acl_symbol(vpc_name: &str, acl_name: &str) -> String {
    format!("{}_{}_acl", snake_case(vpc_name), snake_case(acl_name))
}

fn pgw_symbol(pgw: &PublicGateway) -> String {
    match pgw.override_name.as_deref() {
        Some(name) => format!("{}_{}", snake_case(&pgw.vpc), snake_case(name)),
        None => format!("{}_gateway_zone_{}", snake_case(&pgw.vpc), pgw.zone),
    }
}

/// Compile the VPC resource itself.
pub fn format_vpc(vpc: &Vpc, _config: &Config) -> String {
    let mut attrs = Attrs::new();
    attrs
        .add(
            "name",
            TfValue::str(format!("${{var.prefix}}-{}-vpc", vpc.name)),
        )
        .add("resource_group", rg_var_ref(vpc.resource_group.as_deref()))
        .add("tags", TfValue::expr("var.tags"));
    if vpc.manual_address_prefix_management {
        attrs.add("address_prefix_management", TfValue::str("manual"));
    }
    if vpc.classic_access {
        attrs.add("classic_access", TfValue::Bool(true));
    }
    attrs
        .add(
            "default_network_acl_name",
            TfValue::opt_str(vpc.default_network_acl_name.as_deref()),
        )
        .add(
            "default_security_group_name",
            TfValue::opt_str(vpc.default_security_group_name.as_deref()),
        )
        .add(
            "default_routing_table_name",
            TfValue::opt_str(vpc.default_routing_table_name.as_deref()),
        );
    resource("ibm_is_vpc", &vpc_symbol(vpc), &attrs)
}

/// Compile one address prefix.
pub fn format_address_prefix(prefix: &AddressPrefix, _config: &Config) -> String {
    let mut attrs = Attrs::new();
    attrs
        .add(
            "name",
            TfValue::str(format!("${{var.prefix}}-{}-{}", prefix.vpc, prefix.name)),
        )
        .add(
            "vpc",
            TfValue::expr(format!("ibm_is_vpc.{}_vpc.id", snake_case(&prefix.vpc))),
        )
        .add("zone", crate::tf::util::composed_zone(prefix.zone))
        .add("cidr", TfValue::str(&prefix.cidr));
    resource(
        "ibm_is_vpc_address_prefix",
        &format!(
            "{}_{}_prefix",
            snake_case(&prefix.vpc),
            snake_case(&prefix.name)
        ),
        &attrs,
    )
}

/// Compile one public gateway.
pub fn format_pgw(pgw: &PublicGateway, _config: &Config) -> String {
    let visible = pgw
        .override_name
        .clone()
        .unwrap_or_else(|| format!("gateway-zone-{}", pgw.zone));
    let mut attrs = Attrs::new();
    attrs
        .add(
            "name",
            TfValue::str(format!("${{var.prefix}}-{}-{visible}", pgw.vpc)),
        )
        .add(
            "vpc",
            TfValue::expr(format!("ibm_is_vpc.{}_vpc.id", snake_case(&pgw.vpc))),
        )
        .add("resource_group", rg_var_ref(pgw.resource_group.as_deref()))
        .add("zone", crate::tf::util::composed_zone(pgw.zone))
        .add("tags", TfValue::expr("var.tags"));
    resource("ibm_is_public_gateway", &pgw_symbol(pgw), &attrs)
}

/// Compile one subnet. The CIDR resolves through the matching address
/// prefix when `has_prefix` is set; the gateway reference is only emitted
/// when the zone actually has one.
pub fn format_subnet(subnet: &Subnet, vpc: &Vpc, _config: &Config) -> String {
    let mut attrs = Attrs::new();
    attrs
        .add(
            "vpc",
            TfValue::expr(format!("ibm_is_vpc.{}_vpc.id", snake_case(&subnet.vpc))),
        )
        .add(
            "name",
            TfValue::str(format!("${{var.prefix}}-{}-{}", subnet.vpc, subnet.name)),
        )
        .add("zone", crate::tf::util::composed_zone(subnet.zone))
        .add("resource_group", rg_var_ref(subnet.resource_group.as_deref()))
        .add("tags", TfValue::expr("var.tags"));
    attrs.add_if("network_acl", subnet.network_acl.as_deref(), |acl| {
        TfValue::expr(format!("ibm_is_network_acl.{}.id", acl_symbol(&subnet.vpc, acl)))
    });
    if subnet.has_prefix {
        attrs.add(
            "ipv4_cidr_block",
            TfValue::expr(format!(
                "ibm_is_vpc_address_prefix.{}_{}_prefix.cidr",
                snake_case(&subnet.vpc),
                snake_case(&subnet.name)
            )),
        );
    } else {
        attrs.add("ipv4_cidr_block", TfValue::str(&subnet.cidr));
    }
    if subnet.public_gateway
        && let Some(pgw) = vpc
            .public_gateways
            .iter()
            .find(|pgw| pgw.zone == subnet.zone)
    {
        attrs.add(
            "public_gateway",
            TfValue::expr(format!("ibm_is_public_gateway.{}.id", pgw_symbol(pgw))),
        );
    }
    resource(
        "ibm_is_subnet",
        &format!("{}_{}", snake_case(&subnet.vpc), snake_case(&subnet.name)),
        &attrs,
    )
}

/// Compile one network ACL.
pub fn format_acl(acl: &Acl, _config: &Config) -> String {
    let mut attrs = Attrs::new();
    attrs
        .add(
            "name",
            TfValue::str(format!("${{var.prefix}}-{}-{}-acl", acl.vpc, acl.name)),
        )
        .add(
            "vpc",
            TfValue::expr(format!("ibm_is_vpc.{}_vpc.id", snake_case(&acl.vpc))),
        )
        .add("resource_group", rg_var_ref(acl.resource_group.as_deref()))
        .add("tags", TfValue::expr("var.tags"));
    resource("ibm_is_network_acl", &acl_symbol(&acl.vpc, &acl.name), &attrs)
}

/// Compile one ACL rule. At most one protocol block is emitted; within the
/// chosen protocol, unset bounds render as `null`.
pub fn format_acl_rule(rule: &AclRule, _config: &Config) -> String {
    let mut attrs = Attrs::new();
    attrs
        .add(
            "network_acl",
            TfValue::expr(format!(
                "ibm_is_network_acl.{}.id",
                acl_symbol(&rule.vpc, &rule.acl)
            )),
        )
        .add("action", TfValue::str(&rule.action))
        .add("destination", TfValue::str(&rule.destination))
        .add("direction", TfValue::str(&rule.direction))
        .add("name", TfValue::str(&rule.name))
        .add("source", TfValue::str(&rule.source));
    if rule.icmp.is_set() {
        attrs.add(
            "icmp",
            TfValue::Block(vec![
                ("type".to_string(), TfValue::opt_int(rule.icmp.icmp_type)),
                ("code".to_string(), TfValue::opt_int(rule.icmp.code)),
            ]),
        );
    } else if rule.tcp.is_set() {
        attrs.add("tcp", acl_port_block(&rule.tcp));
    } else if rule.udp.is_set() {
        attrs.add("udp", acl_port_block(&rule.udp));
    }
    resource(
        "ibm_is_network_acl_rule",
        &format!(
            "{}_rule_{}",
            acl_symbol(&rule.vpc, &rule.acl),
            snake_case(&rule.name)
        ),
        &attrs,
    )
}

fn acl_port_block(spec: &crate::config::PortSpec) -> TfValue {
    TfValue::Block(vec![
        ("port_min".to_string(), TfValue::opt_int(spec.port_min)),
        ("port_max".to_string(), TfValue::opt_int(spec.port_max)),
        (
            "source_port_min".to_string(),
            TfValue::opt_int(spec.source_port_min),
        ),
        (
            "source_port_max".to_string(),
            TfValue::opt_int(spec.source_port_max),
        ),
    ])
}

/// Resource groups referenced anywhere inside one VPC's module, in
/// encounter order.
fn module_resource_groups<'a>(vpc: &'a Vpc, config: &'a Config) -> Vec<&'a str> {
    let mut groups: Vec<&str> = Vec::new();
    let mut push = |rg: Option<&'a String>| {
        if let Some(rg) = rg
            && !groups.contains(&rg.as_str())
        {
            groups.push(rg.as_str());
        }
    };
    push(vpc.resource_group.as_ref());
    for subnet in &vpc.subnets {
        push(subnet.resource_group.as_ref());
    }
    for acl in &vpc.acls {
        push(acl.resource_group.as_ref());
    }
    for pgw in &vpc.public_gateways {
        push(pgw.resource_group.as_ref());
    }
    for sg in config.security_groups.iter().filter(|sg| sg.vpc == vpc.name) {
        push(sg.resource_group.as_ref());
    }
    groups
}

/// Owned variant of [`module_resource_groups`] for callers outside this
/// module (the root `main.tf` wires these ids into each module block).
pub fn module_resource_group_names(vpc: &Vpc, config: &Config) -> Vec<String> {
    module_resource_groups(vpc, config)
        .into_iter()
        .map(str::to_string)
        .collect()
}

fn module_variables_tf(vpc: &Vpc, config: &Config) -> String {
    let mut body = String::new();
    let mut tags = Attrs::new();
    tags.add("description", TfValue::str("List of tags"))
        .add("type", TfValue::expr("list(string)"));
    body += &labelled_block("variable", &["tags"], &tags);

    let mut region = Attrs::new();
    region
        .add(
            "description",
            TfValue::str("IBM Cloud Region where resources will be provisioned"),
        )
        .add("type", TfValue::expr("string"))
        .add("validation", region_validation());
    body += &labelled_block("variable", &["region"], &region);

    let mut prefix = Attrs::new();
    prefix
        .add(
            "description",
            TfValue::str("Name prefix that will be prepended to named resources"),
        )
        .add("type", TfValue::expr("string"))
        .add("validation", prefix_validation());
    body += &labelled_block("variable", &["prefix"], &prefix);

    for rg in module_resource_groups(vpc, config) {
        let mut attrs = Attrs::new();
        attrs
            .add(
                "description",
                TfValue::str(format!("ID for the resource group {rg}")),
            )
            .add("type", TfValue::expr("string"));
        let label = format!("{}_id", snake_case(rg));
        body += &labelled_block("variable", &[label.as_str()], &attrs);
    }
    tf_done(&(tf_block(&format!("{} VPC variables", vpc.name), &body) + "\n"))
}

pub(crate) fn region_validation() -> TfValue {
    TfValue::Block(vec![
        (
            "error_message".to_string(),
            TfValue::str("Region must be in a supported IBM VPC region."),
        ),
        (
            "condition".to_string(),
            TfValue::expr(
                "contains([\"us-south\", \"us-east\", \"br-sao\", \"ca-tor\", \"eu-gb\", \
                 \"eu-de\", \"jp-tok\", \"jp-osa\", \"au-syd\"], var.region)",
            ),
        ),
    ])
}

pub(crate) fn prefix_validation() -> TfValue {
    TfValue::Block(vec![
        (
            "error_message".to_string(),
            TfValue::str(
                "Prefix must begin with a lowercase letter and contain only lowercase \
                 letters, numbers, and - characters. Prefixes must end with a lowercase \
                 letter or number and be 16 or fewer characters.",
            ),
        ),
        (
            "condition".to_string(),
            TfValue::expr(
                "can(regex(\"^([a-z]|[a-z][-a-z0-9]*[a-z0-9])\", var.prefix)) && \
                 length(var.prefix) <= 16",
            ),
        ),
    ])
}

fn module_outputs_tf(vpc: &Vpc, config: &Config) -> String {
    let mut body = String::new();
    let mut output = |name: &str, value: String| {
        let mut attrs = Attrs::new();
        attrs.add("value", TfValue::expr(value));
        body += &labelled_block("output", &[name], &attrs);
    };
    output("id", format!("ibm_is_vpc.{}.id", vpc_symbol(vpc)));
    output("crn", format!("ibm_is_vpc.{}.crn", vpc_symbol(vpc)));
    for subnet in &vpc.subnets {
        output(
            &format!("{}_id", snake_case(&subnet.name)),
            format!(
                "ibm_is_subnet.{}_{}.id",
                snake_case(&vpc.name),
                snake_case(&subnet.name)
            ),
        );
    }
    for sg in config.security_groups.iter().filter(|sg| sg.vpc == vpc.name) {
        output(
            &format!("{}_id", snake_case(&sg.name)),
            format!("ibm_is_security_group.{}_sg.id", snake_case(&sg.name)),
        );
    }
    tf_done(&(tf_block(&format!("{} VPC outputs", vpc.name), &body) + "\n"))
}

fn module_main_tf(vpc: &Vpc, config: &Config) -> String {
    let mut body = format_vpc(vpc, config);
    for prefix in &vpc.address_prefixes {
        body += &format_address_prefix(prefix, config);
    }
    for pgw in &vpc.public_gateways {
        body += &format_pgw(pgw, config);
    }
    for subnet in &vpc.subnets {
        body += &format_subnet(subnet, vpc, config);
    }
    tf_done(&(tf_block(&format!("{} VPC", vpc.name), &body) + "\n"))
}

/// Assemble the complete file set for one VPC's module directory.
pub fn vpc_module_files(vpc: &Vpc, config: &Config) -> BTreeMap<String, String> {
    let mut files = BTreeMap::new();
    files.insert("main.tf".to_string(), module_main_tf(vpc, config));
    for acl in &vpc.acls {
        let mut body = format_acl(acl, config);
        for rule in &acl.rules {
            body += &format_acl_rule(rule, config);
        }
        let symbol = acl_symbol(&vpc.name, &acl.name);
        let stem = symbol.strip_suffix("_acl").unwrap_or(&symbol);
        files.insert(
            format!("acl_{stem}.tf"),
            tf_done(&(tf_block(&format!("{} {} ACL", vpc.name, acl.name), &body) + "\n")),
        );
    }
    for sg in config.security_groups.iter().filter(|sg| sg.vpc == vpc.name) {
        files.insert(
            format!("sg_{}.tf", snake_case(&sg.name)),
            sg_module_file(sg, config),
        );
    }
    for table in config.routing_tables.iter().filter(|rt| rt.vpc == vpc.name) {
        files.insert(
            format!("rt_{}.tf", snake_case(&table.name)),
            rt_module_file(table, config),
        );
    }
    files.insert("variables.tf".to_string(), module_variables_tf(vpc, config));
    files.insert("outputs.tf".to_string(), module_outputs_tf(vpc, config));
    files.insert("versions.tf".to_string(), module_versions_tf());
    files
}

//! Transit gateway compiler.

use crate::config::{Config, TgwConnection, TransitGateway};
use crate::tf::block::{Attrs, TfValue, resource};
use crate::tf::util::{rg_id_ref, snake_case, tf_block, tf_done, vpc_module_ref};

fn timeouts() -> TfValue {
    TfValue::Block(vec![
        ("create".to_string(), TfValue::str("30m")),
        ("delete".to_string(), TfValue::str("30m")),
    ])
}

/// Compile one transit gateway.
pub fn format_tgw(tgw: &TransitGateway, config: &Config) -> String {
    let mut attrs = Attrs::new();
    attrs
        .add(
            "name",
            TfValue::str(format!("${{var.prefix}}-{}", tgw.name)),
        )
        .add("location", TfValue::expr("var.region"))
        .add("global", TfValue::Bool(tgw.global))
        .add(
            "resource_group",
            rg_id_ref(tgw.resource_group.as_deref(), config),
        )
        .add("timeouts", timeouts());
    resource("ibm_tg_gateway", &snake_case(&tgw.name), &attrs)
}

/// Compile one connection. VPC connections resolve the network id through
/// the VPC module's CRN output; CRN connections embed the CRN verbatim and
/// derive their symbolic name from its trailing segment.
pub fn format_tgw_connection(connection: &TgwConnection, _config: &Config) -> String {
    let (target, network_id) = match (&connection.vpc, &connection.crn) {
        (Some(vpc), _) => (vpc.clone(), vpc_module_ref(vpc, "crn")),
        (None, Some(crn)) => (
            crn.split(':').next_back().unwrap_or(crn).to_string(),
            TfValue::str(crn),
        ),
        (None, None) => (String::new(), TfValue::Null),
    };
    let mut attrs = Attrs::new();
    attrs
        .add(
            "gateway",
            TfValue::expr(format!("ibm_tg_gateway.{}.id", snake_case(&connection.tgw))),
        )
        .add("network_type", TfValue::str("vpc"))
        .add(
            "name",
            TfValue::str(format!(
                "${{var.prefix}}-{}-{}-hub-connection",
                connection.tgw,
                crate::tf::util::kebab_case(&target)
            )),
        )
        .add("network_id", network_id)
        .add("timeouts", timeouts());
    resource(
        "ibm_tg_connection",
        &format!(
            "{}_to_{}_connection",
            snake_case(&connection.tgw),
            snake_case(&target)
        ),
        &attrs,
    )
}

/// Compile the `transit_gateways.tf` file body.
pub fn tgw_tf(config: &Config) -> String {
    let mut tf = String::new();
    for tgw in &config.transit_gateways {
        let mut body = format_tgw(tgw, config);
        for connection in &tgw.connections {
            body += &format_tgw_connection(connection, config);
        }
        tf += &(tf_block(&format!("{} transit gateway", tgw.name), &body) + "\n");
    }
    tf_done(&tf)
}

//! Routing table compiler. Tables are VPC-scoped and compiled into the
//! owning VPC's module directory.

use crate::config::{Config, Route, RoutingTable};
use crate::tf::block::{Attrs, TfValue, resource};
use crate::tf::util::{composed_zone, snake_case, tf_block, tf_done};

fn table_symbol(table: &RoutingTable) -> String {
    format!(
        "{}_{}_table",
        snake_case(&table.vpc),
        snake_case(&table.name)
    )
}

/// Compile one routing table.
pub fn format_routing_table(table: &RoutingTable, _config: &Config) -> String {
    let mut attrs = Attrs::new();
    attrs
        .add(
            "name",
            TfValue::str(format!("${{var.prefix}}-{}-{}", table.vpc, table.name)),
        )
        .add(
            "vpc",
            TfValue::expr(format!("ibm_is_vpc.{}_vpc.id", snake_case(&table.vpc))),
        )
        .add(
            "route_direct_link_ingress",
            TfValue::Bool(table.route_direct_link_ingress),
        )
        .add(
            "route_transit_gateway_ingress",
            TfValue::Bool(table.transit_gateway_ingress),
        )
        .add(
            "route_vpc_zone_ingress",
            TfValue::Bool(table.route_vpc_zone_ingress),
        );
    resource("ibm_is_vpc_routing_table", &table_symbol(table), &attrs)
}

/// Compile one route.
pub fn format_route(route: &Route, table: &RoutingTable, _config: &Config) -> String {
    let mut attrs = Attrs::new();
    attrs
        .add(
            "vpc",
            TfValue::expr(format!("ibm_is_vpc.{}_vpc.id", snake_case(&route.vpc))),
        )
        .add(
            "routing_table",
            TfValue::expr(format!(
                "ibm_is_vpc_routing_table.{}.routing_table",
                table_symbol(table)
            )),
        )
        .add(
            "name",
            TfValue::str(format!("${{var.prefix}}-{}-{}", route.vpc, route.name)),
        )
        .add("zone", composed_zone(route.zone))
        .add("destination", TfValue::str(&route.destination))
        .add("action", TfValue::str(&route.action));
    attrs.add(
        "next_hop",
        TfValue::str(route.next_hop.as_deref().unwrap_or("0.0.0.0")),
    );
    resource(
        "ibm_is_vpc_routing_table_route",
        &format!("{}_route_{}", table_symbol(table), snake_case(&route.name)),
        &attrs,
    )
}

/// Compile one routing table's module file (`rt_<name>.tf`).
pub fn rt_module_file(table: &RoutingTable, config: &Config) -> String {
    let mut body = format_routing_table(table, config);
    for route in &table.routes {
        body += &format_route(route, table, config);
    }
    tf_done(&(tf_block(&format!("{} routing table", table.name), &body) + "\n"))
}

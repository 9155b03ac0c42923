//! Routing table operations.
//!
//! Routing tables are VPC-scoped module content; when their VPC disappears
//! the table goes with it (removal, not nulling - a table without a VPC has
//! no file to live in).

use super::Store;
use crate::config::{Route, RoutingTable};

pub(super) fn on_store_update(store: &mut Store) {
    let vpcs = store.config.vpc_names();
    store
        .config
        .routing_tables
        .retain(|table| vpcs.contains(&table.vpc));
    for table in &mut store.config.routing_tables {
        let name = table.name.clone();
        let vpc = table.vpc.clone();
        for route in &mut table.routes {
            route.routing_table = name.clone();
            route.vpc = vpc.clone();
        }
    }
}

impl Store {
    /// Append a new routing table.
    pub fn routing_table_create(&mut self, table: RoutingTable) {
        self.config.routing_tables.push(table);
        self.update();
    }

    /// Save a routing table; routes re-parent on the update pass.
    pub fn routing_table_save(&mut self, prev: &str, table: RoutingTable) {
        if let Some(index) = self
            .config
            .routing_tables
            .iter()
            .position(|candidate| candidate.name == prev)
        {
            self.config.routing_tables[index] = table;
            self.update();
        }
    }

    /// Delete a routing table.
    pub fn routing_table_delete(&mut self, name: &str) {
        self.config
            .routing_tables
            .retain(|candidate| candidate.name != name);
        self.update();
    }

    /// Append a route to a table.
    pub fn route_create(&mut self, table_name: &str, route: Route) {
        if let Some(table) = self
            .config
            .routing_tables
            .iter_mut()
            .find(|candidate| candidate.name == table_name)
        {
            table.routes.push(route);
        }
        self.update();
    }

    /// Save a route of a table.
    pub fn route_save(&mut self, table_name: &str, prev: &str, route: Route) {
        if let Some(table) = self
            .config
            .routing_tables
            .iter_mut()
            .find(|candidate| candidate.name == table_name)
            && let Some(index) = table
                .routes
                .iter()
                .position(|candidate| candidate.name == prev)
        {
            table.routes[index] = route;
            self.update();
        }
    }

    /// Delete a route of a table.
    pub fn route_delete(&mut self, table_name: &str, name: &str) {
        if let Some(table) = self
            .config
            .routing_tables
            .iter_mut()
            .find(|candidate| candidate.name == table_name)
        {
            table.routes.retain(|candidate| candidate.name != name);
        }
        self.update();
    }
}

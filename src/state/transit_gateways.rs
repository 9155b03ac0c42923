//! Transit gateway operations.
//!
//! Connections are the interesting part: VPC connections are healed
//! against the VPC list (a deleted VPC silently drops its connection),
//! while CRN connections point outside this configuration and are never
//! touched by the update pass. The `crns` field on the gateway is mirrored
//! into CRN connections on save.

use super::{Store, update_unfound};
use crate::config::{TgwConnection, TransitGateway};

pub(super) fn on_store_update(store: &mut Store) {
    let groups = store.config.resource_group_names();
    let vpcs = store.config.vpc_names();
    for tgw in &mut store.config.transit_gateways {
        update_unfound(&groups, &mut tgw.resource_group);
        tgw.connections.retain(|connection| match &connection.vpc {
            Some(vpc) => vpcs.contains(vpc),
            // CRN connections are external; leave them alone.
            None => connection.crn.is_some(),
        });
        let name = tgw.name.clone();
        for connection in &mut tgw.connections {
            connection.tgw = name.clone();
        }
    }
}

impl Store {
    /// Append a new transit gateway.
    pub fn transit_gateway_create(&mut self, tgw: TransitGateway) {
        self.config.transit_gateways.push(tgw);
        self.update();
    }

    /// Save a transit gateway. Connection parents follow a rename, and the
    /// `crns` list is reconciled into CRN connections: new entries are
    /// appended, removed entries drop their connection.
    pub fn transit_gateway_save(&mut self, prev: &str, mut tgw: TransitGateway) {
        let Some(index) = self
            .config
            .transit_gateways
            .iter()
            .position(|candidate| candidate.name == prev)
        else {
            return;
        };
        if let Some(crns) = tgw.crns.clone() {
            tgw.connections.retain(|connection| {
                connection
                    .crn
                    .as_ref()
                    .is_none_or(|crn| crns.contains(crn))
            });
            for crn in crns {
                let exists = tgw
                    .connections
                    .iter()
                    .any(|connection| connection.crn.as_deref() == Some(crn.as_str()));
                if !exists {
                    tgw.connections.push(TgwConnection {
                        tgw: tgw.name.clone(),
                        vpc: None,
                        crn: Some(crn),
                    });
                }
            }
        }
        self.config.transit_gateways[index] = tgw;
        self.update();
    }

    /// Delete a transit gateway and its connections.
    pub fn transit_gateway_delete(&mut self, name: &str) {
        self.config
            .transit_gateways
            .retain(|candidate| candidate.name != name);
        self.update();
    }
}

//! Resource group operations and rename propagation.
//!
//! Resource groups are the root producer family: nearly every other family
//! holds a `resource_group` reference. Renames rewrite every consumer;
//! deletes leave dangling references for the consumers' own hooks to null
//! on the same update pass.

use super::Store;
use crate::config::{Config, ResourceGroup};

pub(super) fn on_store_update(_store: &mut Store) {
    // Producer family: nothing upstream to heal against.
}

/// Rewrite every `resource_group` reference from `old` to `new`.
fn rename_refs(config: &mut Config, old: &str, new: &str) {
    let rename = |field: &mut Option<String>| {
        if field.as_deref() == Some(old) {
            *field = Some(new.to_string());
        }
    };
    for kms in &mut config.key_management {
        rename(&mut kms.resource_group);
    }
    for cos in &mut config.object_storage {
        rename(&mut cos.resource_group);
    }
    rename(&mut config.atracker.resource_group);
    rename(&mut config.logdna.resource_group);
    rename(&mut config.sysdig.resource_group);
    for appid in &mut config.appid {
        rename(&mut appid.resource_group);
    }
    for sm in &mut config.secrets_manager {
        rename(&mut sm.resource_group);
    }
    for es in &mut config.event_streams {
        rename(&mut es.resource_group);
    }
    for key in &mut config.ssh_keys {
        rename(&mut key.resource_group);
    }
    for vpc in &mut config.vpcs {
        rename(&mut vpc.resource_group);
        for subnet in &mut vpc.subnets {
            rename(&mut subnet.resource_group);
        }
        for acl in &mut vpc.acls {
            rename(&mut acl.resource_group);
        }
        for pgw in &mut vpc.public_gateways {
            rename(&mut pgw.resource_group);
        }
    }
    for sg in &mut config.security_groups {
        rename(&mut sg.resource_group);
    }
    for tgw in &mut config.transit_gateways {
        rename(&mut tgw.resource_group);
    }
    for vpn in &mut config.vpn_gateways {
        rename(&mut vpn.resource_group);
    }
    for cluster in &mut config.clusters {
        rename(&mut cluster.resource_group);
    }
    for vsi in &mut config.vsi {
        rename(&mut vsi.resource_group);
    }
    for lb in &mut config.load_balancers {
        rename(&mut lb.resource_group);
    }
}

impl Store {
    /// Append a new resource group.
    pub fn resource_group_create(&mut self, rg: ResourceGroup) {
        self.config.resource_groups.push(rg);
        self.update();
    }

    /// Save a resource group, propagating a rename to every consumer.
    /// Unknown `prev` silently no-ops.
    pub fn resource_group_save(&mut self, prev: &str, rg: ResourceGroup) {
        let Some(index) = self
            .config
            .resource_groups
            .iter()
            .position(|candidate| candidate.name == prev)
        else {
            return;
        };
        if rg.name != prev {
            rename_refs(&mut self.config, prev, &rg.name);
        }
        self.config.resource_groups[index] = rg;
        self.update();
    }

    /// Delete a resource group. References are nulled by each consumer's
    /// hook on the update pass; the referencing entities survive.
    pub fn resource_group_delete(&mut self, name: &str) {
        self.config
            .resource_groups
            .retain(|candidate| candidate.name != name);
        self.update();
    }
}

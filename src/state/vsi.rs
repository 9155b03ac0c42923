//! Virtual server deployment operations.

use super::{Store, retain_found, update_unfound};
use crate::config::{Config, Vsi};

pub(super) fn on_store_update(store: &mut Store) {
    let groups = store.config.resource_group_names();
    let vpcs = store.config.vpc_names();
    let kms_names: Vec<String> = store
        .config
        .key_management
        .iter()
        .map(|kms| kms.name.clone())
        .collect();
    let key_names = super::key_management::all_key_names(&store.config);
    let ssh_keys: Vec<String> = store
        .config
        .ssh_keys
        .iter()
        .map(|key| key.name.clone())
        .collect();
    let per_vpc: Vec<(String, Vec<String>, Vec<String>)> = store
        .config
        .vpcs
        .iter()
        .map(|vpc| {
            (
                vpc.name.clone(),
                vpc.subnets.iter().map(|s| s.name.clone()).collect(),
                store.config.security_group_names(Some(&vpc.name)),
            )
        })
        .collect();
    for vsi in &mut store.config.vsi {
        update_unfound(&groups, &mut vsi.resource_group);
        update_unfound(&kms_names, &mut vsi.kms);
        update_unfound(&key_names, &mut vsi.encryption_key);
        for volume in &mut vsi.volumes {
            update_unfound(&key_names, &mut volume.encryption_key);
        }
        retain_found(&ssh_keys, &mut vsi.ssh_keys);
        if !vpcs.contains(&vsi.vpc) {
            vsi.vpc = String::new();
        }
        let (subnets, security_groups) = per_vpc
            .iter()
            .find(|(name, _, _)| *name == vsi.vpc)
            .map(|(_, subnets, sgs)| (subnets.clone(), sgs.clone()))
            .unwrap_or_default();
        retain_found(&subnets, &mut vsi.subnets);
        retain_found(&security_groups, &mut vsi.security_groups);
        vsi.network_interfaces
            .retain(|nic| subnets.contains(&nic.subnet));
        for nic in &mut vsi.network_interfaces {
            retain_found(&security_groups, &mut nic.security_groups);
        }
    }
}

fn rename_refs(config: &mut Config, old: &str, new: &str) {
    for lb in &mut config.load_balancers {
        for target in &mut lb.target_vsi {
            if target == old {
                *target = new.to_string();
            }
        }
    }
}

impl Store {
    /// Append a new deployment.
    pub fn vsi_create(&mut self, vsi: Vsi) {
        self.config.vsi.push(vsi);
        self.update();
    }

    /// Save a deployment, propagating a rename into load balancer targets.
    pub fn vsi_save(&mut self, prev: &str, vsi: Vsi) {
        let Some(index) = self
            .config
            .vsi
            .iter()
            .position(|candidate| candidate.name == prev)
        else {
            return;
        };
        if vsi.name != prev {
            rename_refs(&mut self.config, prev, &vsi.name);
        }
        self.config.vsi[index] = vsi;
        self.update();
    }

    /// Delete a deployment; load balancers drop it from their target lists
    /// on the update pass.
    pub fn vsi_delete(&mut self, name: &str) {
        self.config.vsi.retain(|candidate| candidate.name != name);
        self.update();
    }
}

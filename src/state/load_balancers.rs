//! Load balancer operations.

use super::{Store, retain_found, update_unfound};
use crate::config::LoadBalancer;

pub(super) fn on_store_update(store: &mut Store) {
    let groups = store.config.resource_group_names();
    let vpcs = store.config.vpc_names();
    let vsi_names: Vec<String> = store
        .config
        .vsi
        .iter()
        .map(|vsi| vsi.name.clone())
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
    for lb in &mut store.config.load_balancers {
        update_unfound(&groups, &mut lb.resource_group);
        if !vpcs.contains(&lb.vpc) {
            lb.vpc = String::new();
        }
        let (subnets, security_groups) = per_vpc
            .iter()
            .find(|(name, _, _)| *name == lb.vpc)
            .map(|(_, subnets, sgs)| (subnets.clone(), sgs.clone()))
            .unwrap_or_default();
        retain_found(&subnets, &mut lb.subnets);
        retain_found(&security_groups, &mut lb.security_groups);
        retain_found(&vsi_names, &mut lb.target_vsi);
    }
}

impl Store {
    /// Append a new load balancer.
    pub fn load_balancer_create(&mut self, lb: LoadBalancer) {
        self.config.load_balancers.push(lb);
        self.update();
    }

    /// Save a load balancer.
    pub fn load_balancer_save(&mut self, prev: &str, lb: LoadBalancer) {
        if let Some(index) = self
            .config
            .load_balancers
            .iter()
            .position(|candidate| candidate.name == prev)
        {
            self.config.load_balancers[index] = lb;
            self.update();
        }
    }

    /// Delete a load balancer.
    pub fn load_balancer_delete(&mut self, name: &str) {
        self.config
            .load_balancers
            .retain(|candidate| candidate.name != name);
        self.update();
    }
}

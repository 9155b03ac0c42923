//! Cluster operations.

use super::{Store, retain_found, update_unfound};
use crate::config::{Cluster, WorkerPool};

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
    let cos_names: Vec<String> = store
        .config
        .object_storage
        .iter()
        .map(|cos| cos.name.clone())
        .collect();
    let subnets_by_vpc: Vec<(String, Vec<String>)> = store
        .config
        .vpcs
        .iter()
        .map(|vpc| {
            (
                vpc.name.clone(),
                vpc.subnets.iter().map(|s| s.name.clone()).collect(),
            )
        })
        .collect();
    let subnets_of = |vpc: Option<&str>| -> Vec<String> {
        vpc.and_then(|vpc| {
            subnets_by_vpc
                .iter()
                .find(|(name, _)| name == vpc)
                .map(|(_, subnets)| subnets.clone())
        })
        .unwrap_or_default()
    };
    for cluster in &mut store.config.clusters {
        update_unfound(&groups, &mut cluster.resource_group);
        update_unfound(&vpcs, &mut cluster.vpc);
        update_unfound(&kms_names, &mut cluster.kms);
        update_unfound(&key_names, &mut cluster.encryption_key);
        update_unfound(&cos_names, &mut cluster.cos);
        retain_found(&subnets_of(cluster.vpc.as_deref()), &mut cluster.subnets);
        let cluster_name = cluster.name.clone();
        let cluster_vpc = cluster.vpc.clone();
        for pool in &mut cluster.worker_pools {
            pool.cluster = cluster_name.clone();
            // Pools live in their cluster's VPC.
            pool.vpc = cluster_vpc.clone();
            retain_found(&subnets_of(pool.vpc.as_deref()), &mut pool.subnets);
        }
    }
}

impl Store {
    /// Append a new cluster.
    pub fn cluster_create(&mut self, cluster: Cluster) {
        self.config.clusters.push(cluster);
        self.update();
    }

    /// Save a cluster.
    pub fn cluster_save(&mut self, prev: &str, cluster: Cluster) {
        if let Some(index) = self
            .config
            .clusters
            .iter()
            .position(|candidate| candidate.name == prev)
        {
            self.config.clusters[index] = cluster;
            self.update();
        }
    }

    /// Delete a cluster and its worker pools.
    pub fn cluster_delete(&mut self, name: &str) {
        self.config.clusters.retain(|candidate| candidate.name != name);
        self.update();
    }

    /// Append a worker pool to a cluster. The pool inherits the cluster's
    /// VPC, and its subnets when none are given.
    pub fn worker_pool_create(&mut self, cluster_name: &str, mut pool: WorkerPool) {
        if let Some(cluster) = self
            .config
            .clusters
            .iter_mut()
            .find(|candidate| candidate.name == cluster_name)
        {
            pool.cluster = cluster.name.clone();
            pool.vpc = cluster.vpc.clone();
            if pool.subnets.is_empty() {
                pool.subnets = cluster.subnets.clone();
            }
            cluster.worker_pools.push(pool);
        }
        self.update();
    }

    /// Save a worker pool of a cluster.
    pub fn worker_pool_save(&mut self, cluster_name: &str, prev: &str, pool: WorkerPool) {
        if let Some(cluster) = self
            .config
            .clusters
            .iter_mut()
            .find(|candidate| candidate.name == cluster_name)
            && let Some(index) = cluster
                .worker_pools
                .iter()
                .position(|candidate| candidate.name == prev)
        {
            cluster.worker_pools[index] = pool;
            self.update();
        }
    }

    /// Delete a worker pool of a cluster.
    pub fn worker_pool_delete(&mut self, cluster_name: &str, name: &str) {
        if let Some(cluster) = self
            .config
            .clusters
            .iter_mut()
            .find(|candidate| candidate.name == cluster_name)
        {
            cluster
                .worker_pools
                .retain(|candidate| candidate.name != name);
        }
        self.update();
    }
}

//! Cluster compiler: IKS/OpenShift clusters and worker pools.

use crate::config::{Cluster, Config, WorkerPool};
use crate::tf::block::{Attrs, TfValue, resource};
use crate::tf::util::{
    composed_zone, encryption_key_ref, kebab_name, kms_instance_ref, rg_id_ref, snake_case,
    tf_block, tf_done, vpc_module_ref, vpc_output_ref, zone_digit,
};

fn cluster_symbol(cluster: &Cluster) -> String {
    format!(
        "{}_vpc_{}_cluster",
        snake_case(cluster.vpc.as_deref().unwrap_or_default()),
        snake_case(&cluster.name)
    )
}

/// One `zones` block per subnet, the zone derived from the subnet name's
/// trailing digit.
fn zones_blocks(vpc: &str, subnets: &[String]) -> TfValue {
    TfValue::Blocks(
        subnets
            .iter()
            .map(|subnet| {
                vec![
                    (
                        "name".to_string(),
                        composed_zone(zone_digit(subnet)),
                    ),
                    ("subnet_id".to_string(), vpc_output_ref(vpc, subnet)),
                ]
            })
            .collect(),
    )
}

/// Compile one cluster.
pub fn format_cluster(cluster: &Cluster, config: &Config) -> String {
    let vpc = cluster.vpc.as_deref().unwrap_or_default();
    let openshift = cluster.kube_type == "openshift";
    let mut attrs = Attrs::new();
    attrs
        .add("name", kebab_name(&[vpc, &cluster.name]))
        .add("vpc_id", vpc_module_ref(vpc, "id"))
        .add(
            "resource_group_id",
            rg_id_ref(cluster.resource_group.as_deref(), config),
        )
        .add(
            "flavor",
            TfValue::opt_str(cluster.flavor.as_deref()),
        )
        .add("worker_count", TfValue::Int(i64::from(cluster.workers_per_subnet)))
        .add(
            "kube_version",
            TfValue::opt_str(cluster.kube_version.as_deref()),
        )
        .add("update_all_workers", TfValue::Bool(cluster.update_all_workers))
        .add(
            "disable_public_service_endpoint",
            TfValue::Bool(cluster.private_endpoint),
        )
        .add("wait_till", TfValue::str("IngressReady"));
    if openshift {
        attrs.add_if("entitlement", cluster.entitlement.as_deref(), TfValue::str);
        attrs.add_if("cos_instance_crn", cluster.cos.as_deref(), |cos| {
            TfValue::expr(format!(
                "ibm_resource_instance.{}_object_storage.crn",
                snake_case(cos)
            ))
        });
    }
    attrs.add(
        "tags",
        TfValue::Lines(config.options.tags.iter().map(TfValue::str).collect()),
    );
    attrs.add("zones", zones_blocks(vpc, &cluster.subnets));
    if let Some(kms) = cluster.kms.as_deref() {
        attrs.add(
            "kms_config",
            TfValue::Block(vec![
                (
                    "instance_id".to_string(),
                    kms_instance_ref(kms, "guid", config),
                ),
                (
                    "crk_id".to_string(),
                    encryption_key_ref(Some(kms), cluster.encryption_key.as_deref(), "key_id"),
                ),
                (
                    "private_endpoint".to_string(),
                    TfValue::Bool(cluster.private_endpoint),
                ),
            ]),
        );
    }
    attrs.add(
        "timeouts",
        TfValue::Block(vec![
            ("create".to_string(), TfValue::str("3h")),
            ("update".to_string(), TfValue::str("3h")),
            ("delete".to_string(), TfValue::str("2h")),
        ]),
    );
    resource("ibm_container_vpc_cluster", &cluster_symbol(cluster), &attrs)
}

/// Compile one worker pool.
pub fn format_worker_pool(pool: &WorkerPool, cluster: &Cluster, config: &Config) -> String {
    let vpc = pool
        .vpc
        .as_deref()
        .or(cluster.vpc.as_deref())
        .unwrap_or_default();
    let mut attrs = Attrs::new();
    attrs
        .add("worker_pool_name", kebab_name(&[vpc, &cluster.name, &pool.name]))
        .add(
            "vpc_id",
            vpc_module_ref(vpc, "id"),
        )
        .add(
            "resource_group_id",
            rg_id_ref(cluster.resource_group.as_deref(), config),
        )
        .add(
            "cluster",
            TfValue::expr(format!(
                "ibm_container_vpc_cluster.{}.id",
                cluster_symbol(cluster)
            )),
        )
        .add("flavor", TfValue::opt_str(pool.flavor.as_deref()))
        .add(
            "worker_count",
            TfValue::Int(i64::from(pool.workers_per_subnet)),
        );
    attrs.add_if("entitlement", pool.entitlement.as_deref(), TfValue::str);
    attrs.add("zones", zones_blocks(vpc, &pool.subnets));
    resource(
        "ibm_container_vpc_worker_pool",
        &format!("{}_pool_{}", cluster_symbol(cluster), snake_case(&pool.name)),
        &attrs,
    )
}

/// Compile the `clusters.tf` file body.
pub fn cluster_tf(config: &Config) -> String {
    let mut tf = String::new();
    for cluster in &config.clusters {
        let mut body = format_cluster(cluster, config);
        for pool in &cluster.worker_pools {
            body += &format_worker_pool(pool, cluster, config);
        }
        tf += &(tf_block(&format!("{} cluster", cluster.name), &body) + "\n");
    }
    tf_done(&tf)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cluster() -> Cluster {
        Cluster {
            name: "workload-cluster".to_string(),
            vpc: Some("workload".to_string()),
            kube_type: "openshift".to_string(),
            kube_version: Some("default".to_string()),
            flavor: Some("bx2.16x64".to_string()),
            subnets: vec!["vsi-zone-1".to_string(), "vsi-zone-2".to_string()],
            workers_per_subnet: 2,
            resource_group: Some("workload-rg".to_string()),
            kms: Some("kms".to_string()),
            encryption_key: Some("roks-key".to_string()),
            cos: Some("cos".to_string()),
            entitlement: Some("cloud_pak".to_string()),
            update_all_workers: false,
            private_endpoint: true,
            worker_pools: vec![WorkerPool {
                name: "logging-pool".to_string(),
                cluster: "workload-cluster".to_string(),
                vpc: Some("workload".to_string()),
                subnets: vec!["vsi-zone-1".to_string()],
                flavor: Some("bx2.8x32".to_string()),
                workers_per_subnet: 1,
                entitlement: None,
            }],
        }
    }

    #[test]
    fn openshift_cluster_references_cos_and_kms() {
        let rendered = format_cluster(&cluster(), &Config::empty());
        assert!(rendered.contains(
            "resource \"ibm_container_vpc_cluster\" \"workload_vpc_workload_cluster_cluster\""
        ));
        assert!(rendered.contains("cos_instance_crn                = ibm_resource_instance.cos_object_storage.crn"));
        assert!(rendered.contains("crk_id           = ibm_kms_key.kms_roks_key_key.key_id"));
        assert_eq!(rendered.matches("zones {").count(), 2);
        assert!(rendered.contains("subnet_id = module.workload_vpc.vsi_zone_1_id"));
    }

    #[test]
    fn worker_pool_attaches_to_cluster() {
        let cluster = cluster();
        let rendered = format_worker_pool(&cluster.worker_pools[0], &cluster, &Config::empty());
        assert!(rendered.contains(
            "cluster           = ibm_container_vpc_cluster.workload_vpc_workload_cluster_cluster.id"
        ));
        assert!(rendered.contains("\"${var.prefix}-workload-workload-cluster-logging-pool\""));
    }
}

//! State store cascade behavior: renames update references, deletes null
//! or remove them, and after any update pass nothing dangles.

use lzforge::config::{ResourceGroup, SshKey, Subnet, TgwConnection, Vpc};
use lzforge::state::Store;

#[test]
fn vpc_rename_updates_every_referencing_family() {
    let mut store = Store::new();
    let mut vpc = store.config().vpc("management").unwrap().clone();
    vpc.name = "mgmt".to_string();
    store.vpc_save("management", vpc);

    let config = store.config();
    assert!(config.vpc("mgmt").is_some());
    assert!(config.vpc("management").is_none());
    // Children re-parent.
    assert!(config.vpc("mgmt").unwrap().subnets.iter().all(|s| s.vpc == "mgmt"));
    assert!(config.vpc("mgmt").unwrap().acls.iter().all(|a| a.vpc == "mgmt"));
    // Security groups follow.
    let sg = config
        .security_groups
        .iter()
        .find(|sg| sg.name == "management-vpe")
        .unwrap();
    assert_eq!(sg.vpc, "mgmt");
    // Transit gateway connections follow.
    assert!(
        config.transit_gateways[0]
            .connections
            .iter()
            .any(|c| c.vpc.as_deref() == Some("mgmt"))
    );
    // Deployments and VPN gateways follow.
    assert_eq!(config.vsi[0].vpc, "mgmt");
    assert_eq!(config.vpn_gateways[0].vpc.as_deref(), Some("mgmt"));
}

#[test]
fn vpc_rename_shows_up_in_regenerated_output() {
    let mut store = Store::new();
    let mut vpc = store.config().vpc("management").unwrap().clone();
    vpc.name = "mgmt".to_string();
    store.vpc_save("management", vpc);

    let files = lzforge::tf::config_to_files(store.config()).unwrap();
    assert!(files.module("mgmt_vpc").is_some());
    assert!(files.module("management_vpc").is_none());
    let tgw = files.text("transit_gateways.tf").unwrap();
    assert!(tgw.contains("module.mgmt_vpc.crn"));
    assert!(!tgw.contains("module.management_vpc.crn"));
    let servers = files.text("virtual_servers.tf").unwrap();
    assert!(servers.contains("mgmt_vpc_management_server_vsi_1_1"));
}

#[test]
fn resource_group_delete_nulls_references_across_families() {
    let mut store = Store::new();
    // management-rg is referenced by ssh keys, the management VPC (and its
    // subnets/ACLs), security groups, VPN gateways, and deployments.
    store.resource_group_delete("management-rg");

    let config = store.config();
    assert_eq!(config.resource_groups.len(), 2);
    assert_eq!(config.ssh_keys[0].resource_group, None);
    let vpc = config.vpc("management").unwrap();
    assert_eq!(vpc.resource_group, None);
    assert!(vpc.subnets.iter().all(|s| s.resource_group.is_none()));
    assert!(vpc.acls.iter().all(|a| a.resource_group.is_none()));
    let sg = config
        .security_groups
        .iter()
        .find(|sg| sg.name == "management-vpe")
        .unwrap();
    assert_eq!(sg.resource_group, None);
    assert_eq!(config.vpn_gateways[0].resource_group, None);
    assert_eq!(config.vsi[0].resource_group, None);
    // The referencing entities themselves survive.
    assert_eq!(config.vpcs.len(), 2);
    assert_eq!(config.vsi.len(), 1);
}

#[test]
fn resource_group_rename_updates_references() {
    let mut store = Store::new();
    store.resource_group_save(
        "service-rg",
        ResourceGroup {
            name: "services".to_string(),
            use_data: false,
            use_prefix: true,
        },
    );
    let config = store.config();
    assert_eq!(config.key_management[0].resource_group.as_deref(), Some("services"));
    assert_eq!(config.object_storage[0].resource_group.as_deref(), Some("services"));
    assert_eq!(config.atracker.resource_group.as_deref(), Some("services"));
    assert_eq!(
        config.transit_gateways[0].resource_group.as_deref(),
        Some("services")
    );
}

#[test]
fn vpc_delete_drops_transit_gateway_connection_but_keeps_crns() {
    let mut store = Store::new();
    {
        let mut tgw = store.config().transit_gateways[0].clone();
        tgw.connections.push(TgwConnection {
            tgw: tgw.name.clone(),
            vpc: None,
            crn: Some("crn:v1:bluemix:public:is:us-south:a/x::vpc:external".to_string()),
        });
        store.transit_gateway_save("transit-gateway", tgw);
    }
    store.vpc_delete("management");

    let connections = &store.config().transit_gateways[0].connections;
    assert_eq!(connections.len(), 2);
    assert!(connections.iter().any(|c| c.vpc.as_deref() == Some("workload")));
    assert!(connections.iter().any(|c| c.crn.is_some()));
    assert!(!connections.iter().any(|c| c.vpc.as_deref() == Some("management")));
}

#[test]
fn transit_gateway_save_reconciles_crn_list() {
    let mut store = Store::new();
    let mut tgw = store.config().transit_gateways[0].clone();
    tgw.name = "todd".to_string();
    tgw.crns = Some(vec!["crn-a".to_string(), "crn-b".to_string()]);
    store.transit_gateway_save("transit-gateway", tgw);

    let connections = &store.config().transit_gateways[0].connections;
    assert!(connections.iter().all(|c| c.tgw == "todd"));
    assert_eq!(
        connections.iter().filter(|c| c.crn.is_some()).count(),
        2
    );

    // Dropping a CRN drops its connection.
    let mut tgw = store.config().transit_gateways[0].clone();
    tgw.crns = Some(vec!["crn-a".to_string()]);
    store.transit_gateway_save("todd", tgw);
    let connections = &store.config().transit_gateways[0].connections;
    assert_eq!(connections.iter().filter(|c| c.crn.is_some()).count(), 1);
    assert_eq!(
        connections
            .iter()
            .find(|c| c.crn.is_some())
            .and_then(|c| c.crn.as_deref()),
        Some("crn-a")
    );
}

#[test]
fn ssh_key_delete_empties_deployment_key_lists() {
    let mut store = Store::new();
    store.ssh_key_delete("ssh-key");
    assert!(store.config().vsi[0].ssh_keys.is_empty());
    // The deployment survives (and is now invalid, which the badge list
    // reports).
    assert_eq!(store.config().vsi.len(), 1);
}

#[test]
fn ssh_key_rename_follows_into_deployments() {
    let mut store = Store::new();
    let mut key = store.config().ssh_keys[0].clone();
    key.name = "renamed-key".to_string();
    store.ssh_key_save("ssh-key", key);
    assert_eq!(store.config().vsi[0].ssh_keys, ["renamed-key"]);
}

#[test]
fn kms_key_rename_follows_into_consumers() {
    let mut store = Store::new();
    let key = {
        let kms = &store.config().key_management[0];
        let mut key = kms.keys.iter().find(|k| k.name == "roks-key").unwrap().clone();
        key.name = "cluster-key".to_string();
        key
    };
    store.kms_key_save("kms", "roks-key", key);
    assert_eq!(
        store.config().clusters[0].encryption_key.as_deref(),
        Some("cluster-key")
    );
}

#[test]
fn kms_key_delete_nulls_bucket_encryption() {
    let mut store = Store::new();
    store.kms_key_delete("kms", "atracker-key");
    let bucket = &store.config().object_storage[0].buckets[0];
    assert_eq!(bucket.kms_key, None);
    // The bucket itself survives.
    assert_eq!(bucket.name, "atracker-bucket");
}

#[test]
fn subnet_delete_cascades_into_subnet_lists() {
    let mut store = Store::new();
    store.subnet_delete("management", "vsi-zone-3");
    let config = store.config();
    assert!(!config.vsi[0].subnets.contains(&"vsi-zone-3".to_string()));
    assert_eq!(config.vsi[0].subnets.len(), 2);
    // The workload cluster keeps its own vsi-zone-3 (different VPC).
    assert_eq!(config.clusters[0].subnets.len(), 3);
}

#[test]
fn subnet_rename_updates_consumers_and_tiers() {
    let mut store = Store::new();
    let subnet = {
        let vpc = store.config().vpc("management").unwrap();
        let mut subnet = vpc
            .subnets
            .iter()
            .find(|s| s.name == "vsi-zone-1")
            .unwrap()
            .clone();
        subnet.name = "compute-zone-1".to_string();
        subnet
    };
    store.subnet_save("management", "vsi-zone-1", subnet);
    assert!(
        store.config().vsi[0]
            .subnets
            .contains(&"compute-zone-1".to_string())
    );
    let tiers = &store.subnet_tiers["management"];
    assert!(tiers.iter().any(|tier| tier.name == "compute"));
}

#[test]
fn subnet_tier_save_renames_members_and_references() {
    let mut store = Store::new();
    store.subnet_tier_save("management", "vsi", "compute", 3);
    let vpc = store.config().vpc("management").unwrap();
    assert!(vpc.subnets.iter().any(|s| s.name == "compute-zone-1"));
    assert!(!vpc.subnets.iter().any(|s| s.name == "vsi-zone-1"));
    assert_eq!(
        store.config().vsi[0].subnets,
        ["compute-zone-1", "compute-zone-2", "compute-zone-3"]
    );
}

#[test]
fn subnet_tier_zone_shrink_drops_subnets() {
    let mut store = Store::new();
    store.subnet_tier_save("management", "vpe", "vpe", 1);
    let vpc = store.config().vpc("management").unwrap();
    let vpe: Vec<&Subnet> = vpc
        .subnets
        .iter()
        .filter(|s| s.name.starts_with("vpe-zone"))
        .collect();
    assert_eq!(vpe.len(), 1);
    assert_eq!(vpe[0].zone, 1);
}

#[test]
fn unknown_prev_identity_is_a_silent_no_op() {
    let mut store = Store::new();
    let before = store.config().clone();
    store.vpc_save(
        "ghost",
        Vpc {
            name: "ghost".to_string(),
            resource_group: None,
            classic_access: false,
            manual_address_prefix_management: false,
            default_network_acl_name: None,
            default_security_group_name: None,
            default_routing_table_name: None,
            cos: None,
            bucket: None,
            address_prefixes: Vec::new(),
            subnets: Vec::new(),
            public_gateways: Vec::new(),
            acls: Vec::new(),
        },
    );
    store.ssh_key_save(
        "ghost",
        SshKey {
            name: "ghost".to_string(),
            public_key: None,
            resource_group: None,
            use_data: false,
        },
    );
    assert_eq!(store.config(), &before);
}

#[test]
fn update_pass_is_idempotent() {
    let mut store = Store::new();
    store.vpc_delete("management");
    let after_first = store.config().clone();
    store.update();
    assert_eq!(store.config(), &after_first);
}

#[test]
fn every_reference_heals_after_arbitrary_deletes() {
    let mut store = Store::new();
    store.resource_group_delete("workload-rg");
    store.object_storage_delete("cos");
    store.key_management_delete("kms");
    let config = store.config();
    let groups = config.resource_group_names();
    // No surviving entity references a deleted producer.
    for cluster in &config.clusters {
        assert!(cluster.kms.is_none());
        assert!(cluster.encryption_key.is_none());
        assert!(cluster.cos.is_none());
        assert!(
            cluster
                .resource_group
                .as_ref()
                .is_none_or(|rg| groups.contains(rg))
        );
    }
    for vsi in &config.vsi {
        assert!(vsi.kms.is_none());
        assert!(vsi.encryption_key.is_none());
    }
    for vpc in &config.vpcs {
        assert!(vpc.cos.is_none());
        assert!(vpc.bucket.is_none());
    }
    assert_eq!(config.atracker.target_name.as_deref(), Some("atracker-cos"));
}

//! End-to-end compilation: document in, file set out.

use lzforge::config::{Config, LoadBalancer};
use lzforge::state::Store;
use lzforge::tf::config_to_files;
use pretty_assertions::assert_eq;

#[test]
fn compiling_twice_is_byte_identical() {
    let config = Config::default();
    let first = config_to_files(&config).unwrap();
    let second = config_to_files(&config).unwrap();
    assert_eq!(first, second);
    // And through a store round trip: healing an already consistent
    // document changes nothing.
    let store = Store::from_config(config);
    let third = config_to_files(store.config()).unwrap();
    assert_eq!(first, third);
}

#[test]
fn empty_families_map_to_omitted_files() {
    let mut config = Config::default();
    config.load_balancers.clear();
    config.event_streams.clear();
    config.appid.clear();
    let files = config_to_files(&config).unwrap();
    for name in ["load_balancers.tf", "event_streams.tf", "appid.tf"] {
        assert!(files.is_omitted(name), "{name} should be omitted");
        assert_eq!(files.text(name), None);
    }
    // Never an empty string.
    for (_, content) in files.iter() {
        if let lzforge::tf::FileContent::Text(text) = content {
            assert!(!text.is_empty());
        }
    }
}

#[test]
fn always_present_files_exist_for_the_default_document() {
    let files = config_to_files(&Config::default()).unwrap();
    for name in [
        "main.tf",
        "resource_groups.tf",
        "key_management.tf",
        "object_storage.tf",
        "observability.tf",
        "ssh_keys.tf",
        "transit_gateways.tf",
        "vpn_gateways.tf",
        "clusters.tf",
        "virtual_servers.tf",
        "flow_logs.tf",
        "variables.tf",
        "versions.tf",
        "lzforge.json",
    ] {
        assert!(files.text(name).is_some(), "{name} missing");
    }
    assert!(files.module("management_vpc").is_some());
    assert!(files.module("workload_vpc").is_some());
}

#[test]
fn vpc_modules_contain_their_scoped_resources() {
    let mut config = Config::default();
    config.routing_tables.push(lzforge::config::RoutingTable {
        name: "ingress".to_string(),
        vpc: "management".to_string(),
        route_direct_link_ingress: false,
        transit_gateway_ingress: true,
        route_vpc_zone_ingress: false,
        routes: Vec::new(),
    });
    let files = config_to_files(&config).unwrap();
    let module = files.module("management_vpc").unwrap();
    assert!(module.contains_key("main.tf"));
    assert!(module.contains_key("variables.tf"));
    assert!(module.contains_key("outputs.tf"));
    assert!(module.contains_key("versions.tf"));
    assert!(module.contains_key("acl_management_management.tf"));
    assert!(module.contains_key("sg_management_vpe.tf"));
    assert!(module.contains_key("sg_management_vsi.tf"));
    assert!(module.contains_key("rt_ingress.tf"));
    // The workload module holds only its own groups.
    let workload = files.module("workload_vpc").unwrap();
    assert!(workload.contains_key("sg_workload_vpe.tf"));
    assert!(!workload.contains_key("sg_management_vpe.tf"));
    assert!(!workload.contains_key("rt_ingress.tf"));
}

#[test]
fn main_tf_wires_module_inputs() {
    let files = config_to_files(&Config::default()).unwrap();
    let main = files.text("main.tf").unwrap();
    assert!(main.contains("module \"management_vpc\" {"));
    assert!(main.contains("source"));
    assert!(main.contains("\"./management_vpc\""));
    assert!(main.contains("management_rg_id = ibm_resource_group.management_rg.id"));
}

#[test]
fn replica_expansion_produces_one_block_per_subnet_and_replica() {
    // 3 subnets x 2 replicas on the default management server.
    let files = config_to_files(&Config::default()).unwrap();
    let servers = files.text("virtual_servers.tf").unwrap();
    assert_eq!(servers.matches("resource \"ibm_is_instance\"").count(), 6);
    for zone in 1..=3 {
        for index in 1..=2 {
            assert!(servers.contains(&format!(
                "management_vpc_management_server_vsi_{zone}_{index}"
            )));
        }
    }
}

#[test]
fn load_balancer_fan_out_matches_replica_expansion() {
    let mut config = Config::default();
    config.load_balancers.push(LoadBalancer {
        name: "lb-1".to_string(),
        vpc: "management".to_string(),
        lb_type: "public".to_string(),
        subnets: vec!["vsi-zone-1".to_string()],
        security_groups: vec!["management-vpe".to_string()],
        resource_group: Some("management-rg".to_string()),
        target_vsi: vec!["management-server".to_string()],
        port: 80,
        listener_port: 443,
        listener_protocol: "https".to_string(),
        connection_limit: None,
        algorithm: "round_robin".to_string(),
        protocol: "tcp".to_string(),
        health_delay: 60,
        health_retries: 5,
        health_timeout: 30,
        health_type: "https".to_string(),
        proxy_protocol: None,
        session_persistence_type: None,
        session_persistence_app_cookie_name: None,
    });
    let files = config_to_files(&config).unwrap();
    let lb = files.text("load_balancers.tf").unwrap();
    // 3 subnets x 2 replicas on the target deployment.
    assert_eq!(lb.matches("resource \"ibm_is_lb_pool_member\"").count(), 6);
    // The listener depends on every member.
    assert_eq!(lb.matches("ibm_is_lb_pool_member.").count(), 6);
    assert!(lb.contains(
        "ibm_is_instance.management_vpc_management_server_vsi_3_2.primary_network_interface.0.primary_ip.0.address"
    ));
}

#[test]
fn raw_document_survives_verbatim() {
    let config = Config::default();
    let files = config_to_files(&config).unwrap();
    let raw = files.text("lzforge.json").unwrap();
    assert_eq!(Config::from_json(raw).unwrap(), config);
}

#[test]
fn provider_manifest_reacts_to_document_flags() {
    let mut config = Config::default();
    let base = config_to_files(&config).unwrap();
    let versions = base.text("versions.tf").unwrap();
    // Random suffixes are on in the default document.
    assert!(versions.contains("hashicorp/random"));
    assert!(!versions.contains("logdna/logdna"));

    config.logdna.enabled = true;
    config.logdna.archive = true;
    config.logdna.resource_group = Some("service-rg".to_string());
    config.logdna.cos = Some("cos".to_string());
    config.logdna.bucket = Some("management-bucket".to_string());
    let files = config_to_files(&config).unwrap();
    let versions = files.text("versions.tf").unwrap();
    assert!(versions.contains("logdna/logdna"));
    assert!(versions.contains("configuration_aliases = [logdna.logdna]"));
}

#[test]
fn zone_extraction_drives_compiled_zone_strings() {
    let files = config_to_files(&Config::default()).unwrap();
    let servers = files.text("virtual_servers.tf").unwrap();
    assert!(servers.contains("zone           = \"${var.region}-2\""));
}

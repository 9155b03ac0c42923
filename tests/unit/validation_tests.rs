//! Validation layer behavior: duplicate rejection, protocol-aware ports,
//! and the invalid-forms badge list.

use lzforge::config::{Config, ResourceGroup, SgRule, Subnet};
use lzforge::state::Store;
use lzforge::validate;

#[test]
fn duplicate_names_are_rejected_before_mutation() {
    let config = Config::default();
    // Creating a second group under an existing name is blocked...
    let duplicate = ResourceGroup {
        name: "service-rg".to_string(),
        use_data: false,
        use_prefix: true,
    };
    assert!(validate::is_invalid_resource_group(&duplicate, &config, None));
    // ...saving an existing group under its own name is not.
    assert!(!validate::is_invalid_resource_group(
        &duplicate,
        &config,
        Some("service-rg")
    ));
    // Renaming onto another existing name is blocked again.
    assert!(validate::is_invalid_resource_group(
        &duplicate,
        &config,
        Some("management-rg")
    ));
}

#[test]
fn nested_scope_uniqueness_is_parent_qualified() {
    let config = Config::default();
    let vpc = config.vpc("management").unwrap();
    let acl = &vpc.acls[0];
    // Both default VPCs carry a rule named allow-ibm-inbound; a duplicate
    // only counts within the same ACL.
    let mut rule = acl.rules[0].clone();
    assert!(validate::is_invalid_acl_rule(&rule, acl, &config, None));
    let workload = config.vpc("workload").unwrap();
    rule.acl = "workload".to_string();
    rule.vpc = "workload".to_string();
    let workload_acl = &workload.acls[0];
    // Same name exists there too, so still invalid within that parent...
    assert!(validate::is_invalid_acl_rule(&rule, workload_acl, &config, None));
    // ...but a fresh name is fine.
    rule.name = "allow-frog-inbound".to_string();
    assert!(!validate::is_invalid_acl_rule(&rule, workload_acl, &config, None));
}

#[test]
fn security_group_rules_skip_source_port_checks() {
    let config = Config::default();
    let sg = &config.security_groups[0];
    let mut rule = SgRule {
        name: "new-rule".to_string(),
        sg: sg.name.clone(),
        vpc: sg.vpc.clone(),
        direction: "inbound".to_string(),
        source: "10.0.0.0/8".to_string(),
        icmp: Default::default(),
        tcp: Default::default(),
        udp: Default::default(),
    };
    assert!(!validate::is_invalid_sg_rule(&rule, sg, &config, None));
    rule.tcp.port_min = Some(70000);
    assert!(validate::is_invalid_sg_rule(&rule, sg, &config, None));
    rule.tcp.port_min = Some(443);
    rule.source = "not-an-ip".to_string();
    assert!(validate::is_invalid_sg_rule(&rule, sg, &config, None));
}

#[test]
fn icmp_rules_validate_type_and_code_ranges() {
    let config = Config::default();
    let vpc = config.vpc("management").unwrap();
    let acl = &vpc.acls[0];
    let mut rule = acl.rules[0].clone();
    rule.name = "icmp-rule".to_string();
    rule.icmp.icmp_type = Some(8);
    rule.icmp.code = Some(0);
    assert!(!validate::is_invalid_acl_rule(&rule, acl, &config, None));
    rule.icmp.code = Some(256);
    assert!(validate::is_invalid_acl_rule(&rule, acl, &config, None));
}

#[test]
fn subnet_without_acl_is_invalid_but_cidr_must_parse_too() {
    let config = Config::default();
    let mut subnet = Subnet {
        name: "new-zone-1".to_string(),
        vpc: "management".to_string(),
        zone: 1,
        cidr: "10.10.40.0/24".to_string(),
        network_acl: Some("management".to_string()),
        resource_group: None,
        public_gateway: false,
        has_prefix: false,
        tier: None,
    };
    assert!(!validate::is_invalid_subnet(&subnet, &config));
    subnet.network_acl = None;
    assert!(validate::is_invalid_subnet(&subnet, &config));
    subnet.network_acl = Some("management".to_string());
    subnet.cidr = "10.10.40.0/40".to_string();
    assert!(validate::is_invalid_subnet(&subnet, &config));
}

#[test]
fn invalid_forms_lists_failing_families_in_navigation_order() {
    let mut store = Store::new();
    let mut config = store.config().clone();
    config.transit_gateways[0].connections.clear();
    config.clusters[0].flavor = None;
    store.hard_set(config);
    let forms = validate::invalid_forms(&store);
    assert_eq!(forms, ["transit_gateways", "clusters"]);
}

#[test]
fn enterprise_event_streams_need_capacity_fields() {
    let mut config = Config::default();
    config.event_streams.push(lzforge::config::EventStreams {
        name: "event-streams".to_string(),
        plan: "enterprise-3nodes-2tb".to_string(),
        resource_group: Some("service-rg".to_string()),
        endpoints: Some("private".to_string()),
        throughput: Some("150MB/s".to_string()),
        storage_size: Some("2TB".to_string()),
        private_ip_allowlist: Some(vec!["10.0.0.0/32".to_string()]),
    });
    let es = &config.event_streams[0];
    assert!(!validate::is_invalid_event_streams(es, &config, Some("event-streams")));
    let mut broken = es.clone();
    broken.throughput = None;
    assert!(validate::is_invalid_event_streams(&broken, &config, Some("event-streams")));
    let mut bad_list = es.clone();
    bad_list.private_ip_allowlist = Some(vec!["frog".to_string()]);
    assert!(validate::is_invalid_event_streams(&bad_list, &config, Some("event-streams")));
    // Standard plans skip the capacity rules entirely.
    let mut standard = es.clone();
    standard.plan = "standard".to_string();
    standard.throughput = None;
    standard.storage_size = None;
    standard.endpoints = None;
    assert!(!validate::is_invalid_event_streams(&standard, &config, Some("event-streams")));
}

#[test]
fn iam_settings_validate_the_ip_allowlist() {
    let config = Config::default();
    let mut iam = lzforge::config::IamAccountSettings {
        enable: true,
        mfa: Some("NONE".to_string()),
        restrict_create_service_id: Some("RESTRICTED".to_string()),
        restrict_create_platform_apikey: Some("RESTRICTED".to_string()),
        max_sessions_per_identity: Some(2),
        allowed_ip_addresses: Some("1.2.3.4,5.6.7.8".to_string()),
        ..Default::default()
    };
    assert!(!validate::is_invalid_iam_account_settings(&iam, &config));
    iam.allowed_ip_addresses = Some("1.2.3.4,frog".to_string());
    assert!(validate::is_invalid_iam_account_settings(&iam, &config));
}

#[test]
fn scc_descriptions_must_match_the_allowed_alphabet() {
    let config = Config::default();
    let mut scc = lzforge::config::Scc {
        enable: true,
        collector_description: Some("scc collector".to_string()),
        scope_description: Some("scc scope".to_string()),
        ..Default::default()
    };
    assert!(!validate::is_invalid_scc(&scc, &config));
    scc.scope_description = Some("@@@".to_string());
    assert!(validate::is_invalid_scc(&scc, &config));
    scc.enable = false;
    assert!(!validate::is_invalid_scc(&scc, &config));
}

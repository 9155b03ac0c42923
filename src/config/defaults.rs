//! Seeded starter landing zone.
//!
//! [`starter_landing_zone`] builds the default document every new session
//! starts from: a management VPC and a workload VPC behind a transit
//! gateway, key management with a key per concern, object storage wired to
//! activity tracking, an SSH key, an OpenShift cluster in the workload VPC,
//! and a small management server deployment. All cross-references are valid
//! by construction; the store's first update pass leaves it unchanged.

use super::*;

const MGMT: &str = "management";
const WORKLOAD: &str = "workload";

/// Placeholder key material accepted by the validation layer; operators are
/// expected to replace it before provisioning.
const PLACEHOLDER_SSH_KEY: &str = "ssh-rsa AAAAB3NzaC1yc2EAAAADAQABAAABgQDreplacethiskeybeforeprovisioning";

pub(super) fn starter_landing_zone() -> Config {
    Config {
        options: GlobalOptions::default(),
        resource_groups: vec![
            resource_group("service-rg"),
            resource_group("management-rg"),
            resource_group("workload-rg"),
        ],
        key_management: vec![KeyManagement {
            name: "kms".to_string(),
            resource_group: Some("service-rg".to_string()),
            use_data: false,
            use_hs_crypto: false,
            authorize_vpc_reader_role: true,
            keys: vec![
                kms_key("key"),
                kms_key("atracker-key"),
                kms_key("vsi-volume-key"),
                kms_key("roks-key"),
            ],
        }],
        object_storage: vec![
            ObjectStorage {
                name: "atracker-cos".to_string(),
                resource_group: Some("service-rg".to_string()),
                kms: Some("kms".to_string()),
                plan: "standard".to_string(),
                use_data: false,
                use_random_suffix: true,
                buckets: vec![CosBucket {
                    name: "atracker-bucket".to_string(),
                    storage_class: "standard".to_string(),
                    kms_key: Some("atracker-key".to_string()),
                    endpoint: "public".to_string(),
                }],
                keys: vec![CosKey {
                    name: "cos-bind-key".to_string(),
                    role: "Writer".to_string(),
                    enable_hmac: false,
                }],
            },
            ObjectStorage {
                name: "cos".to_string(),
                resource_group: Some("service-rg".to_string()),
                kms: Some("kms".to_string()),
                plan: "standard".to_string(),
                use_data: false,
                use_random_suffix: true,
                buckets: vec![
                    CosBucket {
                        name: "management-bucket".to_string(),
                        storage_class: "standard".to_string(),
                        kms_key: Some("key".to_string()),
                        endpoint: "public".to_string(),
                    },
                    CosBucket {
                        name: "workload-bucket".to_string(),
                        storage_class: "standard".to_string(),
                        kms_key: Some("key".to_string()),
                        endpoint: "public".to_string(),
                    },
                ],
                keys: Vec::new(),
            },
        ],
        atracker: Atracker {
            enabled: true,
            name: "atracker".to_string(),
            target_type: "cos".to_string(),
            target_name: Some("atracker-cos".to_string()),
            bucket: Some("atracker-bucket".to_string()),
            cos_key: Some("cos-bind-key".to_string()),
            add_route: true,
            locations: vec!["global".to_string(), "us-south".to_string()],
            instance: false,
            plan: Some("lite".to_string()),
            resource_group: Some("service-rg".to_string()),
            archive: false,
        },
        logdna: Logdna::default(),
        sysdig: Sysdig::default(),
        appid: Vec::new(),
        secrets_manager: Vec::new(),
        event_streams: Vec::new(),
        scc: Scc::default(),
        iam_account_settings: IamAccountSettings::default(),
        ssh_keys: vec![SshKey {
            name: "ssh-key".to_string(),
            public_key: Some(PLACEHOLDER_SSH_KEY.to_string()),
            resource_group: Some("management-rg".to_string()),
            use_data: false,
        }],
        vpcs: vec![
            default_vpc(MGMT, "management-rg", "management-bucket", 1),
            default_vpc(WORKLOAD, "workload-rg", "workload-bucket", 4),
        ],
        routing_tables: Vec::new(),
        security_groups: vec![
            vpe_security_group(MGMT, "management-rg"),
            vpe_security_group(WORKLOAD, "workload-rg"),
            SecurityGroup {
                name: "management-vsi".to_string(),
                vpc: MGMT.to_string(),
                resource_group: Some("management-rg".to_string()),
                rules: vec![
                    sg_rule("management-vsi", MGMT, "allow-ibm-inbound", "inbound", "161.26.0.0/16"),
                    sg_rule("management-vsi", MGMT, "allow-vpc-inbound", "inbound", "10.0.0.0/8"),
                    sg_rule("management-vsi", MGMT, "allow-vpc-outbound", "outbound", "10.0.0.0/8"),
                ],
            },
        ],
        transit_gateways: vec![TransitGateway {
            name: "transit-gateway".to_string(),
            resource_group: Some("service-rg".to_string()),
            global: false,
            connections: vec![
                TgwConnection {
                    tgw: "transit-gateway".to_string(),
                    vpc: Some(MGMT.to_string()),
                    crn: None,
                },
                TgwConnection {
                    tgw: "transit-gateway".to_string(),
                    vpc: Some(WORKLOAD.to_string()),
                    crn: None,
                },
            ],
            crns: None,
        }],
        vpn_gateways: vec![VpnGateway {
            name: "management-gateway".to_string(),
            vpc: Some(MGMT.to_string()),
            subnet: Some("vpn-zone-1".to_string()),
            resource_group: Some("management-rg".to_string()),
            policy_mode: false,
        }],
        clusters: vec![Cluster {
            name: "workload-cluster".to_string(),
            vpc: Some(WORKLOAD.to_string()),
            kube_type: "openshift".to_string(),
            kube_version: Some("default".to_string()),
            flavor: Some("bx2.16x64".to_string()),
            subnets: vec![
                "vsi-zone-1".to_string(),
                "vsi-zone-2".to_string(),
                "vsi-zone-3".to_string(),
            ],
            workers_per_subnet: 2,
            resource_group: Some("workload-rg".to_string()),
            kms: Some("kms".to_string()),
            encryption_key: Some("roks-key".to_string()),
            cos: Some("cos".to_string()),
            entitlement: Some("cloud_pak".to_string()),
            update_all_workers: false,
            private_endpoint: true,
            worker_pools: Vec::new(),
        }],
        vsi: vec![Vsi {
            name: "management-server".to_string(),
            vpc: MGMT.to_string(),
            subnets: vec![
                "vsi-zone-1".to_string(),
                "vsi-zone-2".to_string(),
                "vsi-zone-3".to_string(),
            ],
            vsi_per_subnet: 2,
            image: "ibm-ubuntu-22-04-3-minimal-amd64-1".to_string(),
            profile: "cx2-4x8".to_string(),
            resource_group: Some("management-rg".to_string()),
            security_groups: vec!["management-vsi".to_string()],
            ssh_keys: vec!["ssh-key".to_string()],
            kms: Some("kms".to_string()),
            encryption_key: Some("vsi-volume-key".to_string()),
            user_data: None,
            enable_floating_ip: false,
            reserved_ips: None,
            network_interfaces: Vec::new(),
            volumes: Vec::new(),
        }],
        load_balancers: Vec::new(),
    }
}

fn resource_group(name: &str) -> ResourceGroup {
    ResourceGroup {
        name: name.to_string(),
        use_data: false,
        use_prefix: true,
    }
}

fn kms_key(name: &str) -> KmsKey {
    KmsKey {
        name: name.to_string(),
        key_ring: Some("ring".to_string()),
        root_key: true,
        force_delete: Some(true),
        endpoint: Some("public".to_string()),
        rotation: 12,
        dual_auth_delete: false,
    }
}

/// A starter VPC: one `/22` prefix per zone, a vsi and vpe subnet in every
/// zone (plus a vpn subnet in zone 1 of the management VPC), and the
/// standard allow-internal ACL.
fn default_vpc(name: &str, rg: &str, bucket: &str, octet: u8) -> Vpc {
    let mut subnets = Vec::new();
    let mut address_prefixes = Vec::new();
    for zone in 1..=3u8 {
        address_prefixes.push(AddressPrefix {
            name: format!("{name}-zone-{zone}"),
            vpc: name.to_string(),
            zone,
            cidr: format!("10.{}0.0.0/22", octet + zone - 1),
        });
        subnets.push(subnet(name, &format!("vsi-zone-{zone}"), zone, rg, format!("10.{}0.0.0/29", octet + zone - 1)));
        subnets.push(subnet(name, &format!("vpe-zone-{zone}"), zone, rg, format!("10.{}0.0.48/29", octet + zone - 1)));
    }
    if name == MGMT {
        subnets.push(subnet(name, "vpn-zone-1", 1, rg, format!("10.{octet}0.0.16/28")));
    }
    Vpc {
        name: name.to_string(),
        resource_group: Some(rg.to_string()),
        classic_access: false,
        manual_address_prefix_management: true,
        default_network_acl_name: None,
        default_security_group_name: None,
        default_routing_table_name: None,
        cos: Some("cos".to_string()),
        bucket: Some(bucket.to_string()),
        address_prefixes,
        subnets,
        public_gateways: Vec::new(),
        acls: vec![Acl {
            name: name.to_string(),
            vpc: name.to_string(),
            resource_group: Some(rg.to_string()),
            rules: vec![
                acl_rule(name, "allow-ibm-inbound", "inbound", "161.26.0.0/16", "10.0.0.0/8"),
                acl_rule(name, "allow-ibm-outbound", "outbound", "10.0.0.0/8", "161.26.0.0/16"),
                acl_rule(name, "allow-all-network-inbound", "inbound", "10.0.0.0/8", "10.0.0.0/8"),
                acl_rule(name, "allow-all-network-outbound", "outbound", "10.0.0.0/8", "10.0.0.0/8"),
            ],
        }],
    }
}

fn subnet(vpc: &str, name: &str, zone: u8, rg: &str, cidr: String) -> Subnet {
    Subnet {
        name: name.to_string(),
        vpc: vpc.to_string(),
        zone,
        cidr,
        network_acl: Some(vpc.to_string()),
        resource_group: Some(rg.to_string()),
        public_gateway: false,
        has_prefix: false,
        tier: None,
    }
}

fn acl_rule(vpc: &str, name: &str, direction: &str, source: &str, destination: &str) -> AclRule {
    AclRule {
        name: name.to_string(),
        acl: vpc.to_string(),
        vpc: vpc.to_string(),
        action: "allow".to_string(),
        direction: direction.to_string(),
        source: source.to_string(),
        destination: destination.to_string(),
        icmp: IcmpSpec::default(),
        tcp: PortSpec::default(),
        udp: PortSpec::default(),
    }
}

fn vpe_security_group(vpc: &str, rg: &str) -> SecurityGroup {
    let sg = format!("{vpc}-vpe");
    SecurityGroup {
        name: sg.clone(),
        vpc: vpc.to_string(),
        resource_group: Some(rg.to_string()),
        rules: vec![
            sg_rule(&sg, vpc, "allow-ibm-inbound", "inbound", "161.26.0.0/16"),
            sg_rule(&sg, vpc, "allow-vpc-inbound", "inbound", "10.0.0.0/8"),
            sg_rule(&sg, vpc, "allow-vpc-outbound", "outbound", "10.0.0.0/8"),
            sg_port_rule(&sg, vpc, "allow-ibm-tcp-53-outbound", 53),
            sg_port_rule(&sg, vpc, "allow-ibm-tcp-80-outbound", 80),
            sg_port_rule(&sg, vpc, "allow-ibm-tcp-443-outbound", 443),
        ],
    }
}

fn sg_rule(sg: &str, vpc: &str, name: &str, direction: &str, source: &str) -> SgRule {
    SgRule {
        name: name.to_string(),
        sg: sg.to_string(),
        vpc: vpc.to_string(),
        direction: direction.to_string(),
        source: source.to_string(),
        icmp: IcmpSpec::default(),
        tcp: PortSpec::default(),
        udp: PortSpec::default(),
    }
}

fn sg_port_rule(sg: &str, vpc: &str, name: &str, port: i64) -> SgRule {
    SgRule {
        tcp: PortSpec {
            port_min: Some(port),
            port_max: Some(port),
            source_port_min: None,
            source_port_max: None,
        },
        ..sg_rule(sg, vpc, name, "outbound", "161.26.0.0/16")
    }
}

//! The validation layer.
//!
//! Pure per-family predicates deciding whether a save should be blocked:
//! `is_invalid_*(candidate, config, prev) -> bool`. `prev` is the entity's
//! name before the edit (`None` for a create) so uniqueness checks do not
//! trip over the entity itself. Each predicate returns `true` on the FIRST
//! failing rule; failures are never aggregated, because the UI surfaces one
//! message at a time.
//!
//! Validation never mutates and never raises: an invalid candidate simply
//! blocks the save, which is why the document itself can never reach an
//! invalid state through the store's save path.

mod invalid_forms;

pub use invalid_forms::invalid_forms;

use crate::config::{
    Acl, AclRule, AppId, AppIdKey, Atracker, Cluster, Config, CosBucket, CosKey, EventStreams,
    IamAccountSettings, IcmpSpec, KeyManagement, KmsKey, LoadBalancer, Logdna, ObjectStorage,
    PortSpec, ResourceGroup, Route, RoutingTable, Scc, SecretsManager, SecurityGroup, SgRule,
    SshKey, Subnet, Sysdig, TransitGateway, Vpc, VpnGateway, Vsi, WorkerPool,
};
use regex::Regex;
use std::net::Ipv4Addr;
use std::sync::LazyLock;

static NAME_EXP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z]([a-z0-9-]*[a-z0-9])?$").unwrap());

static SSH_KEY_EXP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ssh-rsa AAAA[0-9A-Za-z+/]+[=]{0,3}( [^@]+@[^@]+)?$").unwrap());

static DESCRIPTION_EXP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][a-zA-Z0-9._,\s-]*$").unwrap());

/// Valid identifier: lowercase, digits and hyphens, starting with a letter
/// and not ending with a hyphen.
pub fn invalid_name(name: &str) -> bool {
    !NAME_EXP.is_match(name)
}

/// True when `candidate` collides with a name already present in `names`,
/// ignoring the entity's own previous name.
pub fn duplicate_name<'a>(
    names: impl IntoIterator<Item = &'a str>,
    candidate: &str,
    prev: Option<&str>,
) -> bool {
    names
        .into_iter()
        .any(|name| name == candidate && Some(name) != prev)
}

fn invalid_or_duplicate<'a>(
    names: impl IntoIterator<Item = &'a str>,
    candidate: &str,
    prev: Option<&str>,
) -> bool {
    invalid_name(candidate) || duplicate_name(names, candidate, prev)
}

fn empty(field: &Option<String>) -> bool {
    field.as_deref().is_none_or(str::is_empty)
}

/// Valid IPv4 address, optionally with a `/0`..`/32` prefix.
pub fn is_ipv4_cidr_or_address(value: &str) -> bool {
    let (address, prefix) = match value.split_once('/') {
        Some((address, prefix)) => (address, Some(prefix)),
        None => (value, None),
    };
    if address.parse::<Ipv4Addr>().is_err() {
        return false;
    }
    match prefix {
        Some(prefix) => prefix.parse::<u8>().is_ok_and(|prefix| prefix <= 32),
        None => true,
    }
}

/// True when a comma-separated IP allowlist contains an invalid entry.
/// An absent list is fine; an empty string is not.
pub fn invalid_ip_comma_list(list: Option<&str>) -> bool {
    match list {
        None => false,
        Some(list) => list
            .split(',')
            .map(str::trim)
            .any(|entry| !is_ipv4_cidr_or_address(entry)),
    }
}

fn invalid_port_value(value: i64) -> bool {
    !(1..=65535).contains(&value)
}

/// Protocol-aware port validation shared by ACL and security group rules.
///
/// No checks apply when no protocol is selected ("all"); ICMP validates
/// `type` 0..=254 and `code` 0..=255; TCP/UDP validate the port bounds and,
/// for ACL rules only, the source port bounds.
pub fn invalid_port(icmp: &IcmpSpec, tcp: &PortSpec, udp: &PortSpec, is_security_group: bool) -> bool {
    if icmp.is_set() {
        return icmp.icmp_type.is_some_and(|t| !(0..=254).contains(&t))
            || icmp.code.is_some_and(|c| !(0..=255).contains(&c));
    }
    for spec in [tcp, udp] {
        if !spec.is_set() {
            continue;
        }
        if spec.port_min.is_some_and(invalid_port_value)
            || spec.port_max.is_some_and(invalid_port_value)
        {
            return true;
        }
        if !is_security_group
            && (spec.source_port_min.is_some_and(invalid_port_value)
                || spec.source_port_max.is_some_and(invalid_port_value))
        {
            return true;
        }
    }
    false
}

/// True when the public key is not a syntactically valid RSA key.
pub fn invalid_ssh_public_key(key: Option<&str>) -> bool {
    match key {
        Some(key) => !SSH_KEY_EXP.is_match(key),
        None => true,
    }
}

pub fn is_invalid_resource_group(rg: &ResourceGroup, config: &Config, prev: Option<&str>) -> bool {
    invalid_or_duplicate(
        config.resource_groups.iter().map(|r| r.name.as_str()),
        &rg.name,
        prev,
    )
}

pub fn is_invalid_key_management(
    kms: &KeyManagement,
    config: &Config,
    prev: Option<&str>,
) -> bool {
    invalid_or_duplicate(
        config.key_management.iter().map(|k| k.name.as_str()),
        &kms.name,
        prev,
    ) || empty(&kms.resource_group)
}

pub fn is_invalid_kms_key(
    key: &KmsKey,
    parent: &KeyManagement,
    _config: &Config,
    prev: Option<&str>,
) -> bool {
    invalid_or_duplicate(
        parent.keys.iter().map(|k| k.name.as_str()),
        &key.name,
        prev,
    ) || key
        .key_ring
        .as_deref()
        .is_some_and(|ring| !ring.is_empty() && invalid_name(ring))
}

pub fn is_invalid_object_storage(
    cos: &ObjectStorage,
    config: &Config,
    prev: Option<&str>,
) -> bool {
    invalid_or_duplicate(
        config.object_storage.iter().map(|c| c.name.as_str()),
        &cos.name,
        prev,
    ) || empty(&cos.kms)
        || empty(&cos.resource_group)
}

pub fn is_invalid_cos_bucket(
    bucket: &CosBucket,
    config: &Config,
    prev: Option<&str>,
) -> bool {
    // Bucket names must be unique across every instance - they share one
    // global namespace at apply time.
    invalid_or_duplicate(
        config
            .object_storage
            .iter()
            .flat_map(|cos| cos.buckets.iter().map(|b| b.name.as_str())),
        &bucket.name,
        prev,
    ) || empty(&bucket.kms_key)
}

pub fn is_invalid_cos_key(key: &CosKey, config: &Config, prev: Option<&str>) -> bool {
    invalid_or_duplicate(
        config
            .object_storage
            .iter()
            .flat_map(|cos| cos.keys.iter().map(|k| k.name.as_str())),
        &key.name,
        prev,
    )
}

pub fn is_invalid_atracker(atracker: &Atracker, _config: &Config) -> bool {
    atracker.enabled
        && (empty(&atracker.bucket) || empty(&atracker.cos_key) || atracker.locations.is_empty())
}

pub fn is_invalid_logdna(logdna: &Logdna, _config: &Config) -> bool {
    logdna.enabled
        && (empty(&logdna.resource_group)
            || (logdna.archive && (empty(&logdna.cos) || empty(&logdna.bucket))))
}

pub fn is_invalid_sysdig(sysdig: &Sysdig, _config: &Config) -> bool {
    sysdig.enabled && empty(&sysdig.resource_group)
}

pub fn is_invalid_appid(appid: &AppId, config: &Config, prev: Option<&str>) -> bool {
    invalid_or_duplicate(
        config.appid.iter().map(|a| a.name.as_str()),
        &appid.name,
        prev,
    ) || empty(&appid.resource_group)
}

pub fn is_invalid_appid_key(
    key: &AppIdKey,
    parent: &AppId,
    _config: &Config,
    prev: Option<&str>,
) -> bool {
    invalid_or_duplicate(
        parent.keys.iter().map(|k| k.name.as_str()),
        &key.name,
        prev,
    )
}

pub fn is_invalid_secrets_manager(
    sm: &SecretsManager,
    config: &Config,
    prev: Option<&str>,
) -> bool {
    invalid_or_duplicate(
        config.secrets_manager.iter().map(|s| s.name.as_str()),
        &sm.name,
        prev,
    ) || empty(&sm.encryption_key)
        || empty(&sm.resource_group)
}

pub fn is_invalid_event_streams(
    es: &EventStreams,
    config: &Config,
    prev: Option<&str>,
) -> bool {
    let base = invalid_or_duplicate(
        config.event_streams.iter().map(|e| e.name.as_str()),
        &es.name,
        prev,
    ) || empty(&es.resource_group);
    if !es.plan.contains("enterprise") {
        return base;
    }
    base || empty(&es.endpoints)
        || empty(&es.throughput)
        || empty(&es.storage_size)
        || es
            .private_ip_allowlist
            .as_ref()
            .is_some_and(|list| list.iter().any(|entry| !is_ipv4_cidr_or_address(entry)))
}

pub fn is_invalid_scc(scc: &Scc, _config: &Config) -> bool {
    if !scc.enable {
        return false;
    }
    let bad = |field: &Option<String>| {
        field
            .as_deref()
            .is_none_or(|value| !DESCRIPTION_EXP.is_match(value))
    };
    bad(&scc.collector_description) || bad(&scc.scope_description)
}

pub fn is_invalid_iam_account_settings(iam: &IamAccountSettings, _config: &Config) -> bool {
    if !iam.enable {
        return false;
    }
    empty(&iam.mfa)
        || empty(&iam.restrict_create_platform_apikey)
        || empty(&iam.restrict_create_service_id)
        || iam.max_sessions_per_identity.is_none()
        || invalid_ip_comma_list(iam.allowed_ip_addresses.as_deref())
}

pub fn is_invalid_ssh_key(key: &SshKey, config: &Config, prev: Option<&str>) -> bool {
    if invalid_or_duplicate(
        config.ssh_keys.iter().map(|k| k.name.as_str()),
        &key.name,
        prev,
    ) || empty(&key.resource_group)
    {
        return true;
    }
    if key.use_data {
        // Imported keys carry no local material to validate.
        return false;
    }
    invalid_ssh_public_key(key.public_key.as_deref())
        || config.ssh_keys.iter().any(|other| {
            Some(other.name.as_str()) != prev
                && other.public_key.is_some()
                && other.public_key == key.public_key
        })
}

pub fn is_invalid_vpc(vpc: &Vpc, config: &Config, prev: Option<&str>) -> bool {
    if invalid_or_duplicate(
        config.vpcs.iter().map(|v| v.name.as_str()),
        &vpc.name,
        prev,
    ) || empty(&vpc.resource_group)
    {
        return true;
    }
    // Overridden default component names must themselves be valid
    // identifiers.
    [
        &vpc.default_network_acl_name,
        &vpc.default_security_group_name,
        &vpc.default_routing_table_name,
    ]
    .into_iter()
    .any(|field| field.as_deref().is_some_and(invalid_name))
}

pub fn is_invalid_subnet(subnet: &Subnet, _config: &Config) -> bool {
    empty(&subnet.network_acl) || !is_ipv4_cidr_or_address(&subnet.cidr)
}

pub fn is_invalid_acl(acl: &Acl, parent: &Vpc, _config: &Config, prev: Option<&str>) -> bool {
    invalid_or_duplicate(
        parent.acls.iter().map(|a| a.name.as_str()),
        &acl.name,
        prev,
    ) || empty(&acl.resource_group)
}

pub fn is_invalid_acl_rule(
    rule: &AclRule,
    parent: &Acl,
    _config: &Config,
    prev: Option<&str>,
) -> bool {
    invalid_or_duplicate(
        parent.rules.iter().map(|r| r.name.as_str()),
        &rule.name,
        prev,
    ) || !is_ipv4_cidr_or_address(&rule.source)
        || !is_ipv4_cidr_or_address(&rule.destination)
        || invalid_port(&rule.icmp, &rule.tcp, &rule.udp, false)
}

pub fn is_invalid_security_group(
    sg: &SecurityGroup,
    config: &Config,
    prev: Option<&str>,
) -> bool {
    invalid_or_duplicate(
        config.security_groups.iter().map(|s| s.name.as_str()),
        &sg.name,
        prev,
    ) || empty(&sg.resource_group)
        || sg.vpc.is_empty()
}

pub fn is_invalid_sg_rule(
    rule: &SgRule,
    parent: &SecurityGroup,
    _config: &Config,
    prev: Option<&str>,
) -> bool {
    invalid_or_duplicate(
        parent.rules.iter().map(|r| r.name.as_str()),
        &rule.name,
        prev,
    ) || !is_ipv4_cidr_or_address(&rule.source)
        || invalid_port(&rule.icmp, &rule.tcp, &rule.udp, true)
}

pub fn is_invalid_transit_gateway(
    tgw: &TransitGateway,
    config: &Config,
    prev: Option<&str>,
) -> bool {
    invalid_or_duplicate(
        config.transit_gateways.iter().map(|t| t.name.as_str()),
        &tgw.name,
        prev,
    ) || empty(&tgw.resource_group)
        || tgw.connections.is_empty()
}

pub fn is_invalid_vpn_gateway(
    gateway: &VpnGateway,
    config: &Config,
    prev: Option<&str>,
) -> bool {
    invalid_or_duplicate(
        config.vpn_gateways.iter().map(|g| g.name.as_str()),
        &gateway.name,
        prev,
    ) || empty(&gateway.resource_group)
        || empty(&gateway.vpc)
        || empty(&gateway.subnet)
}

pub fn is_invalid_cluster(cluster: &Cluster, config: &Config, prev: Option<&str>) -> bool {
    if cluster.kube_type == "openshift"
        && (empty(&cluster.cos)
            || (cluster.subnets.len() as u32) * cluster.workers_per_subnet < 2)
    {
        return true;
    }
    invalid_or_duplicate(
        config.clusters.iter().map(|c| c.name.as_str()),
        &cluster.name,
        prev,
    ) || empty(&cluster.resource_group)
        || empty(&cluster.vpc)
        || empty(&cluster.encryption_key)
        || empty(&cluster.flavor)
        || empty(&cluster.kube_version)
        || cluster.subnets.is_empty()
}

pub fn is_invalid_worker_pool(
    pool: &WorkerPool,
    parent: &Cluster,
    _config: &Config,
    prev: Option<&str>,
) -> bool {
    invalid_or_duplicate(
        parent.worker_pools.iter().map(|p| p.name.as_str()),
        &pool.name,
        prev,
    ) || empty(&pool.flavor)
        || pool.subnets.is_empty()
}

pub fn is_invalid_vsi(vsi: &Vsi, config: &Config, prev: Option<&str>) -> bool {
    invalid_or_duplicate(config.vsi.iter().map(|v| v.name.as_str()), &vsi.name, prev)
        || empty(&vsi.resource_group)
        || vsi.vpc.is_empty()
        || vsi.image.is_empty()
        || vsi.profile.is_empty()
        || vsi.subnets.is_empty()
        || vsi.security_groups.is_empty()
        || vsi.ssh_keys.is_empty()
        || !(1..=10).contains(&vsi.vsi_per_subnet)
}

pub fn is_invalid_load_balancer(
    lb: &LoadBalancer,
    config: &Config,
    prev: Option<&str>,
) -> bool {
    invalid_or_duplicate(
        config.load_balancers.iter().map(|l| l.name.as_str()),
        &lb.name,
        prev,
    ) || empty(&lb.resource_group)
        || lb.vpc.is_empty()
        || lb.subnets.is_empty()
        || lb.security_groups.is_empty()
        || lb.target_vsi.is_empty()
        || lb.port == 0
        || lb.listener_port == 0
        || lb.health_delay <= lb.health_timeout
}

pub fn is_invalid_routing_table(
    table: &RoutingTable,
    config: &Config,
    prev: Option<&str>,
) -> bool {
    invalid_or_duplicate(
        config.routing_tables.iter().map(|t| t.name.as_str()),
        &table.name,
        prev,
    ) || table.vpc.is_empty()
}

pub fn is_invalid_route(
    route: &Route,
    parent: &RoutingTable,
    _config: &Config,
    prev: Option<&str>,
) -> bool {
    invalid_or_duplicate(
        parent.routes.iter().map(|r| r.name.as_str()),
        &route.name,
        prev,
    ) || !is_ipv4_cidr_or_address(&route.destination)
        || (route.action == "deliver"
            && route
                .next_hop
                .as_deref()
                .is_none_or(|hop| !is_ipv4_cidr_or_address(hop)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_rules() {
        assert!(!invalid_name("management"));
        assert!(!invalid_name("vsi-zone-1"));
        assert!(invalid_name("Management"));
        assert!(invalid_name("ends-with-"));
        assert!(invalid_name("@@@"));
        assert!(invalid_name(""));
    }

    #[test]
    fn duplicate_name_ignores_prev() {
        let names = ["a", "b"];
        assert!(duplicate_name(names, "a", None));
        assert!(!duplicate_name(names, "a", Some("a")));
        assert!(!duplicate_name(names, "c", None));
    }

    #[test]
    fn cidr_and_address_rules() {
        assert!(is_ipv4_cidr_or_address("10.0.0.0/8"));
        assert!(is_ipv4_cidr_or_address("161.26.0.0"));
        assert!(!is_ipv4_cidr_or_address("10.0.0.0/33"));
        assert!(!is_ipv4_cidr_or_address("300.0.0.0"));
        assert!(!is_ipv4_cidr_or_address("frog"));
    }

    #[test]
    fn ip_comma_list_rules() {
        assert!(!invalid_ip_comma_list(None));
        assert!(!invalid_ip_comma_list(Some("1.2.3.4, 5.6.7.8/32")));
        assert!(invalid_ip_comma_list(Some("1.2.3.4,frog")));
        assert!(invalid_ip_comma_list(Some("")));
    }

    #[test]
    fn port_rules_respect_protocol() {
        let none = IcmpSpec::default();
        let all_null = PortSpec::default();
        // No protocol selected: nothing to validate.
        assert!(!invalid_port(&none, &all_null, &all_null, false));
        let bad_tcp = PortSpec {
            port_min: Some(0),
            ..PortSpec::default()
        };
        assert!(invalid_port(&none, &bad_tcp, &all_null, true));
        // Source ports only count outside security groups.
        let bad_source = PortSpec {
            port_min: Some(443),
            source_port_min: Some(70000),
            ..PortSpec::default()
        };
        assert!(!invalid_port(&none, &bad_source, &all_null, true));
        assert!(invalid_port(&none, &bad_source, &all_null, false));
        let bad_icmp = IcmpSpec {
            icmp_type: Some(300),
            code: None,
        };
        assert!(invalid_port(&bad_icmp, &all_null, &all_null, false));
    }

    #[test]
    fn openshift_cluster_needs_two_workers_and_cos() {
        let config = Config::default();
        let mut cluster = config.clusters[0].clone();
        assert!(!is_invalid_cluster(&cluster, &config, Some("workload-cluster")));
        cluster.workers_per_subnet = 0;
        assert!(is_invalid_cluster(&cluster, &config, Some("workload-cluster")));
        cluster.workers_per_subnet = 2;
        cluster.cos = None;
        assert!(is_invalid_cluster(&cluster, &config, Some("workload-cluster")));
    }

    #[test]
    fn duplicate_ssh_key_material_is_rejected() {
        let config = Config::default();
        let mut key = config.ssh_keys[0].clone();
        key.name = "other-key".to_string();
        // Same material as the existing key under a new name.
        assert!(is_invalid_ssh_key(&key, &config, None));
        key.use_data = true;
        assert!(!is_invalid_ssh_key(&key, &config, None));
    }
}

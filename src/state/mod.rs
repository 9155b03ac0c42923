//! The state store.
//!
//! [`Store`] exclusively owns the configuration document and keeps it
//! internally consistent while the operator edits it through per-family
//! `create` / `save` / `delete` operations. Consistency is procedural, not
//! schematic: after **every** mutation in **any** family the store runs the
//! full update pass - a statically ordered list of per-family
//! `on_store_update` hooks that null dangling scalar references, drop
//! dangling list members, and recompute derived state (subnet tiers).
//!
//! The hook order in [`UPDATE_HOOKS`] is load bearing. It is a topological
//! order over family dependency edges - reference producers run before
//! their consumers, because a consumer's hook reads producer state healed
//! earlier in the same pass. Hooks are NOT safe to reorder.
//!
//! Rename propagation happens inside `save` operations (which know the old
//! name) before the update pass runs: renames UPDATE references, deletes
//! null or remove them. Unknown `prev` identities silently no-op so a stale
//! UI frame can never corrupt the document.

mod clusters;
mod compliance;
mod key_management;
mod load_balancers;
mod object_storage;
mod observability;
mod options;
mod resource_groups;
mod routing_tables;
mod security_groups;
mod ssh_keys;
mod transit_gateways;
mod vpcs;
mod vsi;

use crate::config::Config;
use crate::core::Family;
use std::collections::BTreeMap;

/// A derived grouping of same-purpose subnets across zones.
///
/// Recomputed on every update pass; never persisted in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubnetTier {
    /// Tier name: the explicit `tier` tag, or the subnet name prefix before
    /// its `-zone-N` suffix.
    pub name: String,
    /// Zone count for conventional tiers; `None` for advanced tiers.
    pub zones: Option<u8>,
    /// True when membership comes from explicit `tier` tags.
    pub advanced: bool,
    /// Member subnet names, populated for advanced tiers only.
    pub subnets: Vec<String>,
}

type Hook = fn(&mut Store);

/// The full update pass, in dependency order: producers before consumers.
const UPDATE_HOOKS: &[(Family, Hook)] = &[
    (Family::ResourceGroups, resource_groups::on_store_update),
    (Family::KeyManagement, key_management::on_store_update),
    (Family::ObjectStorage, object_storage::on_store_update),
    (Family::Atracker, observability::on_store_update),
    (Family::Appid, compliance::appid_on_store_update),
    (Family::SecretsManager, compliance::secrets_manager_on_store_update),
    (Family::EventStreams, compliance::event_streams_on_store_update),
    (Family::SshKeys, ssh_keys::on_store_update),
    (Family::Vpcs, vpcs::on_store_update),
    (Family::RoutingTables, routing_tables::on_store_update),
    (Family::SecurityGroups, security_groups::on_store_update),
    (Family::TransitGateways, transit_gateways::on_store_update),
    (Family::VpnGateways, vpcs::vpn_gateways_on_store_update),
    (Family::Clusters, clusters::on_store_update),
    (Family::Vsi, vsi::on_store_update),
    (Family::LoadBalancers, load_balancers::on_store_update),
];

/// The observable document manager.
pub struct Store {
    pub(crate) config: Config,
    /// Derived subnet tier summaries, keyed by VPC name.
    pub subnet_tiers: BTreeMap<String, Vec<SubnetTier>>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    /// Build a store seeded with the starter landing zone.
    pub fn new() -> Self {
        Self::from_config(Config::default())
    }

    /// Build a store around an existing document, running one update pass
    /// so imported documents are healed immediately.
    pub fn from_config(config: Config) -> Self {
        let mut store = Self {
            config,
            subnet_tiers: BTreeMap::new(),
        };
        store.update();
        store
    }

    /// Read access to the document.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Replace the whole document (project import), then heal it.
    pub fn hard_set(&mut self, config: Config) {
        self.config = config;
        self.update();
    }

    /// Run the full update pass: every family's `on_store_update` hook in
    /// declaration order, then derived state.
    pub fn update(&mut self) {
        for (family, hook) in UPDATE_HOOKS {
            tracing::trace!(family = family.as_str(), "on_store_update");
            hook(self);
        }
        self.subnet_tiers = derive_subnet_tiers(&self.config);
    }

    /// Every subnet across every VPC, in document order.
    pub fn all_subnets(&self) -> Vec<&crate::config::Subnet> {
        self.config
            .vpcs
            .iter()
            .flat_map(|vpc| vpc.subnets.iter())
            .collect()
    }

    /// Rule names of one ACL, addressed by VPC and ACL name.
    pub fn acl_rule_names(&self, vpc: &str, acl: &str) -> Vec<String> {
        self.config
            .vpc(vpc)
            .and_then(|vpc| vpc.acls.iter().find(|candidate| candidate.name == acl))
            .map(|acl| acl.rules.iter().map(|rule| rule.name.clone()).collect())
            .unwrap_or_default()
    }

    /// Rule names of one security group.
    pub fn sg_rule_names(&self, sg: &str) -> Vec<String> {
        self.config
            .security_groups
            .iter()
            .find(|candidate| candidate.name == sg)
            .map(|sg| sg.rules.iter().map(|rule| rule.name.clone()).collect())
            .unwrap_or_default()
    }
}

/// Null a scalar foreign reference whose target no longer exists.
///
/// The generic mechanism behind most cascade-on-delete behavior: if the
/// field holds a value that is not among the currently valid names, clear
/// it.
pub(crate) fn update_unfound(valid: &[String], field: &mut Option<String>) {
    if let Some(value) = field.as_deref()
        && !valid.iter().any(|name| name == value)
    {
        *field = None;
    }
}

/// Drop list members whose target no longer exists.
pub(crate) fn retain_found(valid: &[String], list: &mut Vec<String>) {
    list.retain(|value| valid.iter().any(|name| name == value));
}

/// Derive tier groupings from subnet names and explicit tier tags.
fn derive_subnet_tiers(config: &Config) -> BTreeMap<String, Vec<SubnetTier>> {
    let mut tiers = BTreeMap::new();
    for vpc in &config.vpcs {
        let mut vpc_tiers: Vec<SubnetTier> = Vec::new();
        for subnet in &vpc.subnets {
            if let Some(tag) = subnet.tier.as_deref() {
                match vpc_tiers
                    .iter_mut()
                    .find(|tier| tier.advanced && tier.name == tag)
                {
                    Some(tier) => tier.subnets.push(subnet.name.clone()),
                    None => vpc_tiers.push(SubnetTier {
                        name: tag.to_string(),
                        zones: None,
                        advanced: true,
                        subnets: vec![subnet.name.clone()],
                    }),
                }
                continue;
            }
            let name = tier_prefix(&subnet.name);
            match vpc_tiers
                .iter_mut()
                .find(|tier| !tier.advanced && tier.name == name)
            {
                Some(tier) => tier.zones = Some(tier.zones.unwrap_or(0) + 1),
                None => vpc_tiers.push(SubnetTier {
                    name,
                    zones: Some(1),
                    advanced: false,
                    subnets: Vec::new(),
                }),
            }
        }
        tiers.insert(vpc.name.clone(), vpc_tiers);
    }
    tiers
}

/// Tier name of a conventionally named subnet: the part before the
/// `-zone-N` suffix, or the whole name when the convention does not hold.
pub(crate) fn tier_prefix(subnet_name: &str) -> String {
    match subnet_name.rfind("-zone-") {
        Some(index) if subnet_name[index + 6..].chars().all(|c| c.is_ascii_digit()) => {
            subnet_name[..index].to_string()
        }
        _ => subnet_name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_store_derives_standard_tiers() {
        let store = Store::new();
        let management = &store.subnet_tiers["management"];
        assert_eq!(
            management
                .iter()
                .map(|tier| (tier.name.as_str(), tier.zones))
                .collect::<Vec<_>>(),
            [("vsi", Some(3)), ("vpe", Some(3)), ("vpn", Some(1))]
        );
        let workload = &store.subnet_tiers["workload"];
        assert_eq!(workload.len(), 2);
    }

    #[test]
    fn explicit_tier_tags_form_an_advanced_tier() {
        let mut store = Store::new();
        let mut config = store.config().clone();
        for subnet in &mut config.vpcs[0].subnets {
            if subnet.name.starts_with("vsi-zone") {
                subnet.tier = Some("frog".to_string());
            }
        }
        store.hard_set(config);
        let management = &store.subnet_tiers["management"];
        let frog = management.iter().find(|tier| tier.name == "frog").unwrap();
        assert!(frog.advanced);
        assert_eq!(frog.zones, None);
        assert_eq!(frog.subnets, ["vsi-zone-1", "vsi-zone-2", "vsi-zone-3"]);
    }

    #[test]
    fn tier_prefix_falls_back_to_whole_name() {
        assert_eq!(tier_prefix("vsi-zone-2"), "vsi");
        assert_eq!(tier_prefix("bastion"), "bastion");
        assert_eq!(tier_prefix("vsi-zone-x"), "vsi-zone-x");
    }

    #[test]
    fn update_unfound_nulls_only_missing_references() {
        let valid = vec!["a".to_string(), "b".to_string()];
        let mut present = Some("a".to_string());
        let mut missing = Some("c".to_string());
        update_unfound(&valid, &mut present);
        update_unfound(&valid, &mut missing);
        assert_eq!(present.as_deref(), Some("a"));
        assert_eq!(missing, None);
    }
}

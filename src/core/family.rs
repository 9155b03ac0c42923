//! Entity family registry.
//!
//! A [`Family`] identifies one top-level category of configuration objects
//! (VPCs, security groups, clusters, ...). The enum replaces the string
//! dispatch the UI layer used to do (`if field == "vpcs" ...`) with a single
//! registry: every family knows its JSON key and the navigation path the UI
//! uses for its form badge, and [`Family::all`] yields the fixed declaration
//! order shared by the state store's update pass and the file assembler.
//!
//! The order returned by [`Family::all`] is load bearing. It is a topological
//! order over the family dependency edges: reference producers (resource
//! groups, key management) come before their consumers (VPCs, clusters,
//! compute), because a consumer's update hook may read a producer that was
//! healed earlier in the same pass.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Enumeration of entity families in a landing zone configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Family {
    /// Global options (`_options`): region, prefix, tags, zone count.
    Options,
    /// Resource groups. Producer for nearly every other family.
    ResourceGroups,
    /// Key management instances and their encryption keys.
    KeyManagement,
    /// Object storage instances, buckets, and resource keys.
    ObjectStorage,
    /// Activity tracker (singleton).
    Atracker,
    /// LogDNA logging instance (singleton).
    Logdna,
    /// Sysdig monitoring instance (singleton).
    Sysdig,
    /// AppID identity instances and keys.
    Appid,
    /// Secrets Manager instances.
    SecretsManager,
    /// Event Streams messaging instances.
    EventStreams,
    /// Security and Compliance Center posture settings (singleton).
    Scc,
    /// IAM account settings (singleton).
    IamAccountSettings,
    /// SSH keys for compute access.
    SshKeys,
    /// VPC networks with subnets, ACLs, prefixes, and gateways.
    Vpcs,
    /// VPC routing tables and routes.
    RoutingTables,
    /// Security groups and their rules.
    SecurityGroups,
    /// Transit gateways and their connections.
    TransitGateways,
    /// VPN gateways.
    VpnGateways,
    /// Container clusters and worker pools.
    Clusters,
    /// Virtual server deployments.
    Vsi,
    /// Load balancers over virtual server deployments.
    LoadBalancers,
}

impl Family {
    /// All families in hook declaration order (producers before consumers).
    pub const fn all() -> &'static [Family] {
        use Family::*;
        &[
            Options,
            ResourceGroups,
            KeyManagement,
            ObjectStorage,
            Atracker,
            Logdna,
            Sysdig,
            Appid,
            SecretsManager,
            EventStreams,
            Scc,
            IamAccountSettings,
            SshKeys,
            Vpcs,
            RoutingTables,
            SecurityGroups,
            TransitGateways,
            VpnGateways,
            Clusters,
            Vsi,
            LoadBalancers,
        ]
    }

    /// The JSON key of this family within the configuration document.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Family::Options => "_options",
            Family::ResourceGroups => "resource_groups",
            Family::KeyManagement => "key_management",
            Family::ObjectStorage => "object_storage",
            Family::Atracker => "atracker",
            Family::Logdna => "logdna",
            Family::Sysdig => "sysdig",
            Family::Appid => "appid",
            Family::SecretsManager => "secrets_manager",
            Family::EventStreams => "event_streams",
            Family::Scc => "scc",
            Family::IamAccountSettings => "iam_account_settings",
            Family::SshKeys => "ssh_keys",
            Family::Vpcs => "vpcs",
            Family::RoutingTables => "routing_tables",
            Family::SecurityGroups => "security_groups",
            Family::TransitGateways => "transit_gateways",
            Family::VpnGateways => "vpn_gateways",
            Family::Clusters => "clusters",
            Family::Vsi => "vsi",
            Family::LoadBalancers => "load_balancers",
        }
    }

    /// Navigation identifier used for the UI's invalid-form badge list.
    ///
    /// Most families badge under their own JSON key; singletons that share
    /// the observability panel badge under a form path instead.
    pub const fn form_id(&self) -> &'static str {
        match self {
            Family::Atracker | Family::Logdna | Family::Sysdig => "/form/observability",
            other => other.as_str(),
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Family {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Family::all()
            .iter()
            .find(|family| family.as_str() == s)
            .copied()
            .ok_or_else(|| format!("unknown entity family '{s}'"))
    }
}

//! The configuration document.
//!
//! [`Config`] is the root entity: a strongly typed mapping from entity
//! family to either a list of instances or a singleton configuration object,
//! plus the reserved [`GlobalOptions`] under `_options`. Every family key is
//! always present in the serialized form - an empty family serializes as an
//! empty list, never as a missing key - because the resource compilers assume
//! presence.
//!
//! The document is created once per session: from [`Config::default`] (the
//! seeded two-VPC starter landing zone), from a persisted blob, or from an
//! imported file via [`Config::from_json`]. It is owned exclusively by the
//! state store ([`crate::state::Store`]); compilers and validators receive
//! `&Config`.

mod compute;
mod defaults;
mod network;
mod options;
mod services;

pub use compute::{Cluster, LoadBalancer, NetworkInterface, Vsi, VsiVolume, WorkerPool};
pub use network::{
    Acl, AclRule, AddressPrefix, IcmpSpec, PortSpec, PublicGateway, Route, RoutingTable,
    SecurityGroup, SgRule, Subnet, TgwConnection, TransitGateway, Vpc, VpnGateway,
};
pub use options::GlobalOptions;
pub use services::{
    AppId, AppIdKey, Atracker, CosBucket, CosKey, EventStreams, IamAccountSettings,
    KeyManagement, KmsKey, Logdna, ObjectStorage, ResourceGroup, Scc, SecretsManager, SmSecret,
    SshKey, Sysdig,
};

use crate::core::ForgeError;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// The full in-memory configuration document for one landing zone.
///
/// Field order here is serialization order, which keeps the raw-document
/// output file byte-stable across runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Global options under the reserved `_options` key.
    #[serde(rename = "_options")]
    pub options: GlobalOptions,
    #[serde(default)]
    pub resource_groups: Vec<ResourceGroup>,
    #[serde(default)]
    pub key_management: Vec<KeyManagement>,
    #[serde(default)]
    pub object_storage: Vec<ObjectStorage>,
    #[serde(default)]
    pub atracker: Atracker,
    #[serde(default)]
    pub logdna: Logdna,
    #[serde(default)]
    pub sysdig: Sysdig,
    #[serde(default)]
    pub appid: Vec<AppId>,
    #[serde(default)]
    pub secrets_manager: Vec<SecretsManager>,
    #[serde(default)]
    pub event_streams: Vec<EventStreams>,
    #[serde(default)]
    pub scc: Scc,
    #[serde(default)]
    pub iam_account_settings: IamAccountSettings,
    #[serde(default)]
    pub ssh_keys: Vec<SshKey>,
    #[serde(default)]
    pub vpcs: Vec<Vpc>,
    #[serde(default)]
    pub routing_tables: Vec<RoutingTable>,
    #[serde(default)]
    pub security_groups: Vec<SecurityGroup>,
    #[serde(default)]
    pub transit_gateways: Vec<TransitGateway>,
    #[serde(default)]
    pub vpn_gateways: Vec<VpnGateway>,
    #[serde(default)]
    pub clusters: Vec<Cluster>,
    #[serde(default)]
    pub vsi: Vec<Vsi>,
    #[serde(default)]
    pub load_balancers: Vec<LoadBalancer>,
}

impl Default for Config {
    fn default() -> Self {
        defaults::starter_landing_zone()
    }
}

impl Config {
    /// An entirely empty document (every family present but empty).
    ///
    /// Used by imports and tests; [`Config::default`] seeds the starter
    /// landing zone instead.
    pub fn empty() -> Self {
        Self {
            options: GlobalOptions::default(),
            resource_groups: Vec::new(),
            key_management: Vec::new(),
            object_storage: Vec::new(),
            atracker: Atracker::default(),
            logdna: Logdna::default(),
            sysdig: Sysdig::default(),
            appid: Vec::new(),
            secrets_manager: Vec::new(),
            event_streams: Vec::new(),
            scc: Scc::default(),
            iam_account_settings: IamAccountSettings::default(),
            ssh_keys: Vec::new(),
            vpcs: Vec::new(),
            routing_tables: Vec::new(),
            security_groups: Vec::new(),
            transit_gateways: Vec::new(),
            vpn_gateways: Vec::new(),
            clusters: Vec::new(),
            vsi: Vec::new(),
            load_balancers: Vec::new(),
        }
    }

    /// Parse a document from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| {
            ForgeError::ConfigParseError {
                reason: e.to_string(),
            }
            .into()
        })
    }

    /// Load a document from a JSON file on disk.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ForgeError::ConfigNotFound {
                path: path.display().to_string(),
            }
            .into());
        }
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Serialize the document as pretty-printed JSON.
    ///
    /// Struct field order is fixed, so the output is byte-stable for a given
    /// document.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    // Lookup helpers used by compilers and the state store. All return
    // `None` rather than panicking: a dangling reference is healed by the
    // next update pass, not treated as an error here.

    /// Find a resource group by name.
    pub fn resource_group(&self, name: &str) -> Option<&ResourceGroup> {
        self.resource_groups.iter().find(|rg| rg.name == name)
    }

    /// Find a key management instance by name.
    pub fn key_management_instance(&self, name: &str) -> Option<&KeyManagement> {
        self.key_management.iter().find(|kms| kms.name == name)
    }

    /// Find an object storage instance by name.
    pub fn object_storage_instance(&self, name: &str) -> Option<&ObjectStorage> {
        self.object_storage.iter().find(|cos| cos.name == name)
    }

    /// Find a VPC by name.
    pub fn vpc(&self, name: &str) -> Option<&Vpc> {
        self.vpcs.iter().find(|vpc| vpc.name == name)
    }

    /// Find an SSH key by name.
    pub fn ssh_key(&self, name: &str) -> Option<&SshKey> {
        self.ssh_keys.iter().find(|key| key.name == name)
    }

    /// Find a virtual server deployment by name.
    pub fn vsi_deployment(&self, name: &str) -> Option<&Vsi> {
        self.vsi.iter().find(|vsi| vsi.name == name)
    }

    /// Names of all resource groups.
    pub fn resource_group_names(&self) -> Vec<String> {
        self.resource_groups.iter().map(|rg| rg.name.clone()).collect()
    }

    /// Names of all VPCs.
    pub fn vpc_names(&self) -> Vec<String> {
        self.vpcs.iter().map(|vpc| vpc.name.clone()).collect()
    }

    /// Names of all subnets across VPCs, optionally limited to one VPC.
    pub fn subnet_names(&self, vpc: Option<&str>) -> Vec<String> {
        self.vpcs
            .iter()
            .filter(|candidate| vpc.is_none_or(|name| candidate.name == name))
            .flat_map(|vpc| vpc.subnets.iter().map(|subnet| subnet.name.clone()))
            .collect()
    }

    /// Names of security groups, optionally limited to one VPC.
    pub fn security_group_names(&self, vpc: Option<&str>) -> Vec<String> {
        self.security_groups
            .iter()
            .filter(|sg| vpc.is_none_or(|name| sg.vpc == name))
            .map(|sg| sg.name.clone())
            .collect()
    }
}

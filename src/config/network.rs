//! Network entity families: VPCs (with subnets, ACLs, address prefixes,
//! public gateways), routing tables, security groups, transit gateways, and
//! VPN gateways.

use serde::{Deserialize, Serialize};

/// A VPC network. Sub-entities (subnets, ACLs, prefixes, gateways) are
/// scoped to their parent: a subnet name must be unique within its VPC, not
/// globally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vpc {
    pub name: String,
    /// Foreign reference to a resource group.
    #[serde(default)]
    pub resource_group: Option<String>,
    #[serde(default)]
    pub classic_access: bool,
    /// Emit `address_prefix_management = "manual"` and explicit prefixes.
    #[serde(default)]
    pub manual_address_prefix_management: bool,
    #[serde(default)]
    pub default_network_acl_name: Option<String>,
    #[serde(default)]
    pub default_security_group_name: Option<String>,
    #[serde(default)]
    pub default_routing_table_name: Option<String>,
    /// Foreign reference to an object storage instance for flow logs.
    #[serde(default)]
    pub cos: Option<String>,
    /// Foreign reference to a bucket of `cos` receiving flow logs.
    #[serde(default)]
    pub bucket: Option<String>,
    #[serde(default)]
    pub address_prefixes: Vec<AddressPrefix>,
    #[serde(default)]
    pub subnets: Vec<Subnet>,
    #[serde(default)]
    pub public_gateways: Vec<PublicGateway>,
    #[serde(default)]
    pub acls: Vec<Acl>,
}

/// An address prefix within a VPC.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressPrefix {
    /// Prefix name, unique within the parent VPC.
    pub name: String,
    /// Parent VPC name.
    pub vpc: String,
    pub zone: u8,
    pub cidr: String,
}

/// A subnet within a VPC. Subnet names conventionally end in a zone digit
/// (`vsi-zone-1`); the compilers' zone extraction depends on that suffix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subnet {
    /// Subnet name, unique within the parent VPC.
    pub name: String,
    /// Parent VPC name.
    pub vpc: String,
    pub zone: u8,
    pub cidr: String,
    /// Foreign reference to an ACL of the parent VPC.
    #[serde(default)]
    pub network_acl: Option<String>,
    /// Foreign reference to a resource group.
    #[serde(default)]
    pub resource_group: Option<String>,
    /// Attach the zone's public gateway.
    #[serde(default)]
    pub public_gateway: bool,
    /// CIDR is backed by a managed address prefix of the same name.
    #[serde(default)]
    pub has_prefix: bool,
    /// Explicit tier tag; when absent the tier is derived from the name
    /// prefix before `-zone-N`.
    #[serde(default)]
    pub tier: Option<String>,
}

/// A zone-scoped public gateway within a VPC.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicGateway {
    /// Parent VPC name.
    pub vpc: String,
    pub zone: u8,
    #[serde(default)]
    pub resource_group: Option<String>,
    /// Override the generated `gateway-zone-N` name.
    #[serde(default)]
    pub override_name: Option<String>,
}

/// A network ACL within a VPC.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Acl {
    /// ACL name, unique within the parent VPC.
    pub name: String,
    /// Parent VPC name.
    pub vpc: String,
    #[serde(default)]
    pub resource_group: Option<String>,
    #[serde(default)]
    pub rules: Vec<AclRule>,
}

/// A rule within a network ACL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AclRule {
    /// Rule name, unique within the parent ACL.
    pub name: String,
    /// Parent ACL name.
    pub acl: String,
    /// Grandparent VPC name.
    pub vpc: String,
    /// `allow` or `deny`.
    pub action: String,
    /// `inbound` or `outbound`.
    pub direction: String,
    pub source: String,
    pub destination: String,
    #[serde(default)]
    pub icmp: IcmpSpec,
    #[serde(default)]
    pub tcp: PortSpec,
    #[serde(default)]
    pub udp: PortSpec,
}

/// ICMP type/code pair; all-null means the protocol is not selected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct IcmpSpec {
    #[serde(rename = "type", default)]
    pub icmp_type: Option<i64>,
    #[serde(default)]
    pub code: Option<i64>,
}

/// TCP/UDP port bounds; all-null means the protocol is not selected.
/// Source ports apply to ACL rules only, never to security group rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PortSpec {
    #[serde(default)]
    pub port_min: Option<i64>,
    #[serde(default)]
    pub port_max: Option<i64>,
    #[serde(default)]
    pub source_port_min: Option<i64>,
    #[serde(default)]
    pub source_port_max: Option<i64>,
}

impl IcmpSpec {
    /// True when any ICMP field is set.
    pub fn is_set(&self) -> bool {
        self.icmp_type.is_some() || self.code.is_some()
    }
}

impl PortSpec {
    /// True when any port bound is set.
    pub fn is_set(&self) -> bool {
        self.port_min.is_some()
            || self.port_max.is_some()
            || self.source_port_min.is_some()
            || self.source_port_max.is_some()
    }
}

/// A routing table attached to a VPC.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingTable {
    /// Table name, unique across routing tables.
    pub name: String,
    /// Foreign reference to a VPC.
    pub vpc: String,
    #[serde(default)]
    pub route_direct_link_ingress: bool,
    #[serde(default)]
    pub transit_gateway_ingress: bool,
    #[serde(default)]
    pub route_vpc_zone_ingress: bool,
    #[serde(default)]
    pub routes: Vec<Route>,
}

/// A route within a routing table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// Route name, unique within the parent table.
    pub name: String,
    /// Parent table name.
    pub routing_table: String,
    /// Parent table's VPC.
    pub vpc: String,
    pub zone: u8,
    pub destination: String,
    /// `delegate`, `deliver`, or `drop`.
    pub action: String,
    /// Next hop address, required when `action` is `deliver`.
    #[serde(default)]
    pub next_hop: Option<String>,
}

/// A security group. Scoped to a VPC; compiled into that VPC's module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityGroup {
    pub name: String,
    /// Foreign reference to a VPC.
    pub vpc: String,
    #[serde(default)]
    pub resource_group: Option<String>,
    #[serde(default)]
    pub rules: Vec<SgRule>,
}

/// A rule within a security group. Direction determines whether `source`
/// is a remote source or destination; security group rules have no source
/// ports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SgRule {
    /// Rule name, unique within the parent group.
    pub name: String,
    /// Parent security group name.
    pub sg: String,
    /// Grandparent VPC name.
    pub vpc: String,
    /// `inbound` or `outbound`.
    pub direction: String,
    pub source: String,
    #[serde(default)]
    pub icmp: IcmpSpec,
    #[serde(default)]
    pub tcp: PortSpec,
    #[serde(default)]
    pub udp: PortSpec,
}

/// A transit gateway interconnecting VPCs and external networks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitGateway {
    pub name: String,
    #[serde(default)]
    pub resource_group: Option<String>,
    /// Route beyond the local region.
    #[serde(default)]
    pub global: bool,
    #[serde(default)]
    pub connections: Vec<TgwConnection>,
    /// External network CRNs; the save hook mirrors these into `crn`
    /// connections.
    #[serde(default)]
    pub crns: Option<Vec<String>>,
}

/// A transit gateway connection: exactly one of `vpc` or `crn` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TgwConnection {
    /// Parent gateway name.
    pub tgw: String,
    /// Foreign reference to a VPC.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vpc: Option<String>,
    /// External network CRN; never healed by the update pass.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crn: Option<String>,
}

/// A VPN gateway placed on one subnet of a VPC.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VpnGateway {
    pub name: String,
    /// Foreign reference to a VPC.
    #[serde(default)]
    pub vpc: Option<String>,
    /// Foreign reference to a subnet of `vpc`.
    #[serde(default)]
    pub subnet: Option<String>,
    #[serde(default)]
    pub resource_group: Option<String>,
    /// `route` or `policy`.
    #[serde(default)]
    pub policy_mode: bool,
}

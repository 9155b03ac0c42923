//! VPC operations: the VPC itself, subnets, subnet tiers, ACLs, ACL rules,
//! and the VPN gateway healing hook.
//!
//! A VPC rename is the widest cascade in the system: subnets, ACLs,
//! prefixes, gateways, security groups, transit gateway connections, VPN
//! gateways, clusters, deployments, load balancers, and routing tables all
//! hold `vpc` references that must follow the new name.

use super::{Store, tier_prefix, update_unfound};
use crate::config::{Acl, AclRule, AddressPrefix, Config, Subnet, Vpc};

pub(super) fn on_store_update(store: &mut Store) {
    let groups = store.config.resource_group_names();
    for vpc in &mut store.config.vpcs {
        update_unfound(&groups, &mut vpc.resource_group);
        let acl_names: Vec<String> = vpc.acls.iter().map(|acl| acl.name.clone()).collect();
        for subnet in &mut vpc.subnets {
            subnet.vpc = vpc.name.clone();
            update_unfound(&groups, &mut subnet.resource_group);
            update_unfound(&acl_names, &mut subnet.network_acl);
        }
        for acl in &mut vpc.acls {
            acl.vpc = vpc.name.clone();
            update_unfound(&groups, &mut acl.resource_group);
            for rule in &mut acl.rules {
                rule.vpc = vpc.name.clone();
                rule.acl = acl.name.clone();
            }
        }
        for prefix in &mut vpc.address_prefixes {
            prefix.vpc = vpc.name.clone();
        }
        for pgw in &mut vpc.public_gateways {
            pgw.vpc = vpc.name.clone();
            update_unfound(&groups, &mut pgw.resource_group);
        }
    }
    // Flow log targets live on the VPC; heal them against object storage.
    let cos_names: Vec<String> = store
        .config
        .object_storage
        .iter()
        .map(|cos| cos.name.clone())
        .collect();
    for vpc in &mut store.config.vpcs {
        update_unfound(&cos_names, &mut vpc.cos);
    }
    let vpc_buckets: Vec<(Option<String>, Vec<String>)> = store
        .config
        .vpcs
        .iter()
        .map(|vpc| {
            (
                vpc.cos.clone(),
                super::object_storage::bucket_names(&store.config, vpc.cos.as_deref()),
            )
        })
        .collect();
    for (vpc, (_, buckets)) in store.config.vpcs.iter_mut().zip(vpc_buckets) {
        update_unfound(&buckets, &mut vpc.bucket);
    }
}

pub(super) fn vpn_gateways_on_store_update(store: &mut Store) {
    let groups = store.config.resource_group_names();
    let vpcs = store.config.vpc_names();
    let subnets_by_vpc: Vec<(String, Vec<String>)> = store
        .config
        .vpcs
        .iter()
        .map(|vpc| (vpc.name.clone(), vpc.subnets.iter().map(|s| s.name.clone()).collect()))
        .collect();
    for gateway in &mut store.config.vpn_gateways {
        update_unfound(&groups, &mut gateway.resource_group);
        update_unfound(&vpcs, &mut gateway.vpc);
        match gateway.vpc.as_deref() {
            Some(vpc) => {
                let subnets = subnets_by_vpc
                    .iter()
                    .find(|(name, _)| name == vpc)
                    .map(|(_, subnets)| subnets.clone())
                    .unwrap_or_default();
                update_unfound(&subnets, &mut gateway.subnet);
            }
            None => gateway.subnet = None,
        }
    }
}

/// Rewrite every `vpc` reference from `old` to `new`.
fn rename_vpc_refs(config: &mut Config, old: &str, new: &str) {
    for sg in &mut config.security_groups {
        if sg.vpc == old {
            sg.vpc = new.to_string();
            for rule in &mut sg.rules {
                rule.vpc = new.to_string();
            }
        }
    }
    for tgw in &mut config.transit_gateways {
        for connection in &mut tgw.connections {
            if connection.vpc.as_deref() == Some(old) {
                connection.vpc = Some(new.to_string());
            }
        }
    }
    for gateway in &mut config.vpn_gateways {
        if gateway.vpc.as_deref() == Some(old) {
            gateway.vpc = Some(new.to_string());
        }
    }
    for cluster in &mut config.clusters {
        if cluster.vpc.as_deref() == Some(old) {
            cluster.vpc = Some(new.to_string());
        }
        for pool in &mut cluster.worker_pools {
            if pool.vpc.as_deref() == Some(old) {
                pool.vpc = Some(new.to_string());
            }
        }
    }
    for vsi in &mut config.vsi {
        if vsi.vpc == old {
            vsi.vpc = new.to_string();
        }
    }
    for lb in &mut config.load_balancers {
        if lb.vpc == old {
            lb.vpc = new.to_string();
        }
    }
    for table in &mut config.routing_tables {
        if table.vpc == old {
            table.vpc = new.to_string();
            for route in &mut table.routes {
                route.vpc = new.to_string();
            }
        }
    }
}

/// Rewrite subnet references held by consumers outside the VPC.
fn rename_subnet_refs(config: &mut Config, vpc: &str, old: &str, new: &str) {
    for cluster in config
        .clusters
        .iter_mut()
        .filter(|cluster| cluster.vpc.as_deref() == Some(vpc))
    {
        for subnet in &mut cluster.subnets {
            if subnet == old {
                *subnet = new.to_string();
            }
        }
        for pool in &mut cluster.worker_pools {
            for subnet in &mut pool.subnets {
                if subnet == old {
                    *subnet = new.to_string();
                }
            }
        }
    }
    for vsi in config.vsi.iter_mut().filter(|vsi| vsi.vpc == vpc) {
        for subnet in &mut vsi.subnets {
            if subnet == old {
                *subnet = new.to_string();
            }
        }
        for nic in &mut vsi.network_interfaces {
            if nic.subnet == old {
                nic.subnet = new.to_string();
            }
        }
    }
    for lb in config.load_balancers.iter_mut().filter(|lb| lb.vpc == vpc) {
        for subnet in &mut lb.subnets {
            if subnet == old {
                *subnet = new.to_string();
            }
        }
    }
    for gateway in config
        .vpn_gateways
        .iter_mut()
        .filter(|gateway| gateway.vpc.as_deref() == Some(vpc))
    {
        if gateway.subnet.as_deref() == Some(old) {
            gateway.subnet = Some(new.to_string());
        }
    }
}

impl Store {
    /// Append a new VPC.
    pub fn vpc_create(&mut self, vpc: Vpc) {
        self.config.vpcs.push(vpc);
        self.update();
    }

    /// Save a VPC, propagating a rename across every referencing family.
    pub fn vpc_save(&mut self, prev: &str, mut vpc: Vpc) {
        let Some(index) = self
            .config
            .vpcs
            .iter()
            .position(|candidate| candidate.name == prev)
        else {
            return;
        };
        if vpc.name != prev {
            rename_vpc_refs(&mut self.config, prev, &vpc.name);
        }
        // Child entities are re-parented by the update pass, but carry the
        // new name immediately so compilation between passes stays sane.
        let name = vpc.name.clone();
        for subnet in &mut vpc.subnets {
            subnet.vpc = name.clone();
        }
        self.config.vpcs[index] = vpc;
        self.update();
    }

    /// Delete a VPC. Transit gateway connections drop, scalar references
    /// null, routing tables disappear with it - each by its own family's
    /// policy on the update pass.
    pub fn vpc_delete(&mut self, name: &str) {
        self.config.vpcs.retain(|candidate| candidate.name != name);
        self.update();
    }

    /// Append a subnet to a VPC, creating the matching address prefix when
    /// the subnet manages one.
    pub fn subnet_create(&mut self, vpc_name: &str, subnet: Subnet) {
        if let Some(vpc) = self
            .config
            .vpcs
            .iter_mut()
            .find(|candidate| candidate.name == vpc_name)
        {
            if subnet.has_prefix {
                vpc.address_prefixes.push(AddressPrefix {
                    name: subnet.name.clone(),
                    vpc: vpc_name.to_string(),
                    zone: subnet.zone,
                    cidr: subnet.cidr.clone(),
                });
            }
            vpc.subnets.push(subnet);
        }
        self.update();
    }

    /// Save a subnet, keeping its address prefix in sync and renaming
    /// references held by deployments, clusters, and gateways.
    pub fn subnet_save(&mut self, vpc_name: &str, prev: &str, subnet: Subnet) {
        let Some(vpc) = self
            .config
            .vpcs
            .iter_mut()
            .find(|candidate| candidate.name == vpc_name)
        else {
            return;
        };
        let Some(index) = vpc
            .subnets
            .iter()
            .position(|candidate| candidate.name == prev)
        else {
            return;
        };
        if let Some(prefix) = vpc
            .address_prefixes
            .iter_mut()
            .find(|prefix| prefix.name == prev)
        {
            prefix.name = subnet.name.clone();
            prefix.zone = subnet.zone;
            prefix.cidr = subnet.cidr.clone();
        } else if subnet.has_prefix {
            vpc.address_prefixes.push(AddressPrefix {
                name: subnet.name.clone(),
                vpc: vpc_name.to_string(),
                zone: subnet.zone,
                cidr: subnet.cidr.clone(),
            });
        }
        let renamed = subnet.name != prev;
        let new_name = subnet.name.clone();
        vpc.subnets[index] = subnet;
        if renamed {
            rename_subnet_refs(&mut self.config, vpc_name, prev, &new_name);
        }
        self.update();
    }

    /// Delete a subnet and its managed prefix; consumers drop it from
    /// their lists on the update pass.
    pub fn subnet_delete(&mut self, vpc_name: &str, name: &str) {
        if let Some(vpc) = self
            .config
            .vpcs
            .iter_mut()
            .find(|candidate| candidate.name == vpc_name)
        {
            vpc.subnets.retain(|candidate| candidate.name != name);
            vpc.address_prefixes.retain(|prefix| prefix.name != name);
        }
        self.update();
    }

    /// Create a subnet tier: one subnet per requested zone, named
    /// `<tier>-zone-<n>`, attached to the given ACL.
    pub fn subnet_tier_create(
        &mut self,
        vpc_name: &str,
        tier: &str,
        zones: u8,
        network_acl: Option<&str>,
    ) {
        let zones = zones.clamp(1, self.config.options.zones.max(1));
        let Some(vpc) = self
            .config
            .vpcs
            .iter_mut()
            .find(|candidate| candidate.name == vpc_name)
        else {
            return;
        };
        let tier_count = self
            .subnet_tiers
            .get(vpc_name)
            .map(|tiers| tiers.len())
            .unwrap_or_default();
        let resource_group = vpc.resource_group.clone();
        for zone in 1..=zones {
            vpc.subnets.push(Subnet {
                name: format!("{tier}-zone-{zone}"),
                vpc: vpc_name.to_string(),
                zone,
                // A fresh /29 carved per tier and zone; operators can edit
                // the CIDR afterwards.
                cidr: format!("10.{}0.{}0.0/29", zone, tier_count + 1),
                network_acl: network_acl.map(str::to_string),
                resource_group: resource_group.clone(),
                public_gateway: false,
                has_prefix: false,
                tier: None,
            });
        }
        self.update();
    }

    /// Rename a subnet tier and/or change its zone count. Member subnets
    /// are renamed (references follow), created, or removed as needed.
    pub fn subnet_tier_save(&mut self, vpc_name: &str, prev: &str, tier: &str, zones: u8) {
        let zones = zones.clamp(1, 3);
        let members: Vec<String> = match self.config.vpc(vpc_name) {
            Some(vpc) => vpc
                .subnets
                .iter()
                .filter(|subnet| tier_prefix(&subnet.name) == prev && subnet.tier.is_none())
                .map(|subnet| subnet.name.clone())
                .collect(),
            None => return,
        };
        if members.is_empty() {
            return;
        }
        if tier != prev {
            for member in &members {
                let renamed = format!("{tier}{}", &member[prev.len()..]);
                let subnet = {
                    let vpc = self
                        .config
                        .vpcs
                        .iter_mut()
                        .find(|candidate| candidate.name == vpc_name)
                        .expect("vpc existed above");
                    let Some(subnet) = vpc
                        .subnets
                        .iter_mut()
                        .find(|subnet| &subnet.name == member)
                    else {
                        continue;
                    };
                    subnet.name = renamed.clone();
                    if let Some(prefix) = vpc
                        .address_prefixes
                        .iter_mut()
                        .find(|prefix| &prefix.name == member)
                    {
                        prefix.name = renamed.clone();
                    }
                    renamed
                };
                rename_subnet_refs(&mut self.config, vpc_name, member, &subnet);
            }
        }
        // Grow or shrink to the requested zone count.
        let vpc = self
            .config
            .vpcs
            .iter_mut()
            .find(|candidate| candidate.name == vpc_name)
            .expect("vpc existed above");
        let current: Vec<String> = vpc
            .subnets
            .iter()
            .filter(|subnet| tier_prefix(&subnet.name) == tier && subnet.tier.is_none())
            .map(|subnet| subnet.name.clone())
            .collect();
        let resource_group = vpc.resource_group.clone();
        let acl = vpc
            .subnets
            .iter()
            .find(|subnet| tier_prefix(&subnet.name) == tier)
            .and_then(|subnet| subnet.network_acl.clone());
        for zone in 1..=zones {
            let name = format!("{tier}-zone-{zone}");
            if !current.contains(&name) {
                vpc.subnets.push(Subnet {
                    name,
                    vpc: vpc_name.to_string(),
                    zone,
                    cidr: format!("10.{zone}0.0.0/29"),
                    network_acl: acl.clone(),
                    resource_group: resource_group.clone(),
                    public_gateway: false,
                    has_prefix: false,
                    tier: None,
                });
            }
        }
        vpc.subnets.retain(|subnet| {
            tier_prefix(&subnet.name) != tier || subnet.tier.is_some() || subnet.zone <= zones
        });
        self.update();
    }

    /// Delete every subnet of a tier.
    pub fn subnet_tier_delete(&mut self, vpc_name: &str, tier: &str) {
        if let Some(vpc) = self
            .config
            .vpcs
            .iter_mut()
            .find(|candidate| candidate.name == vpc_name)
        {
            vpc.subnets
                .retain(|subnet| tier_prefix(&subnet.name) != tier || subnet.tier.is_some());
            vpc.address_prefixes
                .retain(|prefix| tier_prefix(&prefix.name) != tier);
        }
        self.update();
    }

    /// Append an ACL to a VPC.
    pub fn acl_create(&mut self, vpc_name: &str, acl: Acl) {
        if let Some(vpc) = self
            .config
            .vpcs
            .iter_mut()
            .find(|candidate| candidate.name == vpc_name)
        {
            vpc.acls.push(acl);
        }
        self.update();
    }

    /// Save an ACL, propagating a rename into subnet attachments.
    pub fn acl_save(&mut self, vpc_name: &str, prev: &str, acl: Acl) {
        let Some(vpc) = self
            .config
            .vpcs
            .iter_mut()
            .find(|candidate| candidate.name == vpc_name)
        else {
            return;
        };
        let Some(index) = vpc.acls.iter().position(|candidate| candidate.name == prev) else {
            return;
        };
        if acl.name != prev {
            for subnet in &mut vpc.subnets {
                if subnet.network_acl.as_deref() == Some(prev) {
                    subnet.network_acl = Some(acl.name.clone());
                }
            }
        }
        vpc.acls[index] = acl;
        self.update();
    }

    /// Delete an ACL; subnet attachments null out on the update pass.
    pub fn acl_delete(&mut self, vpc_name: &str, name: &str) {
        if let Some(vpc) = self
            .config
            .vpcs
            .iter_mut()
            .find(|candidate| candidate.name == vpc_name)
        {
            vpc.acls.retain(|candidate| candidate.name != name);
        }
        self.update();
    }

    /// Append a rule to an ACL.
    pub fn acl_rule_create(&mut self, vpc_name: &str, acl_name: &str, rule: AclRule) {
        if let Some(vpc) = self
            .config
            .vpcs
            .iter_mut()
            .find(|candidate| candidate.name == vpc_name)
            && let Some(acl) = vpc.acls.iter_mut().find(|candidate| candidate.name == acl_name)
        {
            acl.rules.push(rule);
        }
        self.update();
    }

    /// Save a rule of an ACL.
    pub fn acl_rule_save(&mut self, vpc_name: &str, acl_name: &str, prev: &str, rule: AclRule) {
        if let Some(vpc) = self
            .config
            .vpcs
            .iter_mut()
            .find(|candidate| candidate.name == vpc_name)
            && let Some(acl) = vpc.acls.iter_mut().find(|candidate| candidate.name == acl_name)
            && let Some(index) = acl.rules.iter().position(|candidate| candidate.name == prev)
        {
            acl.rules[index] = rule;
            self.update();
        }
    }

    /// Delete a rule of an ACL.
    pub fn acl_rule_delete(&mut self, vpc_name: &str, acl_name: &str, name: &str) {
        if let Some(vpc) = self
            .config
            .vpcs
            .iter_mut()
            .find(|candidate| candidate.name == vpc_name)
            && let Some(acl) = vpc.acls.iter_mut().find(|candidate| candidate.name == acl_name)
        {
            acl.rules.retain(|candidate| candidate.name != name);
        }
        self.update();
    }

    /// Append a VPN gateway.
    pub fn vpn_gateway_create(&mut self, gateway: crate::config::VpnGateway) {
        self.config.vpn_gateways.push(gateway);
        self.update();
    }

    /// Save a VPN gateway.
    pub fn vpn_gateway_save(&mut self, prev: &str, gateway: crate::config::VpnGateway) {
        if let Some(index) = self
            .config
            .vpn_gateways
            .iter()
            .position(|candidate| candidate.name == prev)
        {
            self.config.vpn_gateways[index] = gateway;
            self.update();
        }
    }

    /// Delete a VPN gateway.
    pub fn vpn_gateway_delete(&mut self, name: &str) {
        self.config
            .vpn_gateways
            .retain(|candidate| candidate.name != name);
        self.update();
    }
}

//! Virtual server compiler.
//!
//! A deployment with `vsi_per_subnet = n` expands into one instance per
//! (subnet x replica) pair. Symbolic identifiers always carry the zone and
//! the 1-based replica index; the provisioned instance name omits the index
//! suffix when the deployment has a single replica per subnet.

use crate::config::{Config, Vsi};
use crate::tf::block::{Attrs, TfValue, data, resource};
use crate::tf::util::{
    az_sort, composed_zone, encryption_key_ref, rg_id_ref, snake_case, tf_block, tf_done,
    tf_ref, vpc_module_ref, vpc_output_ref, zone_digit,
};

/// One expanded replica of a deployment.
#[derive(Debug, Clone, PartialEq)]
pub struct VsiInstance {
    /// Subnet the replica lands on.
    pub subnet: String,
    /// Zone digit extracted from the subnet name.
    pub zone: String,
    /// 1-based replica index within the subnet.
    pub index: u32,
}

impl VsiInstance {
    /// Symbolic identifier: `<vpc>_vpc_<name>_vsi_<zone>_<index>`.
    pub fn symbol(&self, vsi: &Vsi) -> String {
        snake_case(&format!(
            "{} vpc {} vsi {} {}",
            vsi.vpc, vsi.name, self.zone, self.index
        ))
    }

    /// Provisioned name: index 1 of a single-replica deployment drops the
    /// numeric suffix, identifiers never do.
    pub fn visible_name(&self, vsi: &Vsi) -> String {
        let base = format!(
            "${{var.prefix}}-{}-{}-vsi-zone-{}",
            crate::tf::util::kebab_case(&vsi.vpc),
            crate::tf::util::kebab_case(&vsi.name),
            self.zone
        );
        if vsi.vsi_per_subnet == 1 {
            base
        } else {
            format!("{base}-{}", self.index)
        }
    }
}

/// Expand a deployment into its (subnet x replica) instances, subnets
/// ordered by zone so output is independent of input order.
pub fn expand_deployment(vsi: &Vsi) -> Vec<VsiInstance> {
    let mut subnets = vsi.subnets.clone();
    az_sort(&mut subnets);
    let mut instances = Vec::new();
    for subnet in &subnets {
        for index in 1..=vsi.vsi_per_subnet {
            instances.push(VsiInstance {
                subnet: subnet.clone(),
                zone: zone_digit(subnet),
                index,
            });
        }
    }
    instances
}

/// Reserved IP for one replica, looked up by the deployment's original
/// subnet position and replica index.
fn reserved_ip(vsi: &Vsi, instance: &VsiInstance) -> Option<String> {
    let subnet_index = vsi.subnets.iter().position(|s| *s == instance.subnet)?;
    vsi.reserved_ips
        .as_ref()?
        .get(subnet_index)?
        .get(instance.index as usize - 1)?
        .clone()
}

/// Compile the image data source shared by deployments using this image.
pub fn format_vsi_image(image: &str) -> String {
    let mut attrs = Attrs::new();
    attrs.add("name", TfValue::str(image));
    data("ibm_is_image", &snake_case(image), &attrs)
}

/// Compile one expanded instance (plus its reserved IP when configured).
pub fn format_vsi_instance(instance: &VsiInstance, vsi: &Vsi, config: &Config) -> String {
    let symbol = instance.symbol(vsi);
    let mut tf = String::new();
    let reservation = reserved_ip(vsi, instance);
    if let Some(address) = &reservation {
        let mut attrs = Attrs::new();
        attrs
            .add("subnet", vpc_output_ref(&vsi.vpc, &instance.subnet))
            .add(
                "name",
                TfValue::str(format!("{}-reserved-ip", instance.visible_name(vsi))),
            )
            .add("address", TfValue::str(address));
        tf += &resource(
            "ibm_is_subnet_reserved_ip",
            &format!("{symbol}_reserved_ip"),
            &attrs,
        );
    }

    let mut primary_nic = Attrs::new();
    primary_nic.add("subnet", vpc_output_ref(&vsi.vpc, &instance.subnet));
    primary_nic.add(
        "security_groups",
        TfValue::Lines(
            vsi.security_groups
                .iter()
                .map(|sg| vpc_output_ref(&vsi.vpc, sg))
                .collect(),
        ),
    );
    if reservation.is_some() {
        primary_nic.add(
            "primary_ip",
            TfValue::Block(vec![(
                "reserved_ip".to_string(),
                TfValue::expr(format!(
                    "ibm_is_subnet_reserved_ip.{symbol}_reserved_ip.reserved_ip"
                )),
            )]),
        );
    }

    let mut attrs = Attrs::new();
    attrs
        .add("name", TfValue::str(instance.visible_name(vsi)))
        .add(
            "image",
            TfValue::expr(format!("data.ibm_is_image.{}.id", snake_case(&vsi.image))),
        )
        .add("profile", TfValue::str(&vsi.profile))
        .add(
            "resource_group",
            rg_id_ref(vsi.resource_group.as_deref(), config),
        )
        .add("vpc", vpc_module_ref(&vsi.vpc, "id"))
        .add("zone", composed_zone(&instance.zone))
        .add(
            "tags",
            TfValue::Lines(config.options.tags.iter().map(TfValue::str).collect()),
        )
        .add("primary_network_interface", TfValue::Block(primary_nic.into_vec()))
        .add(
            "boot_volume",
            TfValue::Block(vec![(
                "encryption".to_string(),
                encryption_key_ref(vsi.kms.as_deref(), vsi.encryption_key.as_deref(), "crn"),
            )]),
        )
        .add(
            "keys",
            TfValue::Lines(
                vsi.ssh_keys
                    .iter()
                    .map(|key| {
                        let use_data = config.ssh_key(key).is_some_and(|k| k.use_data);
                        tf_ref("ibm_is_ssh_key", key, "id", use_data)
                    })
                    .collect(),
            ),
        );
    attrs.add_if("user_data", vsi.user_data.as_deref(), TfValue::str);
    if !vsi.network_interfaces.is_empty() {
        attrs.add(
            "network_interfaces",
            TfValue::Blocks(
                vsi.network_interfaces
                    .iter()
                    .map(|nic| {
                        vec![
                            (
                                "subnet".to_string(),
                                vpc_output_ref(&vsi.vpc, &nic.subnet),
                            ),
                            ("allow_ip_spoofing".to_string(), TfValue::Bool(true)),
                            (
                                "security_groups".to_string(),
                                TfValue::Lines(
                                    nic.security_groups
                                        .iter()
                                        .map(|sg| vpc_output_ref(&vsi.vpc, sg))
                                        .collect(),
                                ),
                            ),
                        ]
                    })
                    .collect(),
            ),
        );
    }
    if !vsi.volumes.is_empty() {
        attrs.add(
            "volumes",
            TfValue::Lines(
                vsi.volumes
                    .iter()
                    .map(|volume| {
                        TfValue::expr(format!(
                            "ibm_is_volume.{symbol}_{}.id",
                            snake_case(&volume.name)
                        ))
                    })
                    .collect(),
            ),
        );
    }
    tf += &resource("ibm_is_instance", &symbol, &attrs);

    for volume in &vsi.volumes {
        let mut vol_attrs = Attrs::new();
        vol_attrs
            .add(
                "name",
                TfValue::str(format!(
                    "{}-{}",
                    instance.visible_name(vsi),
                    crate::tf::util::kebab_case(&volume.name)
                )),
            )
            .add("profile", TfValue::str(&volume.profile))
            .add("zone", composed_zone(&instance.zone));
        vol_attrs.add_if("iops", volume.iops, |iops| TfValue::Int(iops as i64));
        vol_attrs.add_if("capacity", volume.capacity, |c| TfValue::Int(i64::from(c)));
        vol_attrs
            .add(
                "encryption_key",
                encryption_key_ref(vsi.kms.as_deref(), volume.encryption_key.as_deref(), "crn"),
            )
            .add(
                "tags",
                TfValue::Lines(config.options.tags.iter().map(TfValue::str).collect()),
            );
        tf += &resource(
            "ibm_is_volume",
            &format!("{symbol}_{}", snake_case(&volume.name)),
            &vol_attrs,
        );
    }
    tf
}

/// Compile a floating IP bound to one replica's primary interface.
pub fn format_fip(instance: &VsiInstance, vsi: &Vsi, config: &Config) -> String {
    let symbol = instance.symbol(vsi);
    let mut attrs = Attrs::new();
    attrs
        .add(
            "name",
            TfValue::str(format!("{}-fip", instance.visible_name(vsi))),
        )
        .add(
            "target",
            TfValue::expr(format!(
                "ibm_is_instance.{symbol}.primary_network_interface.0.id"
            )),
        )
        .add(
            "tags",
            TfValue::Lines(config.options.tags.iter().map(TfValue::str).collect()),
        );
    resource("ibm_is_floating_ip", &format!("{symbol}_fip"), &attrs)
}

/// Compile the `virtual_servers.tf` file body: shared image data sources,
/// one section per deployment, and an optional floating IP section.
pub fn vsi_tf(config: &Config) -> String {
    let mut tf = String::new();
    let mut image_body = String::new();
    let mut seen_images: Vec<&str> = Vec::new();
    for vsi in &config.vsi {
        if !seen_images.contains(&vsi.image.as_str()) {
            seen_images.push(&vsi.image);
            image_body += &format_vsi_image(&vsi.image);
        }
    }
    tf += &(tf_block("image data sources", &image_body) + "\n");
    let mut fip_body = String::new();
    for vsi in &config.vsi {
        let mut body = String::new();
        for instance in expand_deployment(vsi) {
            body += &format_vsi_instance(&instance, vsi, config);
            if vsi.enable_floating_ip {
                fip_body += &format_fip(&instance, vsi, config);
            }
        }
        tf += &(tf_block(&format!("{} VPC {} deployment", vsi.vpc, vsi.name), &body) + "\n");
    }
    if !fip_body.is_empty() {
        tf += &(tf_block("floating IPs", &fip_body) + "\n");
    }
    tf_done(&tf)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deployment(vsi_per_subnet: u32) -> Vsi {
        Vsi {
            name: "management-server".to_string(),
            vpc: "management".to_string(),
            subnets: vec!["zone-2".to_string(), "zone-1".to_string()],
            vsi_per_subnet,
            image: "ibm-ubuntu-22-04-3-minimal-amd64-1".to_string(),
            profile: "cx2-4x8".to_string(),
            resource_group: None,
            security_groups: vec!["management-vsi".to_string()],
            ssh_keys: vec!["ssh-key".to_string()],
            kms: Some("kms".to_string()),
            encryption_key: Some("vsi-volume-key".to_string()),
            user_data: None,
            enable_floating_ip: false,
            reserved_ips: None,
            network_interfaces: Vec::new(),
            volumes: Vec::new(),
        }
    }

    #[test]
    fn expansion_orders_by_zone_and_counts_replicas() {
        let instances = expand_deployment(&deployment(2));
        let symbols: Vec<String> = instances
            .iter()
            .map(|i| i.symbol(&deployment(2)))
            .collect();
        assert_eq!(
            symbols,
            [
                "management_vpc_management_server_vsi_1_1",
                "management_vpc_management_server_vsi_1_2",
                "management_vpc_management_server_vsi_2_1",
                "management_vpc_management_server_vsi_2_2",
            ]
        );
    }

    #[test]
    fn single_replica_name_omits_index_suffix() {
        let single = deployment(1);
        let instances = expand_deployment(&single);
        assert_eq!(
            instances[0].visible_name(&single),
            "${var.prefix}-management-management-server-vsi-zone-1"
        );
        // Symbolic identifier keeps the index regardless.
        assert_eq!(
            instances[0].symbol(&single),
            "management_vpc_management_server_vsi_1_1"
        );
    }

    #[test]
    fn multi_replica_name_keeps_index_suffix() {
        let multi = deployment(2);
        let instances = expand_deployment(&multi);
        assert_eq!(
            instances[1].visible_name(&multi),
            "${var.prefix}-management-management-server-vsi-zone-1-2"
        );
    }

    #[test]
    fn reserved_ip_adds_resource_and_primary_ip() {
        let mut vsi = deployment(1);
        vsi.subnets = vec!["zone-1".to_string()];
        vsi.reserved_ips = Some(vec![vec![Some("10.10.0.6".to_string())]]);
        let instances = expand_deployment(&vsi);
        let rendered = format_vsi_instance(&instances[0], &vsi, &Config::empty());
        assert!(rendered.contains("resource \"ibm_is_subnet_reserved_ip\""));
        assert!(rendered.contains("address = \"10.10.0.6\""));
        assert!(rendered.contains(
            "reserved_ip = ibm_is_subnet_reserved_ip.management_vpc_management_server_vsi_1_1_reserved_ip.reserved_ip"
        ));
    }

    #[test]
    fn volumes_render_as_resources_and_references() {
        let mut vsi = deployment(1);
        vsi.subnets = vec!["zone-1".to_string()];
        vsi.volumes = vec![crate::config::VsiVolume {
            name: "data".to_string(),
            profile: "general-purpose".to_string(),
            capacity: Some(100),
            iops: None,
            encryption_key: Some("vsi-volume-key".to_string()),
        }];
        let instances = expand_deployment(&vsi);
        let rendered = format_vsi_instance(&instances[0], &vsi, &Config::empty());
        assert!(rendered.contains(
            "resource \"ibm_is_volume\" \"management_vpc_management_server_vsi_1_1_data\""
        ));
        assert!(rendered.contains(
            "ibm_is_volume.management_vpc_management_server_vsi_1_1_data.id"
        ));
        assert!(rendered.contains("capacity       = 100"));
    }

    #[test]
    fn file_deduplicates_image_data_sources() {
        let mut config = Config::empty();
        let mut first = deployment(1);
        first.subnets = vec!["zone-1".to_string()];
        let mut second = deployment(1);
        second.name = "other".to_string();
        second.subnets = vec!["zone-1".to_string()];
        config.vsi = vec![first, second];
        let rendered = vsi_tf(&config);
        assert_eq!(
            rendered
                .matches("data \"ibm_is_image\" \"ibm_ubuntu_22_04_3_minimal_amd64_1\"")
                .count(),
            1
        );
    }
}

//! Load balancer compiler.
//!
//! Pool members fan out transitively: every deployment in `target_vsi`
//! contributes one member per (subnet x replica) of its own expansion, and
//! the listener carries an explicit dependency edge on every member.

use crate::config::{Config, LoadBalancer};
use crate::tf::block::{Attrs, TfValue, resource};
use crate::tf::util::{kebab_name, rg_id_ref, snake_case, tf_block, tf_done, vpc_output_ref};
use crate::tf::vsi::expand_deployment;

fn lb_symbol(lb: &LoadBalancer) -> String {
    snake_case(&format!("{} load balancer", lb.name))
}

fn pool_symbol(lb: &LoadBalancer) -> String {
    snake_case(&format!("{} load balancer pool", lb.name))
}

/// One compiled pool member: symbolic name plus the replica instance it
/// targets.
#[derive(Debug, Clone)]
pub struct PoolMember {
    /// Symbolic resource name of the member.
    pub symbol: String,
    /// Symbolic resource name of the backend instance.
    pub instance_symbol: String,
}

/// Fan out the pool members for a load balancer through each target
/// deployment's subnet and replica expansion. Unknown targets contribute no
/// members; the validation layer is the gate on completeness.
pub fn pool_members(lb: &LoadBalancer, config: &Config) -> Vec<PoolMember> {
    let mut members = Vec::new();
    for target in &lb.target_vsi {
        let Some(vsi) = config.vsi_deployment(target) else {
            continue;
        };
        for instance in expand_deployment(vsi) {
            let instance_symbol = instance.symbol(vsi);
            members.push(PoolMember {
                symbol: snake_case(&format!(
                    "{} {} {} pool member",
                    lb.name, vsi.name, instance_symbol
                )),
                instance_symbol,
            });
        }
    }
    members
}

/// Compile the load balancer resource.
pub fn format_lb(lb: &LoadBalancer, config: &Config) -> String {
    let mut attrs = Attrs::new();
    attrs
        .add("name", kebab_name(&[&lb.name, "lb"]))
        .add("type", TfValue::str(&lb.lb_type))
        .add(
            "resource_group",
            rg_id_ref(lb.resource_group.as_deref(), config),
        )
        .add(
            "security_groups",
            TfValue::Lines(
                lb.security_groups
                    .iter()
                    .map(|sg| vpc_output_ref(&lb.vpc, sg))
                    .collect(),
            ),
        )
        .add(
            "subnets",
            TfValue::Lines(
                lb.subnets
                    .iter()
                    .map(|subnet| vpc_output_ref(&lb.vpc, subnet))
                    .collect(),
            ),
        )
        .add(
            "tags",
            TfValue::Lines(config.options.tags.iter().map(TfValue::str).collect()),
        );
    resource("ibm_is_lb", &lb_symbol(lb), &attrs)
}

/// Compile the backend pool.
pub fn format_lb_pool(lb: &LoadBalancer, _config: &Config) -> String {
    let mut attrs = Attrs::new();
    attrs
        .add(
            "lb",
            TfValue::expr(format!("ibm_is_lb.{}.id", lb_symbol(lb))),
        )
        .add("name", kebab_name(&[&lb.name, "lb", "pool"]))
        .add("algorithm", TfValue::str(&lb.algorithm))
        .add("protocol", TfValue::str(&lb.protocol))
        .add("health_delay", TfValue::Int(i64::from(lb.health_delay)))
        .add("health_retries", TfValue::Int(i64::from(lb.health_retries)))
        .add("health_timeout", TfValue::Int(i64::from(lb.health_timeout)))
        .add("health_type", TfValue::str(&lb.health_type));
    attrs.add_if("proxy_protocol", lb.proxy_protocol.as_deref(), TfValue::str);
    attrs.add_if(
        "session_persistence_type",
        lb.session_persistence_type.as_deref(),
        TfValue::str,
    );
    if lb.session_persistence_type.as_deref() == Some("app_cookie") {
        attrs.add_if(
            "session_persistence_app_cookie_name",
            lb.session_persistence_app_cookie_name.as_deref(),
            TfValue::str,
        );
    }
    resource("ibm_is_lb_pool", &pool_symbol(lb), &attrs)
}

/// Compile one pool member.
pub fn format_lb_pool_member(member: &PoolMember, lb: &LoadBalancer, _config: &Config) -> String {
    let mut attrs = Attrs::new();
    attrs
        .add("port", TfValue::Int(i64::from(lb.port)))
        .add(
            "lb",
            TfValue::expr(format!("ibm_is_lb.{}.id", lb_symbol(lb))),
        )
        .add(
            "pool",
            TfValue::expr(format!("ibm_is_lb_pool.{}.pool_id", pool_symbol(lb))),
        )
        .add(
            "target_address",
            TfValue::expr(format!(
                "ibm_is_instance.{}.primary_network_interface.0.primary_ip.0.address",
                member.instance_symbol
            )),
        );
    resource("ibm_is_lb_pool_member", &member.symbol, &attrs)
}

/// Compile the front-end listener, depending on every pool member.
pub fn format_lb_listener(
    lb: &LoadBalancer,
    members: &[PoolMember],
    _config: &Config,
) -> String {
    let mut attrs = Attrs::new();
    attrs
        .add(
            "lb",
            TfValue::expr(format!("ibm_is_lb.{}.id", lb_symbol(lb))),
        )
        .add(
            "default_pool",
            TfValue::expr(format!("ibm_is_lb_pool.{}.id", pool_symbol(lb))),
        )
        .add("port", TfValue::Int(i64::from(lb.listener_port)))
        .add("protocol", TfValue::str(&lb.listener_protocol));
    attrs.add_if("connection_limit", lb.connection_limit, |limit| {
        TfValue::Int(i64::from(limit))
    });
    attrs.add(
        "depends_on",
        TfValue::Lines(
            members
                .iter()
                .map(|member| {
                    TfValue::expr(format!("ibm_is_lb_pool_member.{}", member.symbol))
                })
                .collect(),
        ),
    );
    resource(
        "ibm_is_lb_listener",
        &snake_case(&format!("{} listener", lb.name)),
        &attrs,
    )
}

/// Compile the `load_balancers.tf` file body.
pub fn lb_tf(config: &Config) -> String {
    let mut tf = String::new();
    for lb in &config.load_balancers {
        let members = pool_members(lb, config);
        let mut body = format_lb(lb, config);
        body += &format_lb_pool(lb, config);
        for member in &members {
            body += &format_lb_pool_member(member, lb, config);
        }
        body += &format_lb_listener(lb, &members, config);
        tf += &(tf_block(&format!("{} load balancer", lb.name), &body) + "\n");
    }
    tf_done(&tf)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lb_config() -> Config {
        let mut config = Config::empty();
        config.vsi.push(crate::config::Vsi {
            name: "management-server".to_string(),
            vpc: "management".to_string(),
            subnets: vec![
                "vsi-zone-1".to_string(),
                "vsi-zone-2".to_string(),
                "vsi-zone-3".to_string(),
            ],
            vsi_per_subnet: 2,
            image: "image".to_string(),
            profile: "cx2-4x8".to_string(),
            resource_group: None,
            security_groups: Vec::new(),
            ssh_keys: Vec::new(),
            kms: None,
            encryption_key: None,
            user_data: None,
            enable_floating_ip: false,
            reserved_ips: None,
            network_interfaces: Vec::new(),
            volumes: Vec::new(),
        });
        config.load_balancers.push(LoadBalancer {
            name: "lb-1".to_string(),
            vpc: "management".to_string(),
            lb_type: "public".to_string(),
            subnets: vec!["vsi-zone-1".to_string()],
            security_groups: vec!["management-vpe".to_string()],
            resource_group: None,
            target_vsi: vec!["management-server".to_string()],
            port: 80,
            listener_port: 443,
            listener_protocol: "https".to_string(),
            connection_limit: Some(2),
            algorithm: "round_robin".to_string(),
            protocol: "tcp".to_string(),
            health_delay: 60,
            health_retries: 5,
            health_timeout: 30,
            health_type: "https".to_string(),
            proxy_protocol: Some("v1".to_string()),
            session_persistence_type: Some("app_cookie".to_string()),
            session_persistence_app_cookie_name: Some("cookie1".to_string()),
        });
        config
    }

    #[test]
    fn fan_out_produces_one_member_per_replica() {
        let config = lb_config();
        let members = pool_members(&config.load_balancers[0], &config);
        // 3 subnets x 2 replicas
        assert_eq!(members.len(), 6);
        assert_eq!(
            members[0].instance_symbol,
            "management_vpc_management_server_vsi_1_1"
        );
        assert_eq!(
            members[5].instance_symbol,
            "management_vpc_management_server_vsi_3_2"
        );
    }

    #[test]
    fn listener_depends_on_every_member() {
        let config = lb_config();
        let lb = &config.load_balancers[0];
        let members = pool_members(lb, &config);
        let listener = format_lb_listener(lb, &members, &config);
        for member in &members {
            assert!(listener.contains(&format!("ibm_is_lb_pool_member.{}", member.symbol)));
        }
        assert!(listener.contains("connection_limit = 2"));
    }

    #[test]
    fn app_cookie_persistence_keeps_cookie_name() {
        let config = lb_config();
        let rendered = format_lb_pool(&config.load_balancers[0], &config);
        assert!(rendered.contains("session_persistence_app_cookie_name = \"cookie1\""));
        let mut other = config.load_balancers[0].clone();
        other.session_persistence_type = Some("source_ip".to_string());
        let rendered = format_lb_pool(&other, &config);
        assert!(!rendered.contains("session_persistence_app_cookie_name"));
    }

    #[test]
    fn unknown_target_contributes_no_members() {
        let mut config = lb_config();
        config.load_balancers[0]
            .target_vsi
            .push("ghost".to_string());
        let members = pool_members(&config.load_balancers[0], &config);
        assert_eq!(members.len(), 6);
    }
}

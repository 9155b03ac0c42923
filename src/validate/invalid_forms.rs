//! Derived list of invalid forms.
//!
//! Walks every family of the current document through the per-family
//! predicates and returns the navigation identifiers of forms whose current
//! entities fail validation. The UI renders these as warning badges; the
//! list is recomputed from scratch on demand, never cached.

use super::*;
use crate::config::{Config, Vpc};
use crate::state::Store;

fn any_vpc_subform(config: &Config, check: impl Fn(&Vpc) -> bool) -> bool {
    config.vpcs.iter().any(check)
}

/// Navigation identifiers of every form whose entities currently fail
/// validation, in navigation order.
pub fn invalid_forms(store: &Store) -> Vec<String> {
    let config = store.config();
    let mut forms: Vec<&str> = Vec::new();
    let mut push_if = |failing: bool, id: &'static str| {
        if failing {
            forms.push(id);
        }
    };

    push_if(
        config
            .resource_groups
            .iter()
            .any(|rg| is_invalid_resource_group(rg, config, Some(&rg.name))),
        "resource_groups",
    );
    push_if(
        config.key_management.iter().any(|kms| {
            is_invalid_key_management(kms, config, Some(&kms.name))
                || kms
                    .keys
                    .iter()
                    .any(|key| is_invalid_kms_key(key, kms, config, Some(&key.name)))
        }),
        "key_management",
    );
    push_if(
        config.object_storage.iter().any(|cos| {
            is_invalid_object_storage(cos, config, Some(&cos.name))
                || cos
                    .buckets
                    .iter()
                    .any(|bucket| is_invalid_cos_bucket(bucket, config, Some(&bucket.name)))
                || cos
                    .keys
                    .iter()
                    .any(|key| is_invalid_cos_key(key, config, Some(&key.name)))
        }),
        "object_storage",
    );
    push_if(
        config.secrets_manager.iter().any(|sm| {
            is_invalid_secrets_manager(sm, config, Some(&sm.name))
        }),
        "secrets_manager",
    );
    push_if(
        config.event_streams.iter().any(|es| {
            is_invalid_event_streams(es, config, Some(&es.name))
        }),
        "event_streams",
    );
    push_if(
        config.appid.iter().any(|appid| {
            is_invalid_appid(appid, config, Some(&appid.name))
                || appid
                    .keys
                    .iter()
                    .any(|key| is_invalid_appid_key(key, appid, config, Some(&key.name)))
        }),
        "appid",
    );
    push_if(
        is_invalid_atracker(&config.atracker, config)
            || is_invalid_logdna(&config.logdna, config)
            || is_invalid_sysdig(&config.sysdig, config),
        "/form/observability",
    );
    push_if(is_invalid_scc(&config.scc, config), "scc");
    push_if(
        is_invalid_iam_account_settings(&config.iam_account_settings, config),
        "iam_account_settings",
    );
    push_if(
        config
            .ssh_keys
            .iter()
            .any(|key| is_invalid_ssh_key(key, config, Some(&key.name))),
        "ssh_keys",
    );
    push_if(
        config
            .vpcs
            .iter()
            .any(|vpc| is_invalid_vpc(vpc, config, Some(&vpc.name))),
        "vpcs",
    );
    push_if(
        any_vpc_subform(config, |vpc| {
            vpc.acls.iter().any(|acl| {
                is_invalid_acl(acl, vpc, config, Some(&acl.name))
                    || acl
                        .rules
                        .iter()
                        .any(|rule| is_invalid_acl_rule(rule, acl, config, Some(&rule.name)))
            })
        }),
        "/form/acls",
    );
    push_if(
        any_vpc_subform(config, |vpc| {
            vpc.subnets
                .iter()
                .any(|subnet| is_invalid_subnet(subnet, config))
        }),
        "/form/subnets",
    );
    push_if(
        config.routing_tables.iter().any(|table| {
            is_invalid_routing_table(table, config, Some(&table.name))
                || table
                    .routes
                    .iter()
                    .any(|route| is_invalid_route(route, table, config, Some(&route.name)))
        }),
        "routing_tables",
    );
    push_if(
        config.transit_gateways.iter().any(|tgw| {
            is_invalid_transit_gateway(tgw, config, Some(&tgw.name))
        }),
        "transit_gateways",
    );
    push_if(
        config.security_groups.iter().any(|sg| {
            is_invalid_security_group(sg, config, Some(&sg.name))
                || sg
                    .rules
                    .iter()
                    .any(|rule| is_invalid_sg_rule(rule, sg, config, Some(&rule.name)))
        }),
        "security_groups",
    );
    push_if(
        config.vpn_gateways.iter().any(|gateway| {
            is_invalid_vpn_gateway(gateway, config, Some(&gateway.name))
        }),
        "vpn_gateways",
    );
    push_if(
        config.clusters.iter().any(|cluster| {
            is_invalid_cluster(cluster, config, Some(&cluster.name))
                || cluster.worker_pools.iter().any(|pool| {
                    is_invalid_worker_pool(pool, cluster, config, Some(&pool.name))
                })
        }),
        "clusters",
    );
    push_if(
        config
            .vsi
            .iter()
            .any(|vsi| is_invalid_vsi(vsi, config, Some(&vsi.name))),
        "vsi",
    );
    push_if(
        config.load_balancers.iter().any(|lb| {
            is_invalid_load_balancer(lb, config, Some(&lb.name))
        }),
        "load_balancers",
    );

    forms.into_iter().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_document_has_no_invalid_forms() {
        let store = Store::new();
        assert_eq!(invalid_forms(&store), Vec::<String>::new());
    }

    #[test]
    fn broken_entities_surface_their_forms() {
        let mut store = Store::new();
        let mut config = store.config().clone();
        config.key_management[0].keys[0].name = "@@@".to_string();
        config.vpcs[0].subnets[0].network_acl = None;
        config.vsi[0].ssh_keys.clear();
        store.hard_set(config);
        // hard_set heals references but never renames invalid entities.
        let forms = invalid_forms(&store);
        assert!(forms.contains(&"key_management".to_string()));
        assert!(forms.contains(&"/form/subnets".to_string()));
        assert!(forms.contains(&"vsi".to_string()));
        assert!(!forms.contains(&"vpcs".to_string()));
    }
}

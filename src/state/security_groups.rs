//! Security group operations.

use super::{Store, update_unfound};
use crate::config::{Config, SecurityGroup, SgRule};

pub(super) fn on_store_update(store: &mut Store) {
    let groups = store.config.resource_group_names();
    let vpcs = store.config.vpc_names();
    for sg in &mut store.config.security_groups {
        update_unfound(&groups, &mut sg.resource_group);
        // A security group whose VPC disappeared keeps its rules but loses
        // the attachment; the validation layer blocks saving it until the
        // operator picks a new VPC.
        if !vpcs.contains(&sg.vpc) {
            sg.vpc = String::new();
        }
        let parent = sg.name.clone();
        let vpc = sg.vpc.clone();
        for rule in &mut sg.rules {
            rule.sg = parent.clone();
            rule.vpc = vpc.clone();
        }
    }
}

fn rename_refs(config: &mut Config, old: &str, new: &str) {
    for vsi in &mut config.vsi {
        for sg in &mut vsi.security_groups {
            if sg == old {
                *sg = new.to_string();
            }
        }
        for nic in &mut vsi.network_interfaces {
            for sg in &mut nic.security_groups {
                if sg == old {
                    *sg = new.to_string();
                }
            }
        }
    }
    for lb in &mut config.load_balancers {
        for sg in &mut lb.security_groups {
            if sg == old {
                *sg = new.to_string();
            }
        }
    }
}

impl Store {
    /// Append a new security group.
    pub fn security_group_create(&mut self, sg: SecurityGroup) {
        self.config.security_groups.push(sg);
        self.update();
    }

    /// Save a security group, propagating a rename into deployment and
    /// load balancer attachments.
    pub fn security_group_save(&mut self, prev: &str, sg: SecurityGroup) {
        let Some(index) = self
            .config
            .security_groups
            .iter()
            .position(|candidate| candidate.name == prev)
        else {
            return;
        };
        if sg.name != prev {
            rename_refs(&mut self.config, prev, &sg.name);
        }
        self.config.security_groups[index] = sg;
        self.update();
    }

    /// Delete a security group; attachments drop it on the update pass.
    pub fn security_group_delete(&mut self, name: &str) {
        self.config
            .security_groups
            .retain(|candidate| candidate.name != name);
        self.update();
    }

    /// Append a rule to a security group.
    pub fn sg_rule_create(&mut self, sg_name: &str, rule: SgRule) {
        if let Some(sg) = self
            .config
            .security_groups
            .iter_mut()
            .find(|candidate| candidate.name == sg_name)
        {
            sg.rules.push(rule);
        }
        self.update();
    }

    /// Save a rule of a security group.
    pub fn sg_rule_save(&mut self, sg_name: &str, prev: &str, rule: SgRule) {
        if let Some(sg) = self
            .config
            .security_groups
            .iter_mut()
            .find(|candidate| candidate.name == sg_name)
            && let Some(index) = sg.rules.iter().position(|candidate| candidate.name == prev)
        {
            sg.rules[index] = rule;
            self.update();
        }
    }

    /// Delete a rule of a security group.
    pub fn sg_rule_delete(&mut self, sg_name: &str, name: &str) {
        if let Some(sg) = self
            .config
            .security_groups
            .iter_mut()
            .find(|candidate| candidate.name == sg_name)
        {
            sg.rules.retain(|candidate| candidate.name != name);
        }
        self.update();
    }

    /// Copy a security group onto another VPC under a `-copy` suffix.
    pub fn copy_security_group(&mut self, source: &str, target_vpc: &str) {
        let Some(mut copy) = self
            .config
            .security_groups
            .iter()
            .find(|sg| sg.name == source)
            .cloned()
        else {
            return;
        };
        copy.name = format!("{}-copy", copy.name);
        copy.vpc = target_vpc.to_string();
        self.config.security_groups.push(copy);
        self.update();
    }

    /// Copy one rule from a security group to another.
    pub fn copy_sg_rule(&mut self, source_sg: &str, rule_name: &str, target_sg: &str) {
        let Some(rule) = self
            .config
            .security_groups
            .iter()
            .find(|sg| sg.name == source_sg)
            .and_then(|sg| sg.rules.iter().find(|rule| rule.name == rule_name))
            .cloned()
        else {
            return;
        };
        if let Some(target) = self
            .config
            .security_groups
            .iter_mut()
            .find(|sg| sg.name == target_sg)
        {
            target.rules.push(rule);
        }
        self.update();
    }
}

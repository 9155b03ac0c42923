//! Key management operations: instances and their encryption keys.

use super::{Store, update_unfound};
use crate::config::{Config, KeyManagement, KmsKey};

pub(super) fn on_store_update(store: &mut Store) {
    let groups = store.config.resource_group_names();
    for kms in &mut store.config.key_management {
        update_unfound(&groups, &mut kms.resource_group);
    }
}

/// All encryption key names across every instance.
pub(super) fn all_key_names(config: &Config) -> Vec<String> {
    config
        .key_management
        .iter()
        .flat_map(|kms| kms.keys.iter().map(|key| key.name.clone()))
        .collect()
}

fn rename_instance_refs(config: &mut Config, old: &str, new: &str) {
    let rename = |field: &mut Option<String>| {
        if field.as_deref() == Some(old) {
            *field = Some(new.to_string());
        }
    };
    for cos in &mut config.object_storage {
        rename(&mut cos.kms);
    }
    for sm in &mut config.secrets_manager {
        rename(&mut sm.kms);
    }
    for cluster in &mut config.clusters {
        rename(&mut cluster.kms);
    }
    for vsi in &mut config.vsi {
        rename(&mut vsi.kms);
    }
}

fn rename_key_refs(config: &mut Config, old: &str, new: &str) {
    let rename = |field: &mut Option<String>| {
        if field.as_deref() == Some(old) {
            *field = Some(new.to_string());
        }
    };
    for cos in &mut config.object_storage {
        for bucket in &mut cos.buckets {
            rename(&mut bucket.kms_key);
        }
    }
    for sm in &mut config.secrets_manager {
        rename(&mut sm.encryption_key);
    }
    for cluster in &mut config.clusters {
        rename(&mut cluster.encryption_key);
    }
    for vsi in &mut config.vsi {
        rename(&mut vsi.encryption_key);
        for volume in &mut vsi.volumes {
            rename(&mut volume.encryption_key);
        }
    }
}

impl Store {
    /// Append a new key management instance.
    pub fn key_management_create(&mut self, kms: KeyManagement) {
        self.config.key_management.push(kms);
        self.update();
    }

    /// Save an instance, propagating a rename to every consumer.
    pub fn key_management_save(&mut self, prev: &str, kms: KeyManagement) {
        let Some(index) = self
            .config
            .key_management
            .iter()
            .position(|candidate| candidate.name == prev)
        else {
            return;
        };
        if kms.name != prev {
            rename_instance_refs(&mut self.config, prev, &kms.name);
        }
        self.config.key_management[index] = kms;
        self.update();
    }

    /// Delete an instance. Consumers' `kms` references are nulled on the
    /// update pass.
    pub fn key_management_delete(&mut self, name: &str) {
        self.config
            .key_management
            .retain(|candidate| candidate.name != name);
        self.update();
    }

    /// Append an encryption key to an instance.
    pub fn kms_key_create(&mut self, kms_name: &str, key: KmsKey) {
        if let Some(kms) = self
            .config
            .key_management
            .iter_mut()
            .find(|candidate| candidate.name == kms_name)
        {
            kms.keys.push(key);
        }
        self.update();
    }

    /// Save an encryption key, propagating a rename to bucket, cluster,
    /// server, and secrets-manager references.
    pub fn kms_key_save(&mut self, kms_name: &str, prev: &str, key: KmsKey) {
        let Some(kms) = self
            .config
            .key_management
            .iter_mut()
            .find(|candidate| candidate.name == kms_name)
        else {
            return;
        };
        let Some(index) = kms.keys.iter().position(|candidate| candidate.name == prev) else {
            return;
        };
        let renamed = key.name != prev;
        let new_name = key.name.clone();
        kms.keys[index] = key;
        if renamed {
            rename_key_refs(&mut self.config, prev, &new_name);
        }
        self.update();
    }

    /// Delete an encryption key. Consumers are nulled on the update pass.
    pub fn kms_key_delete(&mut self, kms_name: &str, name: &str) {
        if let Some(kms) = self
            .config
            .key_management
            .iter_mut()
            .find(|candidate| candidate.name == kms_name)
        {
            kms.keys.retain(|candidate| candidate.name != name);
        }
        self.update();
    }
}

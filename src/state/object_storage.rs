//! Object storage operations: instances, buckets, and resource keys.

use super::{Store, update_unfound};
use crate::config::{Config, CosBucket, CosKey, ObjectStorage};

pub(super) fn on_store_update(store: &mut Store) {
    let groups = store.config.resource_group_names();
    let kms_names: Vec<String> = store
        .config
        .key_management
        .iter()
        .map(|kms| kms.name.clone())
        .collect();
    let key_names = super::key_management::all_key_names(&store.config);
    for cos in &mut store.config.object_storage {
        update_unfound(&groups, &mut cos.resource_group);
        update_unfound(&kms_names, &mut cos.kms);
        for bucket in &mut cos.buckets {
            update_unfound(&key_names, &mut bucket.kms_key);
        }
    }
}

/// All bucket names, optionally limited to one instance.
pub(super) fn bucket_names(config: &Config, cos: Option<&str>) -> Vec<String> {
    config
        .object_storage
        .iter()
        .filter(|candidate| cos.is_none_or(|name| candidate.name == name))
        .flat_map(|cos| cos.buckets.iter().map(|bucket| bucket.name.clone()))
        .collect()
}

/// All resource key names, optionally limited to one instance.
pub(super) fn cos_key_names(config: &Config, cos: Option<&str>) -> Vec<String> {
    config
        .object_storage
        .iter()
        .filter(|candidate| cos.is_none_or(|name| candidate.name == name))
        .flat_map(|cos| cos.keys.iter().map(|key| key.name.clone()))
        .collect()
}

fn rename_instance_refs(config: &mut Config, old: &str, new: &str) {
    let rename = |field: &mut Option<String>| {
        if field.as_deref() == Some(old) {
            *field = Some(new.to_string());
        }
    };
    rename(&mut config.atracker.target_name);
    rename(&mut config.logdna.cos);
    for vpc in &mut config.vpcs {
        rename(&mut vpc.cos);
    }
    for cluster in &mut config.clusters {
        rename(&mut cluster.cos);
    }
    for sm in &mut config.secrets_manager {
        for secret in &mut sm.secrets {
            rename(&mut secret.credential_instance);
        }
    }
}

fn rename_bucket_refs(config: &mut Config, old: &str, new: &str) {
    let rename = |field: &mut Option<String>| {
        if field.as_deref() == Some(old) {
            *field = Some(new.to_string());
        }
    };
    rename(&mut config.atracker.bucket);
    rename(&mut config.logdna.bucket);
    for vpc in &mut config.vpcs {
        rename(&mut vpc.bucket);
    }
}

impl Store {
    /// Append a new object storage instance.
    pub fn object_storage_create(&mut self, cos: ObjectStorage) {
        self.config.object_storage.push(cos);
        self.update();
    }

    /// Save an instance, propagating a rename to every consumer.
    pub fn object_storage_save(&mut self, prev: &str, cos: ObjectStorage) {
        let Some(index) = self
            .config
            .object_storage
            .iter()
            .position(|candidate| candidate.name == prev)
        else {
            return;
        };
        if cos.name != prev {
            rename_instance_refs(&mut self.config, prev, &cos.name);
        }
        self.config.object_storage[index] = cos;
        self.update();
    }

    /// Delete an instance; dependent references null out on the update
    /// pass.
    pub fn object_storage_delete(&mut self, name: &str) {
        self.config
            .object_storage
            .retain(|candidate| candidate.name != name);
        self.update();
    }

    /// Append a bucket to an instance.
    pub fn cos_bucket_create(&mut self, cos_name: &str, bucket: CosBucket) {
        if let Some(cos) = self
            .config
            .object_storage
            .iter_mut()
            .find(|candidate| candidate.name == cos_name)
        {
            cos.buckets.push(bucket);
        }
        self.update();
    }

    /// Save a bucket, propagating a rename to tracker/logging/VPC
    /// references.
    pub fn cos_bucket_save(&mut self, cos_name: &str, prev: &str, bucket: CosBucket) {
        let Some(cos) = self
            .config
            .object_storage
            .iter_mut()
            .find(|candidate| candidate.name == cos_name)
        else {
            return;
        };
        let Some(index) = cos
            .buckets
            .iter()
            .position(|candidate| candidate.name == prev)
        else {
            return;
        };
        let renamed = bucket.name != prev;
        let new_name = bucket.name.clone();
        cos.buckets[index] = bucket;
        if renamed {
            rename_bucket_refs(&mut self.config, prev, &new_name);
        }
        self.update();
    }

    /// Delete a bucket; dependent references null out on the update pass.
    pub fn cos_bucket_delete(&mut self, cos_name: &str, name: &str) {
        if let Some(cos) = self
            .config
            .object_storage
            .iter_mut()
            .find(|candidate| candidate.name == cos_name)
        {
            cos.buckets.retain(|candidate| candidate.name != name);
        }
        self.update();
    }

    /// Append a resource key to an instance.
    pub fn cos_key_create(&mut self, cos_name: &str, key: CosKey) {
        if let Some(cos) = self
            .config
            .object_storage
            .iter_mut()
            .find(|candidate| candidate.name == cos_name)
        {
            cos.keys.push(key);
        }
        self.update();
    }

    /// Save a resource key, propagating a rename to tracker and secret
    /// references.
    pub fn cos_key_save(&mut self, cos_name: &str, prev: &str, key: CosKey) {
        let Some(cos) = self
            .config
            .object_storage
            .iter_mut()
            .find(|candidate| candidate.name == cos_name)
        else {
            return;
        };
        let Some(index) = cos.keys.iter().position(|candidate| candidate.name == prev) else {
            return;
        };
        let renamed = key.name != prev;
        let new_name = key.name.clone();
        cos.keys[index] = key;
        if renamed {
            if self.config.atracker.cos_key.as_deref() == Some(prev) {
                self.config.atracker.cos_key = Some(new_name.clone());
            }
            for sm in &mut self.config.secrets_manager {
                for secret in &mut sm.secrets {
                    if secret.credentials.as_deref() == Some(prev) {
                        secret.credentials = Some(new_name.clone());
                    }
                }
            }
        }
        self.update();
    }

    /// Delete a resource key; dependent references null out on the update
    /// pass.
    pub fn cos_key_delete(&mut self, cos_name: &str, name: &str) {
        if let Some(cos) = self
            .config
            .object_storage
            .iter_mut()
            .find(|candidate| candidate.name == cos_name)
        {
            cos.keys.retain(|candidate| candidate.name != name);
        }
        self.update();
    }
}

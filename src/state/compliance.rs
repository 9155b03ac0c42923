//! Operations for the remaining service families: AppID, Secrets Manager,
//! Event Streams, SCC, and IAM account settings.

use super::{Store, update_unfound};
use crate::config::{
    AppId, AppIdKey, EventStreams, IamAccountSettings, Scc, SecretsManager,
};

pub(super) fn appid_on_store_update(store: &mut Store) {
    let groups = store.config.resource_group_names();
    for appid in &mut store.config.appid {
        update_unfound(&groups, &mut appid.resource_group);
        // Keys always carry their parent's current name.
        let parent = appid.name.clone();
        for key in &mut appid.keys {
            key.appid = parent.clone();
        }
    }
}

pub(super) fn secrets_manager_on_store_update(store: &mut Store) {
    let groups = store.config.resource_group_names();
    let kms_names: Vec<String> = store
        .config
        .key_management
        .iter()
        .map(|kms| kms.name.clone())
        .collect();
    let key_names = super::key_management::all_key_names(&store.config);
    let cos_keys = super::object_storage::cos_key_names(&store.config, None);
    for sm in &mut store.config.secrets_manager {
        update_unfound(&groups, &mut sm.resource_group);
        update_unfound(&kms_names, &mut sm.kms);
        update_unfound(&key_names, &mut sm.encryption_key);
        for secret in &mut sm.secrets {
            update_unfound(&cos_keys, &mut secret.credentials);
        }
    }
}

pub(super) fn event_streams_on_store_update(store: &mut Store) {
    let groups = store.config.resource_group_names();
    for es in &mut store.config.event_streams {
        update_unfound(&groups, &mut es.resource_group);
    }
}

impl Store {
    /// Append a new AppID instance.
    pub fn appid_create(&mut self, appid: AppId) {
        self.config.appid.push(appid);
        self.update();
    }

    /// Save an AppID instance. Key parent references follow the rename via
    /// the update pass.
    pub fn appid_save(&mut self, prev: &str, appid: AppId) {
        if let Some(index) = self
            .config
            .appid
            .iter()
            .position(|candidate| candidate.name == prev)
        {
            self.config.appid[index] = appid;
            self.update();
        }
    }

    /// Delete an AppID instance and its keys.
    pub fn appid_delete(&mut self, name: &str) {
        self.config.appid.retain(|candidate| candidate.name != name);
        self.update();
    }

    /// Append a key to an AppID instance.
    pub fn appid_key_create(&mut self, appid_name: &str, key: AppIdKey) {
        if let Some(appid) = self
            .config
            .appid
            .iter_mut()
            .find(|candidate| candidate.name == appid_name)
        {
            appid.keys.push(key);
        }
        self.update();
    }

    /// Save a key of an AppID instance.
    pub fn appid_key_save(&mut self, appid_name: &str, prev: &str, key: AppIdKey) {
        if let Some(appid) = self
            .config
            .appid
            .iter_mut()
            .find(|candidate| candidate.name == appid_name)
            && let Some(index) = appid.keys.iter().position(|candidate| candidate.name == prev)
        {
            appid.keys[index] = key;
            self.update();
        }
    }

    /// Delete a key of an AppID instance.
    pub fn appid_key_delete(&mut self, appid_name: &str, name: &str) {
        if let Some(appid) = self
            .config
            .appid
            .iter_mut()
            .find(|candidate| candidate.name == appid_name)
        {
            appid.keys.retain(|candidate| candidate.name != name);
        }
        self.update();
    }

    /// Append a new Secrets Manager instance.
    pub fn secrets_manager_create(&mut self, sm: SecretsManager) {
        self.config.secrets_manager.push(sm);
        self.update();
    }

    /// Save a Secrets Manager instance.
    pub fn secrets_manager_save(&mut self, prev: &str, sm: SecretsManager) {
        if let Some(index) = self
            .config
            .secrets_manager
            .iter()
            .position(|candidate| candidate.name == prev)
        {
            self.config.secrets_manager[index] = sm;
            self.update();
        }
    }

    /// Delete a Secrets Manager instance.
    pub fn secrets_manager_delete(&mut self, name: &str) {
        self.config
            .secrets_manager
            .retain(|candidate| candidate.name != name);
        self.update();
    }

    /// Append a new Event Streams instance.
    pub fn event_streams_create(&mut self, es: EventStreams) {
        self.config.event_streams.push(es);
        self.update();
    }

    /// Save an Event Streams instance.
    pub fn event_streams_save(&mut self, prev: &str, es: EventStreams) {
        if let Some(index) = self
            .config
            .event_streams
            .iter()
            .position(|candidate| candidate.name == prev)
        {
            self.config.event_streams[index] = es;
            self.update();
        }
    }

    /// Delete an Event Streams instance.
    pub fn event_streams_delete(&mut self, name: &str) {
        self.config
            .event_streams
            .retain(|candidate| candidate.name != name);
        self.update();
    }

    /// Save SCC posture settings.
    pub fn scc_save(&mut self, scc: Scc) {
        self.config.scc = scc;
        self.update();
    }

    /// Save IAM account settings.
    pub fn iam_account_settings_save(&mut self, iam: IamAccountSettings) {
        self.config.iam_account_settings = iam;
        self.update();
    }
}

//! SSH key operations.

use super::{Store, update_unfound};
use crate::config::SshKey;

pub(super) fn on_store_update(store: &mut Store) {
    let groups = store.config.resource_group_names();
    for key in &mut store.config.ssh_keys {
        update_unfound(&groups, &mut key.resource_group);
        if key.use_data {
            // Imported keys never carry local key material.
            key.public_key = None;
        }
    }
}

impl Store {
    /// Append a new SSH key.
    pub fn ssh_key_create(&mut self, key: SshKey) {
        self.config.ssh_keys.push(key);
        self.update();
    }

    /// Save an SSH key, propagating a rename into deployment key lists.
    pub fn ssh_key_save(&mut self, prev: &str, key: SshKey) {
        let Some(index) = self
            .config
            .ssh_keys
            .iter()
            .position(|candidate| candidate.name == prev)
        else {
            return;
        };
        if key.name != prev {
            for vsi in &mut self.config.vsi {
                for reference in &mut vsi.ssh_keys {
                    if reference == prev {
                        *reference = key.name.clone();
                    }
                }
            }
        }
        self.config.ssh_keys[index] = key;
        self.update();
    }

    /// Delete an SSH key; deployments drop it from their lists on the
    /// update pass.
    pub fn ssh_key_delete(&mut self, name: &str) {
        self.config.ssh_keys.retain(|candidate| candidate.name != name);
        self.update();
    }
}

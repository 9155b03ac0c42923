//! Observability singleton operations: Activity Tracker, LogDNA, Sysdig.

use super::{Store, update_unfound};
use crate::config::{Atracker, Logdna, Sysdig};

pub(super) fn on_store_update(store: &mut Store) {
    let groups = store.config.resource_group_names();
    let cos_names: Vec<String> = store
        .config
        .object_storage
        .iter()
        .map(|cos| cos.name.clone())
        .collect();

    // Activity tracker: the bucket and key must belong to the selected
    // target instance, so a retarget clears them too.
    update_unfound(&groups, &mut store.config.atracker.resource_group);
    update_unfound(&cos_names, &mut store.config.atracker.target_name);
    let target = store.config.atracker.target_name.clone();
    let buckets = super::object_storage::bucket_names(&store.config, target.as_deref());
    let keys = super::object_storage::cos_key_names(&store.config, target.as_deref());
    update_unfound(&buckets, &mut store.config.atracker.bucket);
    update_unfound(&keys, &mut store.config.atracker.cos_key);

    update_unfound(&groups, &mut store.config.logdna.resource_group);
    update_unfound(&cos_names, &mut store.config.logdna.cos);
    let logdna_cos = store.config.logdna.cos.clone();
    let logdna_buckets =
        super::object_storage::bucket_names(&store.config, logdna_cos.as_deref());
    update_unfound(&logdna_buckets, &mut store.config.logdna.bucket);

    update_unfound(&groups, &mut store.config.sysdig.resource_group);
}

impl Store {
    /// Save the Activity Tracker configuration.
    pub fn atracker_save(&mut self, atracker: Atracker) {
        self.config.atracker = atracker;
        self.update();
    }

    /// Save the LogDNA configuration.
    pub fn logdna_save(&mut self, logdna: Logdna) {
        self.config.logdna = logdna;
        self.update();
    }

    /// Save the Sysdig configuration.
    pub fn sysdig_save(&mut self, sysdig: Sysdig) {
        self.config.sysdig = sysdig;
        self.update();
    }
}

//! Global options operations.

use super::Store;
use crate::config::GlobalOptions;

impl Store {
    /// Save global options. Zone count is clamped to the supported 1..=3
    /// range; everything else is taken as-is.
    pub fn options_save(&mut self, mut options: GlobalOptions) {
        options.zones = options.zones.clamp(1, 3);
        self.config.options = options;
        self.update();
    }
}

//! Global configuration options (`_options`).

use serde::{Deserialize, Serialize};

/// Global parameters applied across the landing zone.
///
/// Lives at the reserved `_options` key of the document. Every compiler may
/// read these (region, prefix, tags); the state store's options hooks keep
/// the zone count within 1..=3 and propagate tag changes to nothing - tags
/// are referenced at compile time only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalOptions {
    /// Name prefix prepended to every provisioned resource.
    pub prefix: String,
    /// IBM Cloud region resources are provisioned in.
    pub region: String,
    /// Number of availability zones used by subnet tiers (1..=3).
    #[serde(default = "default_zones")]
    pub zones: u8,
    /// Tags applied to every taggable resource.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Service endpoint visibility: `private`, `public`, or
    /// `public-and-private`.
    #[serde(default = "default_endpoints")]
    pub endpoints: String,
    /// Account id, needed only by account-scoped resources.
    #[serde(default)]
    pub account_id: Option<String>,
    /// When set, subnet CIDRs are recomputed from tier layout instead of
    /// being hand-managed.
    #[serde(default)]
    pub dynamic_subnets: bool,
}

fn default_zones() -> u8 {
    3
}

fn default_endpoints() -> String {
    "private".to_string()
}

impl Default for GlobalOptions {
    fn default() -> Self {
        Self {
            prefix: "lz".to_string(),
            region: "us-south".to_string(),
            zones: 3,
            tags: vec!["lzforge".to_string(), "landing-zone".to_string()],
            endpoints: "private".to_string(),
            account_id: None,
            dynamic_subnets: false,
        }
    }
}

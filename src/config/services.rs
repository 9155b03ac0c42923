//! Service entity families: resource groups, key management, object storage,
//! observability singletons, identity, secrets, and messaging.
//!
//! Every named entity carries a `name` that is unique within its family (or
//! within its parent scope for nested lists such as encryption keys and
//! buckets). Fields whose value must equal another entity's `name` are plain
//! `Option<String>` foreign references; the state store heals them when the
//! referenced entity disappears.

use serde::{Deserialize, Serialize};

/// A resource group, either managed by this configuration or imported
/// (`use_data`) from the target account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceGroup {
    /// Symbolic name, unique across resource groups.
    pub name: String,
    /// Reference an existing group instead of creating one.
    #[serde(default)]
    pub use_data: bool,
    /// Prepend the global prefix to the provisioned group name.
    #[serde(default)]
    pub use_prefix: bool,
}

/// A key-management (KMS) service instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyManagement {
    pub name: String,
    /// Foreign reference to a [`ResourceGroup`].
    #[serde(default)]
    pub resource_group: Option<String>,
    /// Reference an existing instance instead of creating one.
    #[serde(default)]
    pub use_data: bool,
    /// Use Hyper Protect Crypto Services instead of Key Protect.
    #[serde(default)]
    pub use_hs_crypto: bool,
    /// Create the server-protect authorization for VPC block storage.
    #[serde(default)]
    pub authorize_vpc_reader_role: bool,
    /// Encryption keys owned by this instance.
    #[serde(default)]
    pub keys: Vec<KmsKey>,
}

/// An encryption key within a key-management instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KmsKey {
    /// Key name, unique within the parent instance.
    pub name: String,
    /// Key ring the key is placed in.
    #[serde(default)]
    pub key_ring: Option<String>,
    /// Root key (true) or standard key (false).
    #[serde(default)]
    pub root_key: bool,
    #[serde(default)]
    pub force_delete: Option<bool>,
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Rotation interval in months.
    #[serde(default = "default_rotation")]
    pub rotation: u32,
    #[serde(default)]
    pub dual_auth_delete: bool,
}

fn default_rotation() -> u32 {
    12
}

/// An object storage (COS) service instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectStorage {
    pub name: String,
    /// Foreign reference to a [`ResourceGroup`].
    #[serde(default)]
    pub resource_group: Option<String>,
    /// Foreign reference to a [`KeyManagement`] instance encrypting buckets.
    #[serde(default)]
    pub kms: Option<String>,
    #[serde(default = "default_cos_plan")]
    pub plan: String,
    /// Reference an existing instance instead of creating one.
    #[serde(default)]
    pub use_data: bool,
    /// Append a random suffix to bucket and key names at apply time.
    #[serde(default)]
    pub use_random_suffix: bool,
    #[serde(default)]
    pub buckets: Vec<CosBucket>,
    #[serde(default)]
    pub keys: Vec<CosKey>,
}

fn default_cos_plan() -> String {
    "standard".to_string()
}

/// A bucket within an object storage instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CosBucket {
    /// Bucket name, unique within the parent instance.
    pub name: String,
    #[serde(default = "default_storage_class")]
    pub storage_class: String,
    /// Foreign reference to a [`KmsKey`] of the parent's `kms` instance.
    #[serde(default)]
    pub kms_key: Option<String>,
    #[serde(default = "default_bucket_endpoint")]
    pub endpoint: String,
}

fn default_storage_class() -> String {
    "standard".to_string()
}

fn default_bucket_endpoint() -> String {
    "public".to_string()
}

/// A resource key bound to an object storage instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CosKey {
    /// Key name, unique within the parent instance.
    pub name: String,
    #[serde(default = "default_cos_role")]
    pub role: String,
    /// Generate HMAC credentials for the key.
    #[serde(default)]
    pub enable_hmac: bool,
}

fn default_cos_role() -> String {
    "Writer".to_string()
}

/// Activity Tracker configuration (singleton).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Atracker {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub name: String,
    /// Target type; only `cos` targets are generated.
    #[serde(rename = "type", default)]
    pub target_type: String,
    /// Foreign reference to an [`ObjectStorage`] instance.
    #[serde(default)]
    pub target_name: Option<String>,
    /// Foreign reference to a bucket of `target_name`.
    #[serde(default)]
    pub bucket: Option<String>,
    /// Foreign reference to a key of `target_name`.
    #[serde(default)]
    pub cos_key: Option<String>,
    /// Create the account route to the target.
    #[serde(default)]
    pub add_route: bool,
    /// Route locations, e.g. `["global", "us-south"]`.
    #[serde(default)]
    pub locations: Vec<String>,
    /// Provision a LogDNA-backed instance for event review.
    #[serde(default)]
    pub instance: bool,
    #[serde(default)]
    pub plan: Option<String>,
    #[serde(default)]
    pub resource_group: Option<String>,
    /// Archive events to the COS bucket via the logdna provider.
    #[serde(default)]
    pub archive: bool,
}

/// LogDNA logging configuration (singleton).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Logdna {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub plan: Option<String>,
    #[serde(default)]
    pub resource_group: Option<String>,
    /// Collect platform logs in addition to application logs.
    #[serde(default)]
    pub platform_logs: bool,
    #[serde(default = "default_logdna_role")]
    pub role: String,
    /// Foreign reference to an [`ObjectStorage`] instance used for archive.
    #[serde(default)]
    pub cos: Option<String>,
    /// Foreign reference to a bucket of `cos`.
    #[serde(default)]
    pub bucket: Option<String>,
    /// Archive logs to the COS bucket via the logdna provider.
    #[serde(default)]
    pub archive: bool,
}

fn default_logdna_role() -> String {
    "Manager".to_string()
}

/// Sysdig monitoring configuration (singleton).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Sysdig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub plan: Option<String>,
    #[serde(default)]
    pub resource_group: Option<String>,
    #[serde(default)]
    pub platform_logs: bool,
}

/// An AppID identity instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppId {
    pub name: String,
    #[serde(default)]
    pub use_data: bool,
    #[serde(default)]
    pub resource_group: Option<String>,
    #[serde(default)]
    pub keys: Vec<AppIdKey>,
}

/// A resource key bound to an AppID instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppIdKey {
    /// Parent instance name.
    pub appid: String,
    /// Key name, unique within the parent instance.
    pub name: String,
}

/// A Secrets Manager instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecretsManager {
    pub name: String,
    #[serde(default)]
    pub resource_group: Option<String>,
    /// Foreign reference to a [`KeyManagement`] instance.
    #[serde(default)]
    pub kms: Option<String>,
    /// Foreign reference to a [`KmsKey`] of `kms`.
    #[serde(default)]
    pub encryption_key: Option<String>,
    #[serde(default)]
    pub secrets: Vec<SmSecret>,
}

/// A secret stored in a Secrets Manager instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmSecret {
    /// Secret name, unique within the parent instance.
    pub name: String,
    /// Parent instance name.
    #[serde(default)]
    pub secrets_manager: Option<String>,
    /// `kv`, `arbitrary`, or `imported` (certificate via variable).
    #[serde(rename = "type", default = "default_secret_type")]
    pub secret_type: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Foreign reference to a [`CosKey`] providing the credential payload.
    #[serde(default)]
    pub credentials: Option<String>,
    /// Foreign reference to the [`ObjectStorage`] instance owning the key.
    #[serde(default)]
    pub credential_instance: Option<String>,
}

fn default_secret_type() -> String {
    "kv".to_string()
}

/// An Event Streams messaging instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventStreams {
    pub name: String,
    /// `lite`, `standard`, or `enterprise-3nodes-2tb`.
    pub plan: String,
    #[serde(default)]
    pub resource_group: Option<String>,
    /// Enterprise plan only.
    #[serde(default)]
    pub endpoints: Option<String>,
    /// Enterprise plan only, e.g. `150MB/s`.
    #[serde(default)]
    pub throughput: Option<String>,
    /// Enterprise plan only, e.g. `2TB`.
    #[serde(default)]
    pub storage_size: Option<String>,
    /// Enterprise plan only: allowed private CIDRs.
    #[serde(default)]
    pub private_ip_allowlist: Option<Vec<String>>,
}

/// Security and Compliance Center posture settings (singleton).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Scc {
    #[serde(default)]
    pub enable: bool,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_scc_location")]
    pub location: String,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub collector_description: Option<String>,
    #[serde(default)]
    pub scope_description: Option<String>,
    #[serde(default)]
    pub credential_description: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub passphrase: Option<String>,
}

fn default_scc_location() -> String {
    "us".to_string()
}

/// IAM account settings (singleton).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct IamAccountSettings {
    #[serde(default)]
    pub enable: bool,
    #[serde(default)]
    pub mfa: Option<String>,
    /// Comma-separated IPv4 addresses/CIDRs allowed to authenticate.
    #[serde(default)]
    pub allowed_ip_addresses: Option<String>,
    #[serde(default)]
    pub include_history: bool,
    #[serde(default)]
    pub if_match: Option<String>,
    #[serde(default)]
    pub max_sessions_per_identity: Option<u32>,
    #[serde(default)]
    pub restrict_create_service_id: Option<String>,
    #[serde(default)]
    pub restrict_create_platform_apikey: Option<String>,
    #[serde(default)]
    pub session_expiration_in_seconds: Option<u32>,
    #[serde(default)]
    pub session_invalidation_in_seconds: Option<u32>,
}

/// An SSH key used by virtual server deployments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SshKey {
    pub name: String,
    /// Public key material; provisioned through a sensitive variable, absent
    /// when `use_data` is set.
    #[serde(default)]
    pub public_key: Option<String>,
    #[serde(default)]
    pub resource_group: Option<String>,
    #[serde(default)]
    pub use_data: bool,
}

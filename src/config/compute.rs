//! Compute entity families: clusters, virtual server deployments, and load
//! balancers.

use serde::{Deserialize, Serialize};

/// A container cluster (IKS or OpenShift).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    pub name: String,
    /// Foreign reference to a VPC.
    #[serde(default)]
    pub vpc: Option<String>,
    /// `iks` or `openshift`.
    pub kube_type: String,
    #[serde(default)]
    pub kube_version: Option<String>,
    /// Worker machine flavor, e.g. `bx2.16x64`.
    #[serde(default)]
    pub flavor: Option<String>,
    /// Foreign references to subnets of `vpc`; one zone block per subnet.
    #[serde(default)]
    pub subnets: Vec<String>,
    #[serde(default = "default_workers")]
    pub workers_per_subnet: u32,
    #[serde(default)]
    pub resource_group: Option<String>,
    /// Foreign reference to a key management instance.
    #[serde(default)]
    pub kms: Option<String>,
    /// Foreign reference to a key of `kms` for cluster encryption.
    #[serde(default)]
    pub encryption_key: Option<String>,
    /// OpenShift only: foreign reference to an object storage instance
    /// backing the internal registry.
    #[serde(default)]
    pub cos: Option<String>,
    /// OpenShift entitlement, e.g. `cloud_pak`.
    #[serde(default)]
    pub entitlement: Option<String>,
    #[serde(default)]
    pub update_all_workers: bool,
    #[serde(default)]
    pub private_endpoint: bool,
    #[serde(default)]
    pub worker_pools: Vec<WorkerPool>,
}

fn default_workers() -> u32 {
    2
}

/// An additional worker pool attached to a cluster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerPool {
    /// Pool name, unique within the parent cluster.
    pub name: String,
    /// Parent cluster name.
    pub cluster: String,
    /// Parent cluster's VPC.
    #[serde(default)]
    pub vpc: Option<String>,
    /// Foreign references to subnets of `vpc`.
    #[serde(default)]
    pub subnets: Vec<String>,
    #[serde(default)]
    pub flavor: Option<String>,
    #[serde(default = "default_workers")]
    pub workers_per_subnet: u32,
    #[serde(default)]
    pub entitlement: Option<String>,
}

/// A virtual server deployment. One deployment expands into
/// `subnets.len() * vsi_per_subnet` compiled instances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vsi {
    pub name: String,
    /// Foreign reference to a VPC.
    pub vpc: String,
    /// Foreign references to subnets of `vpc`.
    #[serde(default)]
    pub subnets: Vec<String>,
    #[serde(default = "default_vsi_per_subnet")]
    pub vsi_per_subnet: u32,
    /// Image name; resolved through an `ibm_is_image` data source.
    pub image: String,
    /// Instance profile, e.g. `cx2-4x8`.
    pub profile: String,
    #[serde(default)]
    pub resource_group: Option<String>,
    /// Foreign references to security groups of `vpc`.
    #[serde(default)]
    pub security_groups: Vec<String>,
    /// Foreign references to SSH keys.
    #[serde(default)]
    pub ssh_keys: Vec<String>,
    /// Foreign reference to a key management instance for boot volume
    /// encryption.
    #[serde(default)]
    pub kms: Option<String>,
    /// Foreign reference to a key of `kms`.
    #[serde(default)]
    pub encryption_key: Option<String>,
    #[serde(default)]
    pub user_data: Option<String>,
    #[serde(default)]
    pub enable_floating_ip: bool,
    /// Reserved IP addresses indexed `[subnet][replica]`; entries may be
    /// absent for replicas without a reservation.
    #[serde(default)]
    pub reserved_ips: Option<Vec<Vec<Option<String>>>>,
    /// Secondary network interfaces.
    #[serde(default)]
    pub network_interfaces: Vec<NetworkInterface>,
    /// Block storage volumes attached to every replica.
    #[serde(default)]
    pub volumes: Vec<VsiVolume>,
}

fn default_vsi_per_subnet() -> u32 {
    1
}

/// A secondary network interface on a virtual server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkInterface {
    /// Foreign reference to a subnet of the deployment's VPC.
    pub subnet: String,
    /// Foreign references to security groups of the deployment's VPC.
    #[serde(default)]
    pub security_groups: Vec<String>,
}

/// A block storage volume attached to each replica of a deployment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VsiVolume {
    /// Volume name, unique within the parent deployment.
    pub name: String,
    #[serde(default = "default_volume_profile")]
    pub profile: String,
    #[serde(default)]
    pub capacity: Option<u32>,
    #[serde(default)]
    pub iops: Option<u64>,
    /// Foreign reference to a key of the deployment's `kms` instance.
    #[serde(default)]
    pub encryption_key: Option<String>,
}

fn default_volume_profile() -> String {
    "general-purpose".to_string()
}

/// A load balancer fronting one or more virtual server deployments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadBalancer {
    pub name: String,
    /// Foreign reference to a VPC.
    pub vpc: String,
    /// `public` or `private`.
    #[serde(rename = "type")]
    pub lb_type: String,
    /// Foreign references to subnets of `vpc`.
    #[serde(default)]
    pub subnets: Vec<String>,
    /// Foreign references to security groups of `vpc`.
    #[serde(default)]
    pub security_groups: Vec<String>,
    #[serde(default)]
    pub resource_group: Option<String>,
    /// Foreign references to virtual server deployments; pool members fan
    /// out through each deployment's subnet and replica expansion.
    #[serde(default)]
    pub target_vsi: Vec<String>,
    /// Pool member port.
    pub port: u16,
    pub listener_port: u16,
    /// `http`, `https`, `tcp`, or `udp`.
    pub listener_protocol: String,
    #[serde(default)]
    pub connection_limit: Option<u32>,
    /// `round_robin`, `weighted_round_robin`, or `least_connections`.
    pub algorithm: String,
    /// Pool protocol: `http`, `https`, `tcp`, or `udp`.
    pub protocol: String,
    pub health_delay: u32,
    pub health_retries: u32,
    pub health_timeout: u32,
    /// `http`, `https`, or `tcp`.
    pub health_type: String,
    #[serde(default)]
    pub proxy_protocol: Option<String>,
    /// `source_ip`, `app_cookie`, or `http_cookie`.
    #[serde(default)]
    pub session_persistence_type: Option<String>,
    /// Only emitted when `session_persistence_type` is `app_cookie`.
    #[serde(default)]
    pub session_persistence_app_cookie_name: Option<String>,
}

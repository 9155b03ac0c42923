//! The file assembler: one call turns a configuration document into the
//! complete set of generated files.
//!
//! Files map to `Option<FileContent>`: `None` records an intentionally
//! omitted file (empty family, disabled singleton) so callers can
//! distinguish "nothing to render" from "forgot to render". Per-VPC modules
//! nest their own file maps under the module directory name.

use crate::config::Config;
use crate::core::ForgeError;
use crate::tf::block::{Attrs, TfValue, labelled_block};
use crate::tf::util::{rg_id_ref, snake_case, tf_block, tf_done};
use crate::tf::vpc::{vpc_module_files, vpc_symbol};
use anyhow::Result;
use std::collections::BTreeMap;

/// Content of one generated file.
#[derive(Debug, Clone, PartialEq)]
pub enum FileContent {
    /// A single text file.
    Text(String),
    /// A module directory of file name to text.
    Module(BTreeMap<String, String>),
}

/// The assembled output: file name to content, `None` for omitted files.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileSet {
    files: BTreeMap<String, Option<FileContent>>,
}

impl FileSet {
    fn insert_text(&mut self, name: &str, text: String) {
        self.files.insert(name.to_string(), Some(FileContent::Text(text)));
    }

    fn insert_optional(&mut self, name: &str, text: Option<String>) {
        self.files.insert(name.to_string(), text.map(FileContent::Text));
    }

    /// Insert a file only when the backing entity list is non-empty.
    fn insert_unless_empty(&mut self, name: &str, empty: bool, render: impl FnOnce() -> String) {
        let content = if empty { None } else { Some(render()) };
        self.insert_optional(name, content);
    }

    /// The content for a file name; `None` when the file is omitted or was
    /// never part of the set.
    pub fn get(&self, name: &str) -> Option<&FileContent> {
        self.files.get(name).and_then(Option::as_ref)
    }

    /// The text of a file; `None` for omitted, missing, or module entries.
    pub fn text(&self, name: &str) -> Option<&str> {
        match self.get(name) {
            Some(FileContent::Text(text)) => Some(text),
            _ => None,
        }
    }

    /// The nested file map of a module directory.
    pub fn module(&self, name: &str) -> Option<&BTreeMap<String, String>> {
        match self.get(name) {
            Some(FileContent::Module(files)) => Some(files),
            _ => None,
        }
    }

    /// Whether a file key exists in the set but is intentionally omitted.
    pub fn is_omitted(&self, name: &str) -> bool {
        matches!(self.files.get(name), Some(None))
    }

    /// Iterate over every present file.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &FileContent)> {
        self.files
            .iter()
            .filter_map(|(name, content)| content.as_ref().map(|content| (name, content)))
    }
}

/// Compile the root `main.tf`: the IBM provider plus one module block per
/// VPC, wiring region, prefix, tags, and resource group ids.
fn main_tf(config: &Config) -> String {
    let mut provider = Attrs::new();
    provider
        .add("ibmcloud_api_key", TfValue::expr("var.ibmcloud_api_key"))
        .add("region", TfValue::expr("var.region"));
    let mut tf = tf_block("providers", &labelled_block("provider", &["ibm"], &provider)) + "\n";

    let mut module_body = String::new();
    for vpc in &config.vpcs {
        let mut attrs = Attrs::new();
        attrs
            .add("source", TfValue::str(format!("./{}", vpc_symbol(vpc))))
            .add("region", TfValue::expr("var.region"))
            .add("prefix", TfValue::expr("var.prefix"))
            .add("tags", TfValue::expr("var.tags"));
        for rg in crate::tf::vpc::module_resource_group_names(vpc, config) {
            attrs.add(format!("{}_id", snake_case(&rg)), rg_id_ref(Some(&rg), config));
        }
        let label = vpc_symbol(vpc);
        module_body += &labelled_block("module", &[label.as_str()], &attrs);
    }
    if !module_body.is_empty() {
        tf += &(tf_block("VPC modules", &module_body) + "\n");
    }
    tf_done(&tf)
}

/// Assemble every generated file for a configuration document.
///
/// This is the single entry point the CLI and any embedding UI call after a
/// store mutation. Compilation is pure: calling it twice on the same
/// document yields byte-identical output.
pub fn config_to_files(config: &Config) -> Result<FileSet> {
    if config.vpcs.is_empty() && config.resource_groups.is_empty() && config.options.prefix.is_empty()
    {
        // A default-constructed-then-cleared document is the closest thing
        // to "undefined" a typed API can receive.
        return Err(ForgeError::UndefinedConfiguration.into());
    }
    tracing::debug!(
        vpcs = config.vpcs.len(),
        "assembling terraform file set"
    );
    let mut files = FileSet::default();

    files.insert_text("main.tf", main_tf(config));
    files.insert_text(
        "resource_groups.tf",
        crate::tf::resource_groups::resource_groups_tf(config),
    );
    files.insert_unless_empty(
        "key_management.tf",
        config.key_management.is_empty(),
        || crate::tf::key_management::kms_tf(config),
    );
    files.insert_unless_empty("object_storage.tf", config.object_storage.is_empty(), || {
        crate::tf::object_storage::cos_tf(config)
    });
    files.insert_optional(
        "observability.tf",
        crate::tf::observability::observability_tf(config),
    );
    files.insert_unless_empty("appid.tf", config.appid.is_empty(), || {
        crate::tf::appid::appid_tf(config)
    });
    files.insert_unless_empty(
        "secrets_manager.tf",
        config.secrets_manager.is_empty(),
        || crate::tf::secrets_manager::secrets_manager_tf(config),
    );
    files.insert_unless_empty("event_streams.tf", config.event_streams.is_empty(), || {
        crate::tf::event_streams::event_streams_tf(config)
    });
    files.insert_optional("scc.tf", crate::tf::scc::scc_tf(config));
    files.insert_optional("iam_account_settings.tf", crate::tf::iam::iam_tf(config));
    files.insert_unless_empty("ssh_keys.tf", config.ssh_keys.is_empty(), || {
        crate::tf::ssh_keys::ssh_keys_tf(config)
    });
    files.insert_unless_empty(
        "transit_gateways.tf",
        config.transit_gateways.is_empty(),
        || crate::tf::transit_gateway::tgw_tf(config),
    );
    files.insert_unless_empty("vpn_gateways.tf", config.vpn_gateways.is_empty(), || {
        crate::tf::vpn_gateways::vpn_tf(config)
    });
    files.insert_unless_empty("clusters.tf", config.clusters.is_empty(), || {
        crate::tf::clusters::cluster_tf(config)
    });
    files.insert_unless_empty("virtual_servers.tf", config.vsi.is_empty(), || {
        crate::tf::vsi::vsi_tf(config)
    });
    files.insert_unless_empty("load_balancers.tf", config.load_balancers.is_empty(), || {
        crate::tf::load_balancers::lb_tf(config)
    });
    files.insert_optional("flow_logs.tf", crate::tf::flow_logs::flow_logs_tf(config));
    files.insert_text("variables.tf", crate::tf::variables::variables_tf(config));
    files.insert_text("versions.tf", crate::tf::versions::versions_tf(config));
    // The raw document rides along verbatim so a generated bundle can be
    // re-imported later.
    files
        .files
        .insert("lzforge.json".to_string(), Some(FileContent::Text(config.to_json()?)));

    for vpc in &config.vpcs {
        files.files.insert(
            vpc_symbol(vpc),
            Some(FileContent::Module(vpc_module_files(vpc, config))),
        );
    }
    Ok(files)
}

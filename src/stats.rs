//! Bundler stats model and asset-tree flattening
//!
//! The host bundler hands over its compilation stats as JSON. Only the parts
//! the report needs are modelled here; every other field is ignored and every
//! modelled field has a default, so partial stats from failed builds parse.

use crate::error::ReportError;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::path::Path;

/// One node of the `assets` tree.
///
/// A node is either an emitted file or a meta-asset grouping several emitted
/// files (for example one variant per output format) under `children`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetNode {
    /// Emitted file name, relative to the output path
    #[serde(default)]
    pub name: String,
    /// Node type; `"asset"` marks a concrete file even when it has children
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Whether the file was written during this compilation
    #[serde(default)]
    pub emitted: bool,
    /// Uncompressed size reported by the bundler
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// Grouped assets of a meta-asset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<AssetNode>>,
}

impl AssetNode {
    /// A concrete, childless asset.
    pub fn file(name: impl Into<String>, emitted: bool) -> Self {
        Self {
            name: name.into(),
            kind: Some("asset".to_string()),
            emitted,
            size: None,
            children: None,
        }
    }

    /// A meta-asset grouping `children`.
    pub fn group(name: impl Into<String>, children: Vec<AssetNode>) -> Self {
        Self {
            name: name.into(),
            kind: None,
            emitted: false,
            size: None,
            children: Some(children),
        }
    }

    /// Whether this node is reported as-is rather than expanded.
    pub fn is_leaf(&self) -> bool {
        self.kind.as_deref() == Some("asset")
            || self.children.as_ref().is_none_or(|c| c.is_empty())
    }
}

/// Flatten a list of asset nodes into the concrete assets it contains.
///
/// Traversal is pre-order and order-preserving: each meta-asset is replaced
/// in place by its (recursively flattened) children.
///
/// # Examples
///
/// ```
/// use build_report::stats::{flatten_assets, AssetNode};
///
/// let tree = vec![
///     AssetNode::file("runtime.js", true),
///     AssetNode::group("main", vec![
///         AssetNode::file("main.mjs", true),
///         AssetNode::file("main.cjs", true),
///     ]),
/// ];
///
/// let names: Vec<_> = flatten_assets(&tree).iter().map(|a| a.name.as_str()).collect();
/// assert_eq!(names, ["runtime.js", "main.mjs", "main.cjs"]);
/// ```
pub fn flatten_assets(nodes: &[AssetNode]) -> Vec<&AssetNode> {
    let mut leaves = Vec::with_capacity(nodes.len());
    collect_leaves(nodes, &mut leaves);
    leaves
}

fn collect_leaves<'a>(nodes: &'a [AssetNode], leaves: &mut Vec<&'a AssetNode>) {
    for node in nodes {
        match &node.children {
            Some(children) if !node.is_leaf() => collect_leaves(children, leaves),
            _ => leaves.push(node),
        }
    }
}

/// Location of a diagnostic as reported by the bundler.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticDetails {
    /// Human message, possibly multi-line
    #[serde(default)]
    pub message: String,
    /// Readable name of the module that raised it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module_name: Option<String>,
    /// File the diagnostic points into
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// `line:column` location
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loc: Option<String>,
}

/// A raw compiler warning or error.
///
/// Older bundlers emit plain strings, newer ones structured objects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Diagnostic {
    /// Pre-formatted message
    Text(String),
    /// Structured message with module context
    Detailed(DiagnosticDetails),
}

impl Diagnostic {
    /// Message body without module context.
    pub fn message(&self) -> &str {
        match self {
            Diagnostic::Text(text) => text,
            Diagnostic::Detailed(details) => &details.message,
        }
    }
}

impl From<&str> for Diagnostic {
    fn from(text: &str) -> Self {
        Diagnostic::Text(text.to_string())
    }
}

/// Stats of a single compilation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildStats {
    /// Compiler name in multi-target configurations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Compilation time in milliseconds
    #[serde(default)]
    pub time: u64,
    /// Asset tree, possibly containing meta-assets
    #[serde(default)]
    pub assets: Vec<AssetNode>,
    /// Compilation errors
    #[serde(default)]
    pub errors: Vec<Diagnostic>,
    /// Compilation warnings
    #[serde(default)]
    pub warnings: Vec<Diagnostic>,
}

/// Stats of several compilations run together.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiStats {
    /// One entry per sub-compilation
    pub stats: Vec<BuildStats>,
}

/// Stats delivered to the `done` hook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Stats {
    /// Several sub-compilations
    Multi(MultiStats),
    /// A single compilation
    Single(BuildStats),
}

impl Stats {
    /// Parse stats JSON as written by the bundler.
    ///
    /// Multi-compilation stats are accepted as `{"stats": [...]}` and as the
    /// `{"children": [...]}` shape `webpack --json` writes for several
    /// configurations. A single compilation keeps its own `children` (child
    /// compilers) and is not mistaken for the latter.
    pub fn from_json(json: &str) -> Result<Self, ReportError> {
        Self::parse(json, "<inline>")
    }

    /// Read and parse a stats JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ReportError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ReportError::Io {
            context: format!("reading stats file {}", path.display()),
            source,
        })?;
        Self::parse(&contents, &path.display().to_string())
    }

    fn parse(contents: &str, origin: &str) -> Result<Self, ReportError> {
        let invalid = |source: serde_json::Error| ReportError::InvalidStats {
            origin: origin.to_string(),
            source,
        };

        let value: Value = serde_json::from_str(contents).map_err(invalid)?;
        let value = match value {
            Value::Object(mut map) if is_multi_config_output(&map) => {
                let children = map.remove("children").unwrap_or_default();
                json!({ "stats": children })
            }
            other => other,
        };
        serde_json::from_value(value).map_err(invalid)
    }

    /// All sub-compilations; a single compilation yields itself.
    pub fn compilations(&self) -> &[BuildStats] {
        match self {
            Stats::Multi(multi) => &multi.stats,
            Stats::Single(single) => std::slice::from_ref(single),
        }
    }

    /// Flattened concrete assets across every sub-compilation.
    pub fn assets(&self) -> Vec<&AssetNode> {
        self.compilations()
            .iter()
            .flat_map(|c| flatten_assets(&c.assets))
            .collect()
    }

    /// Wall time of the run: the slowest sub-compilation.
    pub fn time(&self) -> u64 {
        self.compilations()
            .iter()
            .map(|c| c.time)
            .max()
            .unwrap_or(0)
    }

    /// Errors of every sub-compilation, in order.
    pub fn errors(&self) -> Vec<&Diagnostic> {
        self.compilations()
            .iter()
            .flat_map(|c| c.errors.iter())
            .collect()
    }

    /// Warnings of every sub-compilation, in order.
    pub fn warnings(&self) -> Vec<&Diagnostic> {
        self.compilations()
            .iter()
            .flat_map(|c| c.warnings.iter())
            .collect()
    }
}

/// `webpack --json` with several configurations nests each compilation under
/// `children` and has no top-level `assets`.
fn is_multi_config_output(map: &Map<String, Value>) -> bool {
    !map.contains_key("stats")
        && !map.contains_key("assets")
        && map
            .get("children")
            .and_then(Value::as_array)
            .is_some_and(|children| !children.is_empty())
}

impl From<BuildStats> for Stats {
    fn from(stats: BuildStats) -> Self {
        Stats::Single(stats)
    }
}

impl From<Vec<BuildStats>> for Stats {
    fn from(stats: Vec<BuildStats>) -> Self {
        Stats::Multi(MultiStats { stats })
    }
}

//! File-backed operation registry.
//!
//! A manifest describes the operation class tree as data, so declarations can
//! be generated without linking against the library that owns the operations.
//! JSON, YAML and TOML are accepted; the format follows the file extension.
//!
//! ```toml
//! root = "VipsOperation"
//! enums = ["VipsOperationMath"]
//!
//! [[classes]]
//! name = "VipsOperation"
//! abstract = true
//!
//! [[classes]]
//! name = "VipsInvert"
//! parent = "VipsOperation"
//!
//! [[classes.arguments]]
//! name = "in"
//! type = "VipsImage"
//! flags = ["required", "input"]
//! priority = 0
//! ```

use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::{ArgumentFlags, OperationRegistry, Property, ValueTypeKind};
use crate::error::{GenerateError, Result};

/// Serialization format of a manifest file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestFormat {
    /// `.json`
    Json,
    /// `.yaml` or `.yml`
    Yaml,
    /// `.toml`
    Toml,
}

impl ManifestFormat {
    /// Pick the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }
}

/// One argument flag as spelled in a manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArgumentFlag {
    /// Maps to [`ArgumentFlags::REQUIRED`].
    Required,
    /// Maps to [`ArgumentFlags::CONSTRUCT`].
    Construct,
    /// Maps to [`ArgumentFlags::INPUT`].
    Input,
    /// Maps to [`ArgumentFlags::OUTPUT`].
    Output,
    /// Maps to [`ArgumentFlags::DEPRECATED`].
    Deprecated,
    /// Maps to [`ArgumentFlags::MODIFY`].
    Modify,
}

impl From<ArgumentFlag> for ArgumentFlags {
    fn from(flag: ArgumentFlag) -> Self {
        match flag {
            ArgumentFlag::Required => Self::REQUIRED,
            ArgumentFlag::Construct => Self::CONSTRUCT,
            ArgumentFlag::Input => Self::INPUT,
            ArgumentFlag::Output => Self::OUTPUT,
            ArgumentFlag::Deprecated => Self::DEPRECATED,
            ArgumentFlag::Modify => Self::MODIFY,
        }
    }
}

/// An operation argument in a manifest.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArgumentSpec {
    /// Argument name.
    pub name: String,
    /// Value-type identifier.
    #[serde(rename = "type")]
    pub value_type: String,
    /// Argument flags.
    #[serde(default)]
    pub flags: Vec<ArgumentFlag>,
    /// Sort priority; lower first.
    #[serde(default)]
    pub priority: i32,
}

impl ArgumentSpec {
    /// The flags folded into a set.
    pub fn flag_set(&self) -> ArgumentFlags {
        self.flags
            .iter()
            .fold(ArgumentFlags::empty(), |acc, flag| acc | ArgumentFlags::from(*flag))
    }
}

/// An operation class in a manifest.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClassSpec {
    /// Class name, unique within the manifest.
    pub name: String,
    /// Abstract classes are never declared.
    #[serde(rename = "abstract", default)]
    pub is_abstract: bool,
    /// Function name; derived from `name` when absent.
    #[serde(default)]
    pub nickname: Option<String>,
    /// Name of the parent class.
    #[serde(default)]
    pub parent: Option<String>,
    /// Names of child classes.
    #[serde(default)]
    pub children: Vec<String>,
    /// Arguments, in registration order.
    #[serde(default)]
    pub arguments: Vec<ArgumentSpec>,
}

impl ClassSpec {
    /// The explicit nickname, or one derived from the class name.
    pub fn nickname(&self) -> String {
        self.nickname
            .clone()
            .unwrap_or_else(|| default_nickname(&self.name))
    }
}

/// Derive a nickname from a class name: lower-case, without a `vips` prefix.
pub fn default_nickname(class_name: &str) -> String {
    let lower = class_name.to_ascii_lowercase();
    match lower.strip_prefix("vips") {
        Some(rest) if !rest.is_empty() => rest.to_string(),
        _ => lower,
    }
}

/// The deserialized manifest document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// Name of the root class.
    pub root: String,
    /// Value types that are enumerations.
    #[serde(default)]
    pub enums: Vec<String>,
    /// All classes, in registration order.
    #[serde(default)]
    pub classes: Vec<ClassSpec>,
}

impl Manifest {
    /// Parse a manifest from text. `path` is only used in error messages.
    pub fn parse(contents: &str, format: ManifestFormat, path: &Path) -> Result<Self> {
        let parsed = match format {
            ManifestFormat::Json => serde_json::from_str(contents).map_err(|e| e.to_string()),
            ManifestFormat::Yaml => serde_yaml::from_str(contents).map_err(|e| e.to_string()),
            ManifestFormat::Toml => toml::from_str(contents).map_err(|e| e.to_string()),
        };
        parsed.map_err(|message| manifest_error(path, message))
    }

    /// Read and parse the manifest at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let format = ManifestFormat::from_path(path).ok_or_else(|| {
            manifest_error(path, "unsupported extension, expected .json, .yaml, .yml or .toml")
        })?;
        let contents = fs::read_to_string(path)
            .map_err(|err| manifest_error(path, format!("failed to read file: {err}")))?;
        Self::parse(&contents, format, path)
    }
}

fn manifest_error(path: &Path, message: impl Into<String>) -> GenerateError {
    GenerateError::Manifest {
        path: path.to_path_buf(),
        message: message.into(),
    }
}

/// Handle to a class of a [`ManifestRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClassId(usize);

/// An instantiated concrete class of a [`ManifestRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManifestOperation {
    class: ClassId,
}

#[derive(Debug, Clone)]
struct ClassNode {
    spec: ClassSpec,
    parent: Option<ClassId>,
    children: Vec<ClassId>,
}

/// [`OperationRegistry`] backed by a validated [`Manifest`].
///
/// Validation guarantees a single-rooted tree: every class has at most one
/// parent and every class is reachable from the root.
#[derive(Debug, Clone)]
pub struct ManifestRegistry {
    source: PathBuf,
    classes: Vec<ClassNode>,
    root: ClassId,
    enums: HashSet<String>,
}

impl ManifestRegistry {
    /// Load and validate the manifest at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let manifest = Manifest::load(path)?;
        Self::from_manifest(manifest, path)
    }

    /// Validate `manifest` and index its class tree.
    pub fn from_manifest(manifest: Manifest, path: &Path) -> Result<Self> {
        let mut index = HashMap::new();
        for (idx, class) in manifest.classes.iter().enumerate() {
            if index.insert(class.name.clone(), ClassId(idx)).is_some() {
                return Err(manifest_error(
                    path,
                    format!("duplicate class '{}'", class.name),
                ));
            }
            validate_class(class, path)?;
        }

        let lookup = |name: &str| {
            index
                .get(name)
                .copied()
                .ok_or_else(|| manifest_error(path, format!("unknown class '{name}'")))
        };

        // Children and parent declarations both append in document order.
        let mut links = Vec::new();
        for (idx, class) in manifest.classes.iter().enumerate() {
            for child in &class.children {
                links.push((ClassId(idx), lookup(child)?));
            }
            if let Some(parent) = &class.parent {
                links.push((lookup(parent)?, ClassId(idx)));
            }
        }

        let root = lookup(&manifest.root)?;
        let mut classes: Vec<ClassNode> = manifest
            .classes
            .into_iter()
            .map(|spec| ClassNode {
                spec,
                parent: None,
                children: Vec::new(),
            })
            .collect();

        for (parent, child) in links {
            match classes[child.0].parent {
                Some(existing) if existing == parent => {
                    return Err(manifest_error(
                        path,
                        format!(
                            "class '{}' is linked to parent '{}' twice",
                            classes[child.0].spec.name, classes[parent.0].spec.name
                        ),
                    ));
                }
                Some(existing) => {
                    return Err(manifest_error(
                        path,
                        format!(
                            "class '{}' has two parents: '{}' and '{}'",
                            classes[child.0].spec.name,
                            classes[existing.0].spec.name,
                            classes[parent.0].spec.name
                        ),
                    ));
                }
                None => {
                    classes[child.0].parent = Some(parent);
                    classes[parent.0].children.push(child);
                }
            }
        }

        if let Some(parent) = classes[root.0].parent {
            return Err(manifest_error(
                path,
                format!(
                    "root class '{}' has parent '{}'",
                    classes[root.0].spec.name, classes[parent.0].spec.name
                ),
            ));
        }

        let reachable = reachable_from(&classes, root);
        if let Some(orphan) = classes
            .iter()
            .enumerate()
            .find(|(idx, _)| !reachable.contains(&ClassId(*idx)))
        {
            return Err(manifest_error(
                path,
                format!(
                    "class '{}' is not reachable from root '{}'",
                    orphan.1.spec.name, manifest.root
                ),
            ));
        }

        debug!(
            manifest = %path.display(),
            classes = classes.len(),
            enums = manifest.enums.len(),
            "Loaded registry manifest."
        );

        Ok(Self {
            source: path.to_path_buf(),
            classes,
            root,
            enums: manifest.enums.into_iter().collect(),
        })
    }

    /// Path the manifest was loaded from.
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Number of classes in the tree.
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Whether the tree has no classes. Never true for a validated manifest.
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Name of a class.
    pub fn class_name(&self, class: ClassId) -> Result<&str> {
        Ok(&self.node(class)?.spec.name)
    }

    fn node(&self, class: ClassId) -> Result<&ClassNode> {
        self.classes
            .get(class.0)
            .ok_or_else(|| GenerateError::RegistryAccess(format!("no class with id {}", class.0)))
    }

    fn argument(&self, operation: &ManifestOperation, property: &str) -> Result<&ArgumentSpec> {
        let node = self.node(operation.class)?;
        node.spec
            .arguments
            .iter()
            .find(|arg| arg.name == property)
            .ok_or_else(|| {
                GenerateError::RegistryAccess(format!(
                    "operation '{}' has no argument '{property}'",
                    node.spec.name
                ))
            })
    }
}

/// Per-class checks: a usable nickname and unique argument names.
fn validate_class(class: &ClassSpec, path: &Path) -> Result<()> {
    if class.nickname().is_empty() {
        return Err(manifest_error(
            path,
            format!("class '{}' has an empty nickname", class.name),
        ));
    }

    let mut names = HashSet::new();
    for argument in &class.arguments {
        if !names.insert(argument.name.as_str()) {
            return Err(manifest_error(
                path,
                format!(
                    "class '{}' declares argument '{}' twice",
                    class.name, argument.name
                ),
            ));
        }
    }
    Ok(())
}

/// Every class reachable from `root`. The walk stops at classes already seen,
/// so a malformed parent chain cannot loop.
fn reachable_from(classes: &[ClassNode], root: ClassId) -> HashSet<ClassId> {
    let mut seen = HashSet::new();
    let mut stack = vec![root];
    while let Some(id) = stack.pop() {
        if seen.insert(id) {
            stack.extend(classes[id.0].children.iter().copied());
        }
    }
    seen
}

impl OperationRegistry for ManifestRegistry {
    type Class = ClassId;
    type Operation = ManifestOperation;

    fn root(&self) -> Result<ClassId> {
        Ok(self.root)
    }

    fn is_abstract(&self, class: &ClassId) -> Result<bool> {
        Ok(self.node(*class)?.spec.is_abstract)
    }

    fn children(&self, class: &ClassId) -> Result<Vec<ClassId>> {
        Ok(self.node(*class)?.children.clone())
    }

    fn instantiate(&self, class: &ClassId) -> Result<ManifestOperation> {
        let node = self.node(*class)?;
        if node.spec.is_abstract {
            return Err(GenerateError::RegistryAccess(format!(
                "cannot instantiate abstract class '{}'",
                node.spec.name
            )));
        }
        Ok(ManifestOperation { class: *class })
    }

    fn properties(&self, operation: &ManifestOperation) -> Result<Vec<Property>> {
        Ok(self
            .node(operation.class)?
            .spec
            .arguments
            .iter()
            .map(|arg| Property::new(arg.name.clone(), arg.value_type.clone()))
            .collect())
    }

    fn flags(&self, operation: &ManifestOperation, property: &str) -> Result<ArgumentFlags> {
        Ok(self.argument(operation, property)?.flag_set())
    }

    fn priority(&self, operation: &ManifestOperation, property: &str) -> Result<i32> {
        Ok(self.argument(operation, property)?.priority)
    }

    fn nickname(&self, class: &ClassId) -> Result<String> {
        Ok(self.node(*class)?.spec.nickname())
    }

    fn value_type_kind(&self, value_type: &str) -> ValueTypeKind {
        if self.enums.contains(value_type) {
            ValueTypeKind::Enum
        } else {
            ValueTypeKind::Primitive
        }
    }
}

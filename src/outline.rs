//! JSON description of a scanned file, for feeding a [`ContextTree`]
//! without a real scanner.
//!
//! ```json
//! { "filename": "Widget.php", "namespace": "App",
//!   "uses": { "Models": "App\\Models" },
//!   "children": [ { "class": "Widget", "line": 7 } ] }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::context::{
    ContextId, ContextTree, Facts, CHARACTER, CLASS, COMMENT, ENUM, FILENAME, INTERFACE, LINE,
    LOGGER, METHOD, NAMESPACE, PROPERTY, STATIC, TRAIT, USES, VERSION,
};
use crate::errors::{ContextError, Result};

const STRING_FACTS: [&str; 10] = [
    VERSION, NAMESPACE, CLASS, INTERFACE, TRAIT, ENUM, METHOD, PROPERTY, FILENAME, COMMENT,
];
const COUNT_FACTS: [&str; 2] = [LINE, CHARACTER];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Outline {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Outline>,
    #[serde(flatten)]
    pub facts: Map<String, Value>,
}

/// Tree built from an outline, with the JSON path of every node.
#[derive(Debug)]
pub struct OutlineTree {
    pub tree: ContextTree,
    paths: Vec<String>,
}

impl OutlineTree {
    pub fn path(&self, id: ContextId) -> &str {
        &self.paths[id.index()]
    }
}

impl Outline {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Insert this outline and its children depth-first, in document order.
    pub fn build(&self) -> Result<OutlineTree> {
        let mut out = OutlineTree {
            tree: ContextTree::new(),
            paths: Vec::new(),
        };
        self.insert_into(&mut out, None, "$".to_string())?;
        tracing::debug!(nodes = out.tree.len(), "outline built");
        Ok(out)
    }

    fn insert_into(
        &self,
        out: &mut OutlineTree,
        parent: Option<ContextId>,
        path: String,
    ) -> Result<ContextId> {
        self.validate(&path)?;
        let id = out.tree.insert(Facts::from(self.facts.clone()), parent);
        // paths[i] belongs to ContextId(i)
        out.paths.push(path.clone());
        for (i, child) in self.children.iter().enumerate() {
            child.insert_into(out, Some(id), format!("{path}.children[{i}]"))?;
        }
        Ok(id)
    }

    fn validate(&self, path: &str) -> Result<()> {
        let invalid = |name: &str, expected: &str| {
            Err(ContextError::Outline(format!("{path}: `{name}` must be {expected}")))
        };
        for (name, value) in &self.facts {
            let name = name.as_str();
            if STRING_FACTS.contains(&name) && !value.is_string() {
                return invalid(name, "a string");
            }
            if COUNT_FACTS.contains(&name) && !value.is_u64() {
                return invalid(name, "a non-negative integer");
            }
            if name == STATIC && !value.is_boolean() {
                return invalid(name, "a boolean");
            }
            if name == USES {
                let all_strings = value
                    .as_object()
                    .is_some_and(|table| table.values().all(Value::is_string));
                if !all_strings {
                    return invalid(name, "an object of namespace strings");
                }
            }
            // loggers are trait objects, not JSON
            if name == LOGGER {
                return invalid(name, "installed programmatically, not from an outline");
            }
        }
        Ok(())
    }
}

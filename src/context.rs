//! Scope-chain tree of context nodes.
//!
//! Every syntactic unit found by a scanner (file, namespace, type, member,
//! parameter) gets a node holding the facts known at that position. Reads
//! walk the parent chain, so a method node sees the `namespace` and `uses`
//! recorded on its file node without copying them.
//!
//! Nodes live in a [`ContextTree`] arena and are addressed by [`ContextId`].
//! The parent link is a plain id: the tree owns every node, children only
//! point back for lookup.

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::Level;

use crate::logger::{default_logger, Logger, LoggerHandle};

pub const NAMESPACE: &str = "namespace";
pub const USES: &str = "uses";
pub const CLASS: &str = "class";
pub const INTERFACE: &str = "interface";
pub const TRAIT: &str = "trait";
pub const ENUM: &str = "enum";
pub const METHOD: &str = "method";
pub const PROPERTY: &str = "property";
pub const STATIC: &str = "static";
pub const FILENAME: &str = "filename";
pub const LINE: &str = "line";
pub const CHARACTER: &str = "character";
pub const COMMENT: &str = "comment";
pub const VERSION: &str = "version";
pub const LOGGER: &str = "logger";
pub const NESTED: &str = "nested";

pub const VERSION_3_0_0: &str = "3.0.0";
pub const VERSION_3_1_0: &str = "3.1.0";
/// Version assumed when no node of a chain records one.
pub const DEFAULT_VERSION: &str = VERSION_3_0_0;

/// Facts naming the enclosing type, in lookup priority.
pub const TYPE_FACTS: [&str; 4] = [CLASS, INTERFACE, TRAIT, ENUM];

/// Handle of a node inside one [`ContextTree`]. Only meaningful for the
/// tree that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContextId(u32);

impl ContextId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A fact value.
#[derive(Debug, Clone)]
pub enum Fact {
    /// Text, numbers, booleans, lists and nested objects.
    Value(Value),
    /// Reference to another node of the same tree.
    Node(ContextId),
    Logger(LoggerHandle),
}

impl Fact {
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Fact::Value(v) => Some(v),
            _ => None,
        }
    }

    /// Non-empty string value.
    pub fn as_str(&self) -> Option<&str> {
        self.as_value()
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    pub fn as_bool(&self) -> Option<bool> {
        self.as_value().and_then(Value::as_bool)
    }

    pub fn as_u64(&self) -> Option<u64> {
        self.as_value().and_then(Value::as_u64)
    }

    pub fn as_object(&self) -> Option<&Map<String, Value>> {
        self.as_value().and_then(Value::as_object)
    }

    pub fn as_node(&self) -> Option<ContextId> {
        match self {
            Fact::Node(id) => Some(*id),
            _ => None,
        }
    }

    pub fn as_logger(&self) -> Option<&Arc<dyn Logger>> {
        match self {
            Fact::Logger(handle) => Some(handle.get()),
            _ => None,
        }
    }
}

impl From<Value> for Fact {
    fn from(v: Value) -> Self {
        Fact::Value(v)
    }
}

impl From<&str> for Fact {
    fn from(s: &str) -> Self {
        Fact::Value(Value::String(s.to_string()))
    }
}

impl From<String> for Fact {
    fn from(s: String) -> Self {
        Fact::Value(Value::String(s))
    }
}

impl From<bool> for Fact {
    fn from(b: bool) -> Self {
        Fact::Value(Value::Bool(b))
    }
}

impl From<u32> for Fact {
    fn from(n: u32) -> Self {
        Fact::Value(Value::from(n))
    }
}

impl From<u64> for Fact {
    fn from(n: u64) -> Self {
        Fact::Value(Value::from(n))
    }
}

impl From<i64> for Fact {
    fn from(n: i64) -> Self {
        Fact::Value(Value::from(n))
    }
}

impl From<ContextId> for Fact {
    fn from(id: ContextId) -> Self {
        Fact::Node(id)
    }
}

impl From<Arc<dyn Logger>> for Fact {
    fn from(logger: Arc<dyn Logger>) -> Self {
        Fact::Logger(LoggerHandle(logger))
    }
}

/// Property set handed to [`ContextTree::insert`]. Any fact name is accepted.
#[derive(Debug, Clone, Default)]
pub struct Facts {
    map: HashMap<String, Fact>,
}

impl Facts {
    pub fn new() -> Self {
        Self::default()
    }

    /// `filename`, `line` and `character` of the Rust call site.
    #[track_caller]
    pub fn here() -> Self {
        let caller = std::panic::Location::caller();
        Self::new()
            .with(FILENAME, caller.file())
            .with(LINE, caller.line())
            .with(CHARACTER, caller.column())
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<Fact>) -> Self {
        self.insert(name, value);
        self
    }

    /// Alias table, `alias => fully\qualified\namespace`, kept in the given order.
    pub fn with_uses<I, K, V>(self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let table: Map<String, Value> = pairs
            .into_iter()
            .map(|(alias, target)| (alias.into(), Value::String(target.into())))
            .collect();
        self.with(USES, Value::Object(table))
    }

    pub fn with_logger(self, logger: Arc<dyn Logger>) -> Self {
        self.with(LOGGER, logger)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Fact>) {
        self.map.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Fact> {
        self.map.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Fact)> {
        self.map.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl Extend<(String, Fact)> for Facts {
    fn extend<T: IntoIterator<Item = (String, Fact)>>(&mut self, iter: T) {
        self.map.extend(iter);
    }
}

impl IntoIterator for Facts {
    type Item = (String, Fact);
    type IntoIter = std::collections::hash_map::IntoIter<String, Fact>;

    fn into_iter(self) -> Self::IntoIter {
        self.map.into_iter()
    }
}

impl From<Map<String, Value>> for Facts {
    fn from(map: Map<String, Value>) -> Self {
        Self {
            map: map.into_iter().map(|(k, v)| (k, Fact::Value(v))).collect(),
        }
    }
}

#[derive(Debug)]
pub struct ContextNode {
    parent: Option<ContextId>,
    facts: Facts,
}

impl ContextNode {
    pub fn parent(&self) -> Option<ContextId> {
        self.parent
    }

    /// Facts recorded on this node only.
    pub fn facts(&self) -> &Facts {
        &self.facts
    }
}

/// Arena of context nodes for one scan session.
#[derive(Debug, Default)]
pub struct ContextTree {
    nodes: Vec<ContextNode>,
}

impl ContextTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = ContextId> {
        (0..self.nodes.len() as u32).map(ContextId)
    }

    /// `None` when `id` was issued by another tree.
    pub fn get(&self, id: ContextId) -> Option<&ContextNode> {
        self.nodes.get(id.index())
    }

    /// Panics when `id` was issued by another tree; see [`ContextTree::get`].
    pub fn node(&self, id: ContextId) -> &ContextNode {
        &self.nodes[id.index()]
    }

    /// Create a node below `parent` holding `facts` verbatim.
    ///
    /// Installs the default logger on the new node when none is reachable,
    /// and writes [`DEFAULT_VERSION`] on the root of the chain when no node
    /// of it records a `version`.
    pub fn insert(&mut self, mut facts: Facts, parent: Option<ContextId>) -> ContextId {
        let logger_visible =
            facts.contains(LOGGER) || parent.is_some_and(|p| self.find_owner(p, LOGGER).is_some());
        if !logger_visible {
            facts.insert(LOGGER, default_logger());
        }

        let id = ContextId(self.nodes.len() as u32);
        tracing::trace!(node = id.index(), ?parent, facts = facts.len(), "context node created");
        self.nodes.push(ContextNode { parent, facts });

        // root() stops at the last node this tree knows, so a foreign parent
        // leaves the default on the new node
        if self.find_owner(id, VERSION).is_none() {
            let root = self.root(id);
            tracing::debug!(root = root.index(), version = DEFAULT_VERSION, "defaulting version on root");
            self.nodes[root.index()].facts.insert(VERSION, DEFAULT_VERSION);
        }
        id
    }

    /// New node with a snapshot of `id`'s own facts overlaid by `overrides`,
    /// under the same parent. `id` itself is not touched.
    pub fn clone_with(&mut self, id: ContextId, overrides: Facts) -> ContextId {
        let (parent, mut facts) = match self.get(id) {
            Some(source) => (source.parent, source.facts.clone()),
            None => (None, Facts::new()),
        };
        facts.extend(overrides);
        let clone = self.insert(facts, parent);
        tracing::trace!(source = id.index(), clone = clone.index(), "context node cloned");
        clone
    }

    pub fn parent(&self, id: ContextId) -> Option<ContextId> {
        self.get(id).and_then(ContextNode::parent)
    }

    /// `id` followed by its ancestors, closest first.
    pub fn ancestors(&self, id: ContextId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: Some(id),
        }
    }

    /// Number of ancestors; the root has depth 0.
    pub fn depth(&self, id: ContextId) -> usize {
        self.ancestors(id).count().saturating_sub(1)
    }

    pub fn root(&self, id: ContextId) -> ContextId {
        self.ancestors(id).last().unwrap_or(id)
    }

    /// Was `name` given to this node itself (not inherited)?
    pub fn has_own(&self, id: ContextId, name: &str) -> bool {
        self.get(id).is_some_and(|node| node.facts.contains(name))
    }

    pub fn lacks_own(&self, id: ContextId, name: &str) -> bool {
        !self.has_own(id, name)
    }

    /// Closest node of the chain, `id` included, that owns `name`.
    pub fn find_owner(&self, id: ContextId, name: &str) -> Option<ContextId> {
        self.ancestors(id).find(|&n| self.has_own(n, name))
    }

    /// Effective value of `name` as seen from `id`.
    pub fn read(&self, id: ContextId, name: &str) -> Option<&Fact> {
        self.find_owner(id, name)
            .and_then(|owner| self.get(owner))
            .and_then(|node| node.facts.get(name))
    }

    pub fn read_str(&self, id: ContextId, name: &str) -> Option<&str> {
        self.read(id, name).and_then(Fact::as_str)
    }

    pub fn read_bool(&self, id: ContextId, name: &str) -> Option<bool> {
        self.read(id, name).and_then(Fact::as_bool)
    }

    pub fn read_u64(&self, id: ContextId, name: &str) -> Option<u64> {
        self.read(id, name).and_then(Fact::as_u64)
    }

    pub fn read_node(&self, id: ContextId, name: &str) -> Option<ContextId> {
        self.read(id, name).and_then(Fact::as_node)
    }

    /// Effective alias table.
    pub fn uses(&self, id: ContextId) -> Option<&Map<String, Value>> {
        self.read(id, USES).and_then(Fact::as_object)
    }

    /// Simple name of the enclosing class, interface, trait or enum.
    pub fn enclosing_type(&self, id: ContextId) -> Option<&str> {
        TYPE_FACTS
            .iter()
            .find_map(|name| self.read_str(id, name))
    }

    /// Effective version. Numbers and booleans are taken in their text
    /// form (`31` reads as `"31"`); anything else falls back to
    /// [`DEFAULT_VERSION`].
    pub fn version(&self, id: ContextId) -> Cow<'_, str> {
        match self.read(id, VERSION).and_then(Fact::as_value) {
            Some(Value::String(s)) if !s.is_empty() => Cow::Borrowed(s.as_str()),
            Some(v @ (Value::Number(_) | Value::Bool(_))) => Cow::Owned(v.to_string()),
            _ => Cow::Borrowed(DEFAULT_VERSION),
        }
    }

    /// Exact, case-sensitive match of the effective version.
    pub fn matches_version<S: AsRef<str>>(&self, id: ContextId, candidates: &[S]) -> bool {
        let version = self.version(id);
        candidates.iter().any(|c| c.as_ref() == version.as_ref())
    }

    pub fn logger(&self, id: ContextId) -> Arc<dyn Logger> {
        self.read(id, LOGGER)
            .and_then(Fact::as_logger)
            .cloned()
            .unwrap_or_else(default_logger)
    }

    /// Send `message` to the effective logger, suffixed with the node's location.
    pub fn log(&self, id: ContextId, level: Level, message: &str) {
        let location = self.describe_location(id);
        let logger = self.logger(id);
        if location.is_empty() {
            logger.log(level, message);
        } else {
            logger.log(level, &format!("{message} in {location}"));
        }
    }
}

pub struct Ancestors<'a> {
    tree: &'a ContextTree,
    next: Option<ContextId>,
}

impl Iterator for Ancestors<'_> {
    type Item = ContextId;

    fn next(&mut self) -> Option<ContextId> {
        let current = self.next?;
        // ids this tree never issued end the walk
        let node = self.tree.get(current)?;
        self.next = node.parent;
        Some(current)
    }
}

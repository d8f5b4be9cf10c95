//! Hierarchical parse context for annotation scanners.
//!
//! A [`ContextTree`] records one node per syntactic unit met during a scan
//! (file, namespace, type, member, parameter). Facts set on a node are
//! visible to all of its descendants, and type references written inside a
//! node can be resolved to fully-qualified names against the namespace and
//! `use` aliases in scope.

pub mod context;
pub mod doc;
pub mod errors;
pub mod location;
pub mod logger;
pub mod outline;
pub mod resolve;

pub use context::{
    Ancestors, ContextId, ContextNode, ContextTree, Fact, Facts, DEFAULT_VERSION, VERSION_3_0_0,
    VERSION_3_1_0,
};
pub use errors::{ContextError, Result};
pub use location::Location;
pub use logger::{Logger, TracingLogger};
pub use outline::{Outline, OutlineTree};
pub use resolve::{Scope, SEPARATOR};

use std::fmt;

use crate::context::{
    ContextId, ContextTree, CHARACTER, CLASS, FILENAME, LINE, METHOD, PROPERTY, STATIC,
};

/// Human-readable position of a node, e.g. `Foo::bar() in f.php on line 10`.
/// Segments whose facts are not visible are left out.
pub struct Location<'a> {
    tree: &'a ContextTree,
    id: ContextId,
}

impl fmt::Display for Location<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tree = self.tree;
        let id = self.id;
        let is_static = tree.read_bool(id, STATIC).unwrap_or(false);
        let mut written = false;

        // member segment is class-only
        if let Some(owner) = tree.read_str(id, CLASS) {
            if let Some(method) = tree.read_str(id, METHOD) {
                let op = if is_static { "::" } else { "->" };
                write!(f, "{owner}{op}{method}()")?;
                written = true;
            } else if let Some(property) = tree.read_str(id, PROPERTY) {
                let op = if is_static { "::$" } else { "->" };
                write!(f, "{owner}{op}{property}")?;
                written = true;
            }
        }

        if let Some(filename) = tree.read_str(id, FILENAME) {
            if written {
                f.write_str(" in ")?;
            }
            f.write_str(filename)?;
            written = true;
        }

        if let Some(line) = tree.read_u64(id, LINE).filter(|&l| l > 0) {
            if written {
                f.write_str(" on line ")?;
            }
            write!(f, "{line}")?;
            if let Some(character) = tree.read_u64(id, CHARACTER).filter(|&c| c > 0) {
                write!(f, ":{character}")?;
            }
        }
        Ok(())
    }
}

impl ContextTree {
    pub fn location(&self, id: ContextId) -> Location<'_> {
        Location { tree: self, id }
    }

    pub fn describe_location(&self, id: ContextId) -> String {
        self.location(id).to_string()
    }
}

//! Type reference resolution.
//!
//! Turns a reference as written inside a scope (`Widget`, `Models\User`,
//! `\Vendor\Thing`) into a fully-qualified name, using the namespace,
//! enclosing type and alias table visible from that scope.

use serde_json::{Map, Value};

use crate::context::{ContextId, ContextTree, NAMESPACE};

pub const SEPARATOR: char = '\\';

/// What a scope knows about names. Borrowed out of a [`ContextTree`] by
/// [`ContextTree::scope`], or built directly.
#[derive(Debug, Clone, Copy, Default)]
pub struct Scope<'a> {
    pub namespace: Option<&'a str>,
    pub enclosing_type: Option<&'a str>,
    pub uses: Option<&'a Map<String, Value>>,
}

impl<'a> Scope<'a> {
    /// `\` + namespace + `\`, or `\` for the global namespace.
    pub fn namespace_prefix(&self) -> String {
        match self.namespace.filter(|ns| !ns.is_empty()) {
            Some(ns) => format!("\\{ns}\\").replace("\\\\", "\\"),
            None => SEPARATOR.to_string(),
        }
    }

    fn aliases(&self) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        self.uses
            .into_iter()
            .flatten()
            .filter_map(|(alias, target)| target.as_str().map(|t| (alias.as_str(), t)))
    }

    /// Fully-qualified form of `reference`. Never fails: anything that is
    /// neither absolute nor aliased is placed in the current namespace.
    ///
    /// Aliases are tried in declaration order and the first match wins.
    pub fn resolve(&self, reference: &str) -> String {
        if reference.is_empty() {
            return String::new();
        }
        let namespace = self.namespace_prefix();

        if let Some(own) = self.enclosing_type {
            if reference.eq_ignore_ascii_case(own) {
                return format!("{namespace}{own}");
            }
        }

        match reference.find(SEPARATOR) {
            // already fully qualified
            Some(0) => return reference.to_string(),
            // qualified, leading segment may be an alias
            Some(_) => {
                for (alias, target) in self.aliases() {
                    if starts_with_alias(reference, alias) {
                        tracing::trace!(reference, alias, target, "qualified alias applied");
                        return format!("{SEPARATOR}{target}{}", &reference[alias.len()..]);
                    }
                }
            }
            // bare name, may be an alias itself
            None => {
                if let Some((alias, target)) = self
                    .aliases()
                    .find(|(alias, _)| alias.eq_ignore_ascii_case(reference))
                {
                    tracing::trace!(reference, alias, target, "alias applied");
                    return format!("{SEPARATOR}{target}");
                }
            }
        }

        format!("{namespace}{reference}")
    }
}

/// `reference` begins with `alias\`, ignoring ASCII case.
fn starts_with_alias(reference: &str, alias: &str) -> bool {
    let head_len = alias.len() + SEPARATOR.len_utf8();
    reference.len() >= head_len
        && reference.is_char_boundary(alias.len())
        && reference[..alias.len()].eq_ignore_ascii_case(alias)
        && reference[alias.len()..].starts_with(SEPARATOR)
}

impl ContextTree {
    pub fn scope(&self, id: ContextId) -> Scope<'_> {
        Scope {
            namespace: self.read_str(id, NAMESPACE),
            enclosing_type: self.enclosing_type(id),
            uses: self.uses(id),
        }
    }

    /// Resolve `reference` as written in the scope of `id`.
    pub fn fully_qualified_name(&self, id: ContextId, reference: &str) -> String {
        self.scope(id).resolve(reference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{Facts, CLASS};
    use pretty_assertions::assert_eq;

    fn app_scope(tree: &mut ContextTree) -> ContextId {
        let file = tree.insert(
            Facts::new()
                .with(NAMESPACE, "App")
                .with_uses([("Foo", "App\\Models"), ("Log", "Psr\\Log\\LoggerInterface")]),
            None,
        );
        tree.insert(Facts::new().with(CLASS, "Widget"), Some(file))
    }

    #[test]
    fn qualified_alias_is_substituted() {
        let mut tree = ContextTree::new();
        let id = app_scope(&mut tree);
        assert_eq!(tree.fully_qualified_name(id, "Foo\\User"), "\\App\\Models\\User");
        assert_eq!(tree.fully_qualified_name(id, "foo\\User"), "\\App\\Models\\User");
    }

    #[test]
    fn bare_alias_is_substituted() {
        let mut tree = ContextTree::new();
        let id = app_scope(&mut tree);
        assert_eq!(tree.fully_qualified_name(id, "log"), "\\Psr\\Log\\LoggerInterface");
    }

    #[test]
    fn alias_prefix_needs_a_separator() {
        let mut tree = ContextTree::new();
        let id = app_scope(&mut tree);
        assert_eq!(tree.fully_qualified_name(id, "Foobar\\User"), "\\App\\Foobar\\User");
        assert_eq!(tree.fully_qualified_name(id, "Foobar"), "\\App\\Foobar");
    }

    #[test]
    fn absolute_names_pass_through() {
        let mut tree = ContextTree::new();
        let id = app_scope(&mut tree);
        assert_eq!(tree.fully_qualified_name(id, "\\Foo\\User"), "\\Foo\\User");
    }

    #[test]
    fn enclosing_type_resolves_to_itself() {
        let mut tree = ContextTree::new();
        let file = tree.insert(
            Facts::new()
                .with(NAMESPACE, "App")
                .with_uses([("Widget", "Elsewhere\\Widget")]),
            None,
        );
        let class = tree.insert(Facts::new().with(CLASS, "Widget"), Some(file));
        assert_eq!(tree.fully_qualified_name(class, "widget"), "\\App\\Widget");
        assert_eq!(tree.fully_qualified_name(file, "Widget"), "\\Elsewhere\\Widget");
    }

    #[test]
    fn empty_and_global() {
        let scope = Scope::default();
        assert_eq!(scope.resolve(""), "");
        assert_eq!(scope.resolve("Bar"), "\\Bar");
        assert_eq!(scope.resolve("A\\B"), "\\A\\B");
    }

    #[test]
    fn namespace_prefix_normalises_leading_separator() {
        let plain = Scope { namespace: Some("App"), ..Scope::default() };
        let rooted = Scope { namespace: Some("\\App"), ..Scope::default() };
        let empty = Scope { namespace: Some(""), ..Scope::default() };
        assert_eq!(plain.namespace_prefix(), "\\App\\");
        assert_eq!(rooted.namespace_prefix(), "\\App\\");
        assert_eq!(empty.namespace_prefix(), "\\");
        assert_eq!(rooted.resolve("Bar"), "\\App\\Bar");
    }

    #[test]
    fn first_declared_alias_wins() {
        let mut tree = ContextTree::new();
        let id = tree.insert(
            Facts::new().with_uses([("Db", "First\\Db"), ("DB", "Second\\Db")]),
            None,
        );
        assert_eq!(tree.fully_qualified_name(id, "db"), "\\First\\Db");
        assert_eq!(tree.fully_qualified_name(id, "DB\\Row"), "\\First\\Db\\Row");
    }

    #[test]
    fn nested_uses_replace_outer_table() {
        let mut tree = ContextTree::new();
        let root = tree.insert(
            Facts::new().with(NAMESPACE, "ns").with_uses([("A", "Y")]),
            None,
        );
        let child = tree.insert(Facts::new().with_uses([("B", "X")]), Some(root));

        assert_eq!(tree.fully_qualified_name(child, "A\\Z"), "\\ns\\A\\Z");
        assert_eq!(tree.fully_qualified_name(child, "B\\Z"), "\\X\\Z");
        assert_eq!(tree.fully_qualified_name(root, "A\\Z"), "\\Y\\Z");
    }
}

//! Summary and description extraction from the `comment` fact.
//!
//! The comment is a raw `/** ... */` block. Its content is everything
//! before the first `@tag` line, with the comment decoration removed and
//! backslash-continued lines joined.

use itertools::Itertools;

use crate::context::{ContextId, ContextTree, COMMENT};

/// Doc-block text without delimiters, leading `*` and tags.
pub fn content(comment: &str) -> Option<String> {
    let raw: Vec<&str> = comment.lines().collect();
    let last = raw.len().saturating_sub(1);
    let mut lines: Vec<String> = Vec::with_capacity(raw.len());
    let mut append = false;

    for (i, line) in raw.iter().enumerate() {
        let mut line: &str = line;
        if i == 0 {
            let start = line.trim_start_matches([' ', '\t']);
            line = start.strip_prefix("/**").unwrap_or(line);
        }
        if i == last {
            let end = line.trim_end_matches([' ', '\t']);
            line = end.strip_suffix("*/").unwrap_or(line);
        }
        let line = line.trim_start_matches(['\t', ' ', '*']);
        if line.starts_with('@') {
            break;
        }
        match lines.last_mut() {
            Some(prev) if append => {
                prev.pop();
                prev.push_str(line);
            }
            _ => lines.push(line.to_string()),
        }
        append = line.ends_with('\\');
    }

    let text = lines.iter().join("\n");
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// Lines up to the first blank line or the first line ending in `.`.
pub fn summary(comment: &str) -> Option<String> {
    let content = content(comment)?;
    let mut taken = Vec::new();
    for line in content.lines() {
        taken.push(line);
        if line.is_empty() || line.ends_with('.') {
            break;
        }
    }
    let summary = taken.iter().join("\n");
    let summary = summary.trim();
    (!summary.is_empty()).then(|| summary.to_string())
}

/// Whatever follows the summary.
pub fn description(comment: &str) -> Option<String> {
    let content = content(comment)?;
    let summary = summary(comment)?;
    let rest = content.strip_prefix(summary.as_str()).unwrap_or("").trim();
    (!rest.is_empty()).then(|| rest.to_string())
}

impl ContextTree {
    pub fn doc_content(&self, id: ContextId) -> Option<String> {
        self.read_str(id, COMMENT).and_then(content)
    }

    pub fn doc_summary(&self, id: ContextId) -> Option<String> {
        self.read_str(id, COMMENT).and_then(summary)
    }

    pub fn doc_description(&self, id: ContextId) -> Option<String> {
        self.read_str(id, COMMENT).and_then(description)
    }
}

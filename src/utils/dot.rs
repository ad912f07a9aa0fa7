//! DOT format utilities for graph visualization.
//!
//! [`escape_dot`] makes arbitrary text safe inside quoted DOT strings and
//! [`DotWriter`] assembles a `digraph` document line by line. Output is plain text;
//! rendering it with Graphviz is left to the caller.

use std::fmt::Write;

/// Escapes a string for safe use in DOT format labels and identifiers.
///
/// This function handles all characters that have special meaning in DOT format,
/// including quotes, backslashes, newlines, and angle brackets.
///
/// # Arguments
///
/// * `s` - The string to escape
///
/// # Returns
///
/// A new string with all special characters properly escaped.
///
/// # Examples
///
/// ```rust
/// use domibubble::utils::dot::escape_dot;
///
/// let escaped = escape_dot("Method<T>");
/// assert_eq!(escaped, "Method\\<T\\>");
/// ```
#[must_use]
pub fn escape_dot(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "")
        .replace('<', "\\<")
        .replace('>', "\\>")
}

/// Incremental builder for a Graphviz `digraph` document.
///
/// Node identifiers and labels are quoted and escaped, attribute values are quoted.
///
/// # Examples
///
/// ```rust
/// use domibubble::utils::dot::DotWriter;
///
/// let mut dot = DotWriter::new("G");
/// dot.title("example \"graph\"");
/// dot.node("n0", "start", &[]);
/// dot.node("n1", "end", &[("shape", "doublecircle")]);
/// dot.edge("n0", "n1", &[]);
///
/// let text = dot.finish();
/// assert!(text.starts_with("digraph \"G\" {"));
/// assert!(text.contains("\"n0\" -> \"n1\";"));
/// ```
#[derive(Debug, Clone)]
pub struct DotWriter {
    out: String,
}

impl DotWriter {
    /// Starts a new `digraph` with default node and edge styling.
    #[must_use]
    pub fn new(name: &str) -> Self {
        let mut out = String::new();
        let _ = writeln!(out, "digraph \"{}\" {{", escape_dot(name));
        out.push_str("    node [shape=ellipse, fontname=\"Courier\", fontsize=10];\n");
        out.push_str("    edge [fontname=\"Courier\", fontsize=9];\n");
        Self { out }
    }

    /// Adds a graph title placed at the top.
    pub fn title(&mut self, title: &str) -> &mut Self {
        let _ = writeln!(self.out, "    label=\"{}\";", escape_dot(title));
        self.out.push_str("    labelloc=t;\n");
        self
    }

    /// Adds a node statement.
    pub fn node(&mut self, id: &str, label: &str, attrs: &[(&str, &str)]) -> &mut Self {
        let _ = write!(
            self.out,
            "    \"{}\" [label=\"{}\"",
            escape_dot(id),
            escape_dot(label)
        );
        Self::write_attrs(&mut self.out, attrs, true);
        self.out.push_str("];\n");
        self
    }

    /// Adds an edge statement.
    pub fn edge(&mut self, from: &str, to: &str, attrs: &[(&str, &str)]) -> &mut Self {
        let _ = write!(
            self.out,
            "    \"{}\" -> \"{}\"",
            escape_dot(from),
            escape_dot(to)
        );
        if !attrs.is_empty() {
            self.out.push_str(" [");
            Self::write_attrs(&mut self.out, attrs, false);
            self.out.push(']');
        }
        self.out.push_str(";\n");
        self
    }

    /// Closes the graph and returns the document.
    #[must_use]
    pub fn finish(mut self) -> String {
        self.out.push_str("}\n");
        self.out
    }

    fn write_attrs(out: &mut String, attrs: &[(&str, &str)], leading_comma: bool) {
        for (i, (key, value)) in attrs.iter().enumerate() {
            if i > 0 || leading_comma {
                out.push_str(", ");
            }
            let _ = write!(out, "{key}=\"{}\"", escape_dot(value));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_dot_basic() {
        assert_eq!(escape_dot("hello"), "hello");
    }

    #[test]
    fn test_escape_dot_quotes() {
        assert_eq!(escape_dot("say \"hello\""), "say \\\"hello\\\"");
    }

    #[test]
    fn test_escape_dot_backslash() {
        assert_eq!(escape_dot("path\\to\\file"), "path\\\\to\\\\file");
    }

    #[test]
    fn test_escape_dot_newlines() {
        assert_eq!(escape_dot("line1\nline2"), "line1\\nline2");
        assert_eq!(escape_dot("line1\r\nline2"), "line1\\nline2");
    }

    #[test]
    fn test_escape_dot_angle_brackets() {
        assert_eq!(escape_dot("List<T>"), "List\\<T\\>");
    }

    #[test]
    fn test_escape_dot_combined() {
        assert_eq!(
            escape_dot("Method<T>(\"arg\")"),
            "Method\\<T\\>(\\\"arg\\\")"
        );
    }

    #[test]
    fn test_dot_writer_document() {
        let mut dot = DotWriter::new("tree");
        dot.node("n0", "a", &[]).node("n1", "b", &[("shape", "box")]);
        dot.edge("n0", "n1", &[("style", "dashed"), ("color", "red")]);

        let text = dot.finish();
        assert!(text.starts_with("digraph \"tree\" {\n"));
        assert!(text.contains("    \"n0\" [label=\"a\"];\n"));
        assert!(text.contains("    \"n1\" [label=\"b\", shape=\"box\"];\n"));
        assert!(text.contains("    \"n0\" -> \"n1\" [style=\"dashed\", color=\"red\"];\n"));
        assert!(text.ends_with("}\n"));
    }

    #[test]
    fn test_dot_writer_escapes_labels() {
        let mut dot = DotWriter::new("g");
        dot.title("say \"hi\"").node("x", "<entry>", &[]);

        let text = dot.finish();
        assert!(text.contains("label=\"say \\\"hi\\\"\";"));
        assert!(text.contains("[label=\"\\<entry\\>\"]"));
    }
}

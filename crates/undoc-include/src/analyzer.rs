//! Source analysis: docstring discovery and named-object location.
//!
//! The reader only needs two facts about a file: which lines are docstring
//! bodies, and where a named function or class starts and ends. Both come from
//! one parse, captured in a [`SourceOutline`].

use std::collections::{BTreeSet, HashMap};

use tree_sitter::{Node, Parser};

/// Kind of a named object in a source file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObjectKind {
    /// Class definition.
    Class,
    /// Function or method definition.
    Def,
}

/// Location of a named object.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ObjectSpan {
    /// Object kind.
    pub kind: ObjectKind,
    /// First line (1-based, inclusive), including decorators.
    pub start: usize,
    /// Last line (1-based, inclusive).
    pub end: usize,
}

/// Facts extracted from one parse of a source file.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SourceOutline {
    docstring_lines: BTreeSet<usize>,
    objects: HashMap<String, ObjectSpan>,
}

impl SourceOutline {
    /// Create an outline from precomputed parts.
    #[must_use]
    pub fn new(docstring_lines: BTreeSet<usize>, objects: HashMap<String, ObjectSpan>) -> Self {
        Self {
            docstring_lines,
            objects,
        }
    }

    /// 0-based indices of lines inside any docstring in the file.
    #[must_use]
    pub fn docstring_lines(&self) -> &BTreeSet<usize> {
        &self.docstring_lines
    }

    /// Look up a named object by (dotted) qualified name.
    #[must_use]
    pub fn object(&self, name: &str) -> Option<ObjectSpan> {
        self.objects.get(name).copied()
    }
}

/// Error produced while analyzing a source file.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AnalyzeError {
    /// Source does not parse.
    #[error("syntax error at line {line}")]
    Syntax {
        /// 1-based line of the first error.
        line: usize,
    },
    /// Parser could not be initialized.
    #[error("{0}")]
    Setup(String),
}

/// Capability that turns source text into a [`SourceOutline`].
///
/// Implementations must not keep state between calls so one analyzer can be
/// shared by readers running on different threads.
pub trait SourceAnalyzer: Send + Sync {
    /// Analyze the full text of a file.
    fn analyze(&self, source: &str) -> Result<SourceOutline, AnalyzeError>;
}

/// Python analyzer backed by tree-sitter.
///
/// Docstrings are the first statement of a module, class or function body when
/// that statement is a plain string literal (bytes and f-strings do not
/// count). Object names follow the host's tag finder: dotted qualified names,
/// with functions defined directly inside functions left out.
#[derive(Debug, Default, Clone, Copy)]
pub struct PythonAnalyzer;

impl SourceAnalyzer for PythonAnalyzer {
    fn analyze(&self, source: &str) -> Result<SourceOutline, AnalyzeError> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_python::LANGUAGE.into())
            .map_err(|e| AnalyzeError::Setup(format!("Failed to set language: {e}")))?;

        let tree = parser
            .parse(source, None)
            .ok_or_else(|| AnalyzeError::Setup("Failed to parse source code".to_owned()))?;
        let root = tree.root_node();

        if root.has_error() {
            let line = first_error_row(root).unwrap_or(0) + 1;
            return Err(AnalyzeError::Syntax { line });
        }

        let lines: Vec<&str> = source.split('\n').collect();
        let mut walker = OutlineWalker {
            source: source.as_bytes(),
            lines: &lines,
            outline: SourceOutline::default(),
            scopes: Vec::new(),
        };
        walker.visit(root);

        tracing::debug!(
            docstring_lines = walker.outline.docstring_lines.len(),
            objects = walker.outline.objects.len(),
            "Analyzed Python source"
        );
        Ok(walker.outline)
    }
}

/// Row of the first error or missing node in document order.
fn first_error_row(node: Node) -> Option<usize> {
    if node.is_error() || node.is_missing() {
        return Some(node.start_position().row);
    }
    let mut cursor = node.walk();
    node.children(&mut cursor)
        .filter(Node::has_error)
        .find_map(first_error_row)
        .or_else(|| node.has_error().then(|| node.start_position().row))
}

struct OutlineWalker<'a> {
    source: &'a [u8],
    lines: &'a [&'a str],
    outline: SourceOutline,
    /// Enclosing definitions, innermost last.
    scopes: Vec<String>,
}

impl OutlineWalker<'_> {
    fn visit(&mut self, node: Node) {
        match node.kind() {
            "module" => {
                self.record_docstring(node);
                self.visit_children(node);
            }
            "function_definition" | "class_definition" => self.visit_definition(node),
            _ => self.visit_children(node),
        }
    }

    fn visit_children(&mut self, node: Node) {
        let mut cursor = node.walk();
        let children: Vec<Node> = node.named_children(&mut cursor).collect();
        for child in children {
            self.visit(child);
        }
    }

    fn visit_definition(&mut self, node: Node) {
        let kind = if node.kind() == "class_definition" {
            ObjectKind::Class
        } else {
            ObjectKind::Def
        };
        let body = node.child_by_field_name("body");
        if let Some(body) = body {
            self.record_docstring(body);
        }

        let Some(name) = node
            .child_by_field_name("name")
            .and_then(|n| n.utf8_text(self.source).ok())
        else {
            return;
        };

        if !(kind == ObjectKind::Def && in_function_body(node)) {
            let qualified = self
                .scopes
                .iter()
                .map(String::as_str)
                .chain(std::iter::once(name))
                .collect::<Vec<_>>()
                .join(".");
            let span = self.span(node, kind);
            self.outline.objects.insert(qualified, span);
        }

        if let Some(body) = body {
            self.scopes.push(name.to_owned());
            self.visit_children(body);
            self.scopes.pop();
        }
    }

    /// Line span of a definition, widened to its decorators and trimmed of
    /// trailing blank and comment-only lines.
    fn span(&self, node: Node, kind: ObjectKind) -> ObjectSpan {
        let start_row = node
            .parent()
            .filter(|p| p.kind() == "decorated_definition")
            .unwrap_or(node)
            .start_position()
            .row;

        let end_pos = node.end_position();
        let mut end_row = if end_pos.column == 0 && end_pos.row > start_row {
            end_pos.row - 1
        } else {
            end_pos.row
        };
        while end_row > start_row && self.lines.get(end_row).is_none_or(|l| is_empty_line(l)) {
            end_row -= 1;
        }

        ObjectSpan {
            kind,
            start: start_row + 1,
            end: end_row + 1,
        }
    }

    /// Record the docstring of a module or block, if its first statement is one.
    fn record_docstring(&mut self, body: Node) {
        let mut cursor = body.walk();
        let Some(first) = body
            .named_children(&mut cursor)
            .find(|child| !child.is_extra())
        else {
            return;
        };
        if first.kind() != "expression_statement" || first.named_child_count() != 1 {
            return;
        }
        let Some(value) = first.named_child(0).map(unwrap_parens) else {
            return;
        };
        if !self.is_plain_string(value) {
            return;
        }

        let start = value.start_position().row;
        let end = value.end_position().row + 1;
        self.outline.docstring_lines.extend(start..end);
    }

    /// Whether a node is a `str` constant: a literal without bytes or
    /// f-string prefix, or an implicit concatenation of such literals.
    fn is_plain_string(&self, node: Node) -> bool {
        match node.kind() {
            "string" => {
                let mut cursor = node.walk();
                let has_interpolation = node
                    .named_children(&mut cursor)
                    .any(|c| c.kind() == "interpolation");
                let prefix = node
                    .child(0)
                    .and_then(|start| start.utf8_text(self.source).ok())
                    .unwrap_or_default()
                    .trim_end_matches(['"', '\''])
                    .to_ascii_lowercase();
                !has_interpolation && !prefix.contains('b') && !prefix.contains('f')
            }
            "concatenated_string" => {
                let mut cursor = node.walk();
                let parts: Vec<Node> = node.named_children(&mut cursor).collect();
                parts.iter().all(|&part| self.is_plain_string(part))
            }
            _ => false,
        }
    }
}

/// Whether a definition sits directly in a function body.
///
/// A definition under `if`, `for`, `with` or `try` inside a function is one
/// block further in and does not count.
fn in_function_body(node: Node) -> bool {
    node.parent()
        .filter(|p| p.kind() == "decorated_definition")
        .unwrap_or(node)
        .parent()
        .and_then(|block| block.parent())
        .is_some_and(|owner| owner.kind() == "function_definition")
}

/// Strip redundant parentheses around an expression.
fn unwrap_parens(node: Node) -> Node {
    if node.kind() == "parenthesized_expression" && node.named_child_count() == 1 {
        node.named_child(0).map_or(node, unwrap_parens)
    } else {
        node
    }
}

/// Blank or comment-only line.
fn is_empty_line(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.is_empty() || trimmed.starts_with('#')
}

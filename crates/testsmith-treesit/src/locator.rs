use testsmith_core::{ExtractError, FunctionKind, FunctionSpan, FunctionTable};
use tree_sitter::{Node, Parser};

/// Options controlling which top-level declarations are indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocatorOptions {
    /// Index `func (r T) Name()` declarations under their method name.
    pub include_methods: bool,
}

impl Default for LocatorOptions {
    fn default() -> Self {
        Self {
            include_methods: true,
        }
    }
}

/// Parses Go source with tree-sitter and records the span of every named,
/// top-level function declaration.
///
/// Only direct children of the file root are examined, so function literals
/// and closures nested inside bodies are never indexed.
#[derive(Debug, Clone, Copy, Default)]
pub struct FunctionLocator {
    options: LocatorOptions,
}

impl FunctionLocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: LocatorOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> LocatorOptions {
        self.options
    }

    /// Build the function table for `text`.
    ///
    /// Fails with [`ExtractError::Parse`] if the text is not valid Go.
    pub fn locate(&self, text: &str) -> Result<FunctionTable, ExtractError> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_go::LANGUAGE.into())
            .map_err(|e| ExtractError::Parse {
                line: 0,
                column: 0,
                message: format!("failed to load Go grammar: {e}"),
            })?;

        let tree = parser.parse(text, None).ok_or_else(|| ExtractError::Parse {
            line: 0,
            column: 0,
            message: "parser produced no syntax tree".to_string(),
        })?;
        let root = tree.root_node();

        if let Some(bad) = first_error(root) {
            let pos = bad.start_position();
            return Err(ExtractError::Parse {
                line: pos.row + 1,
                column: pos.column + 1,
                message: describe_error(bad, text),
            });
        }
        check_file_structure(root, text)?;

        let mut table = FunctionTable::new();
        let mut cursor = root.walk();
        for node in root.named_children(&mut cursor) {
            let span = match node.kind() {
                "function_declaration" => function_span(node, text, None),
                "method_declaration" if self.options.include_methods => {
                    function_span(node, text, receiver_type(node, text))
                }
                _ => None,
            };
            let Some(span) = span else { continue };

            if let Some(old) = table.insert(span) {
                tracing::warn!(
                    name = %old.name,
                    line = old.start_line,
                    "duplicate function name, later declaration replaces earlier one"
                );
            }
        }

        tracing::debug!(
            functions = table.len(),
            collisions = table.collisions().len(),
            "located functions"
        );
        Ok(table)
    }
}

const TOP_LEVEL_KINDS: &[&str] = &[
    "import_declaration",
    "function_declaration",
    "method_declaration",
    "type_declaration",
    "const_declaration",
    "var_declaration",
    "comment",
];

/// A Go file opens with a package clause (after any comments) and holds only
/// declarations at top level. tree-sitter-go parses bare statements and a
/// missing package clause without error nodes.
fn check_file_structure(root: Node, text: &str) -> Result<(), ExtractError> {
    let mut cursor = root.walk();
    let mut seen_package = false;
    for node in root.named_children(&mut cursor) {
        let kind = node.kind();
        if !seen_package {
            match kind {
                "comment" => continue,
                "package_clause" => {
                    seen_package = true;
                    continue;
                }
                _ => return Err(structure_error(node, text, "expected `package` clause")),
            }
        }
        if !TOP_LEVEL_KINDS.contains(&kind) {
            return Err(structure_error(
                node,
                text,
                "non-declaration statement outside function body",
            ));
        }
    }
    if seen_package {
        Ok(())
    } else {
        let end = root.end_position();
        Err(ExtractError::Parse {
            line: end.row + 1,
            column: end.column + 1,
            message: "expected `package` clause".to_string(),
        })
    }
}

fn structure_error(node: Node, text: &str, what: &str) -> ExtractError {
    let pos = node.start_position();
    let snippet = snippet(node, text);
    ExtractError::Parse {
        line: pos.row + 1,
        column: pos.column + 1,
        message: if snippet.is_empty() {
            what.to_string()
        } else {
            format!("{what}, found `{snippet}`")
        },
    }
}

fn function_span(node: Node, text: &str, receiver: Option<String>) -> Option<FunctionSpan> {
    let name = node.child_by_field_name("name")?;
    let name = name.utf8_text(text.as_bytes()).ok()?;
    let kind = if receiver.is_some() {
        FunctionKind::Method
    } else {
        FunctionKind::Function
    };

    Some(FunctionSpan {
        name: name.to_string(),
        receiver,
        kind,
        start: node.start_byte(),
        end: node.end_byte(),
        start_line: node.start_position().row + 1,
        end_line: node.end_position().row + 1,
    })
}

/// Receiver type name with pointer and type arguments stripped:
/// `(s *Stack[T])` gives `Stack`.
fn receiver_type(node: Node, text: &str) -> Option<String> {
    let receiver = node.child_by_field_name("receiver")?;
    let mut cursor = receiver.walk();
    let param = receiver
        .named_children(&mut cursor)
        .find(|c| c.kind() == "parameter_declaration")?;
    let ty = param.child_by_field_name("type")?;
    let raw = ty.utf8_text(text.as_bytes()).ok()?;

    let name = raw.trim().trim_start_matches('*').trim();
    let name = name.split('[').next().unwrap_or(name).trim();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// Depth-first search for the first ERROR or MISSING node.
fn first_error(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if let Some(bad) = first_error(child) {
            return Some(bad);
        }
    }
    None
}

fn describe_error(node: Node, text: &str) -> String {
    if node.is_missing() {
        return format!("missing `{}`", node.kind());
    }
    let snippet = snippet(node, text);
    if snippet.is_empty() {
        "unexpected syntax".to_string()
    } else {
        format!("unexpected syntax near `{snippet}`")
    }
}

/// First line of the node's text, at most 40 characters.
fn snippet(node: Node, text: &str) -> String {
    let head: String = node
        .utf8_text(text.as_bytes())
        .unwrap_or_default()
        .chars()
        .take(40)
        .collect();
    head.lines().next().unwrap_or_default().trim().to_string()
}

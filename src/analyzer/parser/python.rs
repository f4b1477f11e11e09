//! Python symbol extractor
//!
//! Walks the top-level statements of a module and records classes,
//! functions, module-level bindings and one page block per supported
//! statement. Nothing below module level is visited except class bodies,
//! which contribute their method names.

use serde_json::Value;
use tracing::{debug, warn};
use tree_sitter::Node;

use super::{Language, SymbolParser, create_ts_parser, get_node_lines, get_node_text, named_children};
use crate::types::{BlockKind, ClassSymbols, CodeBlock, FileSymbols, Result, ScopeError};

const FUTURE_MODULE: &str = "__future__";

pub struct PythonParser;

impl PythonParser {
    pub fn new() -> Result<Self> {
        // Validate that the language is available
        let _ = create_ts_parser(tree_sitter_python::LANGUAGE, "Python")?;
        Ok(Self)
    }
}

impl SymbolParser for PythonParser {
    fn parse(&self, path: &str, content: &str) -> Result<FileSymbols> {
        let mut parser =
            create_ts_parser(tree_sitter_python::LANGUAGE, "Python").map_err(|mut e| {
                if let ScopeError::Parse {
                    path: ref mut p, ..
                } = e
                {
                    *p = path.to_string();
                }
                e
            })?;

        let tree = parser
            .parse(content, None)
            .ok_or_else(|| ScopeError::Parse {
                message: "Failed to parse Python file".to_string(),
                path: path.to_string(),
            })?;

        let root = tree.root_node();
        if root.has_error() {
            return Err(ScopeError::Parse {
                message: "syntax errors in module".to_string(),
                path: path.to_string(),
            });
        }

        let mut extractor = Extractor::new(path, content.as_bytes());
        for node in named_children(root) {
            extractor.visit(node);
        }
        Ok(extractor.symbols)
    }

    fn language(&self) -> Language {
        Language::Python
    }
}

// =============================================================================
// Statement classification
// =============================================================================

/// Top-level statement shapes that produce page blocks
enum Statement<'t> {
    Import(Node<'t>),
    ImportFrom {
        node: Node<'t>,
        future: bool,
    },
    Class(Node<'t>),
    Function {
        node: Node<'t>,
        is_async: bool,
    },
    Assignment {
        statement: Node<'t>,
        assignment: Node<'t>,
    },
    Expression(Node<'t>),
    Conditional(Node<'t>),
    /// Exception handling, skipped without a diagnostic
    Silent,
    Unsupported(Node<'t>),
}

impl<'t> Statement<'t> {
    fn classify(node: Node<'t>) -> Self {
        match node.kind() {
            "import_statement" => Statement::Import(node),
            "import_from_statement" => Statement::ImportFrom {
                node,
                future: false,
            },
            "future_import_statement" => Statement::ImportFrom { node, future: true },
            "class_definition" => Statement::Class(node),
            "function_definition" => Statement::Function {
                node,
                is_async: is_async(node),
            },
            "decorated_definition" => match node.child_by_field_name("definition") {
                Some(definition) => Self::classify(definition),
                None => Statement::Unsupported(node),
            },
            "expression_statement" => {
                let children = named_children(node);
                match children.as_slice() {
                    [only] if only.kind() == "assignment" => Statement::Assignment {
                        statement: node,
                        assignment: *only,
                    },
                    [only] if only.kind() == "augmented_assignment" => {
                        Statement::Unsupported(node)
                    }
                    _ => Statement::Expression(node),
                }
            }
            "if_statement" => Statement::Conditional(node),
            "try_statement" => Statement::Silent,
            _ => Statement::Unsupported(node),
        }
    }
}

fn is_async(function: Node) -> bool {
    let mut cursor = function.walk();
    function
        .children(&mut cursor)
        .next()
        .is_some_and(|c| c.kind() == "async")
}

// =============================================================================
// Extraction
// =============================================================================

struct Extractor<'a> {
    path: &'a str,
    source: &'a [u8],
    symbols: FileSymbols,
}

impl<'a> Extractor<'a> {
    fn new(path: &'a str, source: &'a [u8]) -> Self {
        Self {
            path,
            source,
            symbols: FileSymbols::empty(path),
        }
    }

    fn text(&self, node: Node) -> &'a str {
        get_node_text(node, self.source)
    }

    fn visit(&mut self, node: Node) {
        let code_block = match Statement::classify(node) {
            Statement::Import(node) => {
                let names = self.imported_names(node);
                block(node, BlockKind::Import).with_tokens(names)
            }
            Statement::ImportFrom { node, future } => {
                let module = if future {
                    Value::String(FUTURE_MODULE.to_string())
                } else {
                    self.from_module(node)
                };
                let names = self.imported_names(node);
                block(node, BlockKind::ImportFrom)
                    .with_property("module", module)
                    .with_property("names", Value::from(names))
            }
            Statement::Class(node) => {
                let name = self.field_text(node, "name");
                let methods = self.method_names(node);
                self.symbols.classes.push(ClassSymbols {
                    name: name.clone(),
                    methods,
                });
                block(node, BlockKind::ClassDef).with_tokens(vec![name])
            }
            Statement::Function { node, is_async } => {
                let name = self.field_text(node, "name");
                self.symbols.functions.push(name.clone());
                let kind = if is_async {
                    BlockKind::AsyncFunctionDef
                } else {
                    BlockKind::FunctionDef
                };
                block(node, kind).with_tokens(vec![name])
            }
            Statement::Assignment {
                statement,
                assignment,
            } => self.assignment_block(statement, assignment),
            Statement::Expression(node) => {
                let value = match named_children(node).as_slice() {
                    [only] => ValueExpr::from_node(*only, self.source),
                    _ => ValueExpr::Tuple,
                };
                let resolved = self.token(&value, node);
                block(node, BlockKind::Expression)
                    .with_tokens(vec![value.kind_name().to_string(), resolved])
            }
            Statement::Conditional(node) => {
                let tokens = node
                    .child_by_field_name("condition")
                    .map(|c| self.condition_tokens(c))
                    .unwrap_or_default();
                block(node, BlockKind::Conditional).with_tokens(tokens)
            }
            Statement::Silent => return,
            Statement::Unsupported(node) => {
                let (start, end) = get_node_lines(node);
                warn!(
                    "Unsupported code block in {}: {}-{} ({})",
                    self.path,
                    start,
                    end,
                    node.kind()
                );
                return;
            }
        };
        self.symbols.page_blocks.push(code_block);
    }

    fn field_text(&self, node: Node, field: &str) -> String {
        node.child_by_field_name(field)
            .map(|n| self.text(n).to_string())
            .unwrap_or_default()
    }

    /// `a.b`, `c as d` and `*` entries of an import statement
    fn imported_names(&self, node: Node) -> Vec<String> {
        let mut names = Vec::new();
        let mut cursor = node.walk();
        for child in node.children_by_field_name("name", &mut cursor) {
            match child.kind() {
                "aliased_import" => {
                    let name = self.dotted(child.child_by_field_name("name"));
                    let alias = self.dotted(child.child_by_field_name("alias"));
                    names.push(format!("{} as {}", name, alias));
                }
                _ => names.push(self.dotted(Some(child))),
            }
        }
        if named_children(node)
            .iter()
            .any(|c| c.kind() == "wildcard_import")
        {
            names.push("*".to_string());
        }
        names
    }

    fn dotted(&self, node: Option<Node>) -> String {
        node.map(|n| self.text(n).split_whitespace().collect())
            .unwrap_or_default()
    }

    /// Source module of `from m import ...`; relative dots stripped, null when nothing remains
    fn from_module(&self, node: Node) -> Value {
        let module: String = self.dotted(node.child_by_field_name("module_name"));
        let module = module.trim_start_matches('.');
        if module.is_empty() {
            Value::Null
        } else {
            Value::String(module.to_string())
        }
    }

    /// Plain and decorated function members, in order
    fn method_names(&self, class: Node) -> Vec<String> {
        let Some(body) = class.child_by_field_name("body") else {
            return Vec::new();
        };
        named_children(body)
            .into_iter()
            .filter_map(|member| match member.kind() {
                "function_definition" => Some(member),
                "decorated_definition" => member
                    .child_by_field_name("definition")
                    .filter(|d| d.kind() == "function_definition"),
                _ => None,
            })
            .map(|f| self.field_text(f, "name"))
            .collect()
    }

    fn assignment_block(&mut self, statement: Node, assignment: Node) -> CodeBlock {
        if assignment.child_by_field_name("type").is_some() {
            let target = assignment.child_by_field_name("left");
            let token = target.map(|t| self.target_token(t)).unwrap_or_default();
            return block(statement, BlockKind::AnnotatedAssignment).with_tokens(vec![token]);
        }

        // `a = b = 1` nests the second assignment on the right
        let mut targets = Vec::new();
        let mut current = Some(assignment);
        while let Some(node) = current {
            targets.extend(node.child_by_field_name("left"));
            current = node
                .child_by_field_name("right")
                .filter(|r| r.kind() == "assignment");
        }

        let tokens = targets.iter().map(|t| self.target_token(*t)).collect();
        block(statement, BlockKind::Assignment).with_tokens(tokens)
    }

    /// Resolve an assignment target, recording bare identifiers as globals.
    fn target_token(&mut self, target: Node) -> String {
        let value = ValueExpr::from_node(target, self.source);
        if let ValueExpr::Identifier(name) = &value {
            self.symbols.globals.push(name.clone());
        }
        self.token(&value, target)
    }

    fn token(&self, value: &ValueExpr, at: Node) -> String {
        value.resolve().unwrap_or_else(|| {
            debug!(
                "Unresolvable value in {} at line {}: {}",
                self.path,
                at.start_position().row + 1,
                value.kind_name()
            );
            String::new()
        })
    }

    fn condition_tokens(&self, condition: Node) -> Vec<String> {
        let condition = unwrap_parens(condition);
        let operands = match condition.kind() {
            "boolean_operator" => {
                let mut leaves = Vec::new();
                let operator = self.field_text(condition, "operator");
                flatten_boolean(condition, &operator, self.source, &mut leaves);
                leaves.into_iter().filter_map(left_operand).collect()
            }
            "comparison_operator" => named_children(condition),
            other => {
                debug!(
                    "Condition without comparison in {} at line {}: {}",
                    self.path,
                    condition.start_position().row + 1,
                    other
                );
                Vec::new()
            }
        };

        operands
            .into_iter()
            .filter_map(|n| ValueExpr::from_node(n, self.source).resolve())
            .filter(|t| !t.is_empty())
            .collect()
    }
}

fn block(node: Node, kind: BlockKind) -> CodeBlock {
    let (start, end) = get_node_lines(node);
    CodeBlock::new(kind, start, end)
}

/// Operands of an unparenthesized chain of the same boolean operator.
fn flatten_boolean<'t>(node: Node<'t>, operator: &str, source: &[u8], leaves: &mut Vec<Node<'t>>) {
    for field in ["left", "right"] {
        let Some(side) = node.child_by_field_name(field) else {
            continue;
        };
        let same_chain = side.kind() == "boolean_operator"
            && side
                .child_by_field_name("operator")
                .is_some_and(|op| get_node_text(op, source) == operator);
        if same_chain {
            flatten_boolean(side, operator, source, leaves);
        } else {
            leaves.push(side);
        }
    }
}

/// Left operand of a comparison or binary expression.
fn left_operand(node: Node) -> Option<Node> {
    let node = unwrap_parens(node);
    match node.kind() {
        "comparison_operator" => named_children(node).into_iter().next(),
        "binary_operator" => node.child_by_field_name("left"),
        _ => None,
    }
}

fn unwrap_parens(mut node: Node) -> Node {
    while node.kind() == "parenthesized_expression" {
        match named_children(node).into_iter().next() {
            Some(inner) => node = inner,
            None => break,
        }
    }
    node
}

// =============================================================================
// Value resolution
// =============================================================================

/// Shape of an expression used as a token source
#[derive(Debug, Clone, PartialEq)]
pub enum ValueExpr {
    /// Literal value, string quotes and prefixes removed
    Constant(String),
    Identifier(String),
    MemberAccess {
        owner: Option<String>,
        member: String,
    },
    Call(Box<ValueExpr>),
    Tuple,
    /// Anything else, keeping the syntax kind for diagnostics
    Other(String),
}

impl ValueExpr {
    pub fn from_node(node: Node, source: &[u8]) -> Self {
        let node = unwrap_parens(node);
        let text = || get_node_text(node, source).to_string();

        match node.kind() {
            "string" if is_plain_string(node) => ValueExpr::Constant(unquote(&text())),
            "concatenated_string" if named_children(node).into_iter().all(is_plain_string) => {
                ValueExpr::Constant(
                    named_children(node)
                        .into_iter()
                        .map(|s| unquote(get_node_text(s, source)))
                        .collect(),
                )
            }
            "integer" | "float" | "true" | "false" | "none" | "ellipsis" => {
                ValueExpr::Constant(text())
            }
            "identifier" => ValueExpr::Identifier(text()),
            "attribute" => {
                let owner = node
                    .child_by_field_name("object")
                    .filter(|o| o.kind() == "identifier")
                    .map(|o| get_node_text(o, source).to_string());
                let member = node
                    .child_by_field_name("attribute")
                    .map(|a| get_node_text(a, source).to_string())
                    .unwrap_or_default();
                ValueExpr::MemberAccess { owner, member }
            }
            "call" => match node.child_by_field_name("function") {
                Some(callee) => ValueExpr::Call(Box::new(Self::from_node(callee, source))),
                None => ValueExpr::Other("call".to_string()),
            },
            "tuple" | "pattern_list" | "expression_list" | "tuple_pattern" => ValueExpr::Tuple,
            other => ValueExpr::Other(other.to_string()),
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            ValueExpr::Constant(_) => "constant",
            ValueExpr::Identifier(_) => "identifier",
            ValueExpr::MemberAccess { .. } => "member-access",
            ValueExpr::Call(_) => "call",
            ValueExpr::Tuple => "tuple",
            ValueExpr::Other(_) => "other",
        }
    }

    /// Display name of the value; `None` when it has no stable name.
    pub fn resolve(&self) -> Option<String> {
        match self {
            ValueExpr::Constant(v) | ValueExpr::Identifier(v) => Some(v.clone()),
            ValueExpr::MemberAccess {
                owner: Some(owner),
                member,
            } => Some(format!("{}.{}", owner, member)),
            ValueExpr::MemberAccess {
                owner: None,
                member,
            } => Some(member.clone()),
            ValueExpr::Call(callee) => callee.resolve(),
            ValueExpr::Tuple => Some(String::new()),
            ValueExpr::Other(_) => None,
        }
    }
}

/// Strings without `{}` interpolation; f-strings are not constants.
fn is_plain_string(node: Node) -> bool {
    node.kind() == "string" && !named_children(node).iter().any(|c| c.kind() == "interpolation")
}

/// Strip the prefix letters and the quotes of a string literal.
fn unquote(literal: &str) -> String {
    let body = literal.trim_start_matches(|c: char| c.is_ascii_alphabetic());
    for quote in ["\"\"\"", "'''", "\"", "'"] {
        if body.len() >= 2 * quote.len() && body.starts_with(quote) && body.ends_with(quote) {
            return body[quote.len()..body.len() - quote.len()].to_string();
        }
    }
    body.to_string()
}

//! AST produced by the external parser.
//!
//! The parser hands over a JSON document; every node carries a `kind`
//! discriminator and its own `pos` (1-based line, 0-based column). Composite
//! nodes own their children outright, so the tree has no sharing and no
//! cycles. Nodes are never mutated after deserialisation.
//!
//! ```json
//! { "kind": "print", "pos": { "line": 2, "column": 4 }, "value": "1+1" }
//! ```

use quill_common::SourcePosition;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The parser's output for one source file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AstDocument {
    /// Name of the original source file, as it should appear in `sources`.
    pub source: String,
    /// Original source text, embedded in the map when requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_text: Option<String>,
    pub program: ProgramNode,
}

impl AstDocument {
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Node {
    Print(PrintNode),
    IntDeclaration(IntDeclarationNode),
    Assignment(AssignmentNode),
    If(IfNode),
    While(WhileNode),
    FunctionDeclaration(FunctionDeclarationNode),
    Call(CallNode),
    Return(ReturnNode),
    Bool(BoolNode),
    CallAssignment(CallAssignmentNode),
    Program(ProgramNode),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Print,
    IntDeclaration,
    Assignment,
    If,
    Else,
    While,
    FunctionDeclaration,
    Call,
    Return,
    Bool,
    CallAssignment,
    Program,
}

impl NodeKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Print => "print",
            Self::IntDeclaration => "int declaration",
            Self::Assignment => "assignment",
            Self::If => "if",
            Self::Else => "else",
            Self::While => "while",
            Self::FunctionDeclaration => "function declaration",
            Self::Call => "call",
            Self::Return => "return",
            Self::Bool => "boolean literal",
            Self::CallAssignment => "call assignment",
            Self::Program => "program",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Print(_) => NodeKind::Print,
            Node::IntDeclaration(_) => NodeKind::IntDeclaration,
            Node::Assignment(_) => NodeKind::Assignment,
            Node::If(_) => NodeKind::If,
            Node::While(_) => NodeKind::While,
            Node::FunctionDeclaration(_) => NodeKind::FunctionDeclaration,
            Node::Call(_) => NodeKind::Call,
            Node::Return(_) => NodeKind::Return,
            Node::Bool(_) => NodeKind::Bool,
            Node::CallAssignment(_) => NodeKind::CallAssignment,
            Node::Program(_) => NodeKind::Program,
        }
    }

    pub fn position(&self) -> SourcePosition {
        match self {
            Node::Print(node) => node.pos,
            Node::IntDeclaration(node) => node.pos,
            Node::Assignment(node) => node.pos,
            Node::If(node) => node.pos,
            Node::While(node) => node.pos,
            Node::FunctionDeclaration(node) => node.pos,
            Node::Call(node) => node.pos,
            Node::Return(node) => node.pos,
            Node::Bool(node) => node.pos,
            Node::CallAssignment(node) => node.pos,
            Node::Program(node) => node.pos,
        }
    }

    /// Nodes that produce a value inline rather than a full statement line.
    pub fn is_expression(&self) -> bool {
        matches!(self, Node::Bool(_))
    }
}

/// `print <value>`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PrintNode {
    pub pos: SourcePosition,
    /// Pre-rendered expression text.
    pub value: String,
}

/// `int <name> = <value>`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IntDeclarationNode {
    pub pos: SourcePosition,
    pub name: String,
    pub value: Initializer,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Initializer {
    /// Pre-rendered expression text.
    Expression(String),
    /// A nested expression node compiled in place.
    Node(Box<Node>),
}

/// `<name> = <initial> <op> <op> ...`
///
/// Each operation is an operator followed by its operand, e.g. `"+2"`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentNode {
    pub pos: SourcePosition,
    pub name: String,
    pub initial_value: String,
    #[serde(default)]
    pub operations: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IfNode {
    pub pos: SourcePosition,
    pub predicate: String,
    #[serde(default)]
    pub then_statements: Vec<Node>,
    #[serde(default)]
    pub else_statements: Vec<Node>,
    /// Where the `else` keyword was, when the source had one.
    #[serde(default)]
    pub else_node: Option<ElseNode>,
    /// Position of the construct's closing keyword.
    pub end: SourcePosition,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ElseNode {
    pub pos: SourcePosition,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WhileNode {
    pub pos: SourcePosition,
    pub predicate: String,
    #[serde(default)]
    pub body: Vec<Node>,
    pub end: SourcePosition,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FunctionDeclarationNode {
    pub pos: SourcePosition,
    pub name: String,
    #[serde(default)]
    pub parameters: Vec<String>,
    #[serde(default)]
    pub body: Vec<Node>,
}

/// Call in statement form. Arguments are pre-rendered expression text.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CallNode {
    pub pos: SourcePosition,
    pub name: String,
    #[serde(default)]
    pub arguments: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReturnNode {
    pub pos: SourcePosition,
    pub value: String,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoolNode {
    pub pos: SourcePosition,
    pub value: bool,
}

/// `<name> = <call>`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CallAssignmentNode {
    pub pos: SourcePosition,
    pub name: String,
    pub call: CallNode,
}

/// Root of a source file: the top-level statement list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProgramNode {
    pub pos: SourcePosition,
    #[serde(default)]
    pub statements: Vec<Node>,
    pub end: SourcePosition,
}

// =========================================================================
// Builder helpers for AST construction
// =========================================================================

fn at(line: u32, column: u32) -> SourcePosition {
    SourcePosition::new(line, column)
}

impl Node {
    pub fn print(line: u32, column: u32, value: impl Into<String>) -> Self {
        Self::Print(PrintNode {
            pos: at(line, column),
            value: value.into(),
        })
    }

    pub fn int_decl(line: u32, column: u32, name: impl Into<String>, value: Initializer) -> Self {
        Self::IntDeclaration(IntDeclarationNode {
            pos: at(line, column),
            name: name.into(),
            value,
        })
    }

    pub fn assign(
        line: u32,
        column: u32,
        name: impl Into<String>,
        initial_value: impl Into<String>,
        operations: &[&str],
    ) -> Self {
        Self::Assignment(AssignmentNode {
            pos: at(line, column),
            name: name.into(),
            initial_value: initial_value.into(),
            operations: operations.iter().map(|op| (*op).to_string()).collect(),
        })
    }

    pub fn call(line: u32, column: u32, name: impl Into<String>, arguments: &[&str]) -> Self {
        Self::Call(CallNode::new(line, column, name, arguments))
    }

    pub fn ret(line: u32, column: u32, value: impl Into<String>) -> Self {
        Self::Return(ReturnNode {
            pos: at(line, column),
            value: value.into(),
        })
    }

    pub fn boolean(line: u32, column: u32, value: bool) -> Self {
        Self::Bool(BoolNode {
            pos: at(line, column),
            value,
        })
    }

    pub fn call_assign(line: u32, column: u32, name: impl Into<String>, call: CallNode) -> Self {
        Self::CallAssignment(CallAssignmentNode {
            pos: at(line, column),
            name: name.into(),
            call,
        })
    }

    pub fn while_loop(
        line: u32,
        column: u32,
        predicate: impl Into<String>,
        body: Vec<Node>,
        end: SourcePosition,
    ) -> Self {
        Self::While(WhileNode {
            pos: at(line, column),
            predicate: predicate.into(),
            body,
            end,
        })
    }

    pub fn function(
        line: u32,
        column: u32,
        name: impl Into<String>,
        parameters: &[&str],
        body: Vec<Node>,
    ) -> Self {
        Self::FunctionDeclaration(FunctionDeclarationNode {
            pos: at(line, column),
            name: name.into(),
            parameters: parameters.iter().map(|p| (*p).to_string()).collect(),
            body,
        })
    }
}

impl CallNode {
    pub fn new(line: u32, column: u32, name: impl Into<String>, arguments: &[&str]) -> Self {
        Self {
            pos: at(line, column),
            name: name.into(),
            arguments: arguments.iter().map(|a| (*a).to_string()).collect(),
        }
    }
}

impl IfNode {
    pub fn new(line: u32, column: u32, predicate: impl Into<String>, end: SourcePosition) -> Self {
        Self {
            pos: at(line, column),
            predicate: predicate.into(),
            then_statements: Vec::new(),
            else_statements: Vec::new(),
            else_node: None,
            end,
        }
    }

    pub fn then(mut self, statements: Vec<Node>) -> Self {
        self.then_statements = statements;
        self
    }

    pub fn otherwise(mut self, else_pos: SourcePosition, statements: Vec<Node>) -> Self {
        self.else_node = Some(ElseNode { pos: else_pos });
        self.else_statements = statements;
        self
    }
}

impl From<IfNode> for Node {
    fn from(node: IfNode) -> Self {
        Node::If(node)
    }
}

impl ProgramNode {
    pub fn new(pos: SourcePosition, statements: Vec<Node>, end: SourcePosition) -> Self {
        Self {
            pos,
            statements,
            end,
        }
    }
}

#[cfg(test)]
#[path = "../tests/ast.rs"]
mod tests;

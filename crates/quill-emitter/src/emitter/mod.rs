//! The node compilation contract.
//!
//! Every AST node implements [`Compile`], turning itself into a [`Fragment`]
//! tagged with its own source position. The indentation of a statement's
//! first line belongs to the enclosing statement list ([`compile_statements`]);
//! a node uses `indent` only for lines it emits after its first one, such as
//! closing braces. Compiling any node at level 0 therefore yields its text
//! exactly as it would appear flush left.

mod control_flow;
mod declarations;
mod literals;
mod statements;

pub use statements::fold_operations;

use crate::ast::{Node, NodeKind, ProgramNode};
use crate::error::{CompileError, MalformedReason};
use crate::fragment::{Fragment, Tag};
use crate::indent::indent_text;
use quill_common::{FileId, SourcePosition};

pub trait Compile {
    fn compile(&self, indent: u32, file: FileId) -> Result<Fragment, CompileError>;
}

impl Compile for Node {
    fn compile(&self, indent: u32, file: FileId) -> Result<Fragment, CompileError> {
        tracing::trace!(kind = %self.kind(), pos = %self.position(), indent, "compile node");
        match self {
            Node::Print(node) => node.compile(indent, file),
            Node::IntDeclaration(node) => node.compile(indent, file),
            Node::Assignment(node) => node.compile(indent, file),
            Node::If(node) => node.compile(indent, file),
            Node::While(node) => node.compile(indent, file),
            Node::FunctionDeclaration(node) => node.compile(indent, file),
            Node::Call(node) => node.compile(indent, file),
            Node::Return(node) => node.compile(indent, file),
            Node::Bool(node) => node.compile(indent, file),
            Node::CallAssignment(node) => node.compile(indent, file),
            Node::Program(node) => node.compile(indent, file),
        }
    }
}

/// Compile a statement list at `indent`, prefixing each statement with the
/// indentation for that level.
pub fn compile_statements(
    statements: &[Node],
    indent: u32,
    file: FileId,
) -> Result<Fragment, CompileError> {
    let prefix = indent_text(indent);
    let mut block = Fragment::empty();
    for statement in statements {
        check_statement(statement)?;
        if !prefix.is_empty() {
            block.push(Fragment::leaf(prefix.clone()));
        }
        block.push(statement.compile(indent, file)?);
    }
    Ok(block)
}

/// Compile a whole program rooted at level 0.
pub fn compile_program(program: &ProgramNode, file: FileId) -> Result<Fragment, CompileError> {
    tracing::debug!(
        file = %file,
        statements = program.statements.len(),
        "compiling program"
    );
    program.compile(0, file)
}

fn check_statement(statement: &Node) -> Result<(), CompileError> {
    let reason = match statement {
        Node::Program(_) => MalformedReason::NestedProgram,
        node if node.is_expression() => MalformedReason::ExpressionStatement,
        _ => return Ok(()),
    };
    Err(CompileError::malformed(
        statement.kind(),
        statement.position(),
        reason,
    ))
}

fn check_name(name: &str, kind: NodeKind, position: SourcePosition) -> Result<(), CompileError> {
    if name.trim().is_empty() {
        return Err(CompileError::malformed(
            kind,
            position,
            MalformedReason::EmptyName,
        ));
    }
    Ok(())
}

fn tag(position: SourcePosition, file: FileId) -> Tag {
    Tag::new(position, file)
}

#[cfg(test)]
#[path = "../../tests/emitter.rs"]
mod tests;

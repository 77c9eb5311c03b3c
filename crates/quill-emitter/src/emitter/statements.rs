//! Single-line statements: print, declarations, assignments, calls, returns.

use super::{Compile, check_name, tag};
use crate::ast::{
    AssignmentNode, CallAssignmentNode, CallNode, Initializer, IntDeclarationNode, NodeKind,
    PrintNode, ReturnNode,
};
use crate::error::{CompileError, MalformedReason};
use crate::fragment::Fragment;
use crate::indent::indent_text;
use quill_common::FileId;

impl Compile for PrintNode {
    fn compile(&self, _indent: u32, file: FileId) -> Result<Fragment, CompileError> {
        Ok(Fragment::tagged(
            tag(self.pos, file),
            format!("console.log( {} );\n", self.value),
        ))
    }
}

impl Compile for IntDeclarationNode {
    fn compile(&self, _indent: u32, file: FileId) -> Result<Fragment, CompileError> {
        check_name(&self.name, NodeKind::IntDeclaration, self.pos)?;

        let value = match &self.value {
            Initializer::Expression(text) => Fragment::leaf(text.clone()),
            Initializer::Node(node) if node.is_expression() => node.compile(0, file)?,
            Initializer::Node(node) => {
                return Err(CompileError::malformed(
                    node.kind(),
                    node.position(),
                    MalformedReason::InvalidInitializer,
                ));
            }
        };

        Ok(Fragment::tagged(tag(self.pos, file), format!("var {} = ", self.name))
            .with(value)
            .with(Fragment::leaf(";\n")))
    }
}

/// Fold `operations` onto `initial`, left to right, parenthesising every step.
///
/// `fold_operations("1", ["+2", "*3"])` is `((1+2)*3)`, so the result never
/// depends on the target's operator precedence.
pub fn fold_operations<S: AsRef<str>>(initial: &str, operations: &[S]) -> String {
    operations
        .iter()
        .fold(initial.to_string(), |acc, op| format!("({acc}{})", op.as_ref()))
}

impl Compile for AssignmentNode {
    /// The assigned value is always an integer afterwards: a boolean becomes
    /// 1 or 0, then the number is rounded half away from zero. Applied even
    /// when the folded expression is already integral.
    fn compile(&self, indent: u32, file: FileId) -> Result<Fragment, CompileError> {
        check_name(&self.name, NodeKind::Assignment, self.pos)?;

        let name = &self.name;
        let folded = fold_operations(&self.initial_value, &self.operations);
        let continuation = indent_text(indent);

        Ok(Fragment::tagged(tag(self.pos, file), format!("var {name} = ({folded});\n"))
            .with(Fragment::leaf(continuation.clone()))
            .with(Fragment::leaf(format!(
                "if (typeof({name}) === \"boolean\") {{ {name} = {name} ? 1 : 0; }}\n"
            )))
            .with(Fragment::leaf(continuation))
            .with(Fragment::leaf(format!(
                "{name} = Math.sign({name}) * Math.round(Math.abs({name}));\n"
            ))))
    }
}

impl Compile for CallNode {
    fn compile(&self, _indent: u32, file: FileId) -> Result<Fragment, CompileError> {
        check_name(&self.name, NodeKind::Call, self.pos)?;
        Ok(Fragment::tagged(
            tag(self.pos, file),
            format!("{}({});\n", self.name, self.arguments.join(", ")),
        ))
    }
}

impl Compile for ReturnNode {
    fn compile(&self, _indent: u32, file: FileId) -> Result<Fragment, CompileError> {
        Ok(Fragment::tagged(
            tag(self.pos, file),
            format!("return {};\n", self.value),
        ))
    }
}

impl Compile for CallAssignmentNode {
    fn compile(&self, _indent: u32, file: FileId) -> Result<Fragment, CompileError> {
        check_name(&self.name, NodeKind::CallAssignment, self.pos)?;
        let call = self.call.compile(0, file)?;
        Ok(Fragment::tagged(tag(self.pos, file), format!("var {} = ", self.name)).with(call))
    }
}

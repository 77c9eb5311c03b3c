use super::{Compile, compile_statements, tag};
use crate::ast::{IfNode, NodeKind, WhileNode};
use crate::error::{CompileError, MalformedReason};
use crate::fragment::Fragment;
use crate::indent::indent_text;
use quill_common::FileId;

impl Compile for IfNode {
    /// ```text
    /// if (<predicate>) {
    ///     <then statements>
    /// } else {
    ///     <else statements>
    /// }
    /// ```
    ///
    /// The `} else {` line is emitted only when there are else statements and
    /// maps to the `else` keyword. The closing brace maps to the construct's
    /// end position.
    fn compile(&self, indent: u32, file: FileId) -> Result<Fragment, CompileError> {
        let continuation = indent_text(indent);
        let mut out = Fragment::tagged(tag(self.pos, file), format!("if ({}) {{\n", self.predicate));
        out.push(compile_statements(&self.then_statements, indent + 1, file)?);

        if !self.else_statements.is_empty() {
            let Some(else_node) = self.else_node else {
                return Err(CompileError::malformed(
                    NodeKind::If,
                    self.pos,
                    MalformedReason::ElseWithoutIntroducer,
                ));
            };
            out.push(Fragment::leaf(continuation.clone()));
            out.push(Fragment::tagged(tag(else_node.pos, file), "} else {\n"));
            out.push(compile_statements(&self.else_statements, indent + 1, file)?);
        }

        out.push(Fragment::leaf(continuation));
        out.push(Fragment::tagged(tag(self.end, file), "}\n"));
        Ok(out)
    }
}

impl Compile for WhileNode {
    fn compile(&self, indent: u32, file: FileId) -> Result<Fragment, CompileError> {
        Ok(
            Fragment::tagged(tag(self.pos, file), format!("while ({}) {{\n", self.predicate))
                .with(compile_statements(&self.body, indent + 1, file)?)
                .with(Fragment::leaf(indent_text(indent)))
                .with(Fragment::tagged(tag(self.end, file), "}\n")),
        )
    }
}

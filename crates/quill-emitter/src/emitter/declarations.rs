use super::{Compile, check_name, compile_statements, tag};
use crate::ast::{FunctionDeclarationNode, NodeKind, ProgramNode};
use crate::error::CompileError;
use crate::fragment::Fragment;
use crate::indent::indent_text;
use quill_common::FileId;

impl Compile for FunctionDeclarationNode {
    fn compile(&self, indent: u32, file: FileId) -> Result<Fragment, CompileError> {
        check_name(&self.name, NodeKind::FunctionDeclaration, self.pos)?;
        let header = format!("function {} ({}) {{\n", self.name, self.parameters.join(", "));
        Ok(Fragment::tagged(tag(self.pos, file), header)
            .with(compile_statements(&self.body, indent + 1, file)?)
            .with(Fragment::leaf(indent_text(indent)))
            .with(Fragment::leaf("}\n")))
    }
}

impl Compile for ProgramNode {
    /// The whole program runs inside an immediately invoked function so its
    /// `var`s stay out of the global scope.
    fn compile(&self, indent: u32, file: FileId) -> Result<Fragment, CompileError> {
        Ok(Fragment::tagged(tag(self.pos, file), "(function() {\n")
            .with(compile_statements(&self.statements, indent + 1, file)?)
            .with(Fragment::leaf(indent_text(indent)))
            .with(Fragment::tagged(tag(self.end, file), "}());\n")))
    }
}

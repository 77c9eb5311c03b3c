use super::{Compile, tag};
use crate::ast::BoolNode;
use crate::error::CompileError;
use crate::fragment::Fragment;
use quill_common::FileId;

impl Compile for BoolNode {
    fn compile(&self, _indent: u32, file: FileId) -> Result<Fragment, CompileError> {
        let text = if self.value { "true" } else { "false" };
        Ok(Fragment::tagged(tag(self.pos, file), text))
    }
}

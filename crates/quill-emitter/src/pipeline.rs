//! One-call compilation of a parsed document.

use crate::ast::AstDocument;
use crate::emitter::compile_program;
use crate::error::CompileError;
use crate::render::{MappingRecord, render};
use crate::source_map::{MapError, SourceMapOptions, assemble};
use quill_common::FileTable;
use quill_common::source_map::SourceMapGenerator;

#[derive(Clone, Debug, Default)]
pub struct EmitOptions {
    /// Value of the map's `file` field, normally the generated file's name.
    pub output_file: String,
    pub source_map: SourceMapOptions,
}

#[derive(Clone, Debug)]
pub struct EmitOutput {
    pub code: String,
    pub mappings: Vec<MappingRecord>,
    pub source_map: SourceMapGenerator,
}

#[derive(Debug, thiserror::Error)]
pub enum EmitError {
    #[error(transparent)]
    Compile(#[from] CompileError),
    #[error(transparent)]
    Map(#[from] MapError),
}

/// Compile, render and assemble the map for `document`.
///
/// Nothing is produced unless every step succeeds.
pub fn emit_document(document: &AstDocument, options: &EmitOptions) -> Result<EmitOutput, EmitError> {
    let _span = tracing::debug_span!("emit_document", source = %document.source).entered();

    let mut files = FileTable::new();
    let file = match &document.source_text {
        Some(text) => files.add_with_text(document.source.as_str(), text.as_str()),
        None => files.add(document.source.as_str()),
    };

    let fragment = compile_program(&document.program, file)?;
    let rendered = render(&fragment);
    let groups = assemble(&rendered.mappings, &files)?;
    let source_map = groups.to_generator(options.output_file.as_str(), &files, &options.source_map)?;

    Ok(EmitOutput {
        code: rendered.code,
        mappings: rendered.mappings,
        source_map,
    })
}

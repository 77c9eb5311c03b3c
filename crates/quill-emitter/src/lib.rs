//! Position-traced JavaScript code generation.
//!
//! The pipeline for one program is:
//!
//! 1. every AST node compiles itself into a [`Fragment`] tree
//!    ([`emitter::Compile`]), tagged with the node's source position;
//! 2. [`render`] flattens the tree into the output text and an ordered list of
//!    [`MappingRecord`]s;
//! 3. [`source_map::assemble`] groups the records by generated line and feeds
//!    them to the v3 encoder in `quill_common::source_map`.
//!
//! [`pipeline::emit_document`] runs all three for a parsed [`ast::AstDocument`].

pub mod ast;
pub mod emitter;
pub mod error;
pub mod fragment;
pub mod indent;
pub mod pipeline;
pub mod render;
pub mod source_map;

pub use ast::{AstDocument, Node, ProgramNode};
pub use emitter::{Compile, compile_program, compile_statements};
pub use error::{CompileError, MalformedReason};
pub use fragment::{Fragment, Tag};
pub use indent::indent_text;
pub use pipeline::{EmitError, EmitOptions, EmitOutput, emit_document};
pub use render::{MappingRecord, Rendered, render};
pub use source_map::{MapError, MappingGroups, SourceMapOptions, assemble};

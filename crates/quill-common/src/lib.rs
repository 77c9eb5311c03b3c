//! Common types and utilities for the quill compiler backend.
//!
//! This crate provides foundational types used across all quill crates:
//! - Source positions and the file table (`SourcePosition`, `FileId`, `FileTable`)
//! - User-facing diagnostics (`Diagnostic`, `DiagnosticCategory`)
//! - Source map generation (VLQ encoding and the v3 document)

// Position types for line/column source locations
pub mod position;
pub use position::{FileId, FileTable, SourceFile, SourcePosition};

// Diagnostics reported to the user
pub mod diagnostics;
pub use diagnostics::{Diagnostic, DiagnosticCategory};

// Source Map generation
pub mod source_map;

//! Flattening a fragment tree into text plus position mappings.
//!
//! [`render`] walks the tree once in pre-order, appending leaf text to the
//! output and tracking the generated cursor. Every tagged fragment, leaf or
//! composite, produces one [`MappingRecord`] at the cursor position where its
//! text begins. Text is only ever appended, so records come out ordered by
//! generated position.

use crate::fragment::{Content, Fragment, Tag};
use quill_common::FileId;

/// One generated-position to source-position correlation.
///
/// Generated and source lines are 1-based; columns are 0-based.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct MappingRecord {
    pub generated_line: u32,
    pub generated_column: u32,
    pub source_file: FileId,
    pub source_line: u32,
    pub source_column: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Rendered {
    pub code: String,
    pub mappings: Vec<MappingRecord>,
}

/// Position in generated text.
///
/// Columns count UTF-16 code units, which is what JavaScript tooling reading
/// the source map expects. For ASCII output this is the byte length.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Cursor {
    pub line: u32,
    pub column: u32,
}

impl Cursor {
    pub const START: Cursor = Cursor { line: 1, column: 0 };

    /// Move past `text`.
    pub fn advance(&mut self, text: &str) {
        let bytes = text.as_bytes();
        match memchr::memrchr(b'\n', bytes) {
            Some(last) => {
                self.line += memchr::memchr_iter(b'\n', bytes).count() as u32;
                self.column = column_width(&text[last + 1..]);
            }
            None => self.column += column_width(text),
        }
    }
}

fn column_width(text: &str) -> u32 {
    if text.is_ascii() {
        text.len() as u32
    } else {
        text.chars().map(|c| c.len_utf16() as u32).sum()
    }
}

/// Flatten `root` into its output text and ordered mapping records.
pub fn render(root: &Fragment) -> Rendered {
    let mut renderer = Renderer {
        cursor: Cursor::START,
        out: Rendered::default(),
    };
    renderer.visit(root);

    tracing::debug!(
        bytes = renderer.out.code.len(),
        lines = renderer.cursor.line,
        mappings = renderer.out.mappings.len(),
        "rendered fragment tree"
    );
    renderer.out
}

struct Renderer {
    cursor: Cursor,
    out: Rendered,
}

impl Renderer {
    fn visit(&mut self, fragment: &Fragment) {
        if let Some(tag) = fragment.tag() {
            self.record(tag);
        }
        match fragment.content() {
            Content::Text(text) => {
                self.out.code.push_str(text);
                self.cursor.advance(text);
            }
            Content::Children(children) => {
                for child in children {
                    self.visit(child);
                }
            }
        }
    }

    fn record(&mut self, tag: Tag) {
        tracing::trace!(
            line = self.cursor.line,
            column = self.cursor.column,
            source = %tag.position,
            "mapping"
        );
        self.out.mappings.push(MappingRecord {
            generated_line: self.cursor.line,
            generated_column: self.cursor.column,
            source_file: tag.file,
            source_line: tag.position.line,
            source_column: tag.position.column,
        });
    }
}

#[cfg(test)]
#[path = "../tests/render.rs"]
mod tests;

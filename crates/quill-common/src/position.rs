//! Line/column positions in original source files.
//!
//! Positions come from the external parser: lines are 1-based, columns are
//! 0-based. Source files are interned into a [`FileTable`] and referred to by
//! [`FileId`] everywhere else, so fragments and mapping records stay `Copy`.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A position in an original source file.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SourcePosition {
    /// 1-based line number.
    pub line: u32,
    /// 0-based column number.
    pub column: u32,
}

impl SourcePosition {
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Index of a source file in a [`FileTable`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FileId(pub u32);

impl FileId {
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An original source file referenced by generated code.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceFile {
    pub name: String,
    /// Full text of the file, when known. Embedded as `sourcesContent`.
    pub text: Option<String>,
}

/// Interned source file names.
///
/// Adding the same name twice returns the same [`FileId`]; the first known
/// text for a name wins.
#[derive(Clone, Debug, Default)]
pub struct FileTable {
    files: Vec<SourceFile>,
    by_name: FxHashMap<String, FileId>,
}

impl FileTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a file name without text.
    pub fn add(&mut self, name: impl Into<String>) -> FileId {
        self.add_file(name.into(), None)
    }

    /// Intern a file name together with its source text.
    pub fn add_with_text(&mut self, name: impl Into<String>, text: impl Into<String>) -> FileId {
        self.add_file(name.into(), Some(text.into()))
    }

    fn add_file(&mut self, name: String, text: Option<String>) -> FileId {
        if let Some(&id) = self.by_name.get(&name) {
            let file = &mut self.files[id.index()];
            if file.text.is_none() {
                file.text = text;
            }
            return id;
        }

        let id = FileId(self.files.len() as u32);
        self.by_name.insert(name.clone(), id);
        self.files.push(SourceFile { name, text });
        id
    }

    pub fn get(&self, id: FileId) -> Option<&SourceFile> {
        self.files.get(id.index())
    }

    pub fn name(&self, id: FileId) -> Option<&str> {
        self.get(id).map(|file| file.name.as_str())
    }

    pub fn lookup(&self, name: &str) -> Option<FileId> {
        self.by_name.get(name).copied()
    }

    pub fn contains(&self, id: FileId) -> bool {
        id.index() < self.files.len()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FileId, &SourceFile)> {
        self.files
            .iter()
            .enumerate()
            .map(|(index, file)| (FileId(index as u32), file))
    }
}

#[cfg(test)]
#[path = "../tests/position.rs"]
mod tests;

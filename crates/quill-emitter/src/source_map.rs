//! Boundary between the renderer and the v3 encoder.
//!
//! [`assemble`] takes the renderer's [`MappingRecord`] stream, checks every
//! record names a known source file, and groups the records by generated
//! line. [`MappingGroups::to_generator`] then feeds the groups to
//! [`SourceMapGenerator`], which owns the wire format.

use crate::render::MappingRecord;
use quill_common::source_map::SourceMapGenerator;
use quill_common::{FileId, FileTable};
use rustc_hash::{FxHashMap, FxHashSet};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MapError {
    #[error("mapping refers to unknown source file {0}")]
    UnknownFile(FileId),
}

/// All records on one generated line, in column order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LineMappings {
    /// 1-based.
    pub generated_line: u32,
    pub records: Vec<MappingRecord>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MappingGroups {
    lines: Vec<LineMappings>,
    files: Vec<FileId>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SourceMapOptions {
    pub source_root: Option<String>,
    /// Embed each source's text in `sourcesContent` when the table has it.
    pub include_sources_content: bool,
}

/// Group `records` by generated line.
///
/// Lines come out ascending; records within a line keep their column order,
/// and records at the same position keep the order they were produced in.
/// Referenced files are listed in order of first appearance.
pub fn assemble(records: &[MappingRecord], files: &FileTable) -> Result<MappingGroups, MapError> {
    let mut referenced = Vec::new();
    let mut seen = FxHashSet::default();
    for record in records {
        if !files.contains(record.source_file) {
            return Err(MapError::UnknownFile(record.source_file));
        }
        if seen.insert(record.source_file) {
            referenced.push(record.source_file);
        }
    }

    let mut sorted = records.to_vec();
    sorted.sort_by_key(|r| (r.generated_line, r.generated_column));

    let mut lines: Vec<LineMappings> = Vec::new();
    for record in sorted {
        match lines.last_mut() {
            Some(group) if group.generated_line == record.generated_line => {
                group.records.push(record);
            }
            _ => lines.push(LineMappings {
                generated_line: record.generated_line,
                records: vec![record],
            }),
        }
    }

    tracing::debug!(
        records = records.len(),
        lines = lines.len(),
        files = referenced.len(),
        "assembled mappings"
    );

    Ok(MappingGroups {
        lines,
        files: referenced,
    })
}

impl MappingGroups {
    pub fn lines(&self) -> &[LineMappings] {
        &self.lines
    }

    /// Referenced source files, in order of first appearance.
    pub fn files(&self) -> &[FileId] {
        &self.files
    }

    pub fn record_count(&self) -> usize {
        self.lines.iter().map(|line| line.records.len()).sum()
    }

    pub fn records(&self) -> impl Iterator<Item = &MappingRecord> {
        self.lines.iter().flat_map(|line| line.records.iter())
    }

    /// Build a v3 generator for `output_file` from these groups.
    ///
    /// Source indices follow [`MappingGroups::files`]. Lines become 0-based.
    pub fn to_generator(
        &self,
        output_file: impl Into<String>,
        files: &FileTable,
        options: &SourceMapOptions,
    ) -> Result<SourceMapGenerator, MapError> {
        let mut generator = SourceMapGenerator::new(output_file.into());
        if let Some(root) = &options.source_root {
            generator.set_source_root(root.clone());
        }

        let mut indices = FxHashMap::default();
        for &id in &self.files {
            let source = files.get(id).ok_or(MapError::UnknownFile(id))?;
            let index = match (&source.text, options.include_sources_content) {
                (Some(text), true) => {
                    generator.add_source_with_content(source.name.clone(), text.clone())
                }
                _ => generator.add_source(source.name.clone()),
            };
            indices.insert(id, index);
        }

        for record in self.records() {
            let index = *indices
                .get(&record.source_file)
                .ok_or(MapError::UnknownFile(record.source_file))?;
            generator.add_simple_mapping(
                record.generated_line.saturating_sub(1),
                record.generated_column,
                index,
                record.source_line.saturating_sub(1),
                record.source_column,
            );
        }

        Ok(generator)
    }
}

#[cfg(test)]
#[path = "../tests/source_map.rs"]
mod tests;

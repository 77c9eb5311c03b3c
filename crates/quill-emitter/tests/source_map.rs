use super::*;
use crate::ast::{Node, ProgramNode};
use crate::emitter::compile_program;
use crate::render::render;
use quill_common::SourcePosition;
use quill_common::source_map::{Mapping, decode_mappings};

fn record(line: u32, column: u32, file: FileId, source_line: u32, source_column: u32) -> MappingRecord {
    MappingRecord {
        generated_line: line,
        generated_column: column,
        source_file: file,
        source_line,
        source_column,
    }
}

fn table_with(names: &[&str]) -> (FileTable, Vec<FileId>) {
    let mut table = FileTable::new();
    let ids = names.iter().map(|name| table.add(*name)).collect();
    (table, ids)
}

#[test]
fn test_groups_records_by_line() {
    let (table, ids) = table_with(&["a.q"]);
    let a = ids[0];
    let records = [
        record(1, 0, a, 1, 0),
        record(1, 8, a, 1, 8),
        record(3, 4, a, 2, 0),
    ];

    let groups = assemble(&records, &table).unwrap();
    let lines: Vec<_> = groups
        .lines()
        .iter()
        .map(|group| (group.generated_line, group.records.len()))
        .collect();
    assert_eq!(lines, vec![(1, 2), (3, 1)]);
    assert_eq!(groups.record_count(), 3);
    assert_eq!(groups.files(), &[a]);
}

#[test]
fn test_out_of_order_records_are_sorted_stably() {
    let (table, ids) = table_with(&["a.q"]);
    let a = ids[0];
    let records = [
        record(2, 4, a, 5, 0),
        record(1, 3, a, 1, 3),
        record(2, 4, a, 6, 0),
        record(1, 0, a, 1, 0),
    ];

    let groups = assemble(&records, &table).unwrap();
    let order: Vec<_> = groups.records().map(|r| r.source_line).collect();
    assert_eq!(order, vec![1, 1, 5, 6]);
    let columns: Vec<_> = groups.records().map(|r| r.generated_column).collect();
    assert_eq!(columns, vec![0, 3, 4, 4]);
}

#[test]
fn test_files_listed_in_first_appearance_order() {
    let (table, ids) = table_with(&["a.q", "b.q", "c.q"]);
    let records = [
        record(1, 0, ids[2], 1, 0),
        record(2, 0, ids[0], 1, 0),
        record(3, 0, ids[2], 2, 0),
    ];
    let groups = assemble(&records, &table).unwrap();
    assert_eq!(groups.files(), &[ids[2], ids[0]]);

    let generator = groups
        .to_generator("out.js", &table, &SourceMapOptions::default())
        .unwrap();
    assert_eq!(generator.sources(), &["c.q".to_string(), "a.q".to_string()]);
    assert_eq!(generator.mappings()[1].source_index, 1);
}

#[test]
fn test_unknown_file_is_rejected() {
    let (table, _) = table_with(&["a.q"]);
    let err = assemble(&[record(1, 0, FileId(7), 1, 0)], &table).unwrap_err();
    assert_eq!(err, MapError::UnknownFile(FileId(7)));
    assert_eq!(err.to_string(), "mapping refers to unknown source file #7");
}

#[test]
fn test_empty_record_stream() {
    let groups = assemble(&[], &FileTable::new()).unwrap();
    assert!(groups.lines().is_empty());
    assert!(groups.files().is_empty());

    let generator = groups
        .to_generator("out.js", &FileTable::new(), &SourceMapOptions::default())
        .unwrap();
    assert_eq!(generator.encode_mappings(), "");
}

#[test]
fn test_generator_uses_zero_based_lines() {
    let (table, ids) = table_with(&["main.q"]);
    let groups = assemble(&[record(2, 4, ids[0], 3, 1)], &table).unwrap();
    let generator = groups
        .to_generator("main.js", &table, &SourceMapOptions::default())
        .unwrap();
    assert_eq!(
        generator.mappings(),
        &[Mapping {
            generated_line: 1,
            generated_column: 4,
            source_index: 0,
            original_line: 2,
            original_column: 1,
        }]
    );
}

#[test]
fn test_compiled_program_encodes_expected_mappings() {
    let mut table = FileTable::new();
    let file = table.add("main.q");
    let program = ProgramNode::new(
        SourcePosition::new(1, 0),
        vec![Node::print(1, 0, "1")],
        SourcePosition::new(1, 9),
    );

    let rendered = render(&compile_program(&program, file).unwrap());
    let groups = assemble(&rendered.mappings, &table).unwrap();
    let generator = groups
        .to_generator("main.js", &table, &SourceMapOptions::default())
        .unwrap();

    let encoded = generator.encode_mappings();
    assert_eq!(encoded, "AAAA;IAAA;AAAS");
    assert_eq!(decode_mappings(&encoded).unwrap(), generator.mappings());
}

#[test]
fn test_options_set_root_and_content() {
    let mut table = FileTable::new();
    let file = table.add_with_text("main.q", "print 1\n");
    let groups = assemble(&[record(1, 0, file, 1, 0)], &table).unwrap();

    let options = SourceMapOptions {
        source_root: Some("src/".to_string()),
        include_sources_content: true,
    };
    let document = groups.to_generator("main.js", &table, &options).unwrap().to_document();
    assert_eq!(document.source_root.as_deref(), Some("src/"));
    assert_eq!(
        document.sources_content,
        Some(vec![Some("print 1\n".to_string())])
    );

    let without = groups
        .to_generator("main.js", &table, &SourceMapOptions::default())
        .unwrap()
        .to_document();
    assert_eq!(without.source_root, None);
    assert_eq!(without.sources_content, None);
}

use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::args::CliArgs;
use crate::driver::{compile, js_output_path};
use quill_common::{DiagnosticCategory, SourcePosition};

const PRINT_PROGRAM: &str = r#"{
    "source": "main.q",
    "sourceText": "print 1\n",
    "program": {
        "pos": { "line": 1, "column": 0 },
        "end": { "line": 1, "column": 7 },
        "statements": [
            { "kind": "print", "pos": { "line": 1, "column": 0 }, "value": "1" }
        ]
    }
}"#;

const BAD_PROGRAM: &str = r#"{
    "source": "bad.q",
    "program": {
        "pos": { "line": 1, "column": 0 },
        "end": { "line": 2, "column": 0 },
        "statements": [
            { "kind": "call", "pos": { "line": 1, "column": 2 }, "name": "" }
        ]
    }
}"#;

fn write_file(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("failed to create parent directory");
    }
    std::fs::write(path, contents).expect("failed to write file");
}

fn read(path: &Path) -> String {
    std::fs::read_to_string(path).expect("output should exist")
}

#[test]
fn compile_with_config_emits_js_and_map() {
    let temp = TempDir::new().expect("temp dir");
    let base = temp.path();
    write_file(
        &base.join("quill.json"),
        r#"{ "compilerOptions": { "outDir": "dist", "sourceMap": true } }"#,
    );
    write_file(&base.join("main.ast.json"), PRINT_PROGRAM);

    let result = compile(&CliArgs::default(), base).expect("compile should succeed");

    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    assert_eq!(result.files_read.len(), 1);
    assert_eq!(result.emitted_files.len(), 2);

    let js = read(&base.join("dist/main.js"));
    assert_eq!(
        js,
        "(function() {\n    console.log( 1 );\n}());\n//# sourceMappingURL=main.js.map\n"
    );

    let map: serde_json::Value =
        serde_json::from_str(&read(&base.join("dist/main.js.map"))).expect("map is JSON");
    assert_eq!(map["version"], 3);
    assert_eq!(map["file"], "main.js");
    assert_eq!(map["sources"], serde_json::json!(["main.q"]));
    assert_eq!(map["mappings"], "AAAA;IAAA;AAAO");
}

#[test]
fn compile_without_map_writes_next_to_input() {
    let temp = TempDir::new().expect("temp dir");
    let base = temp.path();
    write_file(&base.join("src/main.ast.json"), PRINT_PROGRAM);

    let args = CliArgs {
        files: vec![PathBuf::from("src/main.ast.json")],
        ..CliArgs::default()
    };
    let result = compile(&args, base).expect("compile should succeed");

    assert!(result.diagnostics.is_empty());
    let js = read(&base.join("src/main.js"));
    assert!(!js.contains("sourceMappingURL"));
    assert!(!base.join("src/main.js.map").exists());
}

#[test]
fn inline_source_map_embeds_data_url() {
    let temp = TempDir::new().expect("temp dir");
    let base = temp.path();
    write_file(&base.join("main.ast.json"), PRINT_PROGRAM);

    let args = CliArgs {
        inline_source_map: true,
        inline_sources: true,
        ..CliArgs::default()
    };
    let result = compile(&args, base).expect("compile should succeed");

    assert!(result.diagnostics.is_empty());
    let js = read(&base.join("main.js"));
    assert!(js.contains("\n//# sourceMappingURL=data:application/json;base64,"));
    assert!(!base.join("main.js.map").exists());
}

#[test]
fn conflicting_map_options_warn_and_keep_inline() {
    let temp = TempDir::new().expect("temp dir");
    let base = temp.path();
    write_file(&base.join("main.ast.json"), PRINT_PROGRAM);

    let args = CliArgs {
        source_map: true,
        inline_source_map: true,
        ..CliArgs::default()
    };
    let result = compile(&args, base).expect("compile should succeed");

    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].category, DiagnosticCategory::Warning);
    assert!(!result.has_errors());
    assert!(read(&base.join("main.js")).contains("base64,"));
    assert!(!base.join("main.js.map").exists());
}

#[test]
fn no_emit_reads_but_writes_nothing() {
    let temp = TempDir::new().expect("temp dir");
    let base = temp.path();
    write_file(&base.join("main.ast.json"), PRINT_PROGRAM);

    let args = CliArgs {
        no_emit: true,
        source_map: true,
        ..CliArgs::default()
    };
    let result = compile(&args, base).expect("compile should succeed");

    assert!(result.diagnostics.is_empty());
    assert_eq!(result.files_read.len(), 1);
    assert!(result.emitted_files.is_empty());
    assert!(!base.join("main.js").exists());
}

#[test]
fn malformed_node_blocks_all_outputs() {
    let temp = TempDir::new().expect("temp dir");
    let base = temp.path();
    write_file(&base.join("good.ast.json"), PRINT_PROGRAM);
    write_file(&base.join("bad.ast.json"), BAD_PROGRAM);

    let result = compile(&CliArgs::default(), base).expect("compile should run");

    assert!(result.has_errors());
    assert_eq!(result.files_read.len(), 2);
    assert!(result.emitted_files.is_empty());
    assert!(!base.join("good.js").exists());

    let diagnostic = &result.diagnostics[0];
    assert_eq!(diagnostic.file, "bad.q");
    assert_eq!(diagnostic.position, Some(SourcePosition::new(1, 2)));
    assert_eq!(
        diagnostic.message_text,
        "malformed call node: identifier is empty"
    );
}

#[test]
fn invalid_json_is_reported_per_file() {
    let temp = TempDir::new().expect("temp dir");
    let base = temp.path();
    write_file(&base.join("broken.ast.json"), "{ \"source\": ");

    let result = compile(&CliArgs::default(), base).expect("compile should run");

    assert_eq!(result.diagnostics.len(), 1);
    let diagnostic = &result.diagnostics[0];
    assert!(diagnostic.is_error());
    assert!(diagnostic.file.ends_with("broken.ast.json"));
    assert!(diagnostic.message_text.starts_with("invalid AST document"));
}

#[test]
fn directories_are_searched_for_ast_files() {
    let temp = TempDir::new().expect("temp dir");
    let base = temp.path();
    write_file(
        &base.join("quill.json"),
        r#"{ "compilerOptions": { "outDir": "out" }, "files": ["src"] }"#,
    );
    write_file(&base.join("src/a.ast.json"), PRINT_PROGRAM);
    write_file(&base.join("src/nested/b.ast.json"), PRINT_PROGRAM);
    write_file(&base.join("src/notes.json"), "{}");
    write_file(&base.join("other/c.ast.json"), PRINT_PROGRAM);

    let result = compile(&CliArgs::default(), base).expect("compile should succeed");

    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    assert_eq!(result.files_read.len(), 2);
    assert!(base.join("out/src/a.js").is_file());
    assert!(base.join("out/src/nested/b.js").is_file());
    assert!(!base.join("out/other/c.js").exists());
}

#[test]
fn empty_project_reports_no_inputs() {
    let temp = TempDir::new().expect("temp dir");
    let result = compile(&CliArgs::default(), temp.path()).expect("compile should run");

    assert!(result.has_errors());
    assert_eq!(result.diagnostics[0].message_text, "no input files found");
}

#[test]
fn missing_project_is_an_error() {
    let temp = TempDir::new().expect("temp dir");
    let args = CliArgs {
        project: Some(PathBuf::from("nowhere/quill.json")),
        ..CliArgs::default()
    };
    let err = compile(&args, temp.path()).expect_err("missing project should fail");
    assert!(err.to_string().contains("quill.json not found"));
}

#[test]
fn output_paths_follow_input_layout() {
    let base = Path::new("/project");
    assert_eq!(
        js_output_path(base, None, Path::new("/project/src/main.ast.json")),
        Some(PathBuf::from("/project/src/main.js"))
    );
    assert_eq!(
        js_output_path(
            base,
            Some(Path::new("/project/dist")),
            Path::new("/project/src/main.ast.json")
        ),
        Some(PathBuf::from("/project/dist/src/main.js"))
    );
    assert_eq!(
        js_output_path(base, None, Path::new("/project/plain.json")),
        Some(PathBuf::from("/project/plain.js"))
    );
    assert_eq!(
        js_output_path(base, None, Path::new("/project/.ast.json")),
        None
    );
}

use anyhow::{Context, Result, bail};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::args::CliArgs;
use crate::config::{
    CONFIG_FILE_NAME, QuillConfig, ResolvedCompilerOptions, apply_cli_overrides, load_config,
    resolve_compiler_options,
};
use quill_common::Diagnostic;
use quill_emitter::{AstDocument, EmitError, EmitOptions, SourceMapOptions, emit_document};

/// Suffix the parser gives its output files.
pub const INPUT_SUFFIX: &str = ".ast.json";

#[derive(Debug, Clone)]
pub struct CompilationResult {
    pub diagnostics: Vec<Diagnostic>,
    pub emitted_files: Vec<PathBuf>,
    pub files_read: Vec<PathBuf>,
}

impl CompilationResult {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct OutputFile {
    pub path: PathBuf,
    pub contents: String,
}

/// Per-input result of the parallel phase.
enum FileOutcome {
    Compiled { input: PathBuf, outputs: Vec<OutputFile> },
    Failed { read: Option<PathBuf>, diagnostic: Diagnostic },
}

pub fn compile(args: &CliArgs, cwd: &Path) -> Result<CompilationResult> {
    let cwd = canonicalize_or_owned(cwd);
    let config_path = resolve_config_path(&cwd, args.project.as_deref())?;
    let config = match config_path.as_deref() {
        Some(path) => Some(load_config(path)?),
        None => None,
    };

    let mut resolved = resolve_compiler_options(
        config
            .as_ref()
            .and_then(|cfg| cfg.compiler_options.as_ref()),
    );
    apply_cli_overrides(&mut resolved, args);

    let base_dir = config_base_dir(&cwd, config_path.as_deref());
    let out_dir = resolved.out_dir.as_ref().map(|dir| base_dir.join(dir));

    let mut diagnostics = option_diagnostics(&mut resolved);

    let inputs = discover_inputs(args, &cwd, &base_dir, config.as_ref())?;
    if inputs.is_empty() {
        diagnostics.push(Diagnostic::error("", None, "no input files found"));
        return Ok(CompilationResult {
            diagnostics,
            emitted_files: Vec::new(),
            files_read: Vec::new(),
        });
    }
    tracing::debug!(inputs = inputs.len(), out_dir = ?out_dir, "compiling");

    let outcomes: Vec<FileOutcome> = inputs
        .par_iter()
        .map(|input| compile_file(input, &base_dir, out_dir.as_deref(), &resolved))
        .collect();

    let mut files_read = Vec::with_capacity(outcomes.len());
    let mut outputs = Vec::new();
    for outcome in outcomes {
        match outcome {
            FileOutcome::Compiled {
                input,
                outputs: file_outputs,
            } => {
                files_read.push(input);
                outputs.extend(file_outputs);
            }
            FileOutcome::Failed { read, diagnostic } => {
                files_read.extend(read);
                diagnostics.push(diagnostic);
            }
        }
    }

    let has_errors = diagnostics.iter().any(Diagnostic::is_error);
    let emitted_files = if resolved.no_emit || has_errors {
        Vec::new()
    } else {
        write_outputs(&outputs)?
    };

    Ok(CompilationResult {
        diagnostics,
        emitted_files,
        files_read,
    })
}

/// Warnings for option combinations that are resolved by dropping one side.
fn option_diagnostics(options: &mut ResolvedCompilerOptions) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    if options.source_map && options.inline_source_map {
        options.source_map = false;
        diagnostics.push(Diagnostic::warning(
            "",
            None,
            "'sourceMap' and 'inlineSourceMap' are both set; emitting the inline map only",
        ));
    }
    if options.inline_sources && !options.emits_source_map() {
        options.inline_sources = false;
        diagnostics.push(Diagnostic::warning(
            "",
            None,
            "'inlineSources' has no effect without 'sourceMap' or 'inlineSourceMap'",
        ));
    }
    diagnostics
}

fn compile_file(
    input: &Path,
    base_dir: &Path,
    out_dir: Option<&Path>,
    options: &ResolvedCompilerOptions,
) -> FileOutcome {
    let display = input.display().to_string();
    let _span = tracing::debug_span!("compile_file", file = %input.display()).entered();

    let text = match std::fs::read_to_string(input) {
        Ok(text) => text,
        Err(err) => {
            return FileOutcome::Failed {
                read: None,
                diagnostic: Diagnostic::error(display, None, format!("cannot read file: {err}")),
            };
        }
    };
    let failed = |diagnostic| FileOutcome::Failed {
        read: Some(input.to_path_buf()),
        diagnostic,
    };

    let document = match AstDocument::from_json(&text) {
        Ok(document) => document,
        Err(err) => {
            return failed(Diagnostic::error(
                display,
                None,
                format!("invalid AST document: {err}"),
            ));
        }
    };

    let Some(js_path) = js_output_path(base_dir, out_dir, input) else {
        return failed(Diagnostic::error(
            display,
            None,
            "cannot derive an output file name",
        ));
    };
    let Some((map_path, map_name, output_name)) = map_output_info(&js_path) else {
        return failed(Diagnostic::error(
            display,
            None,
            "cannot derive an output file name",
        ));
    };

    let emit_options = EmitOptions {
        output_file: output_name,
        source_map: SourceMapOptions {
            source_root: options.source_root.clone(),
            include_sources_content: options.inline_sources,
        },
    };
    let output = match emit_document(&document, &emit_options) {
        Ok(output) => output,
        Err(err) => return failed(emit_diagnostic(&display, &document, &err)),
    };

    let mut contents = output.code;
    let mut outputs = Vec::with_capacity(2);
    if options.inline_source_map {
        match output.source_map.to_inline_comment() {
            Ok(comment) => append_line(&mut contents, &comment),
            Err(err) => {
                return failed(Diagnostic::error(
                    display,
                    None,
                    format!("cannot serialise source map: {err}"),
                ));
            }
        }
    } else if options.source_map {
        match output.source_map.to_json() {
            Ok(json) => {
                append_source_mapping_url(&mut contents, &map_name);
                outputs.push(OutputFile {
                    path: map_path,
                    contents: json,
                });
            }
            Err(err) => {
                return failed(Diagnostic::error(
                    display,
                    None,
                    format!("cannot serialise source map: {err}"),
                ));
            }
        }
    }
    outputs.insert(
        0,
        OutputFile {
            path: js_path,
            contents,
        },
    );

    FileOutcome::Compiled {
        input: input.to_path_buf(),
        outputs,
    }
}

/// Malformed nodes are reported against the original source file, since that
/// is what their positions refer to.
fn emit_diagnostic(input: &str, document: &AstDocument, err: &EmitError) -> Diagnostic {
    match err {
        EmitError::Compile(err) => Diagnostic::error(
            document.source.as_str(),
            Some(err.position()),
            format!("malformed {} node: {}", err.kind(), err.reason()),
        ),
        EmitError::Map(err) => Diagnostic::error(input, None, err.to_string()),
    }
}

pub(crate) fn find_config(cwd: &Path) -> Option<PathBuf> {
    let candidate = cwd.join(CONFIG_FILE_NAME);
    if candidate.is_file() {
        Some(canonicalize_or_owned(&candidate))
    } else {
        None
    }
}

pub(crate) fn resolve_config_path(cwd: &Path, project: Option<&Path>) -> Result<Option<PathBuf>> {
    let Some(project) = project else {
        return Ok(find_config(cwd));
    };

    let mut candidate = if project.is_absolute() {
        project.to_path_buf()
    } else {
        cwd.join(project)
    };

    if candidate.is_dir() {
        candidate = candidate.join(CONFIG_FILE_NAME);
    }

    if !candidate.exists() {
        bail!("{CONFIG_FILE_NAME} not found at {}", candidate.display());
    }

    if !candidate.is_file() {
        bail!("project path is not a file: {}", candidate.display());
    }

    Ok(Some(canonicalize_or_owned(&candidate)))
}

pub(crate) fn config_base_dir(cwd: &Path, config_path: Option<&Path>) -> PathBuf {
    config_path
        .and_then(|path| path.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| cwd.to_path_buf())
}

/// Inputs named on the command line win over the config's `files`.
/// Directories are searched recursively for `*.ast.json`.
pub(crate) fn discover_inputs(
    args: &CliArgs,
    cwd: &Path,
    base_dir: &Path,
    config: Option<&QuillConfig>,
) -> Result<Vec<PathBuf>> {
    let roots: Vec<PathBuf> = if !args.files.is_empty() {
        args.files.iter().map(|file| cwd.join(file)).collect()
    } else if let Some(files) = config.and_then(|cfg| cfg.files.as_ref()) {
        files.iter().map(|file| base_dir.join(file)).collect()
    } else {
        vec![base_dir.to_path_buf()]
    };

    let mut inputs = Vec::new();
    for root in roots {
        if root.is_file() {
            inputs.push(canonicalize_or_owned(&root));
            continue;
        }
        if !root.exists() {
            bail!("input not found: {}", root.display());
        }
        for entry in WalkDir::new(&root).follow_links(true) {
            let entry =
                entry.with_context(|| format!("failed to search {}", root.display()))?;
            if entry.file_type().is_file() && is_input_file(entry.path()) {
                inputs.push(canonicalize_or_owned(entry.path()));
            }
        }
    }

    inputs.sort();
    inputs.dedup();
    Ok(inputs)
}

fn is_input_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.ends_with(INPUT_SUFFIX) && name.len() > INPUT_SUFFIX.len())
}

/// `dir/main.ast.json` becomes `dir/main.js`, or `<out_dir>/<relative dir>/main.js`.
pub(crate) fn js_output_path(
    base_dir: &Path,
    out_dir: Option<&Path>,
    input_path: &Path,
) -> Option<PathBuf> {
    let file_name = input_path.file_name()?.to_str()?;
    let stem = file_name
        .strip_suffix(INPUT_SUFFIX)
        .or_else(|| file_name.strip_suffix(".json"))
        .unwrap_or(file_name);
    if stem.is_empty() {
        return None;
    }

    let directory = match out_dir {
        Some(out_dir) => {
            let parent = input_path.parent()?;
            out_dir.join(parent.strip_prefix(base_dir).unwrap_or(Path::new("")))
        }
        None => input_path.parent()?.to_path_buf(),
    };
    Some(directory.join(format!("{stem}.js")))
}

fn map_output_info(output_path: &Path) -> Option<(PathBuf, String, String)> {
    let output_name = output_path.file_name()?.to_string_lossy().into_owned();
    let map_name = format!("{output_name}.map");
    let map_path = output_path.with_file_name(&map_name);
    Some((map_path, map_name, output_name))
}

fn append_line(contents: &mut String, line: &str) {
    if !contents.is_empty() && !contents.ends_with('\n') {
        contents.push('\n');
    }
    contents.push_str(line);
    contents.push('\n');
}

pub(crate) fn append_source_mapping_url(contents: &mut String, map_name: &str) {
    append_line(contents, &format!("//# sourceMappingURL={map_name}"));
}

fn write_outputs(outputs: &[OutputFile]) -> Result<Vec<PathBuf>> {
    outputs.par_iter().try_for_each(|output| -> Result<()> {
        if let Some(parent) = output.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        std::fs::write(&output.path, &output.contents)
            .with_context(|| format!("failed to write {}", output.path.display()))?;
        Ok(())
    })?;

    Ok(outputs.iter().map(|output| output.path.clone()).collect())
}

fn canonicalize_or_owned(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

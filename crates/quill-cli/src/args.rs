use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for the quillc binary.
#[derive(Parser, Debug, Default)]
#[command(
    name = "quillc",
    version,
    about = "Compile quill ASTs to JavaScript with source maps"
)]
pub struct CliArgs {
    /// Path to quill.json or a directory containing it.
    #[arg(short = 'p', long = "project")]
    pub project: Option<PathBuf>,

    // ==================== Emit ====================
    /// Specify an output folder for all emitted files.
    #[arg(long = "outDir", alias = "out-dir")]
    pub out_dir: Option<PathBuf>,

    /// Create source map files for emitted JavaScript files.
    #[arg(long = "sourceMap", alias = "source-map")]
    pub source_map: bool,

    /// Include sourcemap files inside the emitted JavaScript.
    #[arg(long = "inlineSourceMap", alias = "inline-source-map")]
    pub inline_source_map: bool,

    /// Include source code in the sourcemaps.
    #[arg(long = "inlineSources", alias = "inline-sources")]
    pub inline_sources: bool,

    /// Specify the root path for debuggers to find the reference source code.
    #[arg(long = "sourceRoot", alias = "source-root")]
    pub source_root: Option<String>,

    /// Disable emitting files from a compilation.
    #[arg(long = "noEmit", alias = "no-emit")]
    pub no_emit: bool,

    // ==================== Output Formatting ====================
    /// Enable color and formatting in diagnostics.
    #[arg(long)]
    pub pretty: Option<bool>,

    // ==================== Input Files ====================
    /// Input `.ast.json` files, or directories to search for them.
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,
}

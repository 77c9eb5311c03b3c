use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};

use crate::args::CliArgs;

pub const CONFIG_FILE_NAME: &str = "quill.json";

/// Boolean options accept both `true` and `"true"`.
fn deserialize_bool_or_string<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolOrString {
        Bool(bool),
        String(String),
    }

    match Option::<BoolOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(BoolOrString::Bool(b)) => Ok(Some(b)),
        Some(BoolOrString::String(s)) => match s.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(Some(true)),
            "false" | "0" | "no" | "off" => Ok(Some(false)),
            _ => Err(Error::custom(format!(
                "invalid boolean value: '{s}'. Expected true, false, 'true', or 'false'"
            ))),
        },
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct QuillConfig {
    #[serde(default)]
    pub compiler_options: Option<CompilerOptions>,
    /// Inputs relative to the config file's directory. Directories are searched.
    #[serde(default)]
    pub files: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CompilerOptions {
    #[serde(default)]
    pub out_dir: Option<String>,
    #[serde(default, deserialize_with = "deserialize_bool_or_string")]
    pub source_map: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_bool_or_string")]
    pub inline_source_map: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_bool_or_string")]
    pub inline_sources: Option<bool>,
    #[serde(default)]
    pub source_root: Option<String>,
    #[serde(default, deserialize_with = "deserialize_bool_or_string")]
    pub no_emit: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedCompilerOptions {
    pub out_dir: Option<PathBuf>,
    pub source_map: bool,
    pub inline_source_map: bool,
    pub inline_sources: bool,
    pub source_root: Option<String>,
    pub no_emit: bool,
}

impl ResolvedCompilerOptions {
    /// Whether any source map, external or inline, is produced.
    pub fn emits_source_map(&self) -> bool {
        self.source_map || self.inline_source_map
    }
}

pub fn resolve_compiler_options(options: Option<&CompilerOptions>) -> ResolvedCompilerOptions {
    let Some(options) = options else {
        return ResolvedCompilerOptions::default();
    };

    ResolvedCompilerOptions {
        out_dir: options
            .out_dir
            .as_deref()
            .map(str::trim)
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from),
        source_map: options.source_map.unwrap_or(false),
        inline_source_map: options.inline_source_map.unwrap_or(false),
        inline_sources: options.inline_sources.unwrap_or(false),
        source_root: options.source_root.clone(),
        no_emit: options.no_emit.unwrap_or(false),
    }
}

/// Command-line flags win over the config file.
pub fn apply_cli_overrides(options: &mut ResolvedCompilerOptions, args: &CliArgs) {
    if let Some(out_dir) = args.out_dir.as_ref() {
        options.out_dir = Some(out_dir.clone());
    }
    if args.source_map {
        options.source_map = true;
    }
    if args.inline_source_map {
        options.inline_source_map = true;
    }
    if args.inline_sources {
        options.inline_sources = true;
    }
    if let Some(source_root) = args.source_root.as_ref() {
        options.source_root = Some(source_root.clone());
    }
    if args.no_emit {
        options.no_emit = true;
    }
}

pub fn parse_config(source: &str) -> Result<QuillConfig> {
    let config = serde_json::from_str(source).context("failed to parse quill.json")?;
    Ok(config)
}

pub fn load_config(path: &Path) -> Result<QuillConfig> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    parse_config(&source).with_context(|| format!("failed to parse config: {}", path.display()))
}

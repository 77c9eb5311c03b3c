//! Source map (revision 3) generation.
//!
//! [`SourceMapGenerator`] collects mappings from generated positions to
//! original positions and serialises them as the standard JSON document:
//!
//! ```json
//! { "version": 3, "file": "out.js", "sources": ["main.q"], "names": [], "mappings": "AAAA;..." }
//! ```
//!
//! Lines and columns here are 0-based, as in the v3 format. Callers holding
//! 1-based lines convert before calling [`SourceMapGenerator::add_mapping`].

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Base64 VLQ encoding used by the `mappings` field.
pub mod vlq {
    pub(crate) const BASE64_CHARS: &[u8; 64] =
        b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

    const VLQ_BASE_SHIFT: u32 = 5;
    const VLQ_BASE: i64 = 1 << VLQ_BASE_SHIFT;
    const VLQ_BASE_MASK: i64 = VLQ_BASE - 1;
    const VLQ_CONTINUATION_BIT: i64 = VLQ_BASE;

    /// Encode a signed value.
    pub fn encode(value: i64) -> String {
        let mut out = String::new();
        encode_into(value, &mut out);
        out
    }

    /// Encode a signed value, appending to `out`.
    pub fn encode_into(value: i64, out: &mut String) {
        // Sign lives in the least significant bit.
        let mut vlq = if value < 0 {
            ((-value) << 1) | 1
        } else {
            value << 1
        };

        loop {
            let mut digit = vlq & VLQ_BASE_MASK;
            vlq >>= VLQ_BASE_SHIFT;
            if vlq > 0 {
                digit |= VLQ_CONTINUATION_BIT;
            }
            out.push(BASE64_CHARS[digit as usize] as char);
            if vlq == 0 {
                break;
            }
        }
    }

    /// Decode one value from the start of `input`.
    ///
    /// Returns the value and the number of bytes consumed, or `None` on an
    /// invalid character, truncated input or overflow.
    pub fn decode(input: &str) -> Option<(i64, usize)> {
        let mut result: i64 = 0;
        let mut shift = 0u32;

        for (consumed, byte) in input.bytes().enumerate() {
            let digit = decode_char(byte)?;
            if shift > 55 {
                return None;
            }
            result += (digit & VLQ_BASE_MASK) << shift;
            if digit & VLQ_CONTINUATION_BIT == 0 {
                let negative = result & 1 == 1;
                let magnitude = result >> 1;
                let value = if negative { -magnitude } else { magnitude };
                return Some((value, consumed + 1));
            }
            shift += VLQ_BASE_SHIFT;
        }

        None
    }

    fn decode_char(byte: u8) -> Option<i64> {
        let value = match byte {
            b'A'..=b'Z' => byte - b'A',
            b'a'..=b'z' => byte - b'a' + 26,
            b'0'..=b'9' => byte - b'0' + 52,
            b'+' => 62,
            b'/' => 63,
            _ => return None,
        };
        Some(i64::from(value))
    }
}

/// One generated-to-original correspondence, 0-based.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Mapping {
    pub generated_line: u32,
    pub generated_column: u32,
    pub source_index: u32,
    pub original_line: u32,
    pub original_column: u32,
}

/// The serialised source map document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceMapDocument {
    pub version: u32,
    #[serde(default)]
    pub file: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_root: Option<String>,
    pub sources: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources_content: Option<Vec<Option<String>>>,
    #[serde(default)]
    pub names: Vec<String>,
    pub mappings: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("invalid VLQ data in segment `{segment}` on generated line {line}")]
    InvalidVlq { line: u32, segment: String },
    #[error("segment `{segment}` on generated line {line} has {fields} fields (expected 1, 4 or 5)")]
    InvalidSegmentLength {
        line: u32,
        segment: String,
        fields: usize,
    },
    #[error("segment `{segment}` on generated line {line} decodes to a negative position")]
    NegativePosition { line: u32, segment: String },
}

/// Builds a v3 source map.
#[derive(Clone, Debug)]
pub struct SourceMapGenerator {
    file: String,
    source_root: Option<String>,
    sources: Vec<String>,
    sources_content: Vec<Option<String>>,
    source_indices: FxHashMap<String, u32>,
    mappings: Vec<Mapping>,
}

impl SourceMapGenerator {
    pub fn new(file: String) -> Self {
        Self {
            file,
            source_root: None,
            sources: Vec::new(),
            sources_content: Vec::new(),
            source_indices: FxHashMap::default(),
            mappings: Vec::new(),
        }
    }

    pub fn set_source_root(&mut self, root: impl Into<String>) {
        self.source_root = Some(root.into());
    }

    /// Register a source file, returning its index in `sources`.
    pub fn add_source(&mut self, name: String) -> u32 {
        if let Some(&index) = self.source_indices.get(&name) {
            return index;
        }
        let index = self.sources.len() as u32;
        self.source_indices.insert(name.clone(), index);
        self.sources.push(name);
        self.sources_content.push(None);
        index
    }

    /// Register a source file and embed its text in `sourcesContent`.
    pub fn add_source_with_content(&mut self, name: String, content: String) -> u32 {
        let index = self.add_source(name);
        self.sources_content[index as usize] = Some(content);
        index
    }

    pub fn add_mapping(&mut self, mapping: Mapping) {
        self.mappings.push(mapping);
    }

    pub fn add_simple_mapping(
        &mut self,
        generated_line: u32,
        generated_column: u32,
        source_index: u32,
        original_line: u32,
        original_column: u32,
    ) {
        self.add_mapping(Mapping {
            generated_line,
            generated_column,
            source_index,
            original_line,
            original_column,
        });
    }

    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    pub fn mappings(&self) -> &[Mapping] {
        &self.mappings
    }

    /// Encode the `mappings` field.
    ///
    /// Mappings are ordered by generated position first; insertion order
    /// breaks ties so equal positions keep the order they were recorded in.
    pub fn encode_mappings(&self) -> String {
        let mut sorted = self.mappings.clone();
        sorted.sort_by_key(|m| (m.generated_line, m.generated_column));

        let mut out = String::new();
        let mut line = 0u32;
        let mut prev_generated_column = 0i64;
        let mut prev_source_index = 0i64;
        let mut prev_original_line = 0i64;
        let mut prev_original_column = 0i64;
        let mut first_in_line = true;

        for mapping in &sorted {
            while line < mapping.generated_line {
                out.push(';');
                line += 1;
                prev_generated_column = 0;
                first_in_line = true;
            }
            if !first_in_line {
                out.push(',');
            }
            first_in_line = false;

            let generated_column = i64::from(mapping.generated_column);
            let source_index = i64::from(mapping.source_index);
            let original_line = i64::from(mapping.original_line);
            let original_column = i64::from(mapping.original_column);

            vlq::encode_into(generated_column - prev_generated_column, &mut out);
            vlq::encode_into(source_index - prev_source_index, &mut out);
            vlq::encode_into(original_line - prev_original_line, &mut out);
            vlq::encode_into(original_column - prev_original_column, &mut out);

            prev_generated_column = generated_column;
            prev_source_index = source_index;
            prev_original_line = original_line;
            prev_original_column = original_column;
        }

        out
    }

    pub fn to_document(&self) -> SourceMapDocument {
        let sources_content = self
            .sources_content
            .iter()
            .any(Option::is_some)
            .then(|| self.sources_content.clone());

        SourceMapDocument {
            version: 3,
            file: self.file.clone(),
            source_root: self.source_root.clone(),
            sources: self.sources.clone(),
            sources_content,
            names: Vec::new(),
            mappings: self.encode_mappings(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.to_document())
    }

    /// The map as a `//# sourceMappingURL=data:...` comment for inline embedding.
    pub fn to_inline_comment(&self) -> serde_json::Result<String> {
        let json = self.to_json()?;
        Ok(format!(
            "//# sourceMappingURL=data:application/json;base64,{}",
            base64_encode(json.as_bytes())
        ))
    }
}

/// Standard padded base64.
pub fn base64_encode(input: &[u8]) -> String {
    let mut out = String::with_capacity(input.len().div_ceil(3) * 4);
    for chunk in input.chunks(3) {
        let b0 = u32::from(chunk[0]);
        let b1 = chunk.get(1).copied().map_or(0, u32::from);
        let b2 = chunk.get(2).copied().map_or(0, u32::from);
        let triple = (b0 << 16) | (b1 << 8) | b2;

        out.push(vlq::BASE64_CHARS[((triple >> 18) & 0x3f) as usize] as char);
        out.push(vlq::BASE64_CHARS[((triple >> 12) & 0x3f) as usize] as char);
        if chunk.len() > 1 {
            out.push(vlq::BASE64_CHARS[((triple >> 6) & 0x3f) as usize] as char);
        } else {
            out.push('=');
        }
        if chunk.len() > 2 {
            out.push(vlq::BASE64_CHARS[(triple & 0x3f) as usize] as char);
        } else {
            out.push('=');
        }
    }
    out
}

/// Decode a `mappings` string back into absolute mappings.
///
/// Generated-only segments (one field) carry no source position and are
/// skipped. A fifth field (name index) is accepted and ignored.
pub fn decode_mappings(mappings: &str) -> Result<Vec<Mapping>, DecodeError> {
    let mut decoded = Vec::new();
    let mut prev_source_index = 0i64;
    let mut prev_original_line = 0i64;
    let mut prev_original_column = 0i64;

    for (line, text) in mappings.split(';').enumerate() {
        let line = line as u32;
        let mut prev_generated_column = 0i64;

        for segment in text.split(',').filter(|s| !s.is_empty()) {
            let fields = decode_segment(segment).ok_or_else(|| DecodeError::InvalidVlq {
                line,
                segment: segment.to_string(),
            })?;

            match fields.len() {
                1 => {
                    prev_generated_column += fields[0];
                    continue;
                }
                4 | 5 => {}
                n => {
                    return Err(DecodeError::InvalidSegmentLength {
                        line,
                        segment: segment.to_string(),
                        fields: n,
                    });
                }
            }

            prev_generated_column += fields[0];
            prev_source_index += fields[1];
            prev_original_line += fields[2];
            prev_original_column += fields[3];

            let to_u32 = |value: i64| {
                u32::try_from(value).map_err(|_| DecodeError::NegativePosition {
                    line,
                    segment: segment.to_string(),
                })
            };

            decoded.push(Mapping {
                generated_line: line,
                generated_column: to_u32(prev_generated_column)?,
                source_index: to_u32(prev_source_index)?,
                original_line: to_u32(prev_original_line)?,
                original_column: to_u32(prev_original_column)?,
            });
        }
    }

    Ok(decoded)
}

fn decode_segment(segment: &str) -> Option<Vec<i64>> {
    let mut fields = Vec::with_capacity(5);
    let mut rest = segment;
    while !rest.is_empty() {
        let (value, consumed) = vlq::decode(rest)?;
        fields.push(value);
        rest = &rest[consumed..];
    }
    Some(fields)
}

#[cfg(test)]
#[path = "../tests/source_map.rs"]
mod tests;

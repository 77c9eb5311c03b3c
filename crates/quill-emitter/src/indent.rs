//! Block indentation.

/// One level of indentation in generated code.
pub const INDENT_UNIT: &str = "    ";

/// Indentation text for a nesting depth: `level` repetitions of [`INDENT_UNIT`].
pub fn indent_text(level: u32) -> String {
    INDENT_UNIT.repeat(level as usize)
}

#[cfg(test)]
#[path = "../tests/indent.rs"]
mod tests;

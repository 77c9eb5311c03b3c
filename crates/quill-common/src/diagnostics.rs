use crate::position::SourcePosition;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DiagnosticCategory {
    Warning,
    Error,
    Message,
}

impl DiagnosticCategory {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Message => "message",
        }
    }
}

/// A message about one location in one input file.
///
/// `position` is `None` for file-level problems (unreadable input, invalid
/// JSON) that have no meaningful line/column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub category: DiagnosticCategory,
    pub file: String,
    pub position: Option<SourcePosition>,
    pub message_text: String,
}

impl Diagnostic {
    pub fn error(
        file: impl Into<String>,
        position: Option<SourcePosition>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            category: DiagnosticCategory::Error,
            file: file.into(),
            position,
            message_text: message.into(),
        }
    }

    pub fn warning(
        file: impl Into<String>,
        position: Option<SourcePosition>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            category: DiagnosticCategory::Warning,
            file: file.into(),
            position,
            message_text: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.category == DiagnosticCategory::Error
    }
}

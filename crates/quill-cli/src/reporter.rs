use colored::Colorize;
use quill_common::{Diagnostic, DiagnosticCategory};

pub struct Reporter {
    color: bool,
}

impl Reporter {
    pub fn new(color: bool) -> Self {
        Reporter { color }
    }

    /// All diagnostics, one per line, with a trailing summary for errors.
    pub fn render(&self, diagnostics: &[Diagnostic]) -> String {
        let mut out = String::new();
        for diagnostic in diagnostics {
            out.push_str(&self.format_diagnostic(diagnostic));
            out.push('\n');
        }

        let errors = diagnostics.iter().filter(|d| d.is_error()).count();
        if errors > 0 {
            let plural = if errors == 1 { "" } else { "s" };
            let summary = format!("\nFound {errors} error{plural}.\n");
            if self.color {
                out.push_str(&summary.bold().to_string());
            } else {
                out.push_str(&summary);
            }
        }
        out
    }

    pub fn format_diagnostic(&self, diagnostic: &Diagnostic) -> String {
        let location = match (diagnostic.file.is_empty(), diagnostic.position) {
            (true, _) => "<unknown>".to_string(),
            (false, Some(position)) => {
                format!("{}:{}:{}", diagnostic.file, position.line, position.column + 1)
            }
            (false, None) => diagnostic.file.clone(),
        };
        let location = if self.color {
            location.cyan().to_string()
        } else {
            location
        };

        format!(
            "{} - {}: {}",
            location,
            self.format_category(diagnostic.category),
            diagnostic.message_text
        )
    }

    fn format_category(&self, category: DiagnosticCategory) -> String {
        let label = category.as_str();
        if !self.color {
            return label.to_string();
        }

        match category {
            DiagnosticCategory::Error => label.red().bold().to_string(),
            DiagnosticCategory::Warning => label.yellow().bold().to_string(),
            DiagnosticCategory::Message => label.cyan().bold().to_string(),
        }
    }
}

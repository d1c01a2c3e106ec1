use crate::error::{ErrorContext, FxError};
use colored::Colorize;

pub fn format_error_chain(error: &FxError) -> String {
    let context = ErrorContext::new(error);
    context.to_string()
}

/// Format error for display to the user with colors and formatting
pub fn format_error_with_color(error: &FxError, use_color: bool) -> String {
    let context = ErrorContext::new(error);
    let mut output = String::new();

    if use_color {
        output.push_str(&format!("{} {error}\n", "Error:".red().bold()));
    } else {
        output.push_str(&format!("Error: {error}\n"));
    }

    if let Some(details) = &context.details {
        output.push_str(&format!("\n{details}\n"));
    }

    if let Some(suggestion) = &context.suggestion {
        if use_color {
            output.push_str(&format!("\n{}\n", "Suggestions:".yellow().bold()));
            for line in suggestion.lines() {
                if !line.trim().is_empty() {
                    output.push_str(&format!("{}\n", format!("• {line}").cyan()));
                }
            }
        } else {
            output.push_str(&format!("\nSuggestions:\n{suggestion}\n"));
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_error_chain_includes_suggestion() {
        let error = FxError::ModuleDescriptorRequired;
        let formatted = format_error_chain(&error);
        assert!(formatted.contains("module descriptor"));
        assert!(formatted.contains("Suggestion:"));
    }

    #[test]
    fn test_format_without_color_has_no_escapes() {
        let error = FxError::InvalidCompressLevel(7);
        let formatted = format_error_with_color(&error, false);
        assert!(!formatted.contains('\x1b'));
        assert!(formatted.contains("7"));
    }
}

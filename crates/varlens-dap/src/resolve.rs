//! Variable resolution — decide what expression to capture.

use crate::types::{CaptureError, CaptureResult};

/// Last-resort source of an expression when neither an explicit target nor a
/// selection is available. Hosts and tests inject their own.
pub trait ExpressionPrompt {
    /// Ask the user for an expression. `None` means cancelled.
    fn ask(&mut self) -> Option<String>;
}

/// Resolve the expression to visualize. First success wins:
/// an explicit target's expression, then the trimmed active selection, then
/// a free-text prompt. An empty explicit target falls through rather than
/// capturing an empty expression.
pub fn resolve_expression(
    explicit: Option<&str>,
    selection: Option<&str>,
    prompt: &mut dyn ExpressionPrompt,
) -> CaptureResult<String> {
    if let Some(expr) = explicit {
        if !expr.is_empty() {
            return Ok(expr.to_string());
        }
    }

    if let Some(text) = selection {
        let trimmed = text.trim();
        if !trimmed.is_empty() {
            return Ok(trimmed.to_string());
        }
    }

    if let Some(line) = prompt.ask() {
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            return Ok(trimmed.to_string());
        }
    }

    Err(CaptureError::NoVariableSelected)
}

/// Rustyline-backed prompt for terminal use.
pub struct InteractivePrompt {
    editor: rustyline::DefaultEditor,
}

impl InteractivePrompt {
    pub fn new() -> CaptureResult<Self> {
        let editor =
            rustyline::DefaultEditor::new().map_err(|e| CaptureError::Prompt(e.to_string()))?;
        Ok(Self { editor })
    }
}

impl ExpressionPrompt for InteractivePrompt {
    fn ask(&mut self) -> Option<String> {
        // Ctrl-C / Ctrl-D cancel the capture, not the process.
        self.editor.readline("expression to visualize> ").ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StubPrompt {
        reply: Option<String>,
        asked: bool,
    }

    impl StubPrompt {
        fn new(reply: Option<&str>) -> Self {
            Self {
                reply: reply.map(str::to_string),
                asked: false,
            }
        }
    }

    impl ExpressionPrompt for StubPrompt {
        fn ask(&mut self) -> Option<String> {
            self.asked = true;
            self.reply.clone()
        }
    }

    #[test]
    fn explicit_target_wins_over_selection() {
        let mut prompt = StubPrompt::new(None);
        let expr = resolve_expression(Some("model.weights"), Some("other_var"), &mut prompt);
        assert_eq!(expr.unwrap(), "model.weights");
        assert!(!prompt.asked);
    }

    #[test]
    fn empty_explicit_falls_through_to_selection() {
        let mut prompt = StubPrompt::new(None);
        let expr = resolve_expression(Some(""), Some("  img[0] \n"), &mut prompt);
        assert_eq!(expr.unwrap(), "img[0]");
    }

    #[test]
    fn blank_selection_falls_through_to_prompt() {
        let mut prompt = StubPrompt::new(Some("frame.data"));
        let expr = resolve_expression(None, Some("   "), &mut prompt);
        assert_eq!(expr.unwrap(), "frame.data");
        assert!(prompt.asked);
    }

    #[test]
    fn cancelled_prompt_means_nothing_to_visualize() {
        let mut prompt = StubPrompt::new(None);
        let err = resolve_expression(None, None, &mut prompt).unwrap_err();
        assert!(matches!(err, CaptureError::NoVariableSelected));
    }

    #[test]
    fn empty_prompt_reply_means_nothing_to_visualize() {
        let mut prompt = StubPrompt::new(Some("  "));
        let err = resolve_expression(None, None, &mut prompt).unwrap_err();
        assert!(matches!(err, CaptureError::NoVariableSelected));
    }
}

//! Response sanitizer
//!
//! Models like to wrap code in Markdown fences. Only a leading opener and a
//! trailing closer are removed; fences inside the text are left alone.

/// Markdown code fence
const FENCE: &str = "```";

/// Language tag expected on opening fences
pub const DEFAULT_LANGUAGE: &str = "python";

/// Strips code-fence decoration from model output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FenceSanitizer {
    /// Opening fence including the language tag, e.g. "```python"
    opener: String,
}

impl FenceSanitizer {
    /// Create sanitizer for fences tagged with `language`
    #[must_use]
    pub fn new(language: &str) -> Self {
        Self {
            opener: format!("{}{}", FENCE, language),
        }
    }

    /// Sanitize text
    ///
    /// Idempotent: the strip pass is repeated until nothing changes, so a
    /// second call always returns its input.
    #[must_use]
    pub fn sanitize(&self, text: &str) -> String {
        let mut current = text;
        loop {
            let next = self.strip_once(current);
            if next.len() == current.len() {
                return next.to_string();
            }
            current = next;
        }
    }

    /// Trim, drop one opener and one closer, trim again
    fn strip_once<'a>(&self, text: &'a str) -> &'a str {
        let mut code = text.trim();

        if let Some(rest) = code.strip_prefix(self.opener.as_str()) {
            code = rest;
        } else if let Some(rest) = code.strip_prefix(FENCE) {
            code = rest;
        }

        if let Some(rest) = code.strip_suffix(FENCE) {
            code = rest;
        }

        code.trim()
    }
}

impl Default for FenceSanitizer {
    fn default() -> Self {
        Self::new(DEFAULT_LANGUAGE)
    }
}

/// Sanitize text with the default (`python`) fence tag
#[must_use]
pub fn sanitize(text: &str) -> String {
    FenceSanitizer::default().sanitize(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_python_fence() {
        assert_eq!(sanitize("```python\nprint(1)\n```"), "print(1)");
    }

    #[test]
    fn strips_bare_fence() {
        assert_eq!(sanitize("```\nassert f() == 2\n```"), "assert f() == 2");
    }

    #[test]
    fn unfenced_text_is_only_trimmed() {
        assert_eq!(sanitize("  def test_x():\n    pass\n\n"), "def test_x():\n    pass");
    }

    #[test]
    fn internal_fences_survive() {
        let text = "```python\nDOC = \"\"\"\n```\nexample\n```\n\"\"\"\n```";
        assert_eq!(sanitize(text), "DOC = \"\"\"\n```\nexample\n```\n\"\"\"");
    }

    #[test]
    fn only_closing_fence() {
        assert_eq!(sanitize("import pytest\n```"), "import pytest");
    }

    #[test]
    fn leading_whitespace_before_fence() {
        assert_eq!(sanitize("\n  ```python\nx = 1\n```  \n"), "x = 1");
    }

    #[test]
    fn empty_input() {
        assert_eq!(sanitize(""), "");
        assert_eq!(sanitize("```"), "");
    }

    #[test]
    fn custom_language() {
        let sanitizer = FenceSanitizer::new("rust");
        assert_eq!(sanitizer.sanitize("```rust\nfn main() {}\n```"), "fn main() {}");
    }

    #[test]
    fn idempotent_on_nested_fences() {
        let text = "```python\n```python\nx\n```\n```";
        let once = sanitize(text);
        assert_eq!(sanitize(&once), once);
    }
}

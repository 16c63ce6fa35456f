//! Rendering collaborator.
//!
//! Every piece of text shown in the transcript goes through a [`Renderer`]
//! after textual post-processing. Markdown fidelity is the renderer's
//! business; the orchestrator only guarantees the order of the passes.

/// Converts model or user text into a sanitized display form.
pub trait Renderer: Send + Sync {
    fn render(&self, text: &str) -> String;
}

/// Renders text as escaped HTML with line breaks preserved.
///
/// Nothing in the input can produce markup: `<`, `>`, `&`, `"` and `'`
/// are always escaped.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlEscapeRenderer;

impl Renderer for HtmlEscapeRenderer {
    fn render(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len() + text.len() / 8);
        for ch in text.chars() {
            match ch {
                '<' => out.push_str("&lt;"),
                '>' => out.push_str("&gt;"),
                '&' => out.push_str("&amp;"),
                '"' => out.push_str("&quot;"),
                '\'' => out.push_str("&#39;"),
                '\n' => out.push_str("<br>"),
                '\r' => {}
                _ => out.push(ch),
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markup_is_escaped() {
        let rendered = HtmlEscapeRenderer.render("<script>alert('x')</script>");
        assert_eq!(rendered, "&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;");
    }

    #[test]
    fn test_newlines_become_breaks() {
        assert_eq!(HtmlEscapeRenderer.render("a\r\nb & c"), "a<br>b &amp; c");
    }
}

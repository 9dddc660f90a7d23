use colored::*;
use syntect::easy::HighlightLines;
use syntect::highlighting::ThemeSet;
use syntect::parsing::SyntaxSet;
use syntect::util::{as_24_bit_terminal_escaped, LinesWithEndings};
use terminal_size::{terminal_size, Width};

const MAX_RULE_WIDTH: usize = 80;

/// Renders complete replies for the terminal: prose passes through, fenced
/// code blocks get a labelled frame and syntax highlighting.
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    color: bool,
}

impl MarkdownRenderer {
    pub fn new() -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            color: true,
        }
    }

    /// Renderer that emits frames but no escape sequences.
    pub fn plain() -> Self {
        Self {
            color: false,
            ..Self::new()
        }
    }

    pub fn render(&self, content: &str) -> String {
        let mut output = String::new();
        let mut code: Option<(Option<String>, String)> = None;

        for line in LinesWithEndings::from(content) {
            if let Some(tag) = line.trim_start().strip_prefix("```") {
                match code.take() {
                    None => {
                        let tag = tag.trim();
                        let lang = (!tag.is_empty()).then(|| tag.to_string());
                        output.push_str(&self.header(lang.as_deref()));
                        code = Some((lang, String::new()));
                    }
                    Some((lang, body)) => {
                        output.push_str(&self.highlight_code(&body, lang.as_deref()));
                        output.push_str(&self.footer());
                    }
                }
                continue;
            }

            match code.as_mut() {
                Some((_, body)) => body.push_str(line),
                None => output.push_str(line),
            }
        }

        // Unterminated block: show what arrived.
        if let Some((lang, body)) = code {
            output.push_str(&self.highlight_code(&body, lang.as_deref()));
            if !body.is_empty() && !body.ends_with('\n') {
                output.push('\n');
            }
            output.push_str(&self.footer());
        }

        output
    }

    fn rule_width() -> usize {
        terminal_size()
            .map(|(Width(w), _)| w as usize)
            .unwrap_or(MAX_RULE_WIDTH)
            .clamp(20, MAX_RULE_WIDTH)
    }

    fn header(&self, lang: Option<&str>) -> String {
        let label = lang.unwrap_or("code");
        let fill = "─".repeat(Self::rule_width().saturating_sub(label.chars().count() + 4));
        if self.color {
            format!("{}[{}]{}\n", "┌─".dimmed(), label.cyan(), fill.dimmed())
        } else {
            format!("┌─[{}]{}\n", label, fill)
        }
    }

    fn footer(&self) -> String {
        let rule = format!("└{}", "─".repeat(Self::rule_width() - 1));
        if self.color {
            format!("{}\n", rule.dimmed())
        } else {
            format!("{}\n", rule)
        }
    }

    fn highlight_code(&self, code: &str, lang: Option<&str>) -> String {
        if !self.color {
            return code.to_string();
        }

        let theme = &self.theme_set.themes["Solarized (dark)"];
        let syntax = lang
            .and_then(|lang| {
                self.syntax_set
                    .find_syntax_by_token(lang)
                    .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
            })
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let mut highlighter = HighlightLines::new(syntax, theme);
        let mut output = String::new();
        for line in LinesWithEndings::from(code) {
            match highlighter.highlight_line(line, &self.syntax_set) {
                Ok(ranges) => output.push_str(&as_24_bit_terminal_escaped(&ranges[..], false)),
                Err(_) => output.push_str(line),
            }
        }
        output.push_str("\x1b[0m");
        output
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prose_passes_through() {
        let renderer = MarkdownRenderer::plain();
        assert_eq!(renderer.render("Oi!\nTudo bem?"), "Oi!\nTudo bem?");
    }

    #[test]
    fn code_blocks_are_framed_with_language() {
        let renderer = MarkdownRenderer::plain();
        let rendered = renderer.render("Veja:\n```rust\nfn main() {}\n```\nFim.");

        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "Veja:");
        assert!(lines[1].starts_with("┌─[rust]"));
        assert_eq!(lines[2], "fn main() {}");
        assert!(lines[3].starts_with("└"));
        assert_eq!(lines[4], "Fim.");
    }

    #[test]
    fn unterminated_block_is_closed() {
        let renderer = MarkdownRenderer::plain();
        let rendered = renderer.render("```\nlet x = 1;");

        assert!(rendered.starts_with("┌─[code]"));
        assert!(rendered.contains("let x = 1;\n"));
        assert!(rendered.trim_end().ends_with('─'));
    }
}

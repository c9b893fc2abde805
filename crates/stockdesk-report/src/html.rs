//! Line-oriented conversion of specialist text into email HTML.
//!
//! Each line is classified on its own: blank, fully bold, bullet, heading or
//! plain paragraph. Anything else (tables, links, nesting, unbalanced markers)
//! passes through as literal text.

use regex::Regex;

/// The fixed rule table. Built once per compiler.
#[derive(Debug, Clone)]
pub struct LineRules {
    inline_bold: Regex,
}

impl LineRules {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            inline_bold: Regex::new(r"\*\*(.+?)\*\*")?,
        })
    }

    pub fn to_html(&self, text: &str) -> String {
        text.trim()
            .split('\n')
            .map(|line| self.convert_line(line.trim()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn convert_line(&self, line: &str) -> String {
        if line.is_empty() {
            "<br>".to_string()
        } else if line.starts_with("**") && line.ends_with("**") {
            format!("<p><strong>{}</strong></p>", line.trim_matches('*'))
        } else if let Some(item) = line.strip_prefix("- ").or_else(|| line.strip_prefix("* ")) {
            format!("<li>{item}</li>")
        } else if line.starts_with('#') {
            format!("<p><strong>{}</strong></p>", line.trim_start_matches('#').trim())
        } else {
            let line = self.inline_bold.replace_all(line, "<strong>$1</strong>");
            format!("<p>{line}</p>")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn markdown_to_html(text: &str) -> String {
        LineRules::new().unwrap().to_html(text)
    }

    #[test]
    fn each_rule_applies_per_line() {
        let text = "## Market Breadth\n\
                    **Bullish**\n\
                    - NASDAQ: 62 up / 38 down\n\
                    * NSE: 310 up\n\
                    \n\
                    Sentiment is **moderately** positive.";
        assert_eq!(
            markdown_to_html(text),
            "<p><strong>Market Breadth</strong></p>\n\
             <p><strong>Bullish</strong></p>\n\
             <li>NASDAQ: 62 up / 38 down</li>\n\
             <li>NSE: 310 up</li>\n\
             <br>\n\
             <p>Sentiment is <strong>moderately</strong> positive.</p>"
        );
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        assert_eq!(markdown_to_html("\n\n  plain  \n\n"), "<p>plain</p>");
    }

    #[test]
    fn empty_text_is_a_single_break() {
        assert_eq!(markdown_to_html(""), "<br>");
    }

    #[test]
    fn unbalanced_markers_pass_through() {
        assert_eq!(markdown_to_html("**open only"), "<p>**open only</p>");
        assert_eq!(
            markdown_to_html("see [link](http://x) | a | b |"),
            "<p>see [link](http://x) | a | b |</p>"
        );
    }

    #[test]
    fn line_wrapped_in_markers_wins_over_inline_spans() {
        assert_eq!(
            markdown_to_html("**AAPL** up, **MSFT**"),
            "<p><strong>AAPL** up, **MSFT</strong></p>"
        );
        assert_eq!(
            markdown_to_html("Watch **AAPL** and **MSFT** today"),
            "<p>Watch <strong>AAPL</strong> and <strong>MSFT</strong> today</p>"
        );
    }

    #[test]
    fn bullet_needs_a_space() {
        assert_eq!(markdown_to_html("-5% drawdown"), "<p>-5% drawdown</p>");
    }
}

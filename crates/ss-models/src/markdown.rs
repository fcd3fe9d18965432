//! Markdown report descriptions
//!
//! Descriptions are CommonMark with tables, footnotes, strikethrough and
//! task lists. Single line breaks are kept as breaks.

use pulldown_cmark::{html, Event, Options, Parser, Tag, TagEnd};

fn options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
}

/// HTML for display
pub fn to_html(source: &str) -> String {
    let events = Parser::new_ext(source, options()).map(|event| match event {
        Event::SoftBreak => Event::HardBreak,
        other => other,
    });
    let mut out = String::with_capacity(source.len() * 3 / 2);
    html::push_html(&mut out, events);
    out
}

fn start_line(text: &mut String) {
    if !text.is_empty() && !text.ends_with('\n') {
        text.push('\n');
    }
}

/// The text a reader sees, without markup. List items become `- item`
/// (or `1. item`), one block per line.
pub fn to_plain_text(source: &str) -> String {
    let mut text = String::with_capacity(source.len());
    let mut lists: Vec<Option<u64>> = Vec::new();

    for event in Parser::new_ext(source, options()) {
        match event {
            Event::Text(chunk) | Event::Code(chunk) => text.push_str(&chunk),
            Event::SoftBreak | Event::HardBreak => text.push('\n'),
            Event::Start(Tag::List(first)) => {
                start_line(&mut text);
                lists.push(first);
            }
            Event::End(TagEnd::List(_)) => {
                lists.pop();
            }
            Event::Start(Tag::Item) => {
                start_line(&mut text);
                text.push_str(&"  ".repeat(lists.len().saturating_sub(1)));
                match lists.last_mut() {
                    Some(Some(number)) => {
                        text.push_str(&format!("{}. ", number));
                        *number += 1;
                    }
                    _ => text.push_str("- "),
                }
            }
            Event::TaskListMarker(done) => text.push_str(if done { "[x] " } else { "[ ] " }),
            Event::End(TagEnd::TableCell) => text.push('\t'),
            Event::End(TagEnd::TableHead | TagEnd::TableRow) => {
                while text.ends_with('\t') {
                    text.pop();
                }
                start_line(&mut text);
            }
            Event::End(
                TagEnd::Paragraph | TagEnd::Heading(_) | TagEnd::Item | TagEnd::CodeBlock | TagEnd::BlockQuote,
            )
            | Event::Rule => start_line(&mut text),
            _ => {}
        }
    }

    text.truncate(text.trim_end().len());
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_markup_is_stripped() {
        assert_eq!(to_plain_text("`important_parameter`"), "important_parameter");
        assert_eq!(to_plain_text("**bold**"), "bold");
        assert_eq!(to_plain_text("*italic*"), "italic");
        assert_eq!(to_plain_text("_italic as well_"), "italic as well");
        assert_eq!(
            to_plain_text("This **is** _very important_ `feature`: html_to_text_conversion"),
            "This is very important feature: html_to_text_conversion"
        );
    }

    #[test]
    fn test_lines_and_lists_survive() {
        assert_eq!(
            to_plain_text("Some report\r\ncontaining multiple lines\r\nin description."),
            "Some report\ncontaining multiple lines\nin description."
        );
        assert_eq!(
            to_plain_text("Done:\r\n- **review**\r\n- deploy"),
            "Done:\n- review\n- deploy"
        );
        assert_eq!(to_plain_text("1. first\n2. second"), "1. first\n2. second");
        assert_eq!(to_plain_text("- [x] tests\n- [ ] docs"), "- [x] tests\n- [ ] docs");
        assert_eq!(to_plain_text("a\n\nb"), "a\nb");
    }

    #[test]
    fn test_html_keeps_line_breaks() {
        let html = to_html("first\nsecond **bold**");
        assert!(html.contains("first<br />"));
        assert!(html.contains("<strong>bold</strong>"));
        assert!(to_html("- [x] done").contains("checkbox"));
    }
}

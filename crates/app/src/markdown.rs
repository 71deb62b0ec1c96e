use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};

/// Flatten markdown into terminal text: headings and paragraphs separated
/// by blank lines, list items as `- ` or `N. ` with two-space nesting.
pub fn to_plain_text(input: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);

    let mut out = String::new();
    let mut lists: Vec<Option<u64>> = Vec::new();

    for event in Parser::new_ext(input, options) {
        match event {
            Event::Start(Tag::Heading { .. }) => blank_line(&mut out),
            Event::End(TagEnd::Heading(_)) => out.push('\n'),
            Event::Start(Tag::Paragraph) if lists.is_empty() => blank_line(&mut out),
            Event::End(TagEnd::Paragraph) => line_break(&mut out),
            Event::Start(Tag::List(start)) => {
                if lists.is_empty() {
                    blank_line(&mut out);
                }
                lists.push(start);
            }
            Event::End(TagEnd::List(_)) => {
                lists.pop();
            }
            Event::Start(Tag::Item) => {
                line_break(&mut out);
                out.push_str(&"  ".repeat(lists.len().saturating_sub(1)));
                match lists.last_mut() {
                    Some(Some(n)) => {
                        out.push_str(&format!("{n}. "));
                        *n += 1;
                    }
                    _ => out.push_str("- "),
                }
            }
            Event::End(TagEnd::Item) | Event::End(TagEnd::TableRow) => line_break(&mut out),
            Event::End(TagEnd::TableCell) => out.push_str(" | "),
            Event::Text(text) | Event::Code(text) => out.push_str(&text),
            Event::SoftBreak => out.push(' '),
            Event::HardBreak => out.push('\n'),
            Event::Rule => {
                blank_line(&mut out);
                out.push_str("---\n");
            }
            _ => {}
        }
    }

    out.trim_end().to_string()
}

fn line_break(out: &mut String) {
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
}

fn blank_line(out: &mut String) {
    if out.is_empty() {
        return;
    }
    let trimmed = out.trim_end_matches('\n').len();
    out.truncate(trimmed);
    out.push_str("\n\n");
}

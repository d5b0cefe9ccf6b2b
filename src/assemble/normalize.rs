// src/assemble/normalize.rs
// =============================================================================
// Keeps generated section bodies from breaking the document outline.
//
// Text-generation backends like to start a section with its own heading
// ("## Usage") and to use top-level headings inside it. We parse the body
// with pulldown-cmark, which tells us where the real headings are (a "#"
// inside a code block is not a heading), then:
// - drop a leading heading that repeats the section name
// - demote level 1 and 2 headings to level 3
// =============================================================================

use pulldown_cmark::{Event, HeadingLevel, Parser, Tag};
use std::ops::Range;

struct Heading {
    level: HeadingLevel,
    range: Range<usize>,
    text: String,
}

/// Normalizes the body of a section whose heading is `section_heading`.
pub fn normalize_body(section_heading: &str, body: &str) -> String {
    let headings = find_headings(body);
    let mut edits: Vec<(Range<usize>, String)> = Vec::new();

    for (i, heading) in headings.iter().enumerate() {
        let leading = i == 0 && body[..heading.range.start].trim().is_empty();
        if leading && heading.text.trim().eq_ignore_ascii_case(section_heading) {
            edits.push((heading.range.clone(), String::new()));
        } else if matches!(heading.level, HeadingLevel::H1 | HeadingLevel::H2) {
            edits.push((heading.range.clone(), demote(&body[heading.range.clone()])));
        }
    }

    let mut out = body.to_string();
    // Apply back to front so earlier ranges stay valid
    for (range, replacement) in edits.into_iter().rev() {
        out.replace_range(range, &replacement);
    }
    out.trim().to_string()
}

fn find_headings(body: &str) -> Vec<Heading> {
    let mut headings = Vec::new();
    let mut current: Option<Heading> = None;

    for (event, range) in Parser::new(body).into_offset_iter() {
        match event {
            Event::Start(Tag::Heading(level, _, _)) => {
                current = Some(Heading {
                    level,
                    range,
                    text: String::new(),
                });
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some(heading) = current.as_mut() {
                    heading.text.push_str(&text);
                }
            }
            Event::End(Tag::Heading(..)) => {
                if let Some(heading) = current.take() {
                    headings.push(heading);
                }
            }
            _ => {}
        }
    }

    headings
}

// Rewrites one heading's source as a level 3 ATX heading
fn demote(source: &str) -> String {
    let newline = if source.ends_with('\n') { "\n" } else { "" };
    let trimmed = source.trim_start();

    if trimmed.starts_with('#') {
        let rest = trimmed.trim_start_matches('#');
        return format!("###{}", rest);
    }

    // Setext: text lines followed by an underline of '=' or '-'
    let mut lines: Vec<&str> = source.lines().collect();
    lines.pop();
    // Inside a blockquote, continuation lines carry their own '>' marker;
    // the first line's marker sits before the heading's range
    let text: Vec<&str> = lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let line = line.trim();
            if i > 0 {
                line.trim_start_matches('>').trim()
            } else {
                line
            }
        })
        .collect();
    format!("### {}{}", text.join(" "), newline)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_repeated_section_heading() {
        let body = "## Usage\n\nRun `demo --help`.\n";
        assert_eq!(normalize_body("Usage", body), "Run `demo --help`.");
    }

    #[test]
    fn test_keeps_unrelated_leading_heading_but_demotes_it() {
        let body = "# Quick start\n\nRun it.";
        assert_eq!(normalize_body("Usage", body), "### Quick start\n\nRun it.");
    }

    #[test]
    fn test_demotes_setext_heading() {
        let body = "Intro\n\nDetails\n=======\n\nMore.";
        assert_eq!(normalize_body("Features", body), "Intro\n\n### Details\n\nMore.");
    }

    #[test]
    fn test_demotes_multiline_setext_heading_in_blockquote() {
        let body = "> Foo\n> bar\n> ===";
        assert_eq!(normalize_body("Usage", body), "> ### Foo bar");
    }

    #[test]
    fn test_ignores_hashes_in_code_blocks() {
        let body = "```bash\n# install\npip install demo\n```";
        assert_eq!(normalize_body("Installation", body), body);
    }

    #[test]
    fn test_level_three_headings_untouched() {
        let body = "Intro\n\n### Options\n\nNone.";
        assert_eq!(normalize_body("Usage", body), body);
    }
}

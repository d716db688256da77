//! Narrative source format.
//!
//! ```text
//! % The Long Way Down          <- title block (optional, any number of `%` lines)
//! % a story in five parts
//!
//! ## Departure {#departure}     <- section heading with anchor
//! Paragraph text.  Blank lines separate paragraphs.
//!
//! ## The Descent {#descent pinned}
//! Pinned sections hold still while their text is revealed.
//! ```
//!
//! Text before the first heading becomes an untitled prologue anchored at
//! `top`.

use std::collections::HashSet;
use std::path::Path;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NarrativeError {
    #[error("failed to read narrative: {0}")]
    Io(#[from] std::io::Error),

    #[error("narrative has no sections")]
    Empty,

    #[error("anchor `#{anchor}` is used by more than one section (line {line})")]
    DuplicateAnchor { anchor: String, line: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: String,
    pub anchor: String,
    pub pinned: bool,
    pub paragraphs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Narrative {
    /// Title block lines.  Empty when the source has none.
    pub title: Vec<String>,
    pub sections: Vec<Section>,
}

impl Narrative {
    pub fn load(path: &Path) -> Result<Self, NarrativeError> {
        let source = std::fs::read_to_string(path)?;
        Self::parse(&source)
    }

    pub fn parse(source: &str) -> Result<Self, NarrativeError> {
        let mut title = Vec::new();
        let mut sections: Vec<Section> = Vec::new();
        let mut anchors = HashSet::new();
        let mut paragraph = String::new();
        let mut in_title = true;

        for (idx, raw) in source.lines().enumerate() {
            let line = raw.trim_end();

            if in_title {
                if let Some(rest) = line.strip_prefix('%') {
                    title.push(rest.trim().to_string());
                    continue;
                }
                if line.trim().is_empty() {
                    continue;
                }
                in_title = false;
            }

            if let Some(heading) = line.strip_prefix("## ") {
                flush_paragraph(&mut paragraph, &mut sections);
                let section = parse_heading(heading, sections.len() + 1);
                if !anchors.insert(section.anchor.clone()) {
                    return Err(NarrativeError::DuplicateAnchor {
                        anchor: section.anchor,
                        line: idx + 1,
                    });
                }
                sections.push(section);
                continue;
            }

            if line.trim().is_empty() {
                flush_paragraph(&mut paragraph, &mut sections);
                continue;
            }

            if sections.is_empty() {
                anchors.insert("top".to_string());
                sections.push(Section {
                    title: String::new(),
                    anchor: "top".to_string(),
                    pinned: false,
                    paragraphs: Vec::new(),
                });
            }
            if !paragraph.is_empty() {
                paragraph.push(' ');
            }
            paragraph.push_str(line.trim());
        }
        flush_paragraph(&mut paragraph, &mut sections);

        if sections.is_empty() {
            return Err(NarrativeError::Empty);
        }
        Ok(Self { title, sections })
    }

    pub fn section_by_anchor(&self, anchor: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.anchor == anchor)
    }
}

fn flush_paragraph(paragraph: &mut String, sections: &mut [Section]) {
    if paragraph.is_empty() {
        return;
    }
    if let Some(section) = sections.last_mut() {
        section.paragraphs.push(std::mem::take(paragraph));
    }
}

/// Split `Title {#id pinned}` into its parts.  Headings with no explicit id
/// and no sluggable characters fall back to `section-{position}`.
fn parse_heading(heading: &str, position: usize) -> Section {
    let heading = heading.trim();
    let (title, attrs) = match heading.rfind('{') {
        Some(open) if heading.ends_with('}') => {
            (heading[..open].trim(), &heading[open + 1..heading.len() - 1])
        }
        _ => (heading, ""),
    };

    let mut anchor = None;
    let mut pinned = false;
    for attr in attrs.split_whitespace() {
        if let Some(id) = attr.strip_prefix('#') {
            anchor = Some(id.to_string());
        } else if attr == "pinned" {
            pinned = true;
        }
    }

    Section {
        title: title.to_string(),
        anchor: anchor
            .filter(|id| !id.is_empty())
            .or_else(|| Some(slugify(title)).filter(|slug| !slug.is_empty()))
            .unwrap_or_else(|| format!("section-{position}")),
        pinned,
        paragraphs: Vec::new(),
    }
}

/// Lower-case, alphanumerics kept, runs of anything else become one `-`.
pub fn slugify(title: &str) -> String {
    let mut slug = String::new();
    for c in title.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
% The Long Way Down
% a story

## Departure {#departure}
First line
continues here.

Second paragraph.

## The Descent {#descent pinned}
Down we go.

## Last Light
The end.
";

    #[test]
    fn parses_title_sections_and_paragraphs() {
        let n = Narrative::parse(SAMPLE).expect("valid");
        assert_eq!(n.title, vec!["The Long Way Down", "a story"]);
        assert_eq!(n.sections.len(), 3);

        let first = &n.sections[0];
        assert_eq!(first.anchor, "departure");
        assert!(!first.pinned);
        assert_eq!(first.paragraphs, vec!["First line continues here.", "Second paragraph."]);

        assert!(n.sections[1].pinned);
        assert_eq!(n.sections[1].title, "The Descent");
        assert_eq!(n.sections[2].anchor, "last-light");
    }

    #[test]
    fn text_before_first_heading_is_a_prologue() {
        let n = Narrative::parse("Once upon a time.\n\n## Next\nMore.").expect("valid");
        assert!(n.title.is_empty());
        assert_eq!(n.sections[0].anchor, "top");
        assert_eq!(n.sections[0].paragraphs, vec!["Once upon a time."]);
        assert!(n.section_by_anchor("next").is_some());
    }

    #[test]
    fn duplicate_anchor_is_rejected() {
        let err = Narrative::parse("## A {#x}\n\n## B {#x}\n").unwrap_err();
        assert!(matches!(err, NarrativeError::DuplicateAnchor { ref anchor, line: 3 } if anchor == "x"));
    }

    #[test]
    fn symbol_only_headings_get_positional_anchors() {
        let n = Narrative::parse("## ***\nA.\n\n## !!!\nB.\n\n## Coda {#}\nC.\n").expect("valid");
        let anchors: Vec<&str> = n.sections.iter().map(|s| s.anchor.as_str()).collect();
        assert_eq!(anchors, vec!["section-1", "section-2", "coda"]);
        assert_eq!(n.sections[0].title, "***");
    }

    #[test]
    fn empty_source_is_rejected() {
        assert!(matches!(Narrative::parse("% only a title\n"), Err(NarrativeError::Empty)));
    }

    #[test]
    fn slugs() {
        assert_eq!(slugify("The Descent!"), "the-descent");
        assert_eq!(slugify("  Part 2: Ice  "), "part-2-ice");
    }
}

//! Wraps a [`Narrative`] into display rows and maps scroll offsets onto them.
//!
//! Pinned sections add spacer scroll distance: while the scroll position is
//! inside a pin, the view stays frozen on the section heading and its text is
//! revealed progressively.  "Scroll rows" include those spacers; "content
//! rows" index into [`NarrativeLayout::rows`].

use super::document::Narrative;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Title,
    Heading { section: usize },
    Text { section: usize },
    Blank,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub text: String,
    pub kind: RowKind,
}

impl Row {
    fn blank() -> Self {
        Self {
            text: String::new(),
            kind: RowKind::Blank,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionSpan {
    pub anchor: String,
    pub title: String,
    pub pinned: bool,
    /// First content row of the section.
    pub first_row: usize,
    /// One past the last content row.
    pub end_row: usize,
}

/// Extra scroll distance held by a pinned section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pin {
    pub section: usize,
    /// Content row the view freezes on.
    pub row: usize,
    pub len: usize,
}

/// Where the viewport sits for a given scroll offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewOrigin {
    /// Content row at the top of the viewport (fractional).
    pub row: f64,
    /// Pinned section currently holding the view, with its progress in `[0, 1]`.
    pub pin: Option<(usize, f64)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NarrativeLayout {
    pub rows: Vec<Row>,
    pub sections: Vec<SectionSpan>,
    pub pins: Vec<Pin>,
}

impl NarrativeLayout {
    /// Lay out `narrative` at `width` columns.  Each pinned section holds the
    /// view for `pin_len` scroll rows.
    pub fn build(narrative: &Narrative, width: u16, pin_len: usize) -> Self {
        let wrap_width = usize::from(width.max(8));
        let mut rows = Vec::new();
        let mut sections = Vec::with_capacity(narrative.sections.len());
        let mut pins = Vec::new();

        if !narrative.title.is_empty() {
            for line in &narrative.title {
                for text in wrap(line, wrap_width) {
                    rows.push(Row {
                        text,
                        kind: RowKind::Title,
                    });
                }
            }
            rows.push(Row::blank());
        }

        for (idx, section) in narrative.sections.iter().enumerate() {
            let first_row = rows.len();
            if !section.title.is_empty() {
                rows.push(Row {
                    text: section.title.clone(),
                    kind: RowKind::Heading { section: idx },
                });
                rows.push(Row::blank());
            }
            for (p, paragraph) in section.paragraphs.iter().enumerate() {
                if p > 0 {
                    rows.push(Row::blank());
                }
                for text in wrap(paragraph, wrap_width) {
                    rows.push(Row {
                        text,
                        kind: RowKind::Text { section: idx },
                    });
                }
            }
            rows.push(Row::blank());

            if section.pinned && pin_len > 0 {
                pins.push(Pin {
                    section: idx,
                    row: first_row,
                    len: pin_len,
                });
            }
            sections.push(SectionSpan {
                anchor: section.anchor.clone(),
                title: section.title.clone(),
                pinned: section.pinned,
                first_row,
                end_row: rows.len(),
            });
        }

        Self {
            rows,
            sections,
            pins,
        }
    }

    pub fn content_rows(&self) -> usize {
        self.rows.len()
    }

    /// Total scroll distance in rows, pin spacers included.
    pub fn scroll_rows(&self) -> usize {
        self.rows.len() + self.pins.iter().map(|p| p.len).sum::<usize>()
    }

    /// Scroll row at which content row `row` reaches the top of the viewport.
    pub fn scroll_row_of(&self, row: usize) -> usize {
        row + self
            .pins
            .iter()
            .filter(|p| p.row < row)
            .map(|p| p.len)
            .sum::<usize>()
    }

    pub fn section_index(&self, anchor: &str) -> Option<usize> {
        self.sections.iter().position(|s| s.anchor == anchor)
    }

    /// Scroll row of the section carrying `anchor`.
    pub fn anchor_row(&self, anchor: &str) -> Option<usize> {
        let idx = self.section_index(anchor)?;
        Some(self.scroll_row_of(self.sections[idx].first_row))
    }

    /// Scroll row where the pin of `section` begins.
    pub fn pin_start(&self, pin: &Pin) -> usize {
        self.scroll_row_of(pin.row)
    }

    pub fn view_at(&self, scroll_row: f64) -> ViewOrigin {
        let mut spacer = 0.0;
        for pin in &self.pins {
            let start = pin.row as f64 + spacer;
            let len = pin.len as f64;
            if scroll_row < start {
                break;
            }
            if scroll_row <= start + len {
                return ViewOrigin {
                    row: pin.row as f64,
                    pin: Some((pin.section, (scroll_row - start) / len)),
                };
            }
            spacer += len;
        }
        ViewOrigin {
            row: (scroll_row - spacer).max(0.0),
            pin: None,
        }
    }

    /// How much of a section's text is revealed at `scroll_row`.  Unpinned
    /// sections are always fully shown.
    pub fn reveal(&self, section: usize, scroll_row: f64) -> f64 {
        let Some(pin) = self.pins.iter().find(|p| p.section == section) else {
            return 1.0;
        };
        let start = self.pin_start(pin) as f64;
        ((scroll_row - start) / pin.len as f64).clamp(0.0, 1.0)
    }

    /// Section whose span contains the content row at the top of the view.
    pub fn section_at(&self, scroll_row: f64) -> Option<usize> {
        let origin = self.view_at(scroll_row);
        if let Some((section, _)) = origin.pin {
            return Some(section);
        }
        let row = origin.row.floor() as usize;
        self.sections
            .iter()
            .rposition(|s| s.first_row <= row)
    }
}

/// Greedy word wrap on character counts.  Words longer than `width` are split.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut line_len = 0;

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > width {
            if line_len > 0 {
                lines.push(std::mem::take(&mut line));
                line_len = 0;
            }
            let rest = word.split_off(width);
            lines.push(word.into_iter().collect());
            word = rest;
        }
        if word.is_empty() {
            continue;
        }
        let needed = if line_len == 0 { word.len() } else { line_len + 1 + word.len() };
        if needed > width {
            lines.push(std::mem::take(&mut line));
            line_len = 0;
        }
        if line_len > 0 {
            line.push(' ');
            line_len += 1;
        }
        line.extend(word.iter());
        line_len += word.len();
    }
    if line_len > 0 {
        lines.push(line);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Narrative {
        Narrative::parse(
            "% Title\n\n## One {#one}\nalpha beta\n\n## Two {#two pinned}\ngamma\n\n## Three {#three}\ndelta\n",
        )
        .expect("valid")
    }

    #[test]
    fn wraps_on_words() {
        assert_eq!(wrap("the quick brown fox", 9), vec!["the quick", "brown fox"]);
        assert_eq!(wrap("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
        assert!(wrap("   ", 10).is_empty());
    }

    #[test]
    fn rows_and_sections() {
        let layout = NarrativeLayout::build(&sample(), 40, 10);
        // title, blank | One, blank, text, blank | Two, blank, text, blank | Three, blank, text, blank
        assert_eq!(layout.content_rows(), 14);
        assert_eq!(layout.sections[0].first_row, 2);
        assert_eq!(layout.sections[1].first_row, 6);
        assert_eq!(layout.sections[2].first_row, 10);
        assert_eq!(layout.pins, vec![Pin { section: 1, row: 6, len: 10 }]);
        assert_eq!(layout.scroll_rows(), 24);
    }

    #[test]
    fn anchors_after_a_pin_shift_by_its_length() {
        let layout = NarrativeLayout::build(&sample(), 40, 10);
        assert_eq!(layout.anchor_row("one"), Some(2));
        assert_eq!(layout.anchor_row("two"), Some(6));
        assert_eq!(layout.anchor_row("three"), Some(20));
        assert_eq!(layout.anchor_row("four"), None);
    }

    #[test]
    fn view_freezes_inside_pin() {
        let layout = NarrativeLayout::build(&sample(), 40, 10);
        assert_eq!(layout.view_at(3.0), ViewOrigin { row: 3.0, pin: None });
        assert_eq!(layout.view_at(11.0), ViewOrigin { row: 6.0, pin: Some((1, 0.5)) });
        assert_eq!(layout.view_at(18.0), ViewOrigin { row: 8.0, pin: None });
        assert_eq!(layout.reveal(1, 6.0), 0.0);
        assert_eq!(layout.reveal(1, 8.5), 0.25);
        assert_eq!(layout.reveal(1, 30.0), 1.0);
        assert_eq!(layout.reveal(0, 0.0), 1.0);
    }

    #[test]
    fn section_at_tracks_view() {
        let layout = NarrativeLayout::build(&sample(), 40, 10);
        assert_eq!(layout.section_at(0.0), None);
        assert_eq!(layout.section_at(2.0), Some(0));
        assert_eq!(layout.section_at(12.0), Some(1));
        assert_eq!(layout.section_at(20.0), Some(2));
    }
}

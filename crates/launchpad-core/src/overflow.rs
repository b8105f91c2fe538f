use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Rows a collapsed description may occupy before "Read More" is offered.
pub const CLAMP_ROWS: usize = 3;

/// Tracks whether a description overflows its clamp, and whether the user
/// has expanded it.
///
/// Measurement is cached on (text, width); a new text also collapses the
/// description again.
#[derive(Debug, Clone, Default)]
pub struct DescriptionOverflow {
    text: String,
    width: u16,
    rows: usize,
    long: bool,
    expanded: bool,
}

impl DescriptionOverflow {
    /// Measure `text` wrapped at `width` columns. Returns whether it is long.
    pub fn measure(&mut self, text: &str, width: u16) -> bool {
        if text != self.text {
            self.text = text.to_string();
            self.expanded = false;
        } else if width == self.width && self.width != 0 {
            return self.long;
        }
        self.width = width;
        self.rows = wrapped_rows(text, width);
        self.long = self.rows > CLAMP_ROWS;
        self.long
    }

    pub fn is_long(&self) -> bool {
        self.long
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// Wrapped row count from the last measurement.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Flip between "Read More" and "Read Less". Has no effect on short text.
    pub fn toggle(&mut self) {
        if self.long {
            self.expanded = !self.expanded;
        }
    }

    /// Row limit to render with, or `None` to show everything.
    pub fn visible_rows(&self) -> Option<usize> {
        if self.long && !self.expanded {
            Some(CLAMP_ROWS)
        } else {
            None
        }
    }

    pub fn toggle_label(&self) -> Option<&'static str> {
        match (self.long, self.expanded) {
            (false, _) => None,
            (true, false) => Some("Read More"),
            (true, true) => Some("Read Less"),
        }
    }
}

/// Number of rows `text` occupies when word-wrapped at `width` columns.
pub fn wrapped_rows(text: &str, width: u16) -> usize {
    wrap(text, width).len()
}

/// Word-wrap `text` into rows no wider than `width` columns.
///
/// Whitespace runs collapse to a single space. Words wider than a row are
/// hard-broken.
pub fn wrap(text: &str, width: u16) -> Vec<String> {
    let width = usize::from(width.max(1));
    let mut rows = Vec::new();
    for line in text.lines() {
        wrap_line(line, width, &mut rows);
    }
    rows
}

fn wrap_line(line: &str, width: usize, rows: &mut Vec<String>) {
    let mut row = String::new();
    let mut used = 0;
    for word in line.split_whitespace() {
        let w = word.width();
        if w > width {
            if used > 0 {
                rows.push(std::mem::take(&mut row));
                used = 0;
            }
            for c in word.chars() {
                let cw = c.width().unwrap_or(0);
                if used + cw > width {
                    rows.push(std::mem::take(&mut row));
                    used = 0;
                }
                row.push(c);
                used += cw;
            }
            continue;
        }
        let needed = if used == 0 { w } else { used + 1 + w };
        if needed > width {
            rows.push(std::mem::take(&mut row));
            row.push_str(word);
            used = w;
        } else {
            if used > 0 {
                row.push(' ');
            }
            row.push_str(word);
            used = needed;
        }
    }
    rows.push(row);
}

//! Result-area fragments.
//!
//! The result area is replaced wholesale by one fragment per phase. The
//! builders here are pure functions of their input; the terminal layer only
//! styles what they return.

use super::state::Phase;
use crate::locale::Strings;
use unicode_width::UnicodeWidthChar;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentKind {
    Empty,
    Loading,
    Result,
    Error,
}

/// One line of a fragment, with an optional emphasized label in front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentLine {
    pub label: Option<&'static str>,
    pub text: String,
}

impl FragmentLine {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            label: None,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub kind: FragmentKind,
    pub heading: Option<&'static str>,
    pub lines: Vec<FragmentLine>,
}

pub fn empty_fragment() -> Fragment {
    Fragment {
        kind: FragmentKind::Empty,
        heading: None,
        lines: Vec::new(),
    }
}

pub fn loading_fragment(strings: &Strings) -> Fragment {
    Fragment {
        kind: FragmentKind::Loading,
        heading: None,
        lines: vec![FragmentLine::plain(strings.loading_text)],
    }
}

pub fn result_fragment(strings: &Strings, text: &str) -> Fragment {
    Fragment {
        kind: FragmentKind::Result,
        heading: Some(strings.result_heading),
        lines: text.lines().map(FragmentLine::plain).collect(),
    }
}

pub fn error_fragment(strings: &Strings, message: &str) -> Fragment {
    Fragment {
        kind: FragmentKind::Error,
        heading: None,
        lines: vec![
            FragmentLine {
                label: Some(strings.error_label),
                text: message.to_string(),
            },
            FragmentLine::plain(strings.error_hint),
        ],
    }
}

/// The fragment the result area shows in `phase`.
pub fn fragment_for(phase: &Phase, strings: &Strings) -> Fragment {
    match phase {
        Phase::Idle => empty_fragment(),
        Phase::Loading => loading_fragment(strings),
        Phase::Result(text) => result_fragment(strings, text),
        Phase::ErrorDisplayed(message) => error_fragment(strings, message),
    }
}

/// Label of the submit control.
pub fn button_label(trigger_enabled: bool, strings: &Strings) -> &'static str {
    if trigger_enabled {
        strings.button_label
    } else {
        strings.button_busy_label
    }
}

/// The input text split into terminal rows, plus where the cursor sits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputLayout {
    pub rows: Vec<String>,
    /// (row, column) in terminal cells.
    pub cursor: (usize, usize),
}

/// Wrap `value` into rows at most `width` cells wide.
///
/// `cursor` is a character index, as tui-input reports it. Columns are
/// measured in display cells, so wide glyphs take two and combining marks
/// take none.
pub fn layout_input(value: &str, cursor: usize, width: usize) -> InputLayout {
    if width == 0 {
        return InputLayout {
            rows: Vec::new(),
            cursor: (0, 0),
        };
    }

    let mut rows = Vec::new();
    let mut current = String::new();
    let (mut row, mut col) = (0, 0);
    let mut cursor_cell = None;

    for (i, c) in value.chars().enumerate() {
        let w = c.width().unwrap_or(0);
        if col + w > width && col > 0 {
            rows.push(std::mem::take(&mut current));
            row += 1;
            col = 0;
        }
        if i == cursor {
            cursor_cell = Some((row, col));
        }
        current.push(c);
        col += w;
    }
    rows.push(current);

    let cursor = cursor_cell.unwrap_or(if col >= width { (row + 1, 0) } else { (row, col) });
    InputLayout { rows, cursor }
}

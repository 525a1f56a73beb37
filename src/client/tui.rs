//! Full-screen form.
//!
//! One paragraph input, one submit control, and a result area that shows
//! the fragment for the current phase.

use super::state::{Completion, SubmitRejection};
use super::view::{self, Fragment, FragmentKind};
use super::SimplifierClient;
use crate::locale::Strings;
use crate::simplifier::Simplifier;
use anyhow::Result;
use crossterm::{
    event::{
        DisableBracketedPaste, EnableBracketedPaste, Event, EventStream, KeyCode, KeyEvent,
        KeyEventKind, KeyModifiers,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame, Terminal,
};
use std::io::{self, Stdout};
use std::time::Duration;
use tokio::sync::mpsc;
use tui_input::backend::crossterm::EventHandler;
use tui_input::{Input, InputRequest};

const SPINNER: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// Most rows the input box grows to before it scrolls.
const MAX_INPUT_ROWS: usize = 6;

/// Terminal-only state that is not part of the form lifecycle.
#[derive(Default)]
struct FormView {
    input: Input,
    required_notice: bool,
    spinner: usize,
    result_scroll: u16,
}

enum Flow {
    Continue,
    Quit,
}

/// Run the form until the user quits.
pub async fn run_tui(simplifier: Simplifier, initial_text: Option<String>) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_form_loop(&mut terminal, simplifier, initial_text).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableBracketedPaste, LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

/// The main event loop.
async fn run_form_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    simplifier: Simplifier,
    initial_text: Option<String>,
) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel::<Completion>();
    let mut client = SimplifierClient::new(simplifier, tx);
    let mut form = FormView::default();
    if let Some(text) = initial_text {
        form.input = Input::new(join_paragraph(&text));
    }

    let mut events = EventStream::new();
    let mut ticker = tokio::time::interval(Duration::from_millis(100));

    loop {
        terminal.draw(|frame| draw_ui(frame, &client, &form))?;

        tokio::select! {
            maybe_event = events.next() => {
                let Some(event) = maybe_event else {
                    return Ok(());
                };
                if let Flow::Quit = handle_event(&event?, &mut client, &mut form) {
                    return Ok(());
                }
            }
            Some(completion) = rx.recv() => {
                if client.settle(completion) {
                    form.result_scroll = 0;
                }
            }
            _ = ticker.tick(), if !client.trigger_enabled() => {
                form.spinner = form.spinner.wrapping_add(1);
            }
        }
    }
}

fn handle_event(event: &Event, client: &mut SimplifierClient, form: &mut FormView) -> Flow {
    match event {
        Event::Key(key) => handle_key(*key, client, form),
        Event::Paste(text) => {
            for c in join_paragraph(text).chars() {
                form.input.handle(InputRequest::InsertChar(c));
            }
            form.required_notice = false;
            Flow::Continue
        }
        _ => Flow::Continue,
    }
}

fn handle_key(key: KeyEvent, client: &mut SimplifierClient, form: &mut FormView) -> Flow {
    // Only handle key press events (not release)
    if key.kind != KeyEventKind::Press {
        return Flow::Continue;
    }

    match key.code {
        KeyCode::Esc => Flow::Quit,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Flow::Quit,
        KeyCode::Enter => {
            match client.submit(form.input.value()) {
                Ok(_) => {
                    form.required_notice = false;
                    form.result_scroll = 0;
                }
                Err(SubmitRejection::EmptyInput) => form.required_notice = true,
                Err(SubmitRejection::Busy) => {}
            }
            Flow::Continue
        }
        KeyCode::PageDown => {
            form.result_scroll = form.result_scroll.saturating_add(5);
            Flow::Continue
        }
        KeyCode::PageUp => {
            form.result_scroll = form.result_scroll.saturating_sub(5);
            Flow::Continue
        }
        _ => {
            form.input.handle_event(&Event::Key(key));
            form.required_notice = false;
            Flow::Continue
        }
    }
}

/// Collapse pasted lines into one paragraph.
fn join_paragraph(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Draw the form.
fn draw_ui(frame: &mut Frame, client: &SimplifierClient, form: &FormView) {
    let strings = client.strings();
    let outer = Block::default()
        .title(strings.app_title)
        .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let area = outer.inner(frame.area());
    frame.render_widget(outer, frame.area());

    let input_width = area.width.saturating_sub(2) as usize;
    let layout = view::layout_input(form.input.value(), form.input.cursor(), input_width);
    let (cursor_row, cursor_col) = layout.cursor;
    let rows = layout.rows;
    let input_rows = rows.len().max(cursor_row + 1).clamp(1, MAX_INPUT_ROWS);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(input_rows as u16 + 2),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(3),
        ])
        .split(area);

    draw_input(
        frame,
        chunks[0],
        form,
        strings,
        &rows,
        (cursor_row, cursor_col),
        input_rows,
    );

    let enabled = client.trigger_enabled();
    let button_style = if enabled {
        Style::default().fg(Color::Black).bg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray).bg(Color::Gray)
    };
    let button = Paragraph::new(Line::from(vec![Span::styled(
        format!(" {} ", view::button_label(enabled, strings)),
        button_style,
    )]));
    frame.render_widget(button, chunks[1]);

    let help = Paragraph::new(Line::from(Span::styled(
        strings.key_help,
        Style::default().fg(Color::DarkGray),
    )));
    frame.render_widget(help, chunks[2]);

    let fragment = view::fragment_for(client.phase(), strings);
    draw_fragment(frame, chunks[3], &fragment, form);
}

fn draw_input(
    frame: &mut Frame,
    area: Rect,
    form: &FormView,
    strings: &Strings,
    rows: &[String],
    (cursor_row, cursor_col): (usize, usize),
    visible_rows: usize,
) {
    let (title, border) = if form.required_notice {
        (
            Span::styled(
                strings.input_required,
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Color::Red,
        )
    } else {
        (Span::raw(strings.input_title), Color::Gray)
    };
    let block = Block::default()
        .title(Line::from(title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Keep the cursor row visible
    let scroll = (cursor_row + 1).saturating_sub(visible_rows);
    let lines: Vec<Line> = rows
        .iter()
        .skip(scroll)
        .take(visible_rows)
        .map(|row| Line::from(Span::styled(row.clone(), Style::default().fg(Color::White))))
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);

    let cursor_x = inner.x + cursor_col as u16;
    let cursor_y = inner.y + (cursor_row - scroll) as u16;
    frame.set_cursor_position((cursor_x, cursor_y));
}

fn draw_fragment(frame: &mut Frame, area: Rect, fragment: &Fragment, form: &FormView) {
    let (color, title) = match fragment.kind {
        FragmentKind::Empty => (Color::DarkGray, None),
        FragmentKind::Loading => (Color::Cyan, None),
        FragmentKind::Result => (Color::Green, fragment.heading),
        FragmentKind::Error => (Color::Red, None),
    };

    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color));
    if let Some(title) = title {
        block = block.title(Span::styled(
            format!(" {} ", title),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));
    }

    let lines: Vec<Line> = fragment
        .lines
        .iter()
        .map(|line| {
            let mut spans = Vec::new();
            if fragment.kind == FragmentKind::Loading {
                spans.push(Span::styled(
                    format!("{} ", SPINNER[form.spinner % SPINNER.len()]),
                    Style::default().fg(color),
                ));
            }
            if let Some(label) = line.label {
                spans.push(Span::styled(
                    format!("{} ", label),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ));
            }
            spans.push(Span::raw(line.text.clone()));
            Line::from(spans)
        })
        .collect();

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((form.result_scroll, 0));
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::state::Phase;
    use crate::locale::Language;
    use crate::simplifier::testing::FakeProvider;
    use ratatui::backend::TestBackend;
    use std::sync::Arc;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn setup(reply: &str) -> (SimplifierClient, mpsc::UnboundedReceiver<Completion>, FormView) {
        let (tx, rx) = mpsc::unbounded_channel();
        let simplifier = Simplifier::new(Arc::new(FakeProvider::replying(reply)), Language::En);
        (SimplifierClient::new(simplifier, tx), rx, FormView::default())
    }

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_join_paragraph() {
        assert_eq!(join_paragraph("one\n  two  \n\nthree"), "one two three");
        assert_eq!(join_paragraph("  single  "), "single");
    }

    #[tokio::test]
    async fn test_enter_on_blank_input_shows_notice() {
        let (mut client, mut rx, mut form) = setup("unused");
        form.input = Input::new("   ".to_string());

        handle_event(&key(KeyCode::Enter), &mut client, &mut form);
        assert!(form.required_notice);
        assert_eq!(client.phase(), &Phase::Idle);
        assert!(rx.try_recv().is_err());

        handle_event(&key(KeyCode::Char('a')), &mut client, &mut form);
        assert!(!form.required_notice);
        assert_eq!(form.input.value(), "   a");
    }

    #[tokio::test]
    async fn test_typing_and_submitting() {
        let (mut client, mut rx, mut form) = setup("Short.");
        for c in "Long text".chars() {
            handle_event(&key(KeyCode::Char(c)), &mut client, &mut form);
        }
        handle_event(&key(KeyCode::Enter), &mut client, &mut form);
        assert_eq!(client.phase(), &Phase::Loading);

        // The control is disabled until the answer is settled
        handle_event(&key(KeyCode::Enter), &mut client, &mut form);
        client.settle(rx.recv().await.unwrap());
        assert_eq!(client.phase(), &Phase::Result("Short.".to_string()));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_paste_is_joined_into_input() {
        let (mut client, _rx, mut form) = setup("unused");
        handle_event(&Event::Paste("first line\nsecond line".to_string()), &mut client, &mut form);
        assert_eq!(form.input.value(), "first line second line");
    }

    #[tokio::test]
    async fn test_escape_quits() {
        let (mut client, _rx, mut form) = setup("unused");
        assert!(matches!(
            handle_event(&key(KeyCode::Esc), &mut client, &mut form),
            Flow::Quit
        ));
    }

    #[tokio::test]
    async fn test_draw_result_and_busy_label() {
        let (mut client, mut rx, mut form) = setup("Mitochondria give cells energy.");
        form.input = Input::new("The mitochondria is the powerhouse of the cell.".to_string());
        let mut terminal = Terminal::new(TestBackend::new(60, 20)).unwrap();

        handle_event(&key(KeyCode::Enter), &mut client, &mut form);
        terminal.draw(|frame| draw_ui(frame, &client, &form)).unwrap();
        let screen = screen_text(&terminal);
        assert!(screen.contains("Processing..."));
        assert!(screen.contains("Simplifying your text..."));

        client.settle(rx.recv().await.unwrap());
        terminal.draw(|frame| draw_ui(frame, &client, &form)).unwrap();
        let screen = screen_text(&terminal);
        assert!(screen.contains("Simplified version"));
        assert!(screen.contains("Mitochondria give cells energy."));
        assert!(screen.contains("Simplify"));
        assert!(!screen.contains("Processing..."));
    }
}

use crate::config::Config;
use crate::error::Result;
use crate::git::Committer;
use crate::state::{Effect, Flow, SessionEnd, Step};
use crate::theme;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame, Terminal,
};
use std::io::{self, Stdout};
use std::panic;
use std::time::Duration;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

pub fn run_tui(config: &Config, committer: &impl Committer) -> Result<SessionEnd> {
    enable_raw_mode()?;
    let mut terminal = restore_on_err(enter_terminal(), restore_terminal)?;
    install_panic_hook();

    let result = run_session(&mut terminal, Flow::new(config), committer, || {
        if event::poll(POLL_INTERVAL)? {
            event::read().map(Some)
        } else {
            Ok(None)
        }
    });

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn enter_terminal() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    Terminal::new(CrosstermBackend::new(stdout))
}

fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
}

/// Runs `restore` before handing a setup error back, so a half-initialised
/// terminal is not left in raw mode.
fn restore_on_err<T>(result: io::Result<T>, restore: impl FnOnce()) -> io::Result<T> {
    if result.is_err() {
        restore();
    }
    result
}

fn install_panic_hook() {
    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        restore_terminal();
        previous(info);
    }));
}

/// Draw, wait for a key, apply it. The commit runs inline, so no key is
/// looked at until git has exited.
fn run_session<B, C, E>(
    terminal: &mut Terminal<B>,
    mut flow: Flow,
    committer: &C,
    mut next_event: E,
) -> Result<SessionEnd>
where
    B: Backend,
    C: Committer,
    E: FnMut() -> io::Result<Option<Event>>,
{
    loop {
        terminal.draw(|f| render(&flow, f))?;

        let Some(Event::Key(key)) = next_event()? else {
            continue;
        };

        match flow.handle_key(key) {
            Effect::None => {}
            Effect::Quit => return Ok(SessionEnd::Aborted),
            Effect::Commit(message) => {
                // shows the "Committing" line while git runs
                terminal.draw(|f| render(&flow, f))?;
                if let Some(end) = flow.record_outcome(committer.commit(&message)) {
                    return Ok(end);
                }
            }
        }
    }
}

pub fn render(flow: &Flow, f: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(f.size());

    match flow.step {
        Step::TypeSelect => render_type_select(flow, f, chunks[0]),
        Step::Scope => render_scope(flow, f, chunks[0]),
        Step::Message => render_message(flow, f, chunks[0]),
        Step::Error => render_error(flow, f, chunks[0]),
    }

    let hint = match flow.step {
        Step::TypeSelect => "↑/↓ to move, type to filter, Enter to confirm, q/Esc to quit",
        Step::Scope | Step::Message => "Enter to confirm, Shift+Tab to go back, Esc/Ctrl+C to quit",
        Step::Error => "",
    };
    f.render_widget(Paragraph::new(hint).style(theme::HINT), chunks[1]);
}

fn render_type_select(flow: &Flow, f: &mut Frame, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(1)])
        .split(area);

    let mut header = vec![Line::styled("Select the type of change", theme::TITLE)];
    if !flow.filter.is_empty() {
        header.push(Line::from(vec![
            Span::styled("Filter: ", theme::PROMPT),
            Span::styled(flow.filter.as_str(), theme::INPUT),
        ]));
    }
    f.render_widget(Paragraph::new(header), chunks[0]);

    let visible = flow.visible_types();
    if visible.is_empty() {
        f.render_widget(Paragraph::new("No matching types").style(theme::HINT), chunks[1]);
        return;
    }

    let items: Vec<ListItem> = visible
        .iter()
        .map(|t| ListItem::new(format!("{:<10} {}", t.tag, t.description)))
        .collect();
    let mut list_state = ListState::default();
    list_state.select(Some(flow.selected_type));
    let list = List::new(items)
        .highlight_style(theme::SELECTED)
        .highlight_symbol("❯ ");
    f.render_stateful_widget(list, chunks[1], &mut list_state);
}

fn input_line<'a>(value: &'a str, placeholder: &'a str) -> Span<'a> {
    if value.is_empty() {
        Span::styled(placeholder, theme::HINT)
    } else {
        Span::styled(value, theme::INPUT)
    }
}

fn render_scope(flow: &Flow, f: &mut Frame, area: Rect) {
    let text = vec![
        Line::styled("Enter scope (optional, press Enter to skip):", theme::TITLE),
        Line::from(input_line(flow.scope.value(), "scope (optional)")),
    ];
    let block = Block::default().borders(Borders::ALL).border_style(theme::PROMPT);
    f.render_widget(Paragraph::new(text).block(block), area);
}

fn render_message(flow: &Flow, f: &mut Frame, area: Rect) {
    let mut text = vec![
        Line::styled("Enter commit message:", theme::TITLE),
        Line::from(vec![
            Span::styled(flow.prefix(), theme::PROMPT),
            input_line(flow.message.value(), "commit message"),
        ]),
    ];
    if flow.committing {
        text.push(Line::default());
        text.push(Line::styled("Committing…", theme::HINT));
    }
    let block = Block::default().borders(Borders::ALL).border_style(theme::PROMPT);
    f.render_widget(Paragraph::new(text).block(block), area);
}

fn render_error(flow: &Flow, f: &mut Frame, area: Rect) {
    let block = Block::default().borders(Borders::ALL).border_style(theme::ERROR);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(1)])
        .split(inner);

    let mut header = vec![Line::styled("Commit Failed!", theme::ERROR), Line::default()];
    let mut details: Vec<&str> = Vec::new();
    if let Some(result) = &flow.result {
        header.push(Line::raw(result.message.as_str()));
        if !result.details.is_empty() && result.details != result.message {
            details = result.details.lines().collect();
        }
    }
    f.render_widget(Paragraph::new(header), chunks[0]);
    f.render_widget(
        Paragraph::new(tail_lines(&details, chunks[1].height as usize)),
        chunks[1],
    );
    f.render_widget(
        Paragraph::new("Press 'r' to retry or 'q' to quit").style(theme::PROMPT),
        chunks[2],
    );
}

/// The last lines of `lines` that fit in `rows`. Hooks print the actual
/// failure at the end, so the head is what gets dropped.
fn tail_lines<'a>(lines: &[&'a str], rows: usize) -> Vec<Line<'a>> {
    if lines.len() <= rows {
        return lines.iter().map(|l| Line::raw(*l)).collect();
    }
    if rows == 0 {
        return Vec::new();
    }
    let hidden = lines.len() - (rows - 1);
    let mut shown = vec![Line::styled(
        format!("… {} earlier lines not shown", hidden),
        theme::HINT,
    )];
    shown.extend(lines[hidden..].iter().map(|l| Line::raw(*l)));
    shown
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::CommitOutcome;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::backend::TestBackend;
    use std::cell::Cell;

    fn screen(flow: &Flow) -> String {
        let mut terminal = Terminal::new(TestBackend::new(90, 24)).unwrap();
        terminal.draw(|f| render(flow, f)).unwrap();
        let buffer = terminal.backend().buffer();
        let width = buffer.area.width as usize;
        buffer
            .content
            .chunks(width)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn chars(text: &str) -> Vec<Event> {
        text.chars().map(|c| key(KeyCode::Char(c))).collect()
    }

    struct Scripted {
        outcome: CommitOutcome,
        calls: Cell<usize>,
    }

    impl Committer for Scripted {
        fn commit(&self, _message: &str) -> CommitOutcome {
            self.calls.set(self.calls.get() + 1);
            self.outcome.clone()
        }
    }

    fn run(events: Vec<Event>, committer: &Scripted) -> SessionEnd {
        let mut terminal = Terminal::new(TestBackend::new(90, 24)).unwrap();
        let mut events = events.into_iter();
        run_session(&mut terminal, Flow::new(&Config::default()), committer, || {
            Ok(Some(events.next().unwrap_or(key(KeyCode::Esc))))
        })
        .unwrap()
    }

    #[test]
    fn type_screen_lists_catalog() {
        let flow = Flow::new(&Config::default());
        let view = screen(&flow);
        assert!(view.contains("Select the type of change"));
        assert!(view.contains("❯ feat"));
        assert!(view.contains("A new feature"));
        assert!(view.contains("chore"));
    }

    #[test]
    fn type_screen_shows_filter_and_empty_result() {
        let mut flow = Flow::new(&Config::default());
        flow.filter = "zzz".into();
        let view = screen(&flow);
        assert!(view.contains("Filter: zzz"));
        assert!(view.contains("No matching types"));
    }

    #[test]
    fn scope_screen_shows_placeholder() {
        let mut flow = Flow::new(&Config::default());
        flow.step = Step::Scope;
        let view = screen(&flow);
        assert!(view.contains("Enter scope (optional, press Enter to skip):"));
        assert!(view.contains("scope (optional)"));
    }

    #[test]
    fn message_screen_shows_prefix() {
        let mut flow = Flow::new(&Config::default());
        flow.step = Step::Scope;
        flow.scope.push('u');
        flow.scope.push('i');
        flow.step = Step::Message;
        let view = screen(&flow);
        assert!(view.contains("Enter commit message:"));
        assert!(view.contains("feat(ui): commit message"));
    }

    #[test]
    fn error_screen_shows_reason_and_details() {
        let mut flow = Flow::new(&Config::default());
        flow.record_outcome(CommitOutcome::from_failed_output("lint: 3 problems\nhook exited 1"));
        let view = screen(&flow);
        assert!(view.contains("Commit Failed!"));
        assert!(view.contains("Pre-commit hook failed"));
        assert!(view.contains("lint: 3 problems"));
        assert!(view.contains("Press 'r' to retry or 'q' to quit"));
    }

    #[test]
    fn long_hook_output_keeps_the_end_and_the_prompt() {
        let mut output: String = (0..40).map(|i| format!("lint error {}\n", i)).collect();
        output.push_str("pre-commit hook failed");
        let mut flow = Flow::new(&Config::default());
        flow.record_outcome(CommitOutcome::from_failed_output(&output));

        let view = screen(&flow);

        assert!(view.contains("Pre-commit hook failed"));
        assert!(view.contains("pre-commit hook failed"));
        assert!(view.contains("lint error 39"));
        assert!(view.contains("earlier lines not shown"));
        assert!(!view.contains("lint error 0 "));
        assert!(view.contains("Press 'r' to retry or 'q' to quit"));
    }

    #[test]
    fn tail_lines_fits_the_rows() {
        let lines = ["a", "b", "c", "d"];
        assert_eq!(tail_lines(&lines, 4).len(), 4);
        assert_eq!(tail_lines(&lines, 0).len(), 0);

        let shown = tail_lines(&lines, 2);
        assert_eq!(shown.len(), 2);
        assert_eq!(shown[0].spans[0].content, "… 3 earlier lines not shown");
        assert_eq!(shown[1].spans[0].content, "d");
    }

    #[test]
    fn setup_failure_restores_the_terminal() {
        let restored = Cell::new(false);
        let failed: io::Result<()> = Err(io::Error::new(io::ErrorKind::Other, "no tty"));
        assert!(restore_on_err(failed, || restored.set(true)).is_err());
        assert!(restored.get());

        let restored = Cell::new(false);
        assert_eq!(restore_on_err(Ok(7), || restored.set(true)).unwrap(), 7);
        assert!(!restored.get());
    }

    #[test]
    fn session_commits_and_ends() {
        let committer = Scripted {
            outcome: CommitOutcome::committed(),
            calls: Cell::new(0),
        };
        let mut events = vec![key(KeyCode::Down), key(KeyCode::Enter), key(KeyCode::Enter)];
        events.extend(chars("handle empty input"));
        events.push(key(KeyCode::Enter));

        let end = run(events, &committer);

        assert_eq!(end, SessionEnd::Committed("fix: handle empty input".into()));
        assert_eq!(committer.calls.get(), 1);
    }

    #[test]
    fn session_failure_then_quit() {
        let committer = Scripted {
            outcome: CommitOutcome::from_failed_output("nothing to commit"),
            calls: Cell::new(0),
        };
        let mut events = vec![key(KeyCode::Enter), key(KeyCode::Enter)];
        events.extend(chars("x"));
        events.push(key(KeyCode::Enter));
        events.push(key(KeyCode::Enter));
        events.push(key(KeyCode::Char('q')));

        assert_eq!(run(events, &committer), SessionEnd::Aborted);
        assert_eq!(committer.calls.get(), 1);
    }

    #[test]
    fn session_abort_never_commits() {
        let committer = Scripted {
            outcome: CommitOutcome::committed(),
            calls: Cell::new(0),
        };
        assert_eq!(run(vec![key(KeyCode::Esc)], &committer), SessionEnd::Aborted);
        assert_eq!(committer.calls.get(), 0);
    }
}

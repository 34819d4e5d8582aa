//! Ratatui-based terminal UI.
//!
//! The form sits on the left (one control per field plus the predict button);
//! the echoed input record and the prediction result sit on the right.
//! Prediction only happens on an explicit trigger.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Row, Table, Wrap},
};

use crate::app::session::{Session, ViewState};
use crate::error::AppError;
use crate::input::{Field, InputForm};
use crate::locale::Strings;
use crate::models::Classifier;
use crate::report::{RenderedResult, Treatment};

/// Index of the "Predict Now" button in the form list.
const PREDICT_ROW: usize = Field::ALL.len();

/// Start the TUI with an already loaded pipeline.
pub fn run<C: Classifier + ?Sized>(pipeline: &C, strings: &'static Strings) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal =
        Terminal::new(backend).map_err(|e| AppError::terminal(format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(Session::new(pipeline, strings));
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::terminal(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::terminal(format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

struct App<'p, C: Classifier + ?Sized> {
    session: Session<'p, C>,
    selected: usize,
    status: String,
}

impl<'p, C: Classifier + ?Sized> App<'p, C> {
    fn new(session: Session<'p, C>) -> Self {
        let status = session.strings().awaiting_input.to_string();
        Self {
            session,
            selected: 0,
            status,
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::terminal(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::terminal(format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::terminal(format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns `true` when the user asked to quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Up => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::Down => {
                if self.selected < PREDICT_ROW {
                    self.selected += 1;
                }
            }
            KeyCode::Left => self.adjust(-1),
            KeyCode::Right => self.adjust(1),
            KeyCode::Enter | KeyCode::Char('p') => self.predict(),
            _ => {}
        }
        false
    }

    fn adjust(&mut self, delta: i32) {
        let Some(&field) = Field::ALL.get(self.selected) else {
            return;
        };
        let strings = self.session.strings();
        self.session.adjust(field, delta);
        self.status = format!(
            "{}: {}",
            field.label(strings),
            self.session.form().value_label(field)
        );
    }

    fn predict(&mut self) {
        let strings = self.session.strings();
        self.status = match self.session.predict_now() {
            Ok(rendered) => rendered.headline,
            Err(err) => format!("{}: {err}", strings.prediction_failed),
        };
    }

    fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(5), Constraint::Min(0), Constraint::Length(3)])
            .split(frame.area());

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let strings = self.session.strings();
        let lines = vec![
            Line::from(Span::styled(
                strings.title,
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(strings.intro, Style::default().fg(Color::Gray))),
        ];
        let p = Paragraph::new(Text::from(lines))
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(46), Constraint::Min(0)])
            .split(area);

        self.draw_form(frame, columns[0]);

        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(11), Constraint::Min(0)])
            .split(columns[1]);

        self.draw_input_echo(frame, right[0]);
        self.draw_result(frame, right[1]);
    }

    fn draw_form(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let strings = self.session.strings();
        let form = self.session.form();

        let mut items: Vec<ListItem> = Field::ALL
            .iter()
            .map(|&field| ListItem::new(form_line(form, field, strings)))
            .collect();
        items.push(ListItem::new(Line::from(Span::styled(
            format!("[ {} ]", strings.predict_button),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ))));

        let list = List::new(items)
            .block(Block::default().title(strings.form_header).borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ListState::default();
        state.select(Some(self.selected));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_input_echo(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let strings = self.session.strings();
        let form = self.session.form();

        let mut rows: Vec<Row> = Field::ALL
            .iter()
            .map(|&field| Row::new(vec![field.label(strings).to_string(), form.value_label(field)]))
            .collect();
        rows.push(
            Row::new(vec![strings.field_location.to_string(), InputForm::location_label()])
                .style(Style::default().fg(Color::DarkGray)),
        );

        let table = Table::new(rows, [Constraint::Length(28), Constraint::Min(0)])
            .block(Block::default().title(strings.input_heading).borders(Borders::ALL));
        frame.render_widget(table, area);
    }

    fn draw_result(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let strings = self.session.strings();
        let block = Block::default().title(strings.result_heading).borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        match self.session.state() {
            ViewState::AwaitingInput => {
                let msg = Paragraph::new(strings.awaiting_input).style(Style::default().fg(Color::Gray));
                frame.render_widget(msg, inner);
            }
            ViewState::Failed(message) => {
                let msg = Paragraph::new(format!("{}: {message}", strings.prediction_failed))
                    .style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
                    .wrap(Wrap { trim: true });
                frame.render_widget(msg, inner);
            }
            ViewState::ResultDisplayed(rendered) => draw_rendered(frame, inner, rendered, strings),
        }
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let strings = self.session.strings();
        let line = Line::from(vec![
            Span::styled(strings.key_help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
            Span::raw(" | "),
            Span::styled(strings.footer_info, Style::default().fg(Color::DarkGray)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn form_line(form: &InputForm, field: Field, strings: &Strings) -> Line<'static> {
    let value = form.value_label(field);
    let value = if field.is_slider() {
        format!("◂ {value:>3} ▸")
    } else {
        format!("◂ {value} ▸")
    };
    Line::from(vec![
        Span::raw(format!("{:<16} ", truncate(field.label(strings), 16))),
        Span::styled(value, Style::default().fg(Color::White)),
    ])
}

fn draw_rendered(frame: &mut ratatui::Frame<'_>, area: Rect, rendered: &RenderedResult, strings: &Strings) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let style = treatment_style(rendered.treatment);
    let mut lines = vec![Line::from(Span::styled(rendered.headline.clone(), style))];
    if rendered.treatment.celebrates() {
        lines.push(Line::from(Span::styled(strings.celebrate, Style::default().fg(Color::Magenta))));
    }
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Left), chunks[0]);

    let header = Row::new(vec![strings.class_column, strings.probability_row])
        .style(Style::default().add_modifier(Modifier::BOLD));
    let rows: Vec<Row> = rendered
        .rows
        .iter()
        .map(|r| {
            let row = Row::new(vec![r.class.to_string(), format!("{:.4}", r.probability)]);
            if r.class == rendered.level.label() {
                row.style(style)
            } else {
                row
            }
        })
        .collect();
    let table = Table::new(rows, [Constraint::Length(12), Constraint::Length(12)])
        .header(header)
        .block(Block::default().title(strings.probabilities_heading));
    frame.render_widget(table, chunks[1]);
}

fn treatment_style(treatment: Treatment) -> Style {
    let color = match treatment {
        Treatment::Success => Color::Green,
        Treatment::Warning => Color::Yellow,
        Treatment::Alert => Color::Red,
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}

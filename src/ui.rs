use itertools::Itertools;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Widget, Wrap},
};
use time_humanize::HumanTime;
use unicode_width::UnicodeWidthStr;

use crate::grid::Coord;
use crate::session::SessionState;
use crate::{App, Screen};

const HORIZONTAL_MARGIN: u16 = 4;
const VERTICAL_MARGIN: u16 = 1;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.screen {
            Screen::Board => render_board(self, area, buf),
            Screen::Results => render_results(self, area, buf),
            Screen::HighScores => render_high_scores(self, area, buf),
        }
    }
}

fn render_board(app: &App, area: Rect, buf: &mut Buffer) {
    let grid = match app.engine.grid() {
        Some(grid) => grid,
        None => {
            render_welcome(app, area, buf);
            return;
        }
    };

    let board_height = grid.size() as u16 * 2 - 1;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints(
            [
                Constraint::Length(2), // score / timer header
                Constraint::Length(board_height),
                Constraint::Length(2), // current word
                Constraint::Min(2),    // found words
                Constraint::Length(1), // notice
                Constraint::Length(1), // help
            ]
            .as_ref(),
        )
        .split(area);

    render_header(app, chunks[0], buf);

    let selection = app.engine.selection();
    let selected: &[Coord] = selection.as_ref().map(|s| s.path.as_slice()).unwrap_or(&[]);

    let bold = Style::default().add_modifier(Modifier::BOLD);
    let mut board_lines: Vec<Line> = Vec::new();
    for (row_idx, row) in grid.rows().enumerate() {
        let mut spans: Vec<Span> = Vec::new();
        for (col_idx, &letter) in row.iter().enumerate() {
            let coord = Coord::new(row_idx, col_idx);
            let mut style = if selected.contains(&coord) {
                Style::default().patch(bold).fg(Color::Magenta)
            } else {
                Style::default().patch(bold).add_modifier(Modifier::DIM)
            };
            if coord == app.cursor {
                style = style.add_modifier(Modifier::UNDERLINED | Modifier::REVERSED);
            }
            spans.push(Span::styled(format!(" {} ", letter), style));
        }
        board_lines.push(Line::from(spans));
        if row_idx + 1 < grid.size() {
            board_lines.push(Line::from(""));
        }
    }
    Paragraph::new(board_lines)
        .alignment(Alignment::Center)
        .render(chunks[1], buf);

    let current = selection
        .map(|s| s.current_word)
        .filter(|w| !w.is_empty())
        .unwrap_or_else(|| "select letters to form a word".to_string());
    // size the box to the word so the underline hugs it
    let word_width = (current.width() as u16 + 4).min(chunks[2].width);
    let word_area = centered(chunks[2], word_width);
    Paragraph::new(Span::styled(
        current,
        Style::default().add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center)
    .render(word_area, buf);

    let found = app
        .engine
        .found_words()
        .iter()
        .map(|fw| format!("{} (+{})", fw.word, fw.points))
        .join("  ");
    Paragraph::new(Line::from(vec![
        Span::styled("found: ", Style::default().add_modifier(Modifier::DIM)),
        Span::raw(found),
    ]))
    .wrap(Wrap { trim: true })
    .render(chunks[3], buf);

    render_notice(app, chunks[4], buf);

    let help = if app.engine.is_paused() {
        "(p)aused - press p to resume"
    } else {
        "arrows move, enter selects, (c)lear, (p)ause, (n)ew game, (e)nd, (s)cores, esc quit"
    };
    Paragraph::new(Span::styled(
        help,
        Style::default().add_modifier(Modifier::ITALIC | Modifier::DIM),
    ))
    .alignment(Alignment::Center)
    .render(chunks[5], buf);
}

fn render_header(app: &App, area: Rect, buf: &mut Buffer) {
    let mut spans = vec![
        Span::styled(
            format!("score {}", app.engine.score()),
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("   "),
        Span::styled(
            format!("{}/{}", app.game_mode, app.difficulty).to_lowercase(),
            Style::default().add_modifier(Modifier::DIM),
        ),
    ];

    if let Some(timer) = &app.timer {
        let secs = timer.remaining_secs();
        let style = if secs <= 10 {
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        };
        spans.push(Span::raw("   "));
        spans.push(Span::styled(format!("{}:{:02}", secs / 60, secs % 60), style));
        if timer.is_paused() {
            spans.push(Span::styled(" (paused)", Style::default().fg(Color::Yellow)));
        }
    }

    Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .render(area, buf);
}

fn render_welcome(app: &App, area: Rect, buf: &mut Buffer) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)].as_ref())
        .split(area);

    let lines = vec![
        Line::from(Span::styled(
            "gridspell",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("find words in the letter grid to score points"),
        Line::from(""),
        Line::from(Span::styled(
            "press n to start, m to change mode, d to change difficulty, s for scores",
            Style::default().add_modifier(Modifier::DIM),
        )),
        Line::from(Span::styled(
            format!("{}/{}", app.game_mode, app.difficulty).to_lowercase(),
            Style::default().add_modifier(Modifier::DIM),
        )),
    ];

    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .render(chunks[0], buf);
    render_notice(app, chunks[1], buf);
}

fn render_results(app: &App, area: Rect, buf: &mut Buffer) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints(
            [
                Constraint::Length(4), // summary
                Constraint::Min(4),    // lifetime stats
                Constraint::Length(1), // notice
                Constraint::Length(1), // help
            ]
            .as_ref(),
        )
        .split(area);

    let mut lines = vec![Line::from(Span::styled(
        "game over",
        Style::default().add_modifier(Modifier::BOLD),
    ))];
    if let SessionState::Ended(summary) = app.engine.state() {
        lines.push(Line::from(format!(
            "final score {}  words {}  mode {}",
            summary.score,
            summary.words_found,
            summary.mode.to_string().to_lowercase()
        )));
    }
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .render(chunks[0], buf);

    if let Ok(stats) = app.engine.stats() {
        let rows = vec![
            Row::new(vec![
                Cell::from("games played"),
                Cell::from(stats.games_played.to_string()),
            ]),
            Row::new(vec![
                Cell::from("best score"),
                Cell::from(stats.best_score.to_string()),
            ]),
            Row::new(vec![
                Cell::from("average score"),
                Cell::from(stats.average_score.to_string()),
            ]),
            Row::new(vec![
                Cell::from("total words"),
                Cell::from(stats.total_words_found.to_string()),
            ]),
        ];
        Table::new(rows, [Constraint::Length(16), Constraint::Length(8)])
            .block(Block::default().borders(Borders::TOP).title("statistics"))
            .render(chunks[1], buf);
    }

    render_notice(app, chunks[2], buf);
    Paragraph::new(Span::styled(
        "(n)ew game, (s)cores, esc quit",
        Style::default().add_modifier(Modifier::ITALIC | Modifier::DIM),
    ))
    .alignment(Alignment::Center)
    .render(chunks[3], buf);
}

fn render_high_scores(app: &App, area: Rect, buf: &mut Buffer) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([Constraint::Min(4), Constraint::Length(1)].as_ref())
        .split(area);

    let rows: Vec<Row> = match app.engine.high_scores() {
        Ok(entries) => entries
            .iter()
            .enumerate()
            .map(|(i, e)| {
                let age_secs = (e.recorded_at - chrono::Local::now()).num_seconds();
                Row::new(vec![
                    Cell::from(format!("{}", i + 1)),
                    Cell::from(e.score.to_string()),
                    Cell::from(e.words_found.to_string()),
                    Cell::from(e.mode.to_string().to_lowercase()),
                    Cell::from(format!("{}", HumanTime::from(age_secs))),
                ])
            })
            .collect(),
        Err(_) => vec![Row::new(vec![Cell::from("high scores unavailable")])],
    };

    let header = Row::new(vec!["#", "score", "words", "mode", "when"])
        .style(Style::default().add_modifier(Modifier::BOLD));

    Table::new(
        rows,
        [
            Constraint::Length(3),
            Constraint::Length(7),
            Constraint::Length(7),
            Constraint::Length(10),
            Constraint::Min(12),
        ],
    )
    .header(header)
    .block(Block::default().borders(Borders::TOP).title("high scores"))
    .render(chunks[0], buf);

    Paragraph::new(Span::styled(
        "(b)ack, (n)ew game, esc quit",
        Style::default().add_modifier(Modifier::ITALIC | Modifier::DIM),
    ))
    .alignment(Alignment::Center)
    .render(chunks[1], buf);
}

fn render_notice(app: &App, area: Rect, buf: &mut Buffer) {
    if let Some(notice) = &app.notice {
        Paragraph::new(Span::styled(
            notice.as_str(),
            Style::default().fg(Color::Yellow),
        ))
        .alignment(Alignment::Center)
        .render(area, buf);
    }
}

fn centered(area: Rect, width: u16) -> Rect {
    let width = width.min(area.width);
    let x = area.x + (area.width - width) / 2;
    Rect::new(x, area.y, width, area.height)
}

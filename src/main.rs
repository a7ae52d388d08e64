use anyhow::Context;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};
use std::{
    io::{stdout, Stdout},
    time::{Duration, Instant},
};

use blockfall::config::{GameConfig, DEFAULT_HEIGHT, DEFAULT_TICK_MS, DEFAULT_WIDTH};
use blockfall::field::{Cell, Field};
use blockfall::game::{Game, Status};
use blockfall::input::action_for_key;
use blockfall::shapes;

// ============================================================================
// Command Line
// ============================================================================

#[derive(Parser, Debug)]
#[command(about = "Falling-block puzzle in the terminal")]
struct Opts {
    /// Field width in columns
    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    width: usize,
    /// Field height in rows
    #[arg(long, default_value_t = DEFAULT_HEIGHT)]
    height: usize,
    /// Milliseconds between gravity steps
    #[arg(long, default_value_t = DEFAULT_TICK_MS)]
    tick_ms: u64,
    /// Seed for piece selection; random when omitted
    #[arg(long)]
    seed: Option<u64>,
}

// ============================================================================
// Visual Constants
// ============================================================================

const CELL_WIDTH: u16 = 2;
const BLOCK_CHAR: &str = "██";
const EMPTY_CHAR: &str = "  ";

fn cell_color(color: shapes::Color) -> Color {
    Color::Rgb(color.r, color.g, color.b)
}

// ============================================================================
// Rendering
// ============================================================================

fn render(frame: &mut Frame, game: &Game) {
    let area = frame.size();

    render_game(frame, game, area);
    match game.state().status() {
        Status::Active => {}
        Status::Paused => render_paused(frame, game, area),
        Status::GameOver => render_game_over(frame, game, area),
    }
}

fn render_game(frame: &mut Frame, game: &Game, area: Rect) {
    let config = game.state().config();
    let grid_display_width = (config.width as u16 * CELL_WIDTH) + 2;
    let grid_display_height = config.height as u16 + 2;
    let side_width = 14;
    let total_width = grid_display_width + side_width + 2;
    let total_height = grid_display_height + 3;

    let main_area = centered_rect(total_width, total_height, area);

    let vertical = Layout::vertical([
        Constraint::Length(grid_display_height),
        Constraint::Fill(1),
    ])
    .split(main_area);

    let game_row = vertical[0];

    // Layout: [Field][Next / Score]
    let horizontal = Layout::horizontal([
        Constraint::Length(grid_display_width),
        Constraint::Length(side_width),
    ])
    .split(game_row);

    let side = Layout::vertical([Constraint::Length(7), Constraint::Fill(1)]).split(horizontal[1]);

    render_field(frame, &game.display_field(), horizontal[0]);
    render_next(frame, game, side[0]);
    render_info(frame, game, side[1]);

    let controls_area = Rect {
        x: area.x,
        y: game_row.y + game_row.height,
        width: area.width,
        height: 2,
    };

    if controls_area.y + 1 < area.height {
        let controls = Paragraph::new(vec![Line::from(
            "←→: Move | ↓: Drop | ↑: Rotate | Space: Hard drop | P: Pause | R: Restart | Q/ESC: Quit",
        )])
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(controls, controls_area);
    }
}

fn render_field(frame: &mut Frame, field: &Field, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Blockfall ")
        .title_alignment(Alignment::Center);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines: Vec<Line> = field
        .rows()
        .map(|row| {
            let spans: Vec<Span> = row
                .iter()
                .map(|cell| match cell {
                    Cell::Empty => Span::raw(EMPTY_CHAR),
                    Cell::Filled(color) => {
                        Span::styled(BLOCK_CHAR, Style::default().fg(cell_color(*color)))
                    }
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_next(frame: &mut Frame, game: &Game, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Next ")
        .title_alignment(Alignment::Center);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let piece = game.state().next_piece();
    let style = Style::default().fg(cell_color(piece.color));

    let lines: Vec<Line> = piece
        .bitmap
        .rows()
        .map(|row| {
            let mut spans = vec![Span::raw(" ")];
            spans.extend(row.into_iter().map(|filled| {
                if filled {
                    Span::styled(BLOCK_CHAR, style)
                } else {
                    Span::raw(EMPTY_CHAR)
                }
            }));
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_info(frame: &mut Frame, game: &Game, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Info ")
        .title_alignment(Alignment::Center);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let state = game.state();
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled("Score", Style::default().fg(Color::Yellow))),
        Line::from(format!("{}", state.score())),
        Line::from(""),
        Line::from(Span::styled("Lines", Style::default().fg(Color::Cyan))),
        Line::from(format!("{}", state.lines_cleared())),
        Line::from(""),
        Line::from(Span::styled("Pieces", Style::default().fg(Color::Magenta))),
        Line::from(format!("{}", state.pieces_locked())),
    ];

    let paragraph = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(paragraph, inner);
}

/// Stats block shared by the pause and game-over overlays.
fn session_lines(game: &Game) -> Vec<Line<'static>> {
    let state = game.state();
    [
        ("Score", state.score()),
        ("Lines", state.lines_cleared()),
        ("Pieces", state.pieces_locked()),
    ]
    .into_iter()
    .map(|(label, value)| Line::from(format!("{label:<7}{value:>7}")))
    .collect()
}

fn render_overlay(frame: &mut Frame, title: &str, mut body: Vec<Line<'static>>, area: Rect) {
    body.insert(0, Line::from(""));
    let height = body.len() as u16 + 2;
    let popup_area = centered_rect(24, height, area);

    let overlay = Paragraph::new(body).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" {title} "))
            .title_alignment(Alignment::Center)
            .style(Style::default().bg(Color::Black)),
    );
    frame.render_widget(overlay, popup_area);
}

fn render_game_over(frame: &mut Frame, game: &Game, area: Rect) {
    let hint = Style::default().fg(Color::DarkGray);
    let mut body = vec![
        Line::from(Span::styled("STACK REACHED THE TOP", Style::default().fg(Color::Red))),
        Line::from(""),
    ];
    body.extend(session_lines(game));
    body.push(Line::from(""));
    body.push(Line::from(Span::styled("R: new game  Q: quit", hint)));

    render_overlay(frame, "Game Over", body, area);
}

fn render_paused(frame: &mut Frame, game: &Game, area: Rect) {
    let hint = Style::default().fg(Color::DarkGray);
    let next = format!("{:?}", game.state().next_piece().kind);
    let mut body = session_lines(game);
    body.push(Line::from(format!("{:<7}{next:>7}", "Next")));
    body.push(Line::from(""));
    body.push(Line::from(Span::styled("P: resume  Q: quit", hint)));

    render_overlay(frame, "Paused", body, area);
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let horizontal = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(width.min(area.width)),
        Constraint::Fill(1),
    ])
    .split(area);

    let vertical = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height.min(area.height)),
        Constraint::Fill(1),
    ])
    .split(horizontal[1]);

    vertical[1]
}

// ============================================================================
// Main Loop
// ============================================================================

fn run(terminal: &mut Terminal<CrosstermBackend<Stdout>>, mut game: Game) -> anyhow::Result<()> {
    let tick_duration = game.state().config().tick_interval;
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|frame| render(frame, &game))?;

        let timeout = tick_duration
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => break,
                        KeyCode::Char('r') | KeyCode::Char('R') => game.reset(),
                        code => {
                            if let Some(action) = action_for_key(code) {
                                game.apply(action);
                            }
                        }
                    }
                }
            }
        }

        // Gravity; Game::tick is a no-op unless the game is active
        if last_tick.elapsed() >= tick_duration {
            game.tick();
            last_tick = Instant::now();
        }

        // Drain events so the buffer stays bounded
        game.take_events();
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    let opts = Opts::parse();
    let config = GameConfig::new(opts.width, opts.height, Duration::from_millis(opts.tick_ms))
        .context("invalid game configuration")?;
    let game = match opts.seed {
        Some(seed) => Game::with_seed(config, seed),
        None => Game::new(config),
    };

    enable_raw_mode().context("failed to enable raw mode")?;
    let result = stdout()
        .execute(EnterAlternateScreen)
        .map_err(anyhow::Error::from)
        .and_then(|_| {
            let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
            run(&mut terminal, game)
        });

    // Restore terminal before reporting any error
    let restored = disable_raw_mode()
        .and_then(|()| stdout().execute(LeaveAlternateScreen).map(|_| ()));

    result?;
    restored.context("failed to restore terminal")
}

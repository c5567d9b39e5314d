mod app;
mod config;
mod curriculum;
mod event;
mod generator;
mod keyboard;
mod session;
mod store;
mod ui;

use std::io;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::widgets::Paragraph;

use app::{App, AppScreen};
use config::Config;
use event::{AppEvent, EventHandler};
use ui::keyboard_diagram::KeyboardDiagram;
use ui::results::ResultsPanel;
use ui::stats_bar::StatsBar;
use ui::typing_area::TypingArea;

#[derive(Parser)]
#[command(
    name = "typedrill",
    version,
    about = "Terminal typing tutor with curriculum drills and multi-source practice content"
)]
struct Cli {
    #[arg(short, long, help = "Practice mode (curriculum, sentences, code)")]
    mode: Option<String>,

    #[arg(short, long, help = "Keyboard layout (qwerty, dvorak, colemak)")]
    layout: Option<String>,

    #[arg(short, long, help = "Session duration in seconds")]
    duration: Option<u64>,

    #[arg(long, help = "Soft mode: mistakes advance instead of blocking")]
    soft: bool,

    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = Config::load().unwrap_or_default();
    if let Some(mode) = cli.mode {
        config.practice_mode = mode;
    }
    if let Some(layout) = cli.layout {
        config.keyboard_layout = layout;
    }
    if let Some(duration) = cli.duration {
        config.drill_duration_secs = duration;
    }
    if cli.soft {
        config.hard_mode = false;
    }
    if let Some(theme) = cli.theme {
        config.theme = theme;
    }

    let mut app = App::new(config);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(100));

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => app.handle_key(key),
            AppEvent::Tick => app.on_tick(),
            AppEvent::Resize(_, _) => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();

    match app.screen {
        AppScreen::Typing => render_typing(frame, app, area),
        AppScreen::Results => render_results(frame, app, area),
    }
}

fn render_typing(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    let keyboard_height = if app.show_keyboard { 7 } else { 0 };
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(5),
            Constraint::Length(keyboard_height),
            Constraint::Length(1),
        ])
        .split(area);

    let stats = app.engine.tick(Instant::now());
    frame.render_widget(StatsBar::new(&app.engine, stats, &app.theme), layout[0]);

    if let Some(chunk) = app.engine.chunk() {
        frame.render_widget(
            TypingArea::new(chunk, app.engine.typed(), &app.theme),
            layout[1],
        );
    }

    if app.show_keyboard {
        frame.render_widget(
            KeyboardDiagram::new(
                &app.mapping,
                app.engine.expected_key(),
                app.engine.expected_char(),
                &app.theme,
            ),
            layout[2],
        );
    }

    let footer = Paragraph::new(Line::from(
        "F2 keyboard   F6 mode   ESC quit",
    ))
    .style(Style::default().fg(app.theme.colors.text_pending()));
    frame.render_widget(footer, layout[3]);
}

fn render_results(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    let Some(result) = &app.last_result else {
        return;
    };
    let centered = center_rect(area, 60, 12);
    frame.render_widget(ResultsPanel::new(result, &app.theme), centered);
}

fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

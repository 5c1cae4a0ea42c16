use std::fs::{self, OpenOptions};
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::event::{
    DisableBracketedPaste, EnableBracketedPaste, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph, Wrap};
use tracing::info;
use tracing_subscriber::EnvFilter;

use eqlab::app::{App, AppScreen, SettingsItem};
use eqlab::config::Config;
use eqlab::event::{AppEvent, EventHandler};
use eqlab::session::input::InputOp;
use eqlab::ui::components::equation_banner::EquationBanner;
use eqlab::ui::components::history_panel::HistoryPanel;
use eqlab::ui::components::keypad_panel::KeypadPanel;
use eqlab::ui::components::settings_menu::{SettingsMenu, SettingsRow};
use eqlab::ui::components::term_board::TermBoard;
use eqlab::ui::layout::{PracticeLayout, centered_rect, pack_hint_lines};
use eqlab::ui::theme::Theme;

#[derive(Parser)]
#[command(name = "eqlab", version, about = "Solve linear equations by moving term cards")]
struct Cli {
    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(short, long, help = "Interface language (en, ja)")]
    locale: Option<String>,

    #[arg(long, help = "Seed for reproducible equations")]
    seed: Option<u64>,

    #[arg(long, help = "Stay on a solved equation until [n] is pressed")]
    no_keep_practicing: bool,

    #[arg(long, help = "Write logs here instead of the data directory")]
    log_file: Option<PathBuf>,
}

/// Log to a file; the terminal belongs to the UI. Filter with `EQLAB_LOG`.
fn init_logging(path: Option<PathBuf>) {
    let path = path.or_else(|| dirs::data_dir().map(|d| d.join("eqlab").join("eqlab.log")));
    let Some(path) = path else {
        return;
    };
    if let Some(parent) = path.parent()
        && fs::create_dir_all(parent).is_err()
    {
        return;
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };
    let filter = EnvFilter::try_from_env("EQLAB_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.clone());

    let mut config = Config::load().unwrap_or_default();
    if let Some(theme) = cli.theme {
        config.theme = theme;
    }
    if let Some(locale) = cli.locale {
        config.locale = locale;
    }
    if cli.no_keep_practicing {
        config.keep_practicing = false;
    }
    config.validate();
    rust_i18n::set_locale(&config.locale);
    info!(locale = %config.locale, theme = %config.theme, seed = ?cli.seed, "starting");

    let mut app = App::new(config, cli.seed, Instant::now());

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(100));

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
    }
    info!(solved = app.session.solved_count(), "exiting");

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app, Instant::now()))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key, Instant::now()),
            AppEvent::Paste(text) => {
                if app.screen == AppScreen::Practice {
                    app.paste(&text, Instant::now());
                }
            }
            AppEvent::Tick => app.tick(Instant::now()),
            AppEvent::Resize => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent, now: Instant) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.screen {
        AppScreen::Practice => handle_practice_key(app, key, now),
        AppScreen::Settings => handle_settings_key(app, key),
    }
}

fn handle_practice_key(app: &mut App, key: KeyEvent, now: Instant) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::Enter | KeyCode::Char(' ') => app.pick_or_drop(now),
        KeyCode::Right | KeyCode::Char('l') => app.cycle_target(true),
        KeyCode::Left | KeyCode::Char('h') => app.cycle_target(false),
        KeyCode::Esc => app.cancel_drag(now),
        KeyCode::Char('s') => app.toggle_selected_sign(now),
        KeyCode::Char('n') => app.next_equation(now),
        KeyCode::Char('r') => app.reset_round(),
        KeyCode::Char('p') => app.toggle_keep_practicing(),
        KeyCode::Char('o') => app.go_to_settings(),
        KeyCode::Char('-') => app.keypad(&InputOp::ToggleSign, now),
        KeyCode::Backspace => app.keypad(&InputOp::Backspace, now),
        KeyCode::Delete => app.keypad(&InputOp::Clear, now),
        KeyCode::Char(ch) if ch.is_ascii_digit() || ch == 'x' || ch == 'X' => {
            app.keypad(&InputOp::Key(ch), now)
        }
        _ => {}
    }
}

fn handle_settings_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('o') | KeyCode::Char('q') => app.go_to_practice(),
        KeyCode::Down | KeyCode::Char('j') => app.settings_next(),
        KeyCode::Up | KeyCode::Char('k') => app.settings_prev(),
        KeyCode::Enter
        | KeyCode::Char(' ')
        | KeyCode::Left
        | KeyCode::Right
        | KeyCode::Char('h')
        | KeyCode::Char('l') => app.toggle_selected_setting(),
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App, now: Instant) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    render_practice(frame, app, now);
    if app.screen == AppScreen::Settings {
        render_settings(frame, app);
    }
}

fn render_practice(frame: &mut ratatui::Frame, app: &App, now: Instant) {
    let area = frame.area();
    let theme: &Theme = app.theme;
    let colors = &theme.colors;
    let session = &app.session;
    let round = session.round();
    let layout = PracticeLayout::new(area);

    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " eqlab ",
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            app.header_info(),
            Style::default().fg(colors.muted()).bg(colors.header_bg()),
        ),
    ]))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, layout.header);

    frame.render_widget(
        EquationBanner {
            equation: round.equation(),
            stage: round.stage(),
            highlighted: session.is_highlighted(now),
            theme,
        },
        layout.banner,
    );

    let dragging = round.active_drag().is_some();
    frame.render_widget(
        TermBoard {
            round,
            selected: app.selected_card(),
            drop_target: dragging.then_some(app.drop_target),
            color_by_status: app.preferences.highlight_sign_hint,
            theme,
        },
        layout.board,
    );

    if let Some(hint_area) = layout.hint {
        let message = match app.status_text() {
            Some(status) => Some((status, colors.success())),
            None => app.hint_text().map(|hint| (hint, colors.fg())),
        };
        if let Some((text, color)) = message {
            let hint = Paragraph::new(Line::from(Span::styled(text, Style::default().fg(color))))
                .wrap(Wrap { trim: true })
                .block(Block::bordered().border_style(Style::default().fg(colors.border())));
            frame.render_widget(hint, hint_area);
        }
    }

    frame.render_widget(KeypadPanel { round, theme }, layout.keypad);

    if let Some(sidebar) = layout.sidebar {
        frame.render_widget(
            HistoryPanel {
                history: round.history(),
                theme,
            },
            sidebar,
        );
    }

    let hints = app.footer_hints();
    let hint_refs: Vec<&str> = hints.iter().map(String::as_str).collect();
    let footer_lines: Vec<Line> = pack_hint_lines(&hint_refs, layout.footer.width as usize)
        .into_iter()
        .map(|line| Line::from(Span::styled(line, Style::default().fg(colors.muted()))))
        .collect();
    frame.render_widget(Paragraph::new(footer_lines), layout.footer);
}

fn render_settings(frame: &mut ratatui::Frame, app: &App) {
    let area = centered_rect(50, 50, frame.area());
    let menu = SettingsMenu {
        rows: SettingsItem::ALL
            .iter()
            .map(|item| SettingsRow {
                label: item.label(),
                enabled: app.setting_value(*item),
            })
            .collect(),
        selected: app.settings_selected,
        theme: app.theme,
    };
    frame.render_widget(Clear, area);
    frame.render_widget(&menu, area);
}

//! Stargaze CLI: terminal viewer for the astronomy picture of the day

use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use clap::{Parser, Subcommand};

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use ratatui::widgets::*;
use tracing_subscriber::EnvFilter;

use stargaze::catalog::CatalogStore;
use stargaze::favorites::FavoritesManager;
use stargaze::item::{Item, MediaType};
use stargaze_app::app::{AppCommand, Card, GallerySnapshot, GalleryController, View};
use stargaze_app::config::network::READ_TIMEOUT_SECS;
use stargaze_app::config::ui::EMPTY_FAVORITES;
use stargaze_app::data::{config_dir, FileStore, Settings};
use stargaze_app::feed::ApodFeed;

#[derive(Parser)]
#[command(name = "stargaze", about = "Astronomy picture of the day viewer", version)]
struct Cli {
    /// API key (overrides settings and STARGAZE_API_KEY)
    #[arg(long)]
    api_key: Option<String>,

    /// Items to fetch per batch (1-100)
    #[arg(long)]
    count: Option<u32>,

    /// Directory for favorites, settings and the log file
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Log level filter (RUST_LOG takes precedence)
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Print saved favorites and exit
    Favorites,
    /// Fetch one batch, print it and exit
    Fetch,
}

/// Frontend-only state: what is selected on screen
struct App {
    selected: usize,
    last_view: View,
}

impl App {
    fn new(view: View) -> Self {
        Self {
            selected: 0,
            last_view: view,
        }
    }

    /// Keep the selection valid; back to the top on a view switch
    fn sync(&mut self, snapshot: &GallerySnapshot) {
        if snapshot.view != self.last_view {
            self.last_view = snapshot.view;
            self.selected = 0;
        }
        if self.selected >= snapshot.cards.len() {
            self.selected = snapshot.cards.len().saturating_sub(1);
        }
    }

    fn selected_card<'a>(&self, snapshot: &'a GallerySnapshot) -> Option<&'a Card> {
        snapshot.cards.get(self.selected)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let data_dir = match cli.data_dir.clone() {
        Some(dir) => dir,
        None => config_dir()?,
    };

    let mut settings = Settings::load_from(&Settings::path_in(&data_dir))?;
    if let Some(count) = cli.count {
        settings.set_count(count);
    }
    let api_key = cli
        .api_key
        .clone()
        .unwrap_or_else(|| settings.effective_api_key());

    let interactive = cli.command.is_none();
    let log_file = if interactive {
        Some(data_dir.join("stargaze.log"))
    } else {
        None
    };
    init_tracing(&cli.log_level, log_file.as_deref());
    tracing::info!(data_dir = %data_dir.display(), count = settings.count, "starting");

    let store = FileStore::new(&data_dir);

    match cli.command {
        Some(Command::Favorites) => print_favorites(store),
        Some(Command::Fetch) => {
            let feed = Arc::new(ApodFeed::new(api_key)?);
            let controller = GalleryController::new(store, feed, settings.count, View::Results);
            print_fetch(controller)
        }
        None => {
            let feed = Arc::new(ApodFeed::new(api_key)?);
            let controller =
                GalleryController::new(store, feed, settings.count, settings.start_view);
            run_tui(controller)
        }
    }
}

/// Logs go to stderr, or to a file while the TUI owns the terminal
fn init_tracing(level: &str, log_file: Option<&Path>) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let file = log_file.and_then(|path| {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).ok()?;
        }
        OpenOptions::new().create(true).append(true).open(path).ok()
    });

    match file {
        Some(file) => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init(),
        None => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(io::stderr)
            .init(),
    }
}

fn print_favorites(store: FileStore) -> Result<(), Box<dyn std::error::Error>> {
    let (mut favorites, warning) = FavoritesManager::open(store, CatalogStore::new());
    if let Some(warning) = warning {
        eprintln!("Warning: {}", warning);
    }

    let items = favorites.list();
    if items.is_empty() {
        println!("{}", EMPTY_FAVORITES);
        return Ok(());
    }
    for item in &items {
        print_item(item, true);
    }
    Ok(())
}

fn print_fetch(mut controller: GalleryController<FileStore>) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(warning) = &controller.snapshot().warning {
        eprintln!("Warning: {}", warning);
    }

    controller.start();
    if !controller.wait_for_fetch(Duration::from_secs(READ_TIMEOUT_SECS + 5)) {
        return Err("fetch timed out".into());
    }

    let snapshot = controller.snapshot();
    if snapshot.is_error {
        return Err(snapshot.status_text.to_string().into());
    }
    for card in &snapshot.cards {
        print_item(&card.item, card.favorited);
    }
    Ok(())
}

fn print_item(item: &Item, favorited: bool) {
    let heart = if favorited { "♥" } else { "♡" };
    println!("{} {}  [{}]  {}", heart, item.title, item.media_type, item.credit());
    println!("    {}", item.display_url());
}

fn run_tui(mut controller: GalleryController<FileStore>) -> Result<(), Box<dyn std::error::Error>> {
    let mut app = App::new(controller.snapshot().view);
    controller.start();

    terminal::enable_raw_mode()?;
    io::stdout().execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, &mut controller, &mut app);

    // Restore terminal
    terminal::disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;

    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    controller: &mut GalleryController<FileStore>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    let tick_rate = Duration::from_millis(100);

    while controller.is_running() {
        controller.pump();
        controller.tick(Instant::now());
        app.sync(controller.snapshot());

        terminal.draw(|f| draw_ui(f, controller.snapshot(), app))?;

        if !event::poll(tick_rate)? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        let snapshot = controller.snapshot();
        let command = match key.code {
            KeyCode::Char('q') | KeyCode::Esc => Some(AppCommand::Shutdown),
            KeyCode::Down | KeyCode::Char('j') => {
                if app.selected + 1 < snapshot.cards.len() {
                    app.selected += 1;
                }
                None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                app.selected = app.selected.saturating_sub(1);
                None
            }
            KeyCode::Char('f') | KeyCode::Char(' ') | KeyCode::Enter => app
                .selected_card(snapshot)
                .map(|card| AppCommand::Toggle(card.item.id().to_string())),
            KeyCode::Tab => Some(AppCommand::ShowView(snapshot.view.toggled())),
            KeyCode::Char('1') => Some(AppCommand::ShowView(View::Results)),
            KeyCode::Char('2') => Some(AppCommand::ShowView(View::Favorites)),
            KeyCode::Char('r') => Some(AppCommand::Fetch),
            KeyCode::Char('u') => Some(AppCommand::Refresh),
            _ => None,
        };

        if let Some(command) = command {
            controller.sender().send(command)?;
        }
    }

    Ok(())
}

fn draw_ui(f: &mut Frame, snapshot: &GallerySnapshot, app: &App) {
    let area = f.area();

    let outer = Block::default()
        .title(format!(" Stargaze v{} ", env!("CARGO_PKG_VERSION")))
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded);
    let inner = outer.inner(area);
    f.render_widget(outer, area);

    let chunks = Layout::vertical([
        Constraint::Length(1), // nav + banner
        Constraint::Min(5),    // cards
        Constraint::Length(1), // status
        Constraint::Length(1), // help bar
    ])
    .split(inner);

    draw_nav(f, snapshot, chunks[0]);
    draw_body(f, snapshot, app, chunks[1]);
    draw_status(f, snapshot, chunks[2]);
    draw_help(f, chunks[3]);
}

fn draw_nav(f: &mut Frame, snapshot: &GallerySnapshot, area: Rect) {
    let tab = |view: View, label: String| {
        if snapshot.view == view {
            Span::styled(label, Style::default().fg(Color::Cyan).bold())
        } else {
            Span::styled(label, Style::default().fg(Color::DarkGray))
        }
    };

    let mut spans = vec![
        Span::raw("  "),
        tab(View::Results, View::Results.label().to_string()),
        Span::styled("  |  ", Style::default().fg(Color::DarkGray)),
        tab(
            View::Favorites,
            format!("{} ({})", View::Favorites.label(), snapshot.favorites_count),
        ),
    ];

    if let Some(banner) = &snapshot.banner {
        spans.push(Span::raw("    "));
        spans.push(Span::styled(
            format!(" {} ", banner.message),
            Style::default().fg(Color::Black).bg(Color::Green).bold(),
        ));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_body(f: &mut Frame, snapshot: &GallerySnapshot, app: &App, area: Rect) {
    if snapshot.cards.is_empty() {
        let message = if let Some(empty) = snapshot.empty_message {
            empty
        } else if snapshot.loading {
            "Loading..."
        } else {
            "Nothing fetched yet. Press 'r' to fetch."
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::DarkGray));
        let text = Paragraph::new(Line::from(Span::styled(
            message,
            Style::default().fg(Color::Yellow),
        )))
        .alignment(Alignment::Center)
        .block(block);
        f.render_widget(text, area);
        return;
    }

    let cols = Layout::horizontal([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    draw_card_list(f, snapshot, app, cols[0]);
    if let Some(card) = app.selected_card(snapshot) {
        draw_card_detail(f, card, cols[1]);
    }
}

fn draw_card_list(f: &mut Frame, snapshot: &GallerySnapshot, app: &App, area: Rect) {
    let title = if snapshot.loading {
        format!(" {} (loading...) ", snapshot.view.label())
    } else {
        format!(" {} ", snapshot.view.label())
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::DarkGray));

    let items: Vec<ListItem> = snapshot
        .cards
        .iter()
        .map(|card| {
            let heart = if card.favorited {
                Span::styled("♥ ", Style::default().fg(Color::Red))
            } else {
                Span::styled("♡ ", Style::default().fg(Color::DarkGray))
            };
            let mut spans = vec![
                heart,
                Span::styled(card.item.title.clone(), Style::default().fg(Color::White).bold()),
                Span::styled(format!("  {}", card.item.date), Style::default().fg(Color::DarkGray)),
            ];
            if card.item.media_type == MediaType::Video {
                spans.push(Span::styled("  video", Style::default().fg(Color::Magenta)));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("> ");
    let mut state = ListState::default().with_selected(Some(app.selected));
    f.render_stateful_widget(list, area, &mut state);
}

fn draw_card_detail(f: &mut Frame, card: &Card, area: Rect) {
    let item = &card.item;
    let block = Block::default()
        .title(" Details ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::DarkGray));

    let link_label = match (&item.media_type, &item.hdurl) {
        (MediaType::Image, Some(_)) => "View Full Image: ",
        (MediaType::Image, None) => "Image: ",
        (MediaType::Video, _) => "Video: ",
    };
    let heart_hint = if card.favorited {
        Span::styled("♥ Remove from Favorites", Style::default().fg(Color::Red))
    } else {
        Span::styled("♡ Add to Favorites", Style::default().fg(Color::DarkGray))
    };

    let text = vec![
        Line::from(Span::styled(item.title.clone(), Style::default().fg(Color::White).bold())),
        Line::from(Span::styled(item.credit(), Style::default().fg(Color::DarkGray))),
        Line::from(vec![
            Span::styled(link_label, Style::default().fg(Color::DarkGray)),
            Span::styled(item.display_url().to_string(), Style::default().fg(Color::Cyan)),
        ]),
        Line::from(heart_hint),
        Line::from(""),
        Line::from(item.explanation.clone()),
    ];

    f.render_widget(
        Paragraph::new(text).block(block).wrap(Wrap { trim: true }),
        area,
    );
}

fn draw_status(f: &mut Frame, snapshot: &GallerySnapshot, area: Rect) {
    let color = if snapshot.is_error {
        Color::Red
    } else if snapshot.loading {
        Color::Yellow
    } else {
        Color::Green
    };
    let mut spans = vec![
        Span::styled("  Status: ", Style::default().fg(Color::DarkGray)),
        Span::styled(snapshot.status_text.to_string(), Style::default().fg(color)),
    ];
    if let Some(warning) = &snapshot.warning {
        spans.push(Span::styled("  |  ", Style::default().fg(Color::DarkGray)));
        spans.push(Span::styled(
            warning.to_string(),
            Style::default().fg(Color::Red).bold(),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_help(f: &mut Frame, area: Rect) {
    let key = |k: &'static str| Span::styled(k, Style::default().fg(Color::Yellow));
    let help = Line::from(vec![
        Span::raw("  "),
        key("'q' "),
        Span::raw("quit  |  "),
        key("'j'/'k' "),
        Span::raw("move  |  "),
        key("'f' "),
        Span::raw("favorite  |  "),
        key("tab "),
        Span::raw("view  |  "),
        key("'r' "),
        Span::raw("fetch  |  "),
        key("'u' "),
        Span::raw("reload favorites"),
    ]);

    f.render_widget(Paragraph::new(help).alignment(Alignment::Left), area);
}

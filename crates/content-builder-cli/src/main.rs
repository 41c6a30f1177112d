mod app;

use anyhow::{Context, Result};
use app::{App, GUTTER, outline};
use content_builder_config::Config;
use content_builder_engine::io;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use std::{
    env,
    fs::File,
    io::{Stdout, stdout},
    path::PathBuf,
    process,
};

/// Logging goes to a file because the TUI owns the terminal.
fn init_logging() -> Result<()> {
    let Ok(log_path) = env::var("CONTENT_BUILDER_LOG") else {
        return Ok(());
    };
    let file = File::create(&log_path)
        .with_context(|| format!("Failed to create log file {log_path}"))?;
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Debug)
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn usage(program: &str) -> ! {
    eprintln!("Usage: {program} [--print] [document-path]");
    eprintln!(
        "Or set default_document in {}",
        Config::config_path().display()
    );
    process::exit(1);
}

fn main() -> Result<()> {
    init_logging()?;
    log::info!("content-builder starting up");

    let args: Vec<String> = env::args().collect();
    let program = args.first().map_or("content-builder-cli", String::as_str);
    let print = args.iter().skip(1).any(|arg| arg == "--print");
    let positional: Vec<&String> = args
        .iter()
        .skip(1)
        .filter(|arg| !arg.starts_with("--"))
        .collect();

    let config = match Config::load() {
        Ok(config) => config.unwrap_or_default(),
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            process::exit(1);
        }
    };

    let path = match positional.as_slice() {
        [path] => PathBuf::from(path),
        [] => match &config.default_document {
            Some(path) => path.clone(),
            None => usage(program),
        },
        _ => usage(program),
    };

    let document = match io::read_document(&path) {
        Ok(document) => document,
        Err(e) => {
            eprintln!("Error: Cannot open '{}': {e}", path.display());
            process::exit(1);
        }
    };

    if print {
        for line in outline(&document) {
            println!("{line}");
        }
        return Ok(());
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(document, path, &config);

    // Main loop
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        match event::read()? {
            Event::Key(key) => {
                if app.handle_key(key.code) {
                    return Ok(());
                }
            }
            Event::Mouse(mouse) => app.handle_mouse(mouse),
            _ => {}
        }
    }
}

fn document_lines(app: &App) -> Vec<Line<'static>> {
    let blocks = app.rendered_blocks();
    let source = app.editor().session().source();
    let indicator = app.indicator_row();

    let total_rows = blocks
        .last()
        .map_or(0, |block| block.rows().end)
        .max(indicator.map_or(0, |row| row + 1));
    let mut lines: Vec<Line<'static>> = vec![Line::default(); usize::from(total_rows)];

    for block in &blocks {
        let dragged = source
            .as_ref()
            .is_some_and(|range| range.start == block.start && range.end == block.end);
        let text_style = if dragged {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };
        for (i, text) in block.lines.iter().enumerate() {
            let handle = if i == 0 { "⠿ " } else { "  " };
            let row = usize::from(block.first_row) + i;
            if let Some(line) = lines.get_mut(row) {
                *line = Line::from(vec![
                    Span::styled(handle, Style::default().fg(Color::DarkGray)),
                    Span::styled(text.clone(), text_style),
                ]);
            }
        }
    }

    if let Some(row) = indicator
        && let Some(line) = lines.get_mut(usize::from(row))
    {
        let marker = Span::styled(
            "▶".to_string() + &" ".repeat(usize::from(GUTTER) - 1),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );
        let rest: Vec<Span<'static>> = line.spans.iter().skip(1).cloned().collect();
        let mut spans = vec![marker];
        if rest.is_empty() {
            spans.push(Span::styled("────────", Style::default().fg(Color::Yellow)));
        } else {
            spans.extend(rest);
        }
        *line = Line::from(spans);
    }

    lines
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(f.area());

    let title = format!(
        "{}{}",
        app.path().display(),
        if app.dirty { " *" } else { "" }
    );
    let block = Block::default().borders(Borders::ALL).title(title);
    app.set_content_area(block.inner(chunks[0]));

    let content = Paragraph::new(document_lines(app)).block(block);
    f.render_widget(content, chunks[0]);

    let status = Paragraph::new(Line::from(Span::styled(
        app.status.clone(),
        Style::default().fg(Color::Cyan),
    )));
    f.render_widget(status, chunks[1]);

    let help_text = Line::from(vec![
        Span::raw("q: Quit | "),
        Span::raw("drag ⠿: Move block | "),
        Span::raw("Esc: Cancel drag | "),
        Span::raw("u: Undo | r: Redo | s: Save"),
    ]);
    f.render_widget(Paragraph::new(help_text), chunks[2]);
}

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Tabs, Wrap};

use studybuddy_core::{ExtractionStatus, TaskKind};

use crate::app::App;
use crate::view::{results, spinner_char, truncate};

/// Render the main screen. Returns the area used by the results pane.
pub fn render_in(f: &mut Frame, app: &App, area: Rect) -> Rect {
    let chunks = Layout::vertical([
        Constraint::Length(1), // header
        Constraint::Length(3), // document
        Constraint::Length(1), // triggers
        Constraint::Length(1), // error / notice
        Constraint::Min(5),    // results
        Constraint::Length(1), // footer
    ])
    .split(area);

    render_header(f, app, chunks[0]);
    render_document(f, app, chunks[1]);
    render_triggers(f, app, chunks[2]);
    render_status(f, app, chunks[3]);
    render_results(f, app, chunks[4]);

    let footer = Line::from(Span::styled(
        " o:open file  1/2/3:generate  Tab:next tab  j/k:scroll  ?:help  q:quit",
        app.theme.footer_style(),
    ));
    f.render_widget(Paragraph::new(footer), chunks[5]);

    chunks[4]
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let header = Line::from(vec![
        Span::styled(" AI Study Buddy ", theme.header_style()),
        Span::styled(
            " Summaries, flashcards and quizzes from your documents",
            Style::default().fg(theme.dim),
        ),
    ]);
    f.render_widget(Paragraph::new(header), area);
}

fn render_document(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let session = &app.session;
    let status = session.extraction();
    let color = theme.extraction_color(status);
    let width = area.width.saturating_sub(4) as usize;

    let line = match (session.file_name(), status) {
        (None, _) => Line::from(Span::styled(
            "No file selected. Press o to open a .pdf, .xlsx, .xls, .csv, .txt or .md file.",
            Style::default().fg(theme.dim),
        )),
        (Some(name), ExtractionStatus::Processing) => Line::from(vec![
            Span::styled(
                format!("{} Processing file... ", spinner_char(app.tick)),
                Style::default().fg(theme.spinner).add_modifier(Modifier::BOLD),
            ),
            Span::styled(truncate(name, width), Style::default().fg(theme.text)),
        ]),
        (Some(name), ExtractionStatus::Done) => Line::from(vec![
            Span::styled("\u{2713} ", Style::default().fg(color)),
            Span::styled(
                truncate(name, width.saturating_sub(24)),
                Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  {} characters extracted", session.text().chars().count()),
                Style::default().fg(theme.dim),
            ),
        ]),
        (Some(name), ExtractionStatus::Error) => Line::from(vec![
            Span::styled("\u{2717} ", Style::default().fg(color)),
            Span::styled(truncate(name, width), Style::default().fg(theme.text)),
        ]),
        (Some(name), ExtractionStatus::Idle) => Line::from(Span::styled(
            truncate(name, width),
            Style::default().fg(theme.dim),
        )),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style())
        .title(" Document ");
    f.render_widget(Paragraph::new(line).block(block), area);
}

fn render_triggers(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let session = &app.session;
    let enabled = session.can_generate().is_ok();

    let mut spans = vec![Span::raw(" ")];
    for (i, task) in TaskKind::all().into_iter().enumerate() {
        let label = if session.loading() == Some(task) {
            Span::styled(
                format!("{} Generating...", spinner_char(app.tick)),
                Style::default().fg(theme.spinner).add_modifier(Modifier::BOLD),
            )
        } else {
            let style = if enabled {
                Style::default().fg(theme.active)
            } else {
                Style::default().fg(theme.dim)
            };
            Span::styled(format!("[{}] {}", i + 1, task.action_label()), style)
        };
        spans.push(label);
        spans.push(Span::raw("   "));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_status(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let width = area.width.saturating_sub(2) as usize;

    let line = if let Some(notice) = &app.notice {
        Line::from(Span::styled(
            format!(" {}", truncate(notice, width)),
            Style::default().fg(theme.notice).add_modifier(Modifier::BOLD),
        ))
    } else if let Some(error) = app.session.error() {
        Line::from(Span::styled(
            format!(" {}", truncate(error, width)),
            Style::default().fg(theme.error),
        ))
    } else {
        Line::from("")
    };
    f.render_widget(Paragraph::new(line), area);
}

fn render_results(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let chunks = Layout::vertical([Constraint::Length(1), Constraint::Min(1)]).split(area);

    let titles: Vec<Line> = TaskKind::all()
        .into_iter()
        .map(|task| Line::from(tab_title(app, task)))
        .collect();
    let selected = TaskKind::all()
        .iter()
        .position(|t| *t == app.result_tab)
        .unwrap_or(0);
    let tabs = Tabs::new(titles)
        .select(selected)
        .style(Style::default().fg(theme.dim))
        .highlight_style(theme.highlight_style().fg(theme.active))
        .divider("|");
    f.render_widget(tabs, chunks[0]);

    let body = Paragraph::new(results::lines(&app.session, app.result_tab, theme))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border_style()),
        )
        .wrap(Wrap { trim: false })
        .scroll((app.scroll, 0));
    f.render_widget(body, chunks[1]);
}

fn tab_title(app: &App, task: TaskKind) -> String {
    let session = &app.session;
    match task {
        TaskKind::Summary => " Summary ".to_string(),
        TaskKind::Flashcards if !session.flashcards().is_empty() => {
            format!(" Flashcards ({}) ", session.flashcards().len())
        }
        TaskKind::Flashcards => " Flashcards ".to_string(),
        TaskKind::Quiz if !session.quiz().is_empty() => {
            format!(" Quiz ({}) ", session.quiz().len())
        }
        TaskKind::Quiz => " Quiz ".to_string(),
    }
}

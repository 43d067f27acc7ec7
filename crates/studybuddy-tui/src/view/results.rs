use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use studybuddy_core::{Session, TaskKind};

use crate::theme::Theme;

/// Lines of the result tab `tab`, or a placeholder when the slot is empty.
pub fn lines(session: &Session, tab: TaskKind, theme: &Theme) -> Vec<Line<'static>> {
    match tab {
        TaskKind::Summary => summary_lines(session, theme),
        TaskKind::Flashcards => flashcard_lines(session, theme),
        TaskKind::Quiz => quiz_lines(session, theme),
    }
}

fn placeholder(task: TaskKind, key: char, theme: &Theme) -> Vec<Line<'static>> {
    vec![Line::from(Span::styled(
        format!("  Nothing here yet. Press {key} to {}.", task.action_label().to_lowercase()),
        Style::default().fg(theme.dim),
    ))]
}

fn summary_lines(session: &Session, theme: &Theme) -> Vec<Line<'static>> {
    let summary = session.summary();
    if summary.is_empty() {
        return placeholder(TaskKind::Summary, '1', theme);
    }
    summary
        .lines()
        .map(|l| Line::from(Span::styled(l.to_string(), Style::default().fg(theme.text))))
        .collect()
}

fn flashcard_lines(session: &Session, theme: &Theme) -> Vec<Line<'static>> {
    let cards = session.flashcards();
    if cards.is_empty() {
        return placeholder(TaskKind::Flashcards, '2', theme);
    }

    let bold = Style::default().fg(theme.text).add_modifier(Modifier::BOLD);
    let mut lines = Vec::with_capacity(cards.len() * 3);
    for (i, card) in cards.iter().enumerate() {
        lines.push(Line::from(vec![
            Span::styled(format!("{:>2}. Q: ", i + 1), bold),
            Span::styled(card.q.clone(), bold),
        ]));
        lines.push(Line::from(vec![
            Span::styled("    A: ", Style::default().fg(theme.success)),
            Span::styled(card.a.clone(), Style::default().fg(theme.text)),
        ]));
        lines.push(Line::from(""));
    }
    lines
}

fn quiz_lines(session: &Session, theme: &Theme) -> Vec<Line<'static>> {
    let items = session.quiz();
    if items.is_empty() {
        return placeholder(TaskKind::Quiz, '3', theme);
    }

    let mut lines = Vec::new();
    for (i, item) in items.iter().enumerate() {
        lines.push(Line::from(Span::styled(
            format!("{}. {}", i + 1, item.question),
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        )));
        for (j, option) in item.options.iter().enumerate() {
            let letter = (b'A' + (j % 26) as u8) as char;
            lines.push(Line::from(Span::styled(
                format!("   {letter}) {option}"),
                Style::default().fg(theme.text),
            )));
        }
        lines.push(Line::from(vec![
            Span::styled(
                "   Correct Answer: ",
                Style::default()
                    .fg(theme.success)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(item.answer.clone(), Style::default().fg(theme.success)),
        ]));
        lines.push(Line::from(""));
    }
    lines
}

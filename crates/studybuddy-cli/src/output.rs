use std::io::Write;

use owo_colors::OwoColorize;
use serde::Serialize;

use studybuddy_core::{Flashcard, GenerationOutput, QuizItem, TaskKind};

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

fn heading(task: TaskKind) -> &'static str {
    match task {
        TaskKind::Summary => "Summary",
        TaskKind::Flashcards => "Flashcards",
        TaskKind::Quiz => "Quiz Questions",
    }
}

/// Print a section heading.
fn print_heading(w: &mut dyn Write, title: &str, color: ColorMode) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "{}", title.bold().cyan())?;
    } else {
        writeln!(w, "{}", title)?;
    }
    writeln!(w)
}

/// Print any generation result in its human-readable form.
pub fn print_output(
    w: &mut dyn Write,
    output: &GenerationOutput,
    color: ColorMode,
) -> std::io::Result<()> {
    match output {
        GenerationOutput::Summary(text) => print_summary(w, text, color),
        GenerationOutput::Flashcards(cards) => print_flashcards(w, cards, color),
        GenerationOutput::Quiz(items) => print_quiz(w, items, color),
        GenerationOutput::Empty(task) => {
            print_heading(w, heading(*task), color)?;
            writeln!(w, "(the model returned an empty response)")
        }
    }
}

pub fn print_summary(w: &mut dyn Write, text: &str, color: ColorMode) -> std::io::Result<()> {
    print_heading(w, heading(TaskKind::Summary), color)?;
    writeln!(w, "{}", text.trim_end())
}

pub fn print_flashcards(
    w: &mut dyn Write,
    cards: &[Flashcard],
    color: ColorMode,
) -> std::io::Result<()> {
    print_heading(w, heading(TaskKind::Flashcards), color)?;
    if cards.is_empty() {
        return writeln!(w, "(no flashcards)");
    }
    for (i, card) in cards.iter().enumerate() {
        if color.enabled() {
            writeln!(w, "{} {}", format!("{:>2}. Q:", i + 1).bold(), card.q)?;
            writeln!(w, "    {} {}", "A:".green().bold(), card.a)?;
        } else {
            writeln!(w, "{:>2}. Q: {}", i + 1, card.q)?;
            writeln!(w, "    A: {}", card.a)?;
        }
        writeln!(w)?;
    }
    Ok(())
}

pub fn print_quiz(w: &mut dyn Write, items: &[QuizItem], color: ColorMode) -> std::io::Result<()> {
    print_heading(w, heading(TaskKind::Quiz), color)?;
    if items.is_empty() {
        return writeln!(w, "(no questions)");
    }
    for (i, item) in items.iter().enumerate() {
        if color.enabled() {
            writeln!(w, "{}", format!("{}. {}", i + 1, item.question).bold())?;
        } else {
            writeln!(w, "{}. {}", i + 1, item.question)?;
        }
        for (j, option) in item.options.iter().enumerate() {
            writeln!(w, "   {}) {}", option_letter(j), option)?;
        }
        if color.enabled() {
            writeln!(w, "   {} {}", "Correct Answer:".green().bold(), item.answer)?;
        } else {
            writeln!(w, "   Correct Answer: {}", item.answer)?;
        }
        writeln!(w)?;
    }
    Ok(())
}

fn option_letter(index: usize) -> char {
    (b'A' + (index % 26) as u8) as char
}

#[derive(Serialize)]
#[serde(rename_all = "lowercase")]
enum JsonOutput<'a> {
    Summary(&'a str),
    Flashcards(&'a [Flashcard]),
    Quiz(&'a [QuizItem]),
}

/// Print the result as pretty JSON (`{"summary": ...}`, `{"flashcards": [...]}`,
/// or `{"quiz": [...]}`).
pub fn print_json(w: &mut dyn Write, output: &GenerationOutput) -> std::io::Result<()> {
    let json = match output {
        GenerationOutput::Summary(text) => JsonOutput::Summary(text),
        GenerationOutput::Flashcards(cards) => JsonOutput::Flashcards(cards),
        GenerationOutput::Quiz(items) => JsonOutput::Quiz(items),
        GenerationOutput::Empty(TaskKind::Summary) => JsonOutput::Summary(""),
        GenerationOutput::Empty(TaskKind::Flashcards) => JsonOutput::Flashcards(&[]),
        GenerationOutput::Empty(TaskKind::Quiz) => JsonOutput::Quiz(&[]),
    };
    serde_json::to_writer_pretty(&mut *w, &json)?;
    writeln!(w)
}

//! Instruction templates sent to the language model.

use crate::TaskKind;

/// Build the instruction for `task`, embedding `text` verbatim.
pub fn build_prompt(task: TaskKind, text: &str) -> String {
    match task {
        TaskKind::Summary => format!(
            "Please provide a concise, topic-wise summary of the following text:\n\n{text}"
        ),
        TaskKind::Flashcards => format!(
            "Based on the following text, generate 5-10 flashcards for quick revision. \
             Format the output as a valid JSON array of objects, where each object has a \
             \"q\" (question) key and an \"a\" (answer) key. \
             Example: [{{\"q\": \"Q1\", \"a\": \"A1\"}}]. \
             Do not include any text, formatting, or markdown like ```json outside of the JSON array.\
             \n\nText:\n{text}"
        ),
        TaskKind::Quiz => format!(
            "Create a multiple-choice quiz with 5 questions based on the text below. \
             Format as a valid JSON array of objects. Each object should have a \"question\" \
             string, an \"options\" array of 4 strings, and an \"answer\" string. \
             Example: [{{\"question\": \"Q1?\", \"options\": [\"A\", \"B\", \"C\", \"D\"], \"answer\": \"C\"}}]. \
             Do not include any text, formatting, or markdown like ```json outside the JSON array.\
             \n\nText:\n{text}"
        ),
    }
}

//! Prompt construction.

use crate::locale::Language;

/// Separates the instruction from the user's paragraph.
pub const DELIMITER: &str = "\n\n---\n\n";

/// Build the provider prompt: instruction, delimiter, then the text verbatim.
pub fn build_prompt(language: Language, text: &str) -> String {
    let instruction = language.strings().instruction;
    let mut prompt = String::with_capacity(instruction.len() + DELIMITER.len() + text.len());
    prompt.push_str(instruction);
    prompt.push_str(DELIMITER);
    prompt.push_str(text);
    prompt
}

//! Merge loaded skill documents into one context payload

use crate::loader::SkillDocument;

/// Concatenate documents in order, each under a `=== {path} ===` header.
///
/// Sections are separated by a blank line. An empty slice gives an empty
/// string.
pub fn merge_context(documents: &[SkillDocument]) -> String {
    documents
        .iter()
        .map(|doc| {
            format!(
                "=== {} ===\n{}",
                doc.path,
                doc.content.trim_end_matches(['\r', '\n'])
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

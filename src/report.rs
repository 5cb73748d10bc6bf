//! Turn a [`SpellcheckReport`] into a GitHub issue draft.

use serde::Serialize;

use crate::checker::SpellcheckReport;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueDraft {
    pub title: String,
    pub body: String,
}

/// Draft an issue describing the spelling errors found in `path`.
///
/// Only the file name is used in the title; the full path goes in the body.
pub fn format_issue(report: &SpellcheckReport, path: &str) -> IssueDraft {
    let name = path.rsplit('/').next().filter(|n| !n.is_empty()).unwrap_or(path);
    let title = format!("Spelling Errors Found in {}", name);

    let mut body = String::new();
    if report.is_clean() {
        body.push_str(&format!("No spelling errors were found in `{}`.\n", path));
        return IssueDraft { title, body };
    }

    let (subject, verb) = match report.misspelled.len() {
        1 => ("word".to_string(), "looks"),
        n => (format!("{} words", n), "look"),
    };
    body.push_str(&format!(
        "The following {} in `{}` {} misspelled:\n\n",
        subject, path, verb
    ));
    body.push_str("| Word | Suggestion |\n|---|---|\n");
    for word in &report.misspelled {
        let suggestion = match report.suggestions.get(word) {
            Some(Some(s)) => format!("`{}`", s),
            _ => "no suggestion".to_string(),
        };
        body.push_str(&format!("| `{}` | {} |\n", word, suggestion));
    }
    body.push_str("\nCode blocks, inline code, links, and images were not checked.\n");

    IssueDraft { title, body }
}

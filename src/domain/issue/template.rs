//! Description template parsing.
//!
//! A description must consist of three sections, in any order:
//!
//! ```text
//! Objective: <one line>
//! Subtasks:
//! - <up to 3 lines>
//! Acceptance Criteria:
//! - <up to 3 lines>
//! ```
//!
//! Headers are matched case-insensitively and may carry markdown emphasis
//! (`**Objective:**`, `## Subtasks`). Content may follow the colon on the
//! header line. Text before the first header is ignored.

use super::errors::{DraftValidationError, Section};

/// Maximum number of items in the Subtasks and Acceptance Criteria sections.
pub const MAX_SECTION_ITEMS: usize = 3;

/// A description broken into its template sections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DescriptionTemplate {
    pub objective: String,
    pub subtasks: Vec<String>,
    pub acceptance_criteria: Vec<String>,
}

impl DescriptionTemplate {
    /// Parses and validates a description.
    pub fn parse(description: &str) -> Result<Self, DraftValidationError> {
        let mut objective: Option<Vec<String>> = None;
        let mut subtasks: Option<Vec<String>> = None;
        let mut criteria: Option<Vec<String>> = None;
        let mut current: Option<Section> = None;

        for line in description.lines() {
            if let Some((section, inline)) = parse_header(line) {
                let slot = match section {
                    Section::Objective => &mut objective,
                    Section::Subtasks => &mut subtasks,
                    Section::AcceptanceCriteria => &mut criteria,
                };
                if slot.is_some() {
                    return Err(DraftValidationError::DuplicateSection(section));
                }
                let mut items = Vec::new();
                if let Some(inline) = inline {
                    items.push(inline);
                }
                *slot = Some(items);
                current = Some(section);
                continue;
            }

            let Some(section) = current else { continue };
            let item = strip_bullet(line.trim());
            if item.is_empty() {
                continue;
            }
            let slot = match section {
                Section::Objective => &mut objective,
                Section::Subtasks => &mut subtasks,
                Section::AcceptanceCriteria => &mut criteria,
            };
            if let Some(items) = slot.as_mut() {
                items.push(item.to_string());
            }
        }

        let objective = objective.ok_or(DraftValidationError::MissingSection(Section::Objective))?;
        let subtasks = subtasks.ok_or(DraftValidationError::MissingSection(Section::Subtasks))?;
        let criteria =
            criteria.ok_or(DraftValidationError::MissingSection(Section::AcceptanceCriteria))?;

        let objective = match objective.as_slice() {
            [] => return Err(DraftValidationError::EmptyObjective),
            [line] => line.clone(),
            _ => return Err(DraftValidationError::ObjectiveNotSingleLine),
        };
        check_items(Section::Subtasks, &subtasks)?;
        check_items(Section::AcceptanceCriteria, &criteria)?;

        Ok(Self {
            objective,
            subtasks,
            acceptance_criteria: criteria,
        })
    }

    /// Renders the sections back into the canonical layout.
    pub fn render(&self) -> String {
        let mut out = format!("Objective: {}\nSubtasks:", self.objective);
        for item in &self.subtasks {
            out.push_str("\n- ");
            out.push_str(item);
        }
        out.push_str("\nAcceptance Criteria:");
        for item in &self.acceptance_criteria {
            out.push_str("\n- ");
            out.push_str(item);
        }
        out
    }
}

fn check_items(section: Section, items: &[String]) -> Result<(), DraftValidationError> {
    if items.len() > MAX_SECTION_ITEMS {
        return Err(DraftValidationError::TooManyItems {
            section,
            max: MAX_SECTION_ITEMS,
            actual: items.len(),
        });
    }
    Ok(())
}

/// Recognizes a section header, returning inline content after the colon.
fn parse_header(line: &str) -> Option<(Section, Option<String>)> {
    let text = line
        .trim()
        .trim_start_matches(|c: char| c == '#' || c == '*' || c == '_' || c.is_whitespace());

    for section in Section::ALL {
        let name = match section {
            Section::Objective => "objective",
            Section::Subtasks => "subtask",
            Section::AcceptanceCriteria => "acceptance criteria",
        };
        let Some(head) = text.get(..name.len()) else { continue };
        if !head.eq_ignore_ascii_case(name) {
            continue;
        }

        let mut rest = &text[name.len()..];
        if rest.starts_with(['s', 'S']) {
            rest = &rest[1..];
        }
        let rest = rest.trim_start_matches(['*', '_', ' ', '\t']);
        if rest.is_empty() {
            return Some((section, None));
        }
        let after_colon = rest.strip_prefix(':')?;
        let inline = strip_bullet(after_colon.trim_matches(|c: char| c == '*' || c == '_' || c.is_whitespace()));
        let inline = (!inline.is_empty()).then(|| inline.to_string());
        return Some((section, inline));
    }
    None
}

/// Strips a list marker (`-`, `*`, `•`, `1.`, `1)`) from a trimmed line.
fn strip_bullet(line: &str) -> &str {
    for marker in ["- ", "* ", "• "] {
        if let Some(rest) = line.strip_prefix(marker) {
            return rest.trim();
        }
    }
    if line == "-" || line == "*" || line == "•" {
        return "";
    }

    let digits = line.chars().take_while(char::is_ascii_digit).count();
    if digits > 0 {
        let rest = &line[digits..];
        if let Some(rest) = rest.strip_prefix('.').or_else(|| rest.strip_prefix(')')) {
            if rest.is_empty() || rest.starts_with(char::is_whitespace) {
                return rest.trim();
            }
        }
    }
    line
}

//! Draft validation errors.

use thiserror::Error;

/// Why a draft cannot be filed as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftValidationError {
    #[error("Title is empty")]
    EmptyTitle,

    #[error("Title is {actual} characters, maximum is {max}")]
    TitleTooLong { max: usize, actual: usize },

    #[error("Description is {actual} characters, maximum is {max}")]
    DescriptionTooLong { max: usize, actual: usize },

    #[error("Description is missing the {0} section")]
    MissingSection(Section),

    #[error("Description repeats the {0} section")]
    DuplicateSection(Section),

    #[error("Objective is empty")]
    EmptyObjective,

    #[error("Objective must be a single line")]
    ObjectiveNotSingleLine,

    #[error("{section} has {actual} items, maximum is {max}")]
    TooManyItems {
        section: Section,
        max: usize,
        actual: usize,
    },
}

/// The fixed sections of a draft description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Objective,
    Subtasks,
    AcceptanceCriteria,
}

impl Section {
    pub const ALL: [Section; 3] = [
        Section::Objective,
        Section::Subtasks,
        Section::AcceptanceCriteria,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Section::Objective => "Objective",
            Section::Subtasks => "Subtasks",
            Section::AcceptanceCriteria => "Acceptance Criteria",
        }
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.title())
    }
}

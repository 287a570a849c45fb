use std::fmt;

use async_graphql::Enum;
use serde::{Deserialize, Serialize};

/// One of the four answer slots of a multiple-choice question.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize, Enum,
)]
pub enum OptionLabel {
    A,
    B,
    C,
    D,
}

impl OptionLabel {
    pub const ALL: [OptionLabel; 4] = [OptionLabel::A, OptionLabel::B, OptionLabel::C, OptionLabel::D];

    pub fn as_str(&self) -> &'static str {
        match self {
            OptionLabel::A => "A",
            OptionLabel::B => "B",
            OptionLabel::C => "C",
            OptionLabel::D => "D",
        }
    }

    /// Exact, case-sensitive parse of a single-letter label.
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "A" => Some(OptionLabel::A),
            "B" => Some(OptionLabel::B),
            "C" => Some(OptionLabel::C),
            "D" => Some(OptionLabel::D),
            _ => None,
        }
    }

    fn index(&self) -> usize {
        match self {
            OptionLabel::A => 0,
            OptionLabel::B => 1,
            OptionLabel::C => 2,
            OptionLabel::D => 3,
        }
    }
}

impl fmt::Display for OptionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Question {
    pub id: String,
    pub text: String,
    options: [String; 4],
    pub correct_answer: OptionLabel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
}

impl Question {
    /// Options are given in label order A, B, C, D, so the correct answer
    /// always names one of them.
    pub fn new(
        id: impl Into<String>,
        text: impl Into<String>,
        options: [String; 4],
        correct_answer: OptionLabel,
    ) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            options,
            correct_answer,
            category: None,
            difficulty: None,
        }
    }

    pub fn with_category(mut self, category: Option<String>) -> Self {
        self.category = category;
        self
    }

    pub fn with_difficulty(mut self, difficulty: Option<String>) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn option(&self, label: OptionLabel) -> &str {
        &self.options[label.index()]
    }

    pub fn options(&self) -> impl Iterator<Item = (OptionLabel, &str)> {
        OptionLabel::ALL
            .into_iter()
            .map(move |label| (label, self.option(label)))
    }

    /// Exact match against the correct label; anything else, including
    /// lower-case letters, is wrong.
    pub fn is_correct(&self, submitted: Option<&str>) -> bool {
        submitted == Some(self.correct_answer.as_str())
    }
}

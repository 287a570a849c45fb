use std::{collections::HashMap, fs::File, io::Read, path::Path};

use calamine::{open_workbook_auto, Data, Reader};
use csv::StringRecord;
use serde::Deserialize;
use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::domain::{OptionLabel, Question},
};

pub const REQUIRED_COLUMNS: [&str; 7] = [
    "QuestionID",
    "QuestionText",
    "OptionA",
    "OptionB",
    "OptionC",
    "OptionD",
    "CorrectAnswer",
];

#[derive(Debug, Deserialize, Validate)]
struct QuestionRecord {
    #[serde(rename = "QuestionID")]
    #[validate(length(min = 1))]
    question_id: String,

    #[serde(rename = "QuestionText")]
    #[validate(length(min = 1))]
    question_text: String,

    #[serde(rename = "OptionA")]
    #[validate(length(min = 1))]
    option_a: String,

    #[serde(rename = "OptionB")]
    #[validate(length(min = 1))]
    option_b: String,

    #[serde(rename = "OptionC")]
    #[validate(length(min = 1))]
    option_c: String,

    #[serde(rename = "OptionD")]
    #[validate(length(min = 1))]
    option_d: String,

    #[serde(rename = "CorrectAnswer")]
    #[validate(length(min = 1))]
    correct_answer: String,

    #[serde(rename = "Category", default)]
    category: Option<String>,

    #[serde(rename = "Difficulty", default)]
    difficulty: Option<String>,
}

fn column_for(field: &str) -> &str {
    match field {
        "question_id" => "QuestionID",
        "question_text" => "QuestionText",
        "option_a" => "OptionA",
        "option_b" => "OptionB",
        "option_c" => "OptionC",
        "option_d" => "OptionD",
        "correct_answer" => "CorrectAnswer",
        other => other,
    }
}

/// Spreadsheet exports tend to write integer ids as floats ("7.0").
fn canonical_id(raw: &str) -> String {
    let trimmed = raw.trim();
    match trimmed.strip_suffix(".0") {
        Some(whole) if whole.parse::<i64>().is_ok() => whole.to_string(),
        _ => trimmed.to_string(),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl QuestionRecord {
    fn into_question(self, row: usize) -> AppResult<Question> {
        if let Err(errors) = self.validate() {
            let fields = errors.field_errors();
            let mut empty: Vec<&str> = fields
                .keys()
                .map(|field| column_for(field))
                .collect();
            empty.sort_unstable();
            return Err(AppError::Schema(format!(
                "row {}: empty required fields: {}",
                row,
                empty.join(", ")
            )));
        }

        let label = self.correct_answer.trim().to_ascii_uppercase();
        let correct_answer = OptionLabel::parse(&label).ok_or_else(|| {
            AppError::Schema(format!(
                "row {}: CorrectAnswer '{}' is not one of A, B, C, D",
                row, self.correct_answer
            ))
        })?;

        Ok(Question::new(
            canonical_id(&self.question_id),
            self.question_text,
            [self.option_a, self.option_b, self.option_c, self.option_d],
            correct_answer,
        )
        .with_category(non_blank(self.category))
        .with_difficulty(non_blank(self.difficulty)))
    }
}

/// Every question the quiz can draw from. Built once at startup and never
/// mutated afterwards.
#[derive(Debug, Clone)]
pub struct QuestionBank {
    questions: Vec<Question>,
    positions: HashMap<String, usize>,
}

fn is_spreadsheet(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| matches!(ext.to_ascii_lowercase().as_str(), "xlsx" | "xlsm" | "xls" | "ods"))
        .unwrap_or(false)
}

fn sheet_record(row: &[Data]) -> StringRecord {
    row.iter()
        .map(|cell| cell.to_string().trim().to_string())
        .collect()
}

impl QuestionBank {
    /// Loads the bank from a CSV file, or from the first worksheet of a
    /// spreadsheet when the extension is `.xlsx`, `.xlsm`, `.xls` or `.ods`.
    pub fn load_from_path(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let bank = if is_spreadsheet(path) {
            Self::load_spreadsheet(path)?
        } else {
            let file = File::open(path).map_err(|e| {
                AppError::Schema(format!(
                    "cannot open question bank '{}': {}",
                    path.display(),
                    e
                ))
            })?;
            Self::load(file)?
        };

        log::info!(
            "Loaded {} questions from {}",
            bank.len(),
            path.display()
        );
        Ok(bank)
    }

    /// Reads a CSV question bank. Column order is free and unknown columns
    /// are ignored; every required column must be present.
    pub fn load<R: Read>(source: R) -> AppResult<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(source);

        let headers = reader.headers()?.clone();
        let records = reader.records().map(|record| record.map_err(AppError::from));

        Self::from_records(&headers, records)
    }

    /// Reads the first worksheet of a spreadsheet. The first row holds the
    /// headers; fully blank rows are skipped.
    pub fn load_spreadsheet(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let open_error = |e: calamine::Error| {
            AppError::Schema(format!(
                "cannot read question bank '{}': {}",
                path.display(),
                e
            ))
        };

        let mut workbook = open_workbook_auto(path).map_err(open_error)?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| {
                AppError::Schema(format!(
                    "question bank '{}' has no worksheets",
                    path.display()
                ))
            })?
            .map_err(open_error)?;

        let mut rows = range.rows();
        let headers = rows.next().map(sheet_record).unwrap_or_default();
        let records = rows
            .filter(|row| row.iter().any(|cell| !matches!(cell, Data::Empty)))
            .map(|row| Ok(sheet_record(row)));

        Self::from_records(&headers, records)
    }

    fn from_records<I>(headers: &StringRecord, records: I) -> AppResult<Self>
    where
        I: IntoIterator<Item = AppResult<StringRecord>>,
    {
        let mut missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|column| !headers.iter().any(|h| h == *column))
            .collect();
        if !missing.is_empty() {
            missing.sort_unstable();
            return Err(AppError::Schema(format!(
                "question bank missing columns: {}",
                missing.join(", ")
            )));
        }

        let mut questions = Vec::new();
        for (index, record) in records.into_iter().enumerate() {
            let row = index + 1;
            let record: QuestionRecord = record?
                .deserialize(Some(headers))
                .map_err(|e| AppError::Schema(format!("row {}: {}", row, e)))?;
            questions.push(record.into_question(row)?);
        }

        Self::from_questions(questions)
    }

    pub fn from_questions(questions: Vec<Question>) -> AppResult<Self> {
        if questions.is_empty() {
            return Err(AppError::Schema(
                "question bank contains no questions".to_string(),
            ));
        }

        let mut positions = HashMap::with_capacity(questions.len());
        for (index, question) in questions.iter().enumerate() {
            if positions.insert(question.id.clone(), index).is_some() {
                return Err(AppError::Schema(format!(
                    "duplicate QuestionID '{}'",
                    question.id
                )));
            }
        }

        Ok(Self {
            questions,
            positions,
        })
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn get(&self, id: &str) -> Option<&Question> {
        self.positions.get(id).map(|&index| &self.questions[index])
    }

    /// Resolves ids in the order given. An unknown id means a stored quiz
    /// no longer matches the bank, which is reported rather than skipped.
    pub fn lookup(&self, ids: &[String]) -> AppResult<Vec<&Question>> {
        ids.iter()
            .map(|id| {
                self.get(id).ok_or_else(|| {
                    AppError::Integrity(format!(
                        "question '{}' is not in the question bank",
                        id
                    ))
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixtures::{bank_csv, sample_bank};

    #[test]
    fn load_reads_all_records() {
        let bank = QuestionBank::load(bank_csv(12).as_bytes()).unwrap();

        assert_eq!(bank.len(), 12);
        let first = bank.get("Q1").unwrap();
        assert_eq!(first.text, "Question 1?");
        assert_eq!(first.option(OptionLabel::C), "Option C for 1");
        assert_eq!(first.category.as_deref(), Some("general"));
    }

    #[test]
    fn load_reports_every_missing_column() {
        let csv = "QuestionID,QuestionText,OptionA,OptionB,OptionC\nQ1,Text,a,b,c\n";
        let err = QuestionBank::load(csv.as_bytes()).unwrap_err();

        match err {
            AppError::Schema(msg) => {
                assert!(msg.contains("CorrectAnswer"));
                assert!(msg.contains("OptionD"));
                assert!(!msg.contains("OptionA"));
            }
            other => panic!("Expected Schema error, got {:?}", other),
        }
    }

    #[test]
    fn load_accepts_any_column_order_and_extra_columns() {
        let csv = "Notes,CorrectAnswer,OptionD,OptionC,OptionB,OptionA,QuestionText,QuestionID\n\
                   ignored, b ,d,c,b,a,Pick b, 7.0 \n";
        let bank = QuestionBank::load(csv.as_bytes()).unwrap();

        let question = bank.get("7").unwrap();
        assert_eq!(question.correct_answer, OptionLabel::B);
        assert_eq!(question.option(OptionLabel::A), "a");
        assert_eq!(question.category, None);
        assert_eq!(question.difficulty, None);
    }

    #[test]
    fn load_rejects_empty_required_cell() {
        let csv = "QuestionID,QuestionText,OptionA,OptionB,OptionC,OptionD,CorrectAnswer\n\
                   Q1,Text,a,b,c,d,A\n\
                   Q2,,a,b,c,,B\n";
        let err = QuestionBank::load(csv.as_bytes()).unwrap_err();

        match err {
            AppError::Schema(msg) => {
                assert!(msg.starts_with("row 2"));
                assert!(msg.contains("OptionD"));
                assert!(msg.contains("QuestionText"));
            }
            other => panic!("Expected Schema error, got {:?}", other),
        }
    }

    #[test]
    fn load_rejects_unknown_correct_answer() {
        let csv = "QuestionID,QuestionText,OptionA,OptionB,OptionC,OptionD,CorrectAnswer\n\
                   Q1,Text,a,b,c,d,E\n";
        assert!(matches!(
            QuestionBank::load(csv.as_bytes()),
            Err(AppError::Schema(_))
        ));
    }

    #[test]
    fn load_rejects_duplicate_ids() {
        let csv = "QuestionID,QuestionText,OptionA,OptionB,OptionC,OptionD,CorrectAnswer\n\
                   Q1,First,a,b,c,d,A\n\
                   Q1,Second,a,b,c,d,B\n";
        let err = QuestionBank::load(csv.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("duplicate QuestionID 'Q1'"));
    }

    #[test]
    fn load_rejects_empty_bank() {
        let csv = "QuestionID,QuestionText,OptionA,OptionB,OptionC,OptionD,CorrectAnswer\n";
        assert!(matches!(
            QuestionBank::load(csv.as_bytes()),
            Err(AppError::Schema(_))
        ));
    }

    #[test]
    fn load_from_missing_path_is_schema_error() {
        let result = QuestionBank::load_from_path("/definitely/not/here.csv");
        assert!(matches!(result, Err(AppError::Schema(_))));
    }

    #[test]
    fn load_from_path_reads_spreadsheet_banks() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/QUESTION_BANK.xlsx");
        let bank = QuestionBank::load_from_path(path).unwrap();

        assert_eq!(bank.len(), 3);

        let first = bank.get("7").unwrap();
        assert_eq!(first.correct_answer, OptionLabel::A);
        assert_eq!(first.option(OptionLabel::D), "static");
        assert_eq!(first.category.as_deref(), Some("Basics"));
        assert_eq!(first.difficulty.as_deref(), Some("Easy"));

        let second = bank.get("8").unwrap();
        assert_eq!(second.correct_answer, OptionLabel::B);
        assert_eq!(second.difficulty, None);

        assert_eq!(bank.get("9").unwrap().category, None);
    }

    #[test]
    fn missing_spreadsheet_is_schema_error() {
        let result = QuestionBank::load_from_path("/definitely/not/here.xlsx");
        assert!(matches!(result, Err(AppError::Schema(_))));
    }

    #[test]
    fn spreadsheet_extension_is_case_insensitive() {
        assert!(is_spreadsheet(Path::new("QUESTION_BANK.XLSX")));
        assert!(is_spreadsheet(Path::new("bank.ods")));
        assert!(!is_spreadsheet(Path::new("bank.csv")));
        assert!(!is_spreadsheet(Path::new("QUESTION_BANK")));
    }

    #[test]
    fn lookup_preserves_requested_order() {
        let bank = sample_bank(10);
        let ids = vec!["Q7".to_string(), "Q2".to_string(), "Q10".to_string()];

        let found: Vec<&str> = bank
            .lookup(&ids)
            .unwrap()
            .iter()
            .map(|q| q.id.as_str())
            .collect();

        assert_eq!(found, vec!["Q7", "Q2", "Q10"]);
    }

    #[test]
    fn lookup_fails_on_unknown_id() {
        let bank = sample_bank(3);
        let ids = vec!["Q1".to_string(), "Q99".to_string()];

        assert!(matches!(bank.lookup(&ids), Err(AppError::Integrity(_))));
    }

    #[test]
    fn canonical_id_normalizes_float_exports() {
        assert_eq!(canonical_id(" 12.0 "), "12");
        assert_eq!(canonical_id("Q12.0"), "Q12.0");
        assert_eq!(canonical_id("3.5"), "3.5");
    }
}

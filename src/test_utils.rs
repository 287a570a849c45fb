#[cfg(test)]
pub mod fixtures {
    use crate::{
        models::domain::{AnswerSubmission, OptionLabel, Question},
        services::question_bank::QuestionBank,
    };

    /// Correct answers rotate through A, B, C, D so scoring tests exercise
    /// every label.
    pub fn correct_label(n: usize) -> OptionLabel {
        OptionLabel::ALL[n % 4]
    }

    /// Creates questions "Q1".."Qn"
    pub fn sample_questions(n: usize) -> Vec<Question> {
        (1..=n)
            .map(|i| {
                Question::new(
                    format!("Q{}", i),
                    format!("Question {}?", i),
                    OptionLabel::ALL.map(|label| format!("Option {} for {}", label, i)),
                    correct_label(i),
                )
                .with_category(Some("general".to_string()))
            })
            .collect()
    }

    pub fn sample_bank(n: usize) -> QuestionBank {
        QuestionBank::from_questions(sample_questions(n)).expect("sample bank is valid")
    }

    /// The same questions as `sample_questions`, written as a CSV source.
    pub fn bank_csv(n: usize) -> String {
        let mut csv = String::from(
            "QuestionID,QuestionText,OptionA,OptionB,OptionC,OptionD,CorrectAnswer,Category,Difficulty\n",
        );
        for i in 1..=n {
            csv.push_str(&format!(
                "Q{i},Question {i}?,Option A for {i},Option B for {i},Option C for {i},Option D for {i},{},general,\n",
                correct_label(i)
            ));
        }
        csv
    }

    /// A submission answering every given id correctly.
    pub fn all_correct(bank: &QuestionBank, ids: &[String]) -> AnswerSubmission {
        ids.iter().fold(AnswerSubmission::new(), |submission, id| {
            let label = bank.get(id).expect("id is in bank").correct_answer;
            submission.answer(id, label.as_str())
        })
    }
}

#[cfg(test)]
pub mod test_helpers {
    use actix_web::http::StatusCode;

    /// Asserts that a status code represents an error (4xx or 5xx)
    pub fn assert_error_status(status: StatusCode) {
        assert!(
            status.is_client_error() || status.is_server_error(),
            "Expected error status, got: {}",
            status
        );
    }

    /// Asserts that a status code represents success (2xx)
    pub fn assert_success_status(status: StatusCode) {
        assert!(
            status.is_success(),
            "Expected success status, got: {}",
            status
        );
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use crate::models::domain::OptionLabel;

    #[test]
    fn test_fixtures_sample_bank() {
        let bank = sample_bank(6);
        assert_eq!(bank.len(), 6);
        assert_eq!(bank.get("Q1").unwrap().correct_answer, OptionLabel::B);
        assert_eq!(bank.get("Q4").unwrap().correct_answer, OptionLabel::A);
    }

    #[test]
    fn test_fixtures_bank_csv_has_header_and_rows() {
        let csv = bank_csv(3);
        assert_eq!(csv.lines().count(), 4);
        assert!(csv.starts_with("QuestionID,"));
    }

    #[test]
    fn test_fixtures_all_correct() {
        let bank = sample_bank(4);
        let ids = vec!["Q2".to_string(), "Q3".to_string()];
        let submission = all_correct(&bank, &ids);

        assert_eq!(submission.answer_for("Q2"), Some("C"));
        assert_eq!(submission.answer_for("Q3"), Some("D"));
    }
}

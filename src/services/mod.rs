pub mod question_bank;
pub mod quiz_selector;
pub mod quiz_service;
pub mod scoring_service;

pub use question_bank::QuestionBank;
pub use quiz_selector::QuizSelector;
pub use quiz_service::QuizService;
pub use scoring_service::ScoringService;

pub mod question;
pub mod quiz_session;
pub mod score;
pub use question::{OptionLabel, Question};
pub use quiz_session::QuizSession;
pub use score::{AnswerSubmission, ReviewItem, ScoreResult};

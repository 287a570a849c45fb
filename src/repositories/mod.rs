pub mod memory_session_repository;
pub mod quiz_session_repository;

pub use memory_session_repository::InMemoryQuizSessionRepository;
pub use quiz_session_repository::{MongoQuizSessionRepository, QuizSessionRepository};

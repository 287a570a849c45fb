use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The question set bound to one session token while a quiz is active.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuizSession {
    pub sid: String,
    pub question_ids: Vec<String>,
    pub started_at: DateTime<Utc>,
}

impl QuizSession {
    pub fn start(sid: &str, question_ids: Vec<String>) -> Self {
        Self {
            sid: sid.to_string(),
            question_ids,
            started_at: Utc::now(),
        }
    }

    pub fn len(&self) -> usize {
        self.question_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.question_ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_keeps_selection_order() {
        let ids = vec!["Q9".to_string(), "Q2".to_string(), "Q5".to_string()];
        let session = QuizSession::start("sid-1", ids.clone());

        assert_eq!(session.sid, "sid-1");
        assert_eq!(session.question_ids, ids);
        assert_eq!(session.len(), 3);
        assert!(session.started_at <= Utc::now());
    }
}

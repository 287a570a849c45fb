use std::collections::HashMap;

use async_graphql::InputObject;
use serde::Deserialize;
use validator::Validate;

use crate::models::domain::AnswerSubmission;

/// Upper bound on answers accepted in one submission; far above any sane
/// quiz size, it only guards against oversized payloads.
pub const MAX_SUBMITTED_ANSWERS: u64 = 500;

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct SubmitAnswersRequest {
    #[serde(default)]
    #[validate(length(max = MAX_SUBMITTED_ANSWERS))]
    pub answers: HashMap<String, Option<String>>,
}

impl From<SubmitAnswersRequest> for AnswerSubmission {
    fn from(request: SubmitAnswersRequest) -> Self {
        AnswerSubmission::from(request.answers)
    }
}

#[derive(Debug, Clone, Deserialize, Validate, InputObject)]
pub struct AnswerInput {
    #[validate(length(min = 1, max = 200))]
    pub question_id: String,

    #[validate(length(max = 1))]
    pub answer: Option<String>,
}

/// Collects GraphQL answer inputs into a submission. A question id repeated
/// in the list keeps its last answer.
pub fn submission_from_inputs(inputs: Vec<AnswerInput>) -> AnswerSubmission {
    inputs
        .into_iter()
        .map(|input| (input.question_id, input.answer))
        .collect::<HashMap<_, _>>()
        .into()
}

pub mod health_handler;
pub mod quiz_handler;

use actix_web::web;

pub use health_handler::{health_check, health_check_live, health_check_ready};
pub use quiz_handler::{get_quiz, reset_quiz, start_over, submit_answers, submit_answers_form};

/// Registers every REST route.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health_check)
        .service(health_check_live)
        .service(health_check_ready)
        .service(get_quiz)
        .service(submit_answers)
        .service(submit_answers_form)
        .service(reset_quiz)
        .service(start_over);
}

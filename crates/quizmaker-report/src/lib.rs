//! quizmaker-report: Result sheets and result emails.

pub mod email;
pub mod html;

pub use email::{compose_email, compose_email_with_subject, EmailDraft};
pub use html::{generate_html, write_html_report};

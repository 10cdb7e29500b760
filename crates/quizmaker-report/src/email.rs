//! Result emails.
//!
//! A draft carries the recipient, subject, and body handed to the mail
//! client. The body is the same plain-text summary shown on screen.

use url::{form_urlencoded, Url};

use quizmaker_core::report::QuizResult;

pub const DEFAULT_SUBJECT: &str = "Test result";

/// An email ready to be handed to a mail client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailDraft {
    /// May be empty; the student fills it in.
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

impl EmailDraft {
    /// A `mailto:` URL that opens the draft in the local mail client.
    pub fn mailto_url(&self) -> Result<Url, url::ParseError> {
        let mut url = Url::parse(&format!("mailto:{}", self.recipient.trim()))?;
        let query = format!(
            "subject={}&body={}",
            encode_component(&self.subject),
            encode_component(&self.body)
        );
        url.set_query(Some(&query));
        Ok(url)
    }
}

/// Percent-encode for a mailto header value. Mail clients read `+` literally,
/// so spaces become `%20` rather than the form encoding's `+`.
fn encode_component(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

/// Compose the result email with the default subject.
pub fn compose_email(
    recipient: Option<&str>,
    test_name: Option<&str>,
    result: &QuizResult,
) -> EmailDraft {
    compose_email_with_subject(DEFAULT_SUBJECT, recipient, test_name, result)
}

/// Compose the result email. The subject is `prefix`, followed by
/// `": <test name>"` when the name is known.
pub fn compose_email_with_subject(
    prefix: &str,
    recipient: Option<&str>,
    test_name: Option<&str>,
    result: &QuizResult,
) -> EmailDraft {
    let subject = match test_name.map(str::trim).filter(|n| !n.is_empty()) {
        Some(name) => format!("{prefix}: {name}"),
        None => prefix.to_string(),
    };

    EmailDraft {
        recipient: recipient.map(str::trim).unwrap_or_default().to_string(),
        subject,
        body: result.summary(),
    }
}

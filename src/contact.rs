//! Contact form state machine.
//!
//! ```text
//! Idle ──submit (invalid)──▶ Error("Please fix the errors above...")
//!   │
//!   ├──submit (relay)──▶ Submitting ──ok──▶ Success   (fields cleared)
//!   │                         └─────err──▶ Error     (fields kept)
//!   │
//!   └──submit (no relay)──▶ Info("Opening your email client...") + mailto: link
//! ```
//!
//! Editing a field clears that field's error and any displayed status.
//! While a submission is in flight further submits are rejected.

use chrono::{Local, NaiveDateTime};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::{Arc, LazyLock};

use crate::relay::{MailRelay, RelayError, RelayMessage};

pub const NAME_MIN: usize = 2;
pub const NAME_MAX: usize = 100;
pub const MESSAGE_MIN: usize = 10;
pub const MESSAGE_MAX: usize = 5000;

pub const MAILTO_SUBJECT: &str = "Portfolio Contact: New Message";
pub const INVALID_FORM: &str = "Please fix the errors above before submitting.";
pub const SEND_SUCCESS: &str = "Message sent successfully! I'll get back to you soon.";
pub const SEND_FAILURE: &str = "Failed to send message. Please try again or use direct email.";
pub const OPENING_MAIL_CLIENT: &str = "Opening your email client...";

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern must compile")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Name,
    Email,
    Message,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Name, Field::Email, Field::Message];

    /// Form control name, also the relay template parameter.
    pub fn key(self) -> &'static str {
        match self {
            Field::Name => "from_name",
            Field::Email => "from_email",
            Field::Message => "message",
        }
    }
}

pub type FieldErrors = BTreeMap<Field, String>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactForm {
    pub from_name: String,
    pub from_email: String,
    pub message: String,
}

impl ContactForm {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.from_name,
            Field::Email => &self.from_email,
            Field::Message => &self.message,
        }
    }

    fn slot(&mut self, field: Field) -> &mut String {
        match field {
            Field::Name => &mut self.from_name,
            Field::Email => &mut self.from_email,
            Field::Message => &mut self.message,
        }
    }
}

/// Validate every field; an empty map means the form may be submitted.
pub fn validate(form: &ContactForm) -> FieldErrors {
    let mut errors = FieldErrors::new();

    let name = form.from_name.trim().chars().count();
    if name == 0 {
        errors.insert(Field::Name, "Name is required".into());
    } else if name < NAME_MIN {
        errors.insert(
            Field::Name,
            format!("Name must be at least {NAME_MIN} characters"),
        );
    } else if name > NAME_MAX {
        errors.insert(
            Field::Name,
            format!("Name must be at most {NAME_MAX} characters"),
        );
    }

    if form.from_email.trim().is_empty() {
        errors.insert(Field::Email, "Email is required".into());
    } else if !EMAIL_PATTERN.is_match(&form.from_email) {
        errors.insert(Field::Email, "Please enter a valid email address".into());
    }

    let message = form.message.trim().chars().count();
    if message == 0 {
        errors.insert(Field::Message, "Message is required".into());
    } else if message < MESSAGE_MIN {
        errors.insert(
            Field::Message,
            format!("Message must be at least {MESSAGE_MIN} characters"),
        );
    } else if message > MESSAGE_MAX {
        errors.insert(
            Field::Message,
            format!("Message must be at most {MESSAGE_MAX} characters"),
        );
    }

    errors
}

/// `mailto:` link prefilled with the form contents.
pub fn mailto_link(recipient_email: &str, form: &ContactForm) -> String {
    let body = format!(
        "Name: {}\nEmail: {}\n\nMessage:\n{}",
        form.from_name, form.from_email, form.message
    );
    format!(
        "mailto:{recipient_email}?subject={}&body={}",
        urlencoding::encode(MAILTO_SUBJECT),
        urlencoding::encode(&body)
    )
}

/// Human-readable send timestamp, e.g. `Oct 19, 2026, 3:45 PM`.
pub fn format_sent_time(at: NaiveDateTime) -> String {
    at.format("%b %-d, %Y, %-I:%M %p").to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitStatus {
    Idle,
    Submitting,
    Success(String),
    Error(String),
    Info(String),
}

/// Who receives messages: the portfolio owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipient {
    pub name: String,
    pub email: String,
}

/// What a submit attempt resulted in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Invalid,
    /// A submission is already in flight.
    Busy,
    Sent,
    Failed,
    Mailto(String),
}

/// Work decided by [`ContactController::begin_submit`].
pub enum Dispatch {
    Relay(Arc<dyn MailRelay>, RelayMessage),
    Mailto(String),
}

pub struct ContactController {
    form: ContactForm,
    errors: FieldErrors,
    status: SubmitStatus,
    recipient: Recipient,
    relay: Option<Arc<dyn MailRelay>>,
}

impl std::fmt::Debug for ContactController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContactController")
            .field("form", &self.form)
            .field("errors", &self.errors)
            .field("status", &self.status)
            .field("recipient", &self.recipient)
            .field("relay", &self.relay.is_some())
            .finish()
    }
}

impl ContactController {
    /// `relay = None` selects the mailto fallback.
    pub fn new(recipient: Recipient, relay: Option<Arc<dyn MailRelay>>) -> Self {
        Self {
            form: ContactForm::default(),
            errors: FieldErrors::new(),
            status: SubmitStatus::Idle,
            recipient,
            relay,
        }
    }

    pub fn form(&self) -> &ContactForm {
        &self.form
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn status(&self) -> &SubmitStatus {
        &self.status
    }

    pub fn is_submitting(&self) -> bool {
        self.status == SubmitStatus::Submitting
    }

    pub fn uses_relay(&self) -> bool {
        self.relay.is_some()
    }

    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        *self.form.slot(field) = value.into();
        self.errors.remove(&field);
        if !self.is_submitting() {
            self.status = SubmitStatus::Idle;
        }
    }

    pub fn validate(&self) -> FieldErrors {
        validate(&self.form)
    }

    /// Validate and decide how to deliver. Moves to `Submitting` when the
    /// relay will be called; the caller must report back through [`finish`].
    ///
    /// [`finish`]: ContactController::finish
    pub fn begin_submit(&mut self, now: NaiveDateTime) -> Result<Dispatch, SubmitOutcome> {
        if self.is_submitting() {
            return Err(SubmitOutcome::Busy);
        }

        let errors = self.validate();
        if !errors.is_empty() {
            self.errors = errors;
            self.status = SubmitStatus::Error(INVALID_FORM.into());
            return Err(SubmitOutcome::Invalid);
        }
        self.errors.clear();

        match &self.relay {
            Some(relay) => {
                let message = RelayMessage {
                    from_name: self.form.from_name.trim().to_string(),
                    from_email: self.form.from_email.clone(),
                    message: self.form.message.trim().to_string(),
                    to_name: self.recipient.name.clone(),
                    reply_to: self.form.from_email.clone(),
                    sent_time: format_sent_time(now),
                };
                self.status = SubmitStatus::Submitting;
                Ok(Dispatch::Relay(relay.clone(), message))
            }
            None => {
                self.status = SubmitStatus::Info(OPENING_MAIL_CLIENT.into());
                Ok(Dispatch::Mailto(mailto_link(
                    &self.recipient.email,
                    &self.form,
                )))
            }
        }
    }

    /// Apply the relay result of an in-flight submission.
    pub fn finish(&mut self, result: Result<(), RelayError>) -> SubmitOutcome {
        match result {
            Ok(()) => {
                self.form = ContactForm::default();
                self.status = SubmitStatus::Success(SEND_SUCCESS.into());
                SubmitOutcome::Sent
            }
            Err(err) => {
                tracing::error!(error = %err, "contact message delivery failed");
                self.status = SubmitStatus::Error(SEND_FAILURE.into());
                SubmitOutcome::Failed
            }
        }
    }

    pub async fn submit(&mut self) -> SubmitOutcome {
        self.submit_at(Local::now().naive_local()).await
    }

    pub async fn submit_at(&mut self, now: NaiveDateTime) -> SubmitOutcome {
        match self.begin_submit(now) {
            Err(outcome) => outcome,
            Ok(Dispatch::Mailto(href)) => SubmitOutcome::Mailto(href),
            Ok(Dispatch::Relay(relay, message)) => {
                let result = relay.send(&message).await;
                self.finish(result)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeRelay {
        sent: Mutex<Vec<RelayMessage>>,
        fail: bool,
    }

    #[async_trait]
    impl MailRelay for FakeRelay {
        async fn send(&self, message: &RelayMessage) -> Result<(), RelayError> {
            self.sent.lock().unwrap().push(message.clone());
            if self.fail {
                Err(RelayError::Rejected {
                    status: 500,
                    body: "boom".into(),
                })
            } else {
                Ok(())
            }
        }
    }

    fn recipient() -> Recipient {
        Recipient {
            name: "Jordan Rivera".into(),
            email: "jordan@example.com".into(),
        }
    }

    fn stamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(15, 45, 0)
            .unwrap()
    }

    fn filled(controller: &mut ContactController) {
        controller.set_field(Field::Name, "Ada Lovelace");
        controller.set_field(Field::Email, "ada@example.com");
        controller.set_field(Field::Message, "I would like to talk about a project.");
    }

    fn valid_form() -> ContactForm {
        ContactForm {
            from_name: "Ada".into(),
            from_email: "ada@example.com".into(),
            message: "Hello, this is long enough.".into(),
        }
    }

    #[test]
    fn valid_form_has_no_errors() {
        assert!(validate(&valid_form()).is_empty());
    }

    #[test]
    fn required_and_invalid_messages_differ() {
        let empty = validate(&ContactForm::default());
        assert_eq!(empty[&Field::Name], "Name is required");
        assert_eq!(empty[&Field::Email], "Email is required");
        assert_eq!(empty[&Field::Message], "Message is required");

        let form = ContactForm {
            from_name: "A".into(),
            from_email: "not-an-email".into(),
            message: "short".into(),
        };
        let errors = validate(&form);
        assert_eq!(errors[&Field::Name], "Name must be at least 2 characters");
        assert_eq!(errors[&Field::Email], "Please enter a valid email address");
        assert_eq!(errors[&Field::Message], "Message must be at least 10 characters");
    }

    #[test]
    fn whitespace_only_name_is_required_error() {
        let mut form = valid_form();
        form.from_name = "   ".into();
        assert_eq!(validate(&form)[&Field::Name], "Name is required");
    }

    #[test]
    fn name_length_is_measured_after_trimming() {
        let mut form = valid_form();
        form.from_name = "  A  ".into();
        assert!(validate(&form).contains_key(&Field::Name));
    }

    #[test]
    fn length_limits_are_inclusive() {
        let mut form = valid_form();
        form.from_name = "Al".into();
        form.message = "x".repeat(MESSAGE_MIN);
        assert!(validate(&form).is_empty());

        form.from_name = " Al ".into();
        form.message = "y".repeat(MESSAGE_MAX);
        assert!(validate(&form).is_empty());

        form.from_name = "x".repeat(NAME_MAX);
        assert!(validate(&form).is_empty());
    }

    #[test]
    fn overlong_fields_are_rejected() {
        let mut form = valid_form();
        form.from_name = "x".repeat(NAME_MAX + 1);
        form.message = "y".repeat(MESSAGE_MAX + 1);
        let errors = validate(&form);
        assert_eq!(errors[&Field::Name], "Name must be at most 100 characters");
        assert_eq!(errors[&Field::Message], "Message must be at most 5000 characters");
    }

    #[test]
    fn email_pattern_cases() {
        for (email, ok) in [
            ("a@b.co", true),
            ("first.last@sub.example.org", true),
            ("a@b", false),
            ("a b@c.de", false),
            ("@c.de", false),
            ("a@@c.de", false),
        ] {
            let mut form = valid_form();
            form.from_email = email.into();
            assert_eq!(validate(&form).is_empty(), ok, "{email}");
        }
    }

    #[test]
    fn mailto_link_encodes_subject_and_body() {
        let form = ContactForm {
            from_name: "Ada Lovelace".into(),
            from_email: "ada@example.com".into(),
            message: "Hi & hello?".into(),
        };
        let link = mailto_link("jordan@example.com", &form);
        assert!(link.starts_with("mailto:jordan@example.com?subject=Portfolio%20Contact%3A%20New%20Message&body="));
        assert!(link.contains("Ada%20Lovelace"));
        assert!(link.contains("Hi%20%26%20hello%3F"));
        assert!(link.contains("Message%3A%0A"));
    }

    #[test]
    fn sent_time_is_human_readable() {
        assert_eq!(format_sent_time(stamp()), "Oct 19, 2026, 3:45 PM");
    }

    #[tokio::test]
    async fn invalid_submit_surfaces_errors_and_never_sends() {
        let relay = Arc::new(FakeRelay::default());
        let mut controller = ContactController::new(recipient(), Some(relay.clone()));
        controller.set_field(Field::Name, "A");

        assert_eq!(controller.submit_at(stamp()).await, SubmitOutcome::Invalid);
        assert_eq!(controller.status(), &SubmitStatus::Error(INVALID_FORM.into()));
        assert!(controller.errors().contains_key(&Field::Name));
        assert!(relay.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn successful_send_clears_fields() {
        let relay = Arc::new(FakeRelay::default());
        let mut controller = ContactController::new(recipient(), Some(relay.clone()));
        filled(&mut controller);

        assert_eq!(controller.submit_at(stamp()).await, SubmitOutcome::Sent);
        assert_eq!(controller.status(), &SubmitStatus::Success(SEND_SUCCESS.into()));
        assert_eq!(controller.form(), &ContactForm::default());

        let sent = relay.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to_name, "Jordan Rivera");
        assert_eq!(sent[0].reply_to, "ada@example.com");
        assert_eq!(sent[0].sent_time, "Oct 19, 2026, 3:45 PM");
    }

    #[tokio::test]
    async fn failed_send_keeps_fields_and_shows_generic_error() {
        let relay = Arc::new(FakeRelay {
            fail: true,
            ..Default::default()
        });
        let mut controller = ContactController::new(recipient(), Some(relay));
        filled(&mut controller);

        assert_eq!(controller.submit_at(stamp()).await, SubmitOutcome::Failed);
        assert_eq!(controller.status(), &SubmitStatus::Error(SEND_FAILURE.into()));
        assert_eq!(controller.form().from_name, "Ada Lovelace");
    }

    #[tokio::test]
    async fn unconfigured_relay_falls_back_to_mailto() {
        let mut controller = ContactController::new(recipient(), None);
        filled(&mut controller);

        match controller.submit_at(stamp()).await {
            SubmitOutcome::Mailto(href) => {
                assert!(href.starts_with("mailto:jordan@example.com?"));
                assert!(href.contains("Ada%20Lovelace"));
                assert!(href.contains("I%20would%20like%20to%20talk"));
            }
            other => panic!("expected mailto fallback, got {other:?}"),
        }
        assert_eq!(
            controller.status(),
            &SubmitStatus::Info(OPENING_MAIL_CLIENT.into())
        );
    }

    #[test]
    fn second_submit_while_in_flight_is_rejected() {
        let relay = Arc::new(FakeRelay::default());
        let mut controller = ContactController::new(recipient(), Some(relay));
        filled(&mut controller);

        assert!(matches!(controller.begin_submit(stamp()), Ok(Dispatch::Relay(..))));
        assert!(controller.is_submitting());
        assert!(matches!(
            controller.begin_submit(stamp()),
            Err(SubmitOutcome::Busy)
        ));

        assert_eq!(controller.finish(Ok(())), SubmitOutcome::Sent);
        assert!(!controller.is_submitting());
    }

    #[tokio::test]
    async fn editing_a_field_clears_its_error_and_status() {
        let mut controller = ContactController::new(recipient(), None);
        controller.submit_at(stamp()).await;
        assert_eq!(controller.errors().len(), 3);

        controller.set_field(Field::Email, "ada@example.com");
        assert!(!controller.errors().contains_key(&Field::Email));
        assert!(controller.errors().contains_key(&Field::Name));
        assert_eq!(controller.status(), &SubmitStatus::Idle);
    }
}

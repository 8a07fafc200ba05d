//! Email notifications for committed ledger changes.
//!
//! The engine emits a [`LedgerEvent`] after every commit; the worker spawned by
//! [`spawn_notifier`] renders each event into mails and hands them to a
//! [`Mailer`]. Delivery failures are logged and dropped: the ledger state is
//! already committed and is never affected.

use std::future::Future;

use engine::{LedgerEvent, Money, events::EventReceiver};
use thiserror::Error;
use tokio::task::JoinHandle;

const SIGNATURE: &str = "<p>Best regards,<br>Split-it Team</p>";

#[derive(Error, Debug)]
pub enum MailError {
    #[error("mail delivery failed: {0}")]
    Delivery(String),
}

/// A rendered HTML mail.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

pub trait Mailer: Send + Sync + 'static {
    fn deliver(&self, mail: &Mail) -> impl Future<Output = Result<(), MailError>> + Send;
}

/// Writes every mail to the log instead of sending it.
#[derive(Clone, Debug)]
pub struct LogMailer;

impl Mailer for LogMailer {
    async fn deliver(&self, mail: &Mail) -> Result<(), MailError> {
        tracing::info!(
            from = %mail.from,
            to = %mail.to,
            subject = %mail.subject,
            "mail: {}",
            mail.body
        );
        Ok(())
    }
}

/// Escapes user-provided text for an HTML body.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Renders the mails an event should produce, one per recipient.
pub fn render(event: &LedgerEvent, from: &str) -> Vec<Mail> {
    match event {
        LedgerEvent::ExpenseCreated {
            group_name,
            paid_by,
            amount_minor,
            notify,
            ..
        } => notify
            .iter()
            .map(|recipient| Mail {
                from: from.to_string(),
                to: recipient.email.clone(),
                subject: "New expense added".to_string(),
                body: format!(
                    "<p>Hello <b>{}</b>,</p><p><b>{}</b> has added an expense of <b>{}</b> in the group <b>{}</b>.</p>{SIGNATURE}",
                    escape(&recipient.username),
                    escape(paid_by),
                    Money::new(*amount_minor),
                    escape(group_name),
                ),
            })
            .collect(),
        LedgerEvent::Settled {
            paid_by,
            paid_to,
            amount_minor,
            ..
        } => vec![Mail {
            from: from.to_string(),
            to: paid_to.email.clone(),
            subject: "Payment settled".to_string(),
            body: format!(
                "<p>Hello <b>{}</b>,</p><p><b>{}</b> has settled up with you for <b>{}</b>.</p>{SIGNATURE}",
                escape(&paid_to.username),
                escape(paid_by),
                Money::new(*amount_minor),
            ),
        }],
        LedgerEvent::ReminderSent {
            sent_by,
            sent_to,
            amount_minor,
            ..
        } => vec![Mail {
            from: from.to_string(),
            to: sent_to.email.clone(),
            subject: "Payment Reminder".to_string(),
            body: format!(
                "<p>Hello <b>{}</b>,</p><p><b>{}</b> reminds you to settle <b>{}</b>.</p>{SIGNATURE}",
                escape(&sent_to.username),
                escape(sent_by),
                Money::new(*amount_minor),
            ),
        }],
    }
}

/// Consume events until every sender is dropped.
pub fn spawn_notifier<M: Mailer>(
    mut events: EventReceiver,
    mailer: M,
    from: String,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            for mail in render(&event, &from) {
                if let Err(err) = mailer.deliver(&mail).await {
                    tracing::warn!("failed to notify {}: {err}", mail.to);
                }
            }
        }
        tracing::info!("notifier stopped");
    })
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use engine::{Recipient, events};
    use uuid::Uuid;

    use super::*;

    #[derive(Clone, Default)]
    struct Recording {
        sent: Arc<Mutex<Vec<Mail>>>,
        fail_for: Option<String>,
    }

    impl Mailer for Recording {
        async fn deliver(&self, mail: &Mail) -> Result<(), MailError> {
            if self.fail_for.as_deref() == Some(mail.to.as_str()) {
                return Err(MailError::Delivery("smtp unavailable".to_string()));
            }
            self.sent.lock().unwrap().push(mail.clone());
            Ok(())
        }
    }

    fn recipient(name: &str) -> Recipient {
        Recipient {
            username: name.to_string(),
            email: format!("{name}@example.com"),
        }
    }

    fn expense_event() -> LedgerEvent {
        LedgerEvent::ExpenseCreated {
            group_id: Uuid::nil(),
            group_name: "Trip".to_string(),
            expense_id: Uuid::nil(),
            paid_by: "alice".to_string(),
            amount_minor: 100_00,
            notify: vec![recipient("bob"), recipient("carol")],
        }
    }

    #[test]
    fn expense_mail_goes_to_every_borrower() {
        let mails = render(&expense_event(), "noreply@example.com");
        let to: Vec<&str> = mails.iter().map(|m| m.to.as_str()).collect();
        assert_eq!(to, vec!["bob@example.com", "carol@example.com"]);
        assert!(mails[0].body.contains("<b>100.00</b>"));
        assert!(mails[0].body.contains("<b>Trip</b>"));
        assert_eq!(mails[0].from, "noreply@example.com");
    }

    #[test]
    fn user_text_is_escaped_in_bodies() {
        let event = LedgerEvent::ExpenseCreated {
            group_id: Uuid::nil(),
            group_name: "<a href=\"https://evil.test\">Trip</a> & co".to_string(),
            expense_id: Uuid::nil(),
            paid_by: "alice".to_string(),
            amount_minor: 1_00,
            notify: vec![recipient("bob")],
        };
        let mails = render(&event, "noreply@example.com");
        let body = &mails[0].body;
        assert!(!body.contains("<a href"));
        assert!(body.contains(
            "<b>&lt;a href=&quot;https://evil.test&quot;&gt;Trip&lt;/a&gt; &amp; co</b>"
        ));
        assert!(body.starts_with("<p>Hello <b>bob</b>,</p>"));
    }

    #[tokio::test]
    async fn failed_delivery_does_not_stop_the_worker() {
        let mailer = Recording {
            fail_for: Some("bob@example.com".to_string()),
            ..Recording::default()
        };
        let sent = Arc::clone(&mailer.sent);
        let (tx, rx) = events::channel();
        let worker = spawn_notifier(rx, mailer, "noreply@example.com".to_string());

        tx.send(expense_event()).unwrap();
        tx.send(LedgerEvent::ReminderSent {
            reminder_id: Uuid::nil(),
            sent_by: "alice".to_string(),
            sent_to: recipient("carol"),
            amount_minor: 5_00,
        })
        .unwrap();
        drop(tx);
        worker.await.unwrap();

        let sent = sent.lock().unwrap();
        let subjects: Vec<&str> = sent.iter().map(|m| m.subject.as_str()).collect();
        assert_eq!(subjects, vec!["New expense added", "Payment Reminder"]);
        assert!(sent.iter().all(|m| m.to == "carol@example.com"));
    }
}

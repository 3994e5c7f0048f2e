use crate::notify::{Notification, Notifier, NotifyError, NotifyResult};
use chrono::Utc;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Writes each notification as an RFC 5322 style message file
///
/// Files are named `<timestamp>-landing-monitor.eml` inside the outbox
/// directory, which is created on first use.
#[derive(Debug, Clone)]
pub struct OutboxNotifier {
    dir: PathBuf,
}

impl OutboxNotifier {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl Notifier for OutboxNotifier {
    fn send(&self, notification: &Notification) -> NotifyResult<()> {
        if notification.recipients.is_empty() {
            return Err(NotifyError::NoRecipients);
        }

        std::fs::create_dir_all(&self.dir)?;

        let now = Utc::now();
        let stem = now.format("%Y%m%dT%H%M%S%.3fZ").to_string();
        let (mut file, path) = create_message_file(&self.dir, &stem)?;
        file.write_all(format_message(notification, &now.to_rfc2822()).as_bytes())?;

        tracing::info!(
            "Notification written to {} for {} recipient(s)",
            path.display(),
            notification.recipients.len()
        );
        Ok(())
    }
}

/// Creates a new message file, never replacing an existing one
///
/// A numeric suffix is appended when `<stem>-landing-monitor.eml` is taken.
fn create_message_file(dir: &Path, stem: &str) -> io::Result<(File, PathBuf)> {
    let mut attempt = 0u32;
    loop {
        let name = if attempt == 0 {
            format!("{}-landing-monitor.eml", stem)
        } else {
            format!("{}-{}-landing-monitor.eml", stem, attempt)
        };
        let path = dir.join(name);

        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok((file, path)),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => attempt += 1,
            Err(e) => return Err(e),
        }
    }
}

/// Renders headers and body of a message
fn format_message(notification: &Notification, date: &str) -> String {
    let mut message = String::new();

    let from = notification
        .sender_name
        .as_deref()
        .unwrap_or("Landing Page Monitor");
    message.push_str(&format!("From: {}\r\n", from));
    message.push_str(&format!("To: {}\r\n", notification.to_header()));
    if let Some(reply_to) = &notification.reply_to {
        message.push_str(&format!("Reply-To: {}\r\n", reply_to));
    }
    message.push_str(&format!("Subject: {}\r\n", notification.subject));
    message.push_str(&format!("Date: {}\r\n", date));
    message.push_str("MIME-Version: 1.0\r\n");
    message.push_str("Content-Type: text/html; charset=UTF-8\r\n");
    message.push_str("\r\n");
    message.push_str(&notification.html_body);
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(recipients: Vec<&str>) -> Notification {
        Notification {
            recipients: recipients.into_iter().map(String::from).collect(),
            subject: "Landing Page Monitor".to_string(),
            html_body: "<p>report</p>".to_string(),
            reply_to: Some("scripts@example.com".to_string()),
            sender_name: Some("Monitor Bot".to_string()),
        }
    }

    #[test]
    fn test_writes_message_file() {
        let dir = tempfile::tempdir().unwrap();
        let notifier = OutboxNotifier::new(dir.path().join("outbox"));

        notifier.send(&message(vec!["ops@example.com"])).unwrap();

        let files: Vec<_> = std::fs::read_dir(notifier.dir())
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect();
        assert_eq!(files.len(), 1);

        let content = std::fs::read_to_string(&files[0]).unwrap();
        assert!(content.contains("To: ops@example.com\r\n"));
        assert!(content.contains("Reply-To: scripts@example.com\r\n"));
        assert!(content.contains("From: Monitor Bot\r\n"));
        assert!(content.ends_with("<p>report</p>"));
    }

    #[test]
    fn test_same_timestamp_does_not_overwrite() {
        let dir = tempfile::tempdir().unwrap();

        let (_, first) = create_message_file(dir.path(), "20240101T000000.000Z").unwrap();
        let (_, second) = create_message_file(dir.path(), "20240101T000000.000Z").unwrap();

        assert_ne!(first, second);
        assert!(second.ends_with("20240101T000000.000Z-1-landing-monitor.eml"));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 2);
    }

    #[test]
    fn test_back_to_back_sends_keep_every_message() {
        let dir = tempfile::tempdir().unwrap();
        let notifier = OutboxNotifier::new(dir.path());

        for _ in 0..3 {
            notifier.send(&message(vec!["ops@example.com"])).unwrap();
        }

        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 3);
    }

    #[test]
    fn test_requires_recipients() {
        let dir = tempfile::tempdir().unwrap();
        let notifier = OutboxNotifier::new(dir.path());
        assert!(matches!(
            notifier.send(&message(vec![])),
            Err(NotifyError::NoRecipients)
        ));
    }
}

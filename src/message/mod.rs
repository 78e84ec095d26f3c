/*
 * Copyright Stalwart Labs Ltd. See the COPYING
 * file at the top-level directory of this distribution.
 *
 * Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
 * https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
 * <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
 * option. This file may not be copied, modified, or distributed
 * except according to those terms.
 */

use std::{fmt::Display, path::Path, str::FromStr};

use chrono::{DateTime, TimeZone, Utc};

use crate::transport::{check_address, Envelope};

pub mod encoding;
pub mod mime;

pub use mime::MimeMessage;

/// An e-mail address with an optional display name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mailbox {
    pub email: String,
    pub name: Option<String>,
}

impl Mailbox {
    pub fn new(name: Option<String>, email: impl Into<String>) -> Self {
        Mailbox {
            email: email.into(),
            name: name.filter(|name| !name.is_empty()),
        }
    }

    /// Renders the mailbox as `Name <addr>` or `<addr>`.
    pub fn formatted(&self) -> String {
        encoding::format_address(&self.email, self.name.as_deref())
    }
}

impl From<&str> for Mailbox {
    fn from(email: &str) -> Self {
        Mailbox::new(None, email)
    }
}

impl From<String> for Mailbox {
    fn from(email: String) -> Self {
        Mailbox::new(None, email)
    }
}

impl From<(&str, &str)> for Mailbox {
    fn from((name, email): (&str, &str)) -> Self {
        Mailbox::new(Some(name.to_string()), email)
    }
}

impl From<(String, String)> for Mailbox {
    fn from((name, email): (String, String)) -> Self {
        Mailbox::new(Some(name), email)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    Normal,
    Urgent,
    NonUrgent,
}

impl FromStr for Priority {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" => Ok(Priority::Normal),
            "urgent" => Ok(Priority::Urgent),
            "non-urgent" => Ok(Priority::NonUrgent),
            _ => Err(crate::Error::InvalidPriority(s.to_string())),
        }
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::Normal => write!(f, "normal"),
            Priority::Urgent => write!(f, "urgent"),
            Priority::NonUrgent => write!(f, "non-urgent"),
        }
    }
}

/// A file attached to the message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    filename: String,
    content_type: String,
    contents: Vec<u8>,
}

impl Attachment {
    pub fn new(filename: impl Into<String>, contents: impl Into<Vec<u8>>) -> Self {
        Attachment {
            filename: filename.into(),
            content_type: "application/octet-stream".to_string(),
            contents: contents.into(),
        }
    }

    /// Reads an attachment from disk, named after the file itself.
    pub fn from_path(path: impl AsRef<Path>) -> crate::Result<Self> {
        let path = path.as_ref();
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let contents = std::fs::read(path)
            .map_err(|err| crate::Error::Attachment(path.display().to_string(), err))?;
        Ok(Attachment::new(filename, contents))
    }

    /// Name used in the `Content-Disposition` header and to reference the
    /// attachment inline from the HTML body.
    pub fn inline_name(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        self
    }

    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn contents(&self) -> &[u8] {
        &self.contents
    }

    /// Stable Content-ID derived from the file name.
    pub fn content_id(&self) -> String {
        encoding::content_id(&self.filename)
    }
}

/// A validated, immutable message ready for composition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    from: Mailbox,
    to: Vec<Mailbox>,
    reply_to: Option<Mailbox>,
    subject: String,
    text: String,
    html: String,
    attachments: Vec<Attachment>,
    headers: Vec<(String, String)>,
    date: Option<DateTime<Utc>>,
    message_id: Option<String>,
    x_mailer: Option<String>,
    priority: Option<Priority>,
}

impl Message {
    pub fn builder() -> MessageBuilder {
        MessageBuilder::new()
    }

    pub fn from(&self) -> &Mailbox {
        &self.from
    }

    pub fn to(&self) -> &[Mailbox] {
        &self.to
    }

    pub fn reply_to(&self) -> Option<&Mailbox> {
        self.reply_to.as_ref()
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn date(&self) -> Option<&DateTime<Utc>> {
        self.date.as_ref()
    }

    pub fn message_id(&self) -> Option<&str> {
        self.message_id.as_deref()
    }

    pub fn x_mailer(&self) -> Option<&str> {
        self.x_mailer.as_deref()
    }

    pub fn priority(&self) -> Option<Priority> {
        self.priority
    }

    /// Composes the message and wraps it in an envelope addressed to
    /// every recipient.
    pub fn envelope(&self) -> Envelope<'_> {
        let mime = self.compose();
        Envelope::new(
            self.from.email.as_str(),
            self.to.iter().map(|rcpt| rcpt.email.as_str()),
            mime.headers,
            mime.body,
        )
    }
}

/// Accumulates message fields; [`MessageBuilder::build`] validates them.
#[derive(Debug, Clone, Default)]
pub struct MessageBuilder {
    from: Mailbox,
    to: Vec<Mailbox>,
    reply_to: Option<Mailbox>,
    subject: String,
    text: String,
    html: String,
    attachments: Vec<Attachment>,
    headers: Vec<(String, String)>,
    date: Option<DateTime<Utc>>,
    message_id: Option<String>,
    x_mailer: Option<String>,
    priority: Option<String>,
}

impl MessageBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the sender of the message.
    pub fn from(mut self, from: impl Into<Mailbox>) -> Self {
        self.from = from.into();
        self
    }

    /// Add a message recipient.
    pub fn to(mut self, to: impl Into<Mailbox>) -> Self {
        self.to.push(to.into());
        self
    }

    /// Add several message recipients, keeping their order.
    pub fn recipients<T: Into<Mailbox>>(mut self, to: impl IntoIterator<Item = T>) -> Self {
        self.to.extend(to.into_iter().map(Into::into));
        self
    }

    pub fn reply_to(mut self, reply_to: impl Into<Mailbox>) -> Self {
        self.reply_to = Some(reply_to.into());
        self
    }

    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    pub fn text_body(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn html_body(mut self, html: impl Into<String>) -> Self {
        self.html = html.into();
        self
    }

    /// Sets the HTML body and derives the plain text body from it.
    pub fn html_body_with_alt_text(mut self, html: impl Into<String>) -> Self {
        self.html = html.into();
        self.text = encoding::strip_tags(&self.html);
        self
    }

    /// Adds an attachment. An attachment with the same file name replaces
    /// the existing one.
    pub fn attachment(mut self, attachment: Attachment) -> Self {
        match self
            .attachments
            .iter_mut()
            .find(|existing| existing.filename == attachment.filename)
        {
            Some(existing) => *existing = attachment,
            None => self.attachments.push(attachment),
        }
        self
    }

    /// Adds a custom header, emitted after the standard ones.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn date<Tz: TimeZone>(mut self, date: DateTime<Tz>) -> Self {
        self.date = Some(date.with_timezone(&Utc));
        self
    }

    pub fn message_id(mut self, message_id: impl Into<String>) -> Self {
        self.message_id = Some(message_id.into());
        self
    }

    pub fn x_mailer(mut self, x_mailer: impl Into<String>) -> Self {
        self.x_mailer = Some(x_mailer.into());
        self
    }

    /// One of `normal`, `urgent` or `non-urgent`, checked by [`MessageBuilder::build`].
    pub fn priority(mut self, priority: impl ToString) -> Self {
        self.priority = Some(priority.to_string());
        self
    }

    pub fn build(self) -> crate::Result<Message> {
        if self.to.is_empty() || self.to.iter().any(|rcpt| rcpt.email.is_empty()) {
            return Err(crate::Error::MissingRcptTo);
        }
        if self.from.email.is_empty() {
            return Err(crate::Error::MissingMailFrom);
        }
        for mailbox in self.to.iter().chain([&self.from]).chain(&self.reply_to) {
            check_address(&mailbox.email)?;
        }
        if self.subject.is_empty() {
            return Err(crate::Error::MissingSubject);
        }
        if self.text.is_empty() && self.html.is_empty() {
            return Err(crate::Error::MissingBody);
        }
        let priority = self
            .priority
            .filter(|priority| !priority.is_empty())
            .map(|priority| priority.parse::<Priority>())
            .transpose()?;

        Ok(Message {
            from: self.from,
            to: self.to,
            reply_to: self.reply_to.filter(|reply_to| !reply_to.email.is_empty()),
            subject: self.subject,
            text: self.text,
            html: self.html,
            attachments: self.attachments,
            headers: self.headers,
            date: self.date,
            message_id: self.message_id,
            x_mailer: self.x_mailer,
            priority,
        })
    }
}

#[cfg(test)]
mod test {
    use crate::{Error, MessageBuilder, Priority};

    use super::{Attachment, Mailbox};

    fn builder() -> MessageBuilder {
        MessageBuilder::new()
            .from(("John Doe", "john@example.com"))
            .to("jane@example.com")
            .subject("Hello")
            .text_body("Hello world")
    }

    #[test]
    fn validation() {
        assert!(builder().build().is_ok());

        for (builder, expected) in [
            (
                MessageBuilder::new()
                    .from("john@example.com")
                    .subject("Hello")
                    .text_body("Hi"),
                Error::MissingRcptTo,
            ),
            (builder().to(""), Error::MissingRcptTo),
            (builder().from(""), Error::MissingMailFrom),
            (
                builder().to("jane@example.com>\r\nRCPT TO:<evil@example.net"),
                Error::InvalidAddress("jane@example.com>\r\nRCPT TO:<evil@example.net".to_string()),
            ),
            (
                builder().from("john@example.com\r\nDATA"),
                Error::InvalidAddress("john@example.com\r\nDATA".to_string()),
            ),
            (
                builder().reply_to("<replies@example.com>"),
                Error::InvalidAddress("<replies@example.com>".to_string()),
            ),
            (builder().subject(""), Error::MissingSubject),
            (builder().text_body(""), Error::MissingBody),
            (
                builder().priority("no-urgent"),
                Error::InvalidPriority("no-urgent".to_string()),
            ),
        ] {
            let err = builder.build().unwrap_err();
            assert!(err.is_validation());
            assert_eq!(err.to_string(), expected.to_string());
        }

        // An HTML body alone is enough
        assert!(builder().text_body("").html_body("<b>Hi</b>").build().is_ok());
    }

    #[test]
    fn priorities() {
        for (value, priority) in [
            ("normal", Priority::Normal),
            ("urgent", Priority::Urgent),
            ("non-urgent", Priority::NonUrgent),
        ] {
            let message = builder().priority(value).build().unwrap();
            assert_eq!(message.priority(), Some(priority));
            assert_eq!(priority.to_string(), value);
        }
        assert_eq!(builder().build().unwrap().priority(), None);
    }

    #[test]
    fn mailboxes_and_attachments() {
        assert_eq!(
            Mailbox::from(("", "a@x.com")),
            Mailbox {
                email: "a@x.com".to_string(),
                name: None
            }
        );

        let message = builder()
            .attachment(Attachment::new("a.txt", "one"))
            .attachment(Attachment::new("b.txt", "two"))
            .attachment(Attachment::new("a.txt", "three"))
            .build()
            .unwrap();
        assert_eq!(
            message
                .attachments()
                .iter()
                .map(|attachment| (attachment.filename(), attachment.contents()))
                .collect::<Vec<_>>(),
            [("a.txt", &b"three"[..]), ("b.txt", &b"two"[..])]
        );
        assert_eq!(
            message.attachments()[0].content_id(),
            super::encoding::content_id("a.txt")
        );

        let message = builder()
            .html_body_with_alt_text("<p>Hello <b>there</b></p>")
            .build()
            .unwrap();
        assert_eq!(message.text(), "Hello there");
    }

    #[test]
    fn attachment_from_path() {
        let path = std::env::temp_dir().join(format!(
            "mail-dispatch-{}-report.csv",
            std::process::id()
        ));
        std::fs::write(&path, b"a,b\n1,2\n").unwrap();
        let attachment = Attachment::from_path(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert!(attachment.filename().ends_with("-report.csv"));
        assert_eq!(attachment.contents(), b"a,b\n1,2\n");
        assert_eq!(
            attachment.inline_name("report.csv").filename(),
            "report.csv"
        );

        assert!(matches!(
            Attachment::from_path("/nonexistent/report.csv"),
            Err(Error::Attachment(..))
        ));
    }
}

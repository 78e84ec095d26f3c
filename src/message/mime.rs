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

use chrono::Utc;

use super::{
    encoding::{base64_lines, boundary, embed_content_ids, encode_word, format_date},
    Attachment, Message,
};

/// Output of [`Message::compose`]: the formatted addresses, the header
/// block and the body, ready to be handed to a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MimeMessage {
    pub from: String,
    pub to: String,
    pub headers: String,
    pub body: String,
}

enum Layout {
    Plain,
    Alternative,
    PlainAttachments,
    AlternativeAttachments,
}

impl Message {
    /// Renders the header block and body. Multipart boundaries are random,
    /// so two compositions of the same message differ only in them.
    pub fn compose(&self) -> MimeMessage {
        let from = self.from.formatted();
        let to = self
            .to
            .iter()
            .map(|rcpt| rcpt.formatted())
            .collect::<Vec<_>>()
            .join(", ");

        let layout = match (
            !self.text.is_empty() && !self.html.is_empty(),
            self.attachments.is_empty(),
        ) {
            (false, true) => Layout::Plain,
            (true, true) => Layout::Alternative,
            (false, false) => Layout::PlainAttachments,
            (true, false) => Layout::AlternativeAttachments,
        };

        let mut headers = String::with_capacity(512);
        headers.push_str(&format!("To: {}\r\n", to));
        headers.push_str(&format!("Subject: {}\r\n", encode_word(&self.subject)));
        if let Some(message_id) = &self.message_id {
            headers.push_str(&format!("Message-ID: {}\r\n", message_id));
        }
        if let Some(x_mailer) = &self.x_mailer {
            headers.push_str(&format!("X-Mailer: {}\r\n", x_mailer));
        }
        headers.push_str("MIME-Version: 1.0\r\n");
        headers.push_str(&format!("From: {}\r\n", from));
        let reply_to = match &self.reply_to {
            Some(reply_to) if reply_to.name.is_some() => reply_to.formatted(),
            Some(reply_to) => reply_to.email.clone(),
            None => from.clone(),
        };
        headers.push_str(&format!("Reply-To: {}\r\n", reply_to));
        headers.push_str(&format!(
            "Date: {}\r\n",
            format_date(&self.date.unwrap_or_else(Utc::now))
        ));
        if let Some(priority) = &self.priority {
            headers.push_str(&format!("Priority: {}\r\n", priority));
        }
        for (name, value) in &self.headers {
            headers.push_str(&format!("{}: {}\r\n", name, value));
        }

        let mut body = String::with_capacity(
            self.text.len() + self.html.len() * 2 + 512,
        );
        match layout {
            Layout::Plain => {
                if self.html.is_empty() {
                    headers.push_str("Content-Type: text/plain; charset=\"UTF-8\"\r\n");
                    body.push_str(&self.text);
                } else {
                    headers.push_str("Content-Type: text/html; charset=\"UTF-8\"\r\n");
                    body.push_str(&self.html);
                }
            }
            Layout::Alternative => {
                let boundary = boundary();
                headers.push_str(&format!(
                    "Content-Type: multipart/alternative; format=flowed; delsp=yes; boundary=\"{}\"\r\n",
                    boundary
                ));
                body.push_str(&format!("--{}\r\n", boundary));
                write_text_part(&mut body, "text/plain", &self.text);
                body.push_str(&format!("\r\n--{}\r\n", boundary));
                write_text_part(&mut body, "text/html", &self.html);
                body.push_str(&format!("\r\n--{}--", boundary));
            }
            Layout::PlainAttachments => {
                let boundary = boundary();
                headers.push_str(&format!(
                    "Content-Type: multipart/mixed; boundary=\"{}\"\r\n",
                    boundary
                ));
                body.push_str(&format!("--{}\r\n", boundary));
                if !self.text.is_empty() {
                    write_text_part(&mut body, "text/plain", &self.text);
                } else {
                    write_text_part(&mut body, "text/html", &self.embedded_html());
                }
                self.write_attachments(&mut body, &boundary);
                body.push_str(&format!("\r\n--{}--", boundary));
            }
            Layout::AlternativeAttachments => {
                let boundary = boundary();
                let inner = format!("bd2_{}", boundary);
                headers.push_str(&format!(
                    "Content-Type: multipart/mixed; boundary=\"{}\"\r\n",
                    boundary
                ));
                body.push_str(&format!("--{}\r\n", boundary));
                body.push_str(&format!(
                    "Content-Type: multipart/alternative; boundary=\"{}\"\r\n\r\n",
                    inner
                ));
                body.push_str(&format!("--{}\r\n", inner));
                write_text_part(&mut body, "text/plain", &self.text);
                body.push_str(&format!("\r\n--{}\r\n", inner));
                write_text_part(&mut body, "text/html", &self.embedded_html());
                body.push_str(&format!("\r\n--{}--", inner));
                self.write_attachments(&mut body, &boundary);
                body.push_str(&format!("\r\n--{}--", boundary));
            }
        }

        MimeMessage {
            from,
            to,
            headers,
            body,
        }
    }

    fn embedded_html(&self) -> String {
        embed_content_ids(
            &self.html,
            self.attachments.iter().map(|attachment| attachment.filename()),
        )
    }

    fn write_attachments(&self, body: &mut String, boundary: &str) {
        for attachment in &self.attachments {
            body.push_str(&format!("\r\n--{}\r\n", boundary));
            write_attachment_part(body, attachment);
        }
    }
}

fn write_text_part(body: &mut String, content_type: &str, text: &str) {
    body.push_str(&format!(
        "Content-Type: {}; charset=\"UTF-8\"\r\nContent-Transfer-Encoding: base64\r\n\r\n",
        content_type
    ));
    body.push_str(&base64_lines(text.as_bytes()));
}

fn write_attachment_part(body: &mut String, attachment: &Attachment) {
    body.push_str(&format!(
        concat!(
            "Content-Type: {}\r\n",
            "Content-Transfer-Encoding: base64\r\n",
            "Content-Disposition: attachment; filename=\"{}\"\r\n",
            "Content-ID: <{}>\r\n\r\n"
        ),
        attachment.content_type,
        attachment.filename,
        attachment.content_id()
    ));
    body.push_str(&base64_lines(&attachment.contents));
}

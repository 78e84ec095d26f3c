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

use crate::{Message, Transport};

/// Composes messages and hands them to a [`Transport`].
#[derive(Debug, Clone)]
pub struct Mailer<T: Transport> {
    transport: T,
}

impl<T: Transport> Mailer<T> {
    pub fn new(transport: T) -> Self {
        Mailer { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Composes `message` and delivers it to every recipient.
    pub async fn send(&self, message: &Message) -> crate::Result<bool> {
        let envelope = message.envelope();
        log::debug!(
            "Sending message from {} to {} recipient(s)",
            envelope.mail_from,
            envelope.rcpt_to.len()
        );
        self.transport.send(&envelope).await
    }
}

#[cfg(test)]
mod test {
    use crate::{Mailer, MessageBuilder, StubTransport};

    #[tokio::test]
    async fn send_through_stub() {
        let message = MessageBuilder::new()
            .from(("John Doe", "john@example.com"))
            .to("jane@example.com")
            .to(("Bob", "bob@example.com"))
            .subject("Hello")
            .text_body("Hello world")
            .build()
            .unwrap();

        let mailer = Mailer::new(StubTransport::new_positive());
        assert!(mailer.send(&message).await.unwrap());

        let sent = mailer.transport().messages();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].mail_from, "john@example.com");
        assert_eq!(sent[0].rcpt_to, ["jane@example.com", "bob@example.com"]);
        assert!(sent[0]
            .headers
            .starts_with("To: <jane@example.com>, Bob <bob@example.com>\r\n"));
        assert_eq!(sent[0].body, "Hello world");

        let mailer = Mailer::new(Box::new(StubTransport::new(false)));
        assert!(!mailer.send(&message).await.unwrap());
    }
}

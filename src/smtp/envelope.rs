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

use tokio::io::{AsyncRead, AsyncWrite};

use crate::SmtpClient;

use super::{stream::write_message, transcript::Direction, AssertReply};

impl<T: AsyncRead + AsyncWrite + Unpin> SmtpClient<'_, T> {
    /// Sends a MAIL FROM command to the server.
    pub async fn mail_from(&mut self, addr: &str) -> crate::Result<()> {
        self.cmd(&format!("MAIL FROM:<{}>", addr))
            .await?
            .assert_code(250)
    }

    /// Sends a RCPT TO command to the server.
    pub async fn rcpt_to(&mut self, addr: &str) -> crate::Result<()> {
        self.cmd(&format!("RCPT TO:<{}>", addr))
            .await?
            .assert_code(250)
    }

    /// Sends a DATA command followed by the header block, a blank line
    /// and the body.
    pub async fn data(&mut self, headers: &str, body: &str) -> crate::Result<()> {
        self.cmd("DATA").await?.assert_code(354)?;

        let message = format!("{}\r\n\r\n{}", headers.trim(), body.trim());
        let timeout = self.timeout;
        tokio::time::timeout(timeout, async {
            self.transcript
                .record(Direction::ClientToServer, message.as_bytes());
            self.transcript.record(Direction::ClientToServer, b".");
            write_message(&mut self.stream, message.as_bytes()).await?;
            self.read().await
        })
        .await
        .map_err(|_| crate::Error::Timeout(timeout))??
        .assert_code(250)
    }
}

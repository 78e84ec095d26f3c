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

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use super::{
    reply::{Reply, ReplyError, ReplyParser},
    transcript::Direction,
    SmtpClient,
};

const REDACTED: &str = "<redacted>";

impl<T: AsyncRead + AsyncWrite + Unpin> SmtpClient<'_, T> {
    /// Reads a complete reply from the server.
    ///
    /// Bytes following the final reply line are discarded, the session never
    /// pipelines commands.
    pub(crate) async fn read(&mut self) -> crate::Result<Reply> {
        let mut buf = vec![0u8; 1024];
        let mut parser = ReplyParser::new();

        loop {
            let br = self.stream.read(&mut buf).await?;

            if br == 0 {
                return Err(crate::Error::IncompleteReply);
            }

            match parser.parse(&buf[..br]) {
                Ok(reply) => {
                    for line in reply.lines() {
                        self.transcript
                            .record(Direction::ServerToClient, line.as_bytes());
                    }
                    return Ok(reply);
                }
                Err(ReplyError::NeedsMoreData) => (),
                Err(err) => {
                    self.transcript
                        .record(Direction::ServerToClient, &buf[..br]);
                    return Err(err.into());
                }
            }
        }
    }

    /// Reads a reply within the configured timeout.
    pub async fn read_reply(&mut self) -> crate::Result<Reply> {
        let timeout = self.timeout;
        tokio::time::timeout(timeout, self.read())
            .await
            .map_err(|_| crate::Error::Timeout(timeout))?
    }

    /// Writes a single command line, appending CRLF.
    pub(crate) async fn write_line(&mut self, line: &str) -> crate::Result<()> {
        self.write_recorded(line, line).await
    }

    /// Writes `line` while the transcript and the log only see `recorded`.
    async fn write_recorded(&mut self, line: &str, recorded: &str) -> crate::Result<()> {
        self.transcript
            .record(Direction::ClientToServer, recorded.as_bytes());
        self.stream.write_all(line.as_bytes()).await?;
        self.stream.write_all(b"\r\n").await?;
        self.stream.flush().await?;
        Ok(())
    }

    /// Sends a command to the SMTP server and waits for a reply.
    pub async fn cmd(&mut self, line: &str) -> crate::Result<Reply> {
        let timeout = self.timeout;
        tokio::time::timeout(timeout, async {
            self.write_line(line).await?;
            self.read().await
        })
        .await
        .map_err(|_| crate::Error::Timeout(timeout))?
    }

    /// Like [`SmtpClient::cmd`], for lines carrying secrets. The line is
    /// recorded as `<redacted>`.
    pub(crate) async fn cmd_redacted(&mut self, line: &str) -> crate::Result<Reply> {
        let timeout = self.timeout;
        tokio::time::timeout(timeout, async {
            self.write_recorded(line, REDACTED).await?;
            self.read().await
        })
        .await
        .map_err(|_| crate::Error::Timeout(timeout))?
    }

    /// Sends a QUIT command and closes the connection without waiting
    /// for the server to acknowledge it.
    pub async fn quit(mut self) -> crate::Result<()> {
        let timeout = self.timeout;
        tokio::time::timeout(timeout, async {
            self.write_line("QUIT").await?;
            self.stream.shutdown().await?;
            Ok(())
        })
        .await
        .map_err(|_| crate::Error::Timeout(timeout))?
    }
}

#[cfg(test)]
mod test {
    use std::time::Duration;

    use tokio::io::AsyncWriteExt;

    use crate::{
        smtp::{transcript::Transcript, AssertReply, SmtpClient},
        Error,
    };

    #[tokio::test]
    async fn cmd_and_reply() {
        let (client_io, mut server_io) = tokio::io::duplex(4096);
        server_io
            .write_all(b"250-mx.test\r\n250 HELP\r\n")
            .await
            .unwrap();

        let mut transcript = Transcript::new(true);
        let mut client = SmtpClient::new(client_io, Duration::from_secs(5), &mut transcript);
        let reply = client.cmd("NOOP").await.unwrap();
        assert_eq!(reply.code(), 250);
        assert_eq!(reply.lines().len(), 2);
        assert!(matches!(
            reply.assert_code(354),
            Err(Error::UnexpectedReply { expected: 354, .. })
        ));
    }

    #[tokio::test]
    async fn closed_stream() {
        let (client_io, server_io) = tokio::io::duplex(4096);
        drop(server_io);

        let mut transcript = Transcript::default();
        let mut client = SmtpClient::new(client_io, Duration::from_secs(5), &mut transcript);
        assert!(matches!(
            client.read_reply().await,
            Err(Error::IncompleteReply)
        ));
    }

    #[tokio::test]
    async fn reply_timeout() {
        let (client_io, _server_io) = tokio::io::duplex(4096);

        let mut transcript = Transcript::default();
        let mut client =
            SmtpClient::new(client_io, Duration::from_millis(50), &mut transcript);
        assert!(matches!(
            client.read_reply().await,
            Err(Error::Timeout(_))
        ));
    }
}

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

use std::fmt::Debug;

use base64::{engine::general_purpose::STANDARD, Engine};
use tokio::io::{AsyncRead, AsyncWrite};

use crate::SmtpClient;

use super::AssertReply;

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    secret: String,
}

impl From<(&str, &str)> for Credentials {
    fn from(credentials: (&str, &str)) -> Self {
        Credentials::new(credentials.0, credentials.1)
    }
}

impl From<(String, String)> for Credentials {
    fn from(credentials: (String, String)) -> Self {
        Credentials {
            username: credentials.0,
            secret: credentials.1,
        }
    }
}

impl Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("secret", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Creates a new `Credentials` instance.
    pub fn new(username: impl Into<String>, secret: impl Into<String>) -> Credentials {
        Credentials {
            username: username.into(),
            secret: secret.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub(crate) fn secret(&self) -> &str {
        &self.secret
    }

    /// Authentication is only attempted when both values are present.
    pub fn is_complete(&self) -> bool {
        !self.username.is_empty() && !self.secret.is_empty()
    }

    /// Response lines for the `LOGIN` mechanism: the base64 encoded
    /// username followed by the base64 encoded secret.
    pub(crate) fn encode_login(&self) -> [String; 2] {
        [STANDARD.encode(&self.username), STANDARD.encode(&self.secret)]
    }
}

impl<T: AsyncRead + AsyncWrite + Unpin> SmtpClient<'_, T> {
    /// Authenticates using `AUTH LOGIN`.
    pub async fn authenticate(&mut self, credentials: &Credentials) -> crate::Result<()> {
        let [username, secret] = credentials.encode_login();
        let reply = self.cmd("AUTH LOGIN").await?;
        auth_result(reply.assert_code(334))?;
        let reply = self.cmd_redacted(&username).await?;
        auth_result(reply.assert_code(334))?;
        let reply = self.cmd_redacted(&secret).await?;
        auth_result(reply.assert_code(235))
    }
}

fn auth_result(result: crate::Result<()>) -> crate::Result<()> {
    match result {
        Err(crate::Error::UnexpectedReply { reply, .. }) => {
            Err(crate::Error::AuthenticationFailed(reply))
        }
        result => result,
    }
}

#[cfg(test)]
mod test {
    use std::time::Duration;

    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

    use crate::{
        smtp::{
            transcript::{Direction, Transcript},
            SmtpClient,
        },
        Credentials, Error,
    };

    #[test]
    fn auth_encode() {
        assert_eq!(
            Credentials::new("tim", "tanstaaftanstaaf").encode_login(),
            ["dGlt".to_string(), "dGFuc3RhYWZ0YW5zdGFhZg==".to_string()]
        );
        assert!(!Credentials::new("tim", "").is_complete());
        assert!(!format!("{:?}", Credentials::new("tim", "tanstaaf")).contains("tanstaaf"));
    }

    async fn auth_exchange(
        replies: &'static [&'static str],
    ) -> (crate::Result<()>, Vec<String>, Transcript) {
        let (client_io, server_io) = tokio::io::duplex(4096);
        let server = tokio::spawn(async move {
            let (read, mut write) = tokio::io::split(server_io);
            let mut lines = BufReader::new(read).lines();
            let mut received = Vec::new();
            for reply in replies {
                match lines.next_line().await.unwrap() {
                    Some(line) => received.push(line),
                    None => break,
                }
                write.write_all(reply.as_bytes()).await.unwrap();
            }
            received
        });

        let mut transcript = Transcript::new(true);
        let mut client = SmtpClient::new(client_io, Duration::from_secs(5), &mut transcript);
        let result = client
            .authenticate(&Credentials::new("tim", "tanstaaftanstaaf"))
            .await;
        drop(client);
        (result, server.await.unwrap(), transcript)
    }

    #[tokio::test]
    async fn auth_login() {
        let (result, received, transcript) = auth_exchange(&[
            "334 VXNlcm5hbWU6\r\n",
            "334 UGFzc3dvcmQ6\r\n",
            "235 2.7.0 Authentication successful\r\n",
        ])
        .await;
        result.unwrap();
        assert_eq!(
            received,
            ["AUTH LOGIN", "dGlt", "dGFuc3RhYWZ0YW5zdGFhZg=="]
        );

        // Encoded credentials never reach the transcript
        assert_eq!(
            transcript
                .lines(Direction::ClientToServer)
                .collect::<Vec<_>>(),
            ["AUTH LOGIN", "<redacted>", "<redacted>"]
        );
        assert!(!transcript.to_string().contains("dGFuc3RhYWZ0YW5zdGFhZg=="));

        let (result, received, _) = auth_exchange(&[
            "334 VXNlcm5hbWU6\r\n",
            "334 UGFzc3dvcmQ6\r\n",
            "535 5.7.8 Authentication credentials invalid\r\n",
        ])
        .await;
        match result {
            Err(Error::AuthenticationFailed(reply)) => assert_eq!(reply.code(), 535),
            other => panic!("unexpected result {other:?}"),
        }
        assert_eq!(received.len(), 3);
    }
}

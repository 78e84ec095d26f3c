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

use super::{reply::Reply, AssertReply};

impl<T: AsyncRead + AsyncWrite + Unpin> SmtpClient<'_, T> {
    /// Reads the `220` greeting and introduces the client with EHLO.
    pub async fn greet(&mut self, hostname: &str) -> crate::Result<Reply> {
        self.read_reply().await?.assert_code(220)?;
        self.ehlo(hostname).await
    }

    /// Sends a EHLO command to the server.
    pub async fn ehlo(&mut self, hostname: &str) -> crate::Result<Reply> {
        let reply = self.cmd(&format!("EHLO {hostname}")).await?;
        if reply.code() == 250 {
            Ok(reply)
        } else {
            Err(crate::Error::UnexpectedReply {
                expected: 250,
                reply,
            })
        }
    }
}

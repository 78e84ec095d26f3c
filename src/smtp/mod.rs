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

use std::time::Duration;

use tokio::io::{AsyncRead, AsyncWrite};

use self::{reply::Reply, transcript::Transcript};

pub mod auth;
pub mod client;
pub mod ehlo;
pub mod envelope;
pub mod proxy;
pub mod reply;
pub mod stream;
pub mod tls;
pub mod transcript;

/// SMTP client session over a single duplex stream.
///
/// The stream is owned by the client and closed when the client is dropped,
/// whichever way the session ends.
pub struct SmtpClient<'x, T: AsyncRead + AsyncWrite> {
    pub stream: T,
    pub timeout: Duration,
    pub transcript: &'x mut Transcript,
}

impl<'x, T: AsyncRead + AsyncWrite + Unpin> SmtpClient<'x, T> {
    pub fn new(stream: T, timeout: Duration, transcript: &'x mut Transcript) -> Self {
        SmtpClient {
            stream,
            timeout,
            transcript,
        }
    }
}

pub trait AssertReply: Sized {
    fn assert_code(self, code: u16) -> crate::Result<()>;
}

impl AssertReply for Reply {
    /// Returns an error if the reply code is not the expected one.
    fn assert_code(self, code: u16) -> crate::Result<()> {
        if self.code() == code {
            Ok(())
        } else {
            Err(crate::Error::UnexpectedReply {
                expected: code,
                reply: self,
            })
        }
    }
}

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

use std::borrow::Cow;

use async_trait::async_trait;

pub mod smtp;
pub mod stub;

/// Delivery mechanism for composed messages.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Delivers the envelope. Returns `Ok(false)` when the transport
    /// chose to report a delivery failure without its details.
    async fn send(&self, envelope: &Envelope<'_>) -> crate::Result<bool>;
}

/// Sender and recipient addresses plus the pre-built header block and body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Envelope<'x> {
    pub mail_from: Cow<'x, str>,
    pub rcpt_to: Vec<Cow<'x, str>>,
    pub headers: Cow<'x, str>,
    pub body: Cow<'x, str>,
}

impl<'x> Envelope<'x> {
    /// Create a new envelope
    pub fn new<T, U, V, W>(from: T, to: U, headers: V, body: W) -> Self
    where
        T: Into<Cow<'x, str>>,
        U: IntoIterator,
        U::Item: Into<Cow<'x, str>>,
        V: Into<Cow<'x, str>>,
        W: Into<Cow<'x, str>>,
    {
        Envelope {
            mail_from: from.into(),
            rcpt_to: to.into_iter().map(Into::into).collect(),
            headers: headers.into(),
            body: body.into(),
        }
    }

    /// Rejects envelopes without recipients and addresses that would break
    /// out of `MAIL FROM:<..>` or `RCPT TO:<..>`.
    pub fn validate(&self) -> crate::Result<()> {
        if self.rcpt_to.is_empty() {
            return Err(crate::Error::MissingRcptTo);
        }
        check_address(&self.mail_from)?;
        for rcpt in &self.rcpt_to {
            check_address(rcpt)?;
        }
        Ok(())
    }

    pub fn into_owned(self) -> Envelope<'static> {
        Envelope {
            mail_from: self.mail_from.into_owned().into(),
            rcpt_to: self
                .rcpt_to
                .into_iter()
                .map(|rcpt| rcpt.into_owned().into())
                .collect(),
            headers: self.headers.into_owned().into(),
            body: self.body.into_owned().into(),
        }
    }
}

pub(crate) fn check_address(address: &str) -> crate::Result<()> {
    if address.contains(['\r', '\n', '<', '>']) {
        Err(crate::Error::InvalidAddress(address.to_string()))
    } else {
        Ok(())
    }
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for &T {
    async fn send(&self, envelope: &Envelope<'_>) -> crate::Result<bool> {
        (**self).send(envelope).await
    }
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Box<T> {
    async fn send(&self, envelope: &Envelope<'_>) -> crate::Result<bool> {
        (**self).send(envelope).await
    }
}

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

//! The stub transport keeps every envelope in memory and returns a fixed
//! outcome. It can be useful for testing purposes.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use super::{Envelope, Transport};

#[derive(Debug, Default)]
pub struct StubTransport {
    response: bool,
    sent: Mutex<Vec<Envelope<'static>>>,
}

impl StubTransport {
    /// Creates a new transport that always returns the given response
    pub fn new(response: bool) -> Self {
        StubTransport {
            response,
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Creates a new transport that always reports a successful delivery
    pub fn new_positive() -> Self {
        StubTransport::new(true)
    }

    /// Envelopes handed to the transport so far.
    pub fn messages(&self) -> Vec<Envelope<'static>> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn send(&self, envelope: &Envelope<'_>) -> crate::Result<bool> {
        log::debug!(
            "stub transport: from {} to {:?}",
            envelope.mail_from,
            envelope.rcpt_to
        );
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(envelope.clone().into_owned());
        Ok(self.response)
    }
}

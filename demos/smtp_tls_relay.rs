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

use mail_dispatch::{Encryption, Envelope, SmtpTransport};

#[tokio::main]
async fn main() {
    env_logger::init();

    let envelope = Envelope::new(
        "john@example.com",
        ["jane@example.com"],
        "From: <john@example.com>\r\nTo: <jane@example.com>\r\nSubject: Hi!\r\n",
        "Hello, world!",
    );

    // Connect using implicit TLS to a relay with a self-signed certificate
    SmtpTransport::new("mail.example.com")
        .port(465)
        .encryption(Encryption::Implicit)
        .allow_invalid_certs()
        .try_send(&envelope)
        .await
        .unwrap();
}

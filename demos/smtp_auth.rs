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

use mail_dispatch::{Encryption, Mailer, MessageBuilder, SmtpTransport};

#[tokio::main]
async fn main() {
    env_logger::init();

    // Build a simple multipart message
    let message = MessageBuilder::new()
        .from(("John Doe", "john@example.com"))
        .recipients([
            ("Jane Doe", "jane@example.com"),
            ("James Smith", "james@test.com"),
        ])
        .subject("Hi!")
        .html_body("<h1>Hello, world!</h1>")
        .text_body("Hello world!")
        .build()
        .unwrap();

    // Connect to the SMTP submissions port, upgrade to TLS and
    // authenticate using the provided credentials.
    let transport = SmtpTransport::new("smtp.gmail.com")
        .port(587)
        .encryption(Encryption::StartTls)
        .credentials("john", "p4ssw0rd")
        .debug_mode(true);

    Mailer::new(transport).send(&message).await.unwrap();
}

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

use mail_dispatch::{Envelope, SmtpTransport};

#[tokio::main]
async fn main() {
    // Pre-built header block and body
    let envelope = Envelope::new(
        "jdoe@example.com",
        ["jane@example.com", "james@smith.com"],
        "From: jdoe@example.com\r\nTo: jane@example.com\r\nSubject: Hi!",
        "Hello, world!",
    );

    // Send it and print the session transcript
    let (result, transcript) = SmtpTransport::new("mail.smtp2go.com")
        .port(2525)
        .starttls(true)
        .send_traced(&envelope)
        .await;
    print!("{transcript}");
    result.unwrap();
}

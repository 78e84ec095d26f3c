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

use mail_dispatch::{Attachment, Mailer, MessageBuilder, SmtpTransport};

#[tokio::main]
async fn main() {
    env_logger::init();

    // Build a message with an inline image
    let message = MessageBuilder::new()
        .from(("John Doe", "john@example.com"))
        .to(("Jane Doe", "jane@example.com"))
        .subject("Quarterly report")
        .html_body_with_alt_text(r#"<p>Sales are up!</p><img src="chart.png">"#)
        .attachment(Attachment::new("chart.png", vec![0x89, b'P', b'N', b'G']).content_type("image/png"))
        .priority("urgent")
        .build()
        .unwrap();

    // Deliver through a plain text relay. Failures are logged and
    // reported as `false`.
    let delivered = Mailer::new(SmtpTransport::new("mail.smtp2go.com").port(2525))
        .send(&message)
        .await
        .unwrap();
    println!("delivered: {delivered}");
}

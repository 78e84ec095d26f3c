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

use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Writes a DATA payload followed by the `CRLF . CRLF` terminator,
/// doubling every dot found at the beginning of a line.
pub async fn write_message<T: AsyncWrite + Unpin>(
    stream: &mut T,
    message: &[u8],
) -> tokio::io::Result<()> {
    // Transparency procedure
    #[derive(Debug)]
    enum State {
        Cr,
        CrLf,
        Init,
    }

    let mut state = State::Init;
    let mut last_pos = 0;
    for (pos, byte) in message.iter().enumerate() {
        if *byte == b'.' && matches!(state, State::CrLf) {
            if let Some(bytes) = message.get(last_pos..pos) {
                stream.write_all(bytes).await?;
                stream.write_all(b".").await?;
                last_pos = pos;
            }
            state = State::Init;
        } else if *byte == b'\r' {
            state = State::Cr;
        } else if *byte == b'\n' && matches!(state, State::Cr) {
            state = State::CrLf;
        } else {
            state = State::Init;
        }
    }
    if let Some(bytes) = message.get(last_pos..) {
        stream.write_all(bytes).await?;
    }
    stream.write_all(b"\r\n.\r\n").await?;
    stream.flush().await
}

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

use std::fmt::Display;

pub const MAX_LINE_LENGTH: usize = 512;
pub const MAX_REPLY_LINES: usize = 128;

/// A complete, possibly multi-line, SMTP reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    code: u16,
    lines: Vec<String>,
}

impl Reply {
    pub fn code(&self) -> u16 {
        self.code
    }

    /// Raw reply lines, without the trailing CRLF.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// The final line of the reply as sent by the server.
    pub fn last_line(&self) -> &str {
        self.lines.last().map_or("", |line| line.as_str())
    }

    /// Reply text of every line, with the code and separator removed.
    pub fn message(&self) -> impl Iterator<Item = &str> {
        self.lines
            .iter()
            .map(|line| line.get(4..).unwrap_or_default())
    }
}

impl Display for Reply {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.last_line())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyError {
    InvalidReplyCode,
    InvalidSeparator,
    CodeMismatch,
    LineTooLong,
    TooManyLines,
    NeedsMoreData,
}

impl Display for ReplyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReplyError::InvalidReplyCode => write!(f, "Invalid reply code"),
            ReplyError::InvalidSeparator => write!(f, "Invalid separator after reply code"),
            ReplyError::CodeMismatch => write!(f, "Reply code changed within a multi-line reply"),
            ReplyError::LineTooLong => write!(f, "Reply line too long"),
            ReplyError::TooManyLines => write!(f, "Too many reply lines"),
            ReplyError::NeedsMoreData => write!(f, "Incomplete reply"),
        }
    }
}

/// Incremental, line-buffered reply parser.
///
/// A line whose fourth character is `-` continues the reply, a line whose
/// fourth character is a space (or that holds nothing but the code) ends it.
#[derive(Debug, Default)]
pub struct ReplyParser {
    code: Option<u16>,
    line: Vec<u8>,
    lines: Vec<String>,
}

impl ReplyParser {
    pub fn new() -> Self {
        Self::default()
    }

    fn reset(&mut self) {
        self.code = None;
        self.line.clear();
        self.lines.clear();
    }

    pub fn parse(&mut self, bytes: &[u8]) -> Result<Reply, ReplyError> {
        for &byte in bytes {
            match byte {
                b'\n' => {
                    if let Some(reply) = self.end_of_line()? {
                        return Ok(reply);
                    }
                }
                b'\r' => (),
                _ if self.line.len() < MAX_LINE_LENGTH => self.line.push(byte),
                _ => {
                    self.reset();
                    return Err(ReplyError::LineTooLong);
                }
            }
        }

        Err(ReplyError::NeedsMoreData)
    }

    fn end_of_line(&mut self) -> Result<Option<Reply>, ReplyError> {
        let line = std::mem::take(&mut self.line);

        let code = match line.get(0..3) {
            Some(digits) if digits.iter().all(u8::is_ascii_digit) => digits
                .iter()
                .fold(0u16, |code, digit| code * 10 + (digit - b'0') as u16),
            _ => {
                self.reset();
                return Err(ReplyError::InvalidReplyCode);
            }
        };
        let is_last = match line.get(3) {
            None | Some(b' ') => true,
            Some(b'-') => false,
            Some(_) => {
                self.reset();
                return Err(ReplyError::InvalidSeparator);
            }
        };

        match self.code {
            Some(current) if current != code => {
                self.reset();
                return Err(ReplyError::CodeMismatch);
            }
            _ => self.code = Some(code),
        }

        self.lines.push(String::from_utf8_lossy(&line).into_owned());

        if is_last {
            self.code = None;
            Ok(Some(Reply {
                code,
                lines: std::mem::take(&mut self.lines),
            }))
        } else if self.lines.len() >= MAX_REPLY_LINES {
            self.reset();
            Err(ReplyError::TooManyLines)
        } else {
            Ok(None)
        }
    }
}

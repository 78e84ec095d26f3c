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

use chrono::{DateTime, SecondsFormat, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    ClientToServer,
    ServerToClient,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub timestamp: DateTime<Utc>,
    pub direction: Direction,
    pub line: String,
}

/// Lines exchanged during a single SMTP session.
///
/// Every line is forwarded to the `log` facade. Lines are only retained
/// when the transcript is enabled.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    enabled: bool,
    entries: Vec<Entry>,
}

impl Transcript {
    pub fn new(enabled: bool) -> Self {
        Transcript {
            enabled,
            entries: Vec::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Lines sent in the given direction, in order.
    pub fn lines(&self, direction: Direction) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(move |entry| entry.direction == direction)
            .map(|entry| entry.line.as_str())
    }

    pub(crate) fn record(&mut self, direction: Direction, bytes: &[u8]) {
        let raw = String::from_utf8_lossy(bytes);
        for line in raw.strip_suffix("\r\n").unwrap_or(&*raw).split("\r\n") {
            log::trace!("{} {}", direction, line);
            if self.enabled {
                self.entries.push(Entry {
                    timestamp: Utc::now(),
                    direction,
                    line: line.to_string(),
                });
            }
        }
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::ClientToServer => f.write_str("C:"),
            Direction::ServerToClient => f.write_str("S:"),
        }
    }
}

impl Display for Entry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] {} {}",
            self.timestamp.to_rfc3339_opts(SecondsFormat::Micros, true),
            self.direction,
            self.line
        )
    }
}

impl Display for Transcript {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for entry in &self.entries {
            writeln!(f, "{}", entry)?;
        }
        Ok(())
    }
}

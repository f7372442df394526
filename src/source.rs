//! Line Source
//!
//! A cursor over a text stream that hands out one line at a time and can
//! un-read the most recently returned line. The lookahead is a single slot:
//! rewinding twice in a row still yields only the last line again.

use std::io::{self, BufRead};

/// One-line-lookahead reader over any buffered input
pub struct LineSource<R> {
    reader: R,
    /// The most recently returned line
    last: Option<String>,
    /// Set by `rewind`, cleared when `last` is handed out again
    rewound: bool,
}

impl<R: BufRead> LineSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            last: None,
            rewound: false,
        }
    }

    /// Next line including its line terminator, or `None` at end of input
    pub fn next_line(&mut self) -> io::Result<Option<String>> {
        if self.rewound {
            self.rewound = false;
            return Ok(self.last.clone());
        }

        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            self.last = None;
            return Ok(None);
        }

        self.last = Some(line.clone());
        Ok(Some(line))
    }

    /// Un-read the most recently returned line
    pub fn rewind(&mut self) {
        if self.last.is_some() {
            self.rewound = true;
        }
    }
}

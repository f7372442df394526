//! Component Chunker
//!
//! Groups the lines of a journal file into one [`Chunk`] per component.
//! A component starts at a header line (`/name`) and runs until the next
//! header, a draft marker (`---`), or the end of input. A draft marker at the
//! start of a chunk ends the whole sequence.

use std::io::{self, BufRead};

use crate::source::LineSource;

/// A line made only of whitespace. The empty string is not blank.
pub fn is_blank(line: &str) -> bool {
    !line.is_empty() && line.chars().all(char::is_whitespace)
}

/// A line that introduces a new component
pub fn is_component_header(line: &str) -> bool {
    line.starts_with('/')
}

/// A line marking the end of authored content
pub fn is_draft_marker(line: &str) -> bool {
    line.starts_with("---")
}

/// Raw lines of one component, header inclusive, terminators preserved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    lines: Vec<String>,
}

impl Chunk {
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    /// The header line as written (terminator included)
    pub fn header(&self) -> &str {
        self.lines.first().map(String::as_str).unwrap_or("")
    }

    /// The header without surrounding whitespace, e.g. `/chapter`
    pub fn component_id(&self) -> &str {
        self.header().trim()
    }

    /// Every line after the header
    pub fn body(&self) -> &[String] {
        self.lines.get(1..).unwrap_or(&[])
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

/// Lazy sequence of chunks over one input stream
pub struct Chunker<R> {
    source: LineSource<R>,
    finished: bool,
}

impl<R: BufRead> Chunker<R> {
    pub fn new(reader: R) -> Self {
        Self {
            source: LineSource::new(reader),
            finished: false,
        }
    }

    fn next_chunk(&mut self) -> io::Result<Option<Chunk>> {
        let header = match self.source.next_line()? {
            Some(line) if !is_draft_marker(&line) => line,
            _ => return Ok(None),
        };

        let mut lines = vec![header];
        while let Some(line) = self.source.next_line()? {
            if is_component_header(&line) || is_draft_marker(&line) {
                self.source.rewind();
                break;
            }
            lines.push(line);
        }

        Ok(Some(Chunk { lines }))
    }
}

impl<R: BufRead> Iterator for Chunker<R> {
    type Item = io::Result<Chunk>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        match self.next_chunk() {
            Ok(Some(chunk)) => Some(Ok(chunk)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

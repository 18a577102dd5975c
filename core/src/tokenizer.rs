use lazy_static::lazy_static;
use regex::{Matches, Regex};
use std::io::{self, BufRead};

lazy_static! {
    // A term is a maximal run of Unicode letters and digits; everything else separates.
    static ref RE: Regex = Regex::new(r"[\p{L}\p{N}]+").expect("valid regex");
}

/// Lazy, left-to-right sequence of `(term, position)` pairs over a string.
///
/// Terms are lower-cased; the position is the zero-based ordinal of the term
/// in the sequence, not a byte offset. Call [`tokenize`] again to restart.
pub struct Tokens<'t> {
    matches: Matches<'static, 't>,
    position: usize,
}

impl<'t> Iterator for Tokens<'t> {
    type Item = (String, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let mat = self.matches.next()?;
        let pos = self.position;
        self.position += 1;
        Some((mat.as_str().to_lowercase(), pos))
    }
}

/// Tokenize text into `(term, position)` pairs.
pub fn tokenize(text: &str) -> Tokens<'_> {
    Tokens { matches: RE.find_iter(text), position: 0 }
}

/// Eagerly tokenize a query into its terms, in order.
pub fn query_terms(text: &str) -> Vec<String> {
    tokenize(text).map(|(term, _)| term).collect()
}

/// Streaming tokenizer over a buffered reader.
///
/// Reads one line at a time, so a term never spans a newline (a separator
/// anyway). Positions keep counting across lines. Invalid UTF-8 decodes to
/// U+FFFD, which separates terms like any other symbol. A read failure is
/// yielded once and ends the stream.
pub struct TokenStream<R> {
    reader: R,
    line: Vec<u8>,
    pending: Vec<String>,
    position: usize,
    done: bool,
}

impl<R: BufRead> TokenStream<R> {
    pub fn new(reader: R) -> Self {
        Self { reader, line: Vec::new(), pending: Vec::new(), position: 0, done: false }
    }

    fn fill(&mut self) -> io::Result<bool> {
        while self.pending.is_empty() {
            self.line.clear();
            if self.reader.read_until(b'\n', &mut self.line)? == 0 {
                return Ok(false);
            }
            let text = String::from_utf8_lossy(&self.line);
            // Reversed so terms can be popped off the end in order.
            self.pending = RE.find_iter(&text).map(|m| m.as_str().to_lowercase()).collect();
            self.pending.reverse();
        }
        Ok(true)
    }
}

impl<R: BufRead> Iterator for TokenStream<R> {
    type Item = io::Result<(String, usize)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.fill() {
            Ok(true) => {
                let term = self.pending.pop()?;
                let pos = self.position;
                self.position += 1;
                Some(Ok((term, pos)))
            }
            Ok(false) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

//! Zero-copy splitter used for both lines (`'\n'`) and arguments (`' '`).
//!
//! Runs of separators collapse, so no empty token is ever produced. The
//! token count is computed up front; iteration hands out borrowed slices
//! of the original text.

#[derive(Debug, Clone)]
pub struct SplitIter<'a> {
    src: &'a str,
    sep: char,
    cursor: usize,
    seps_seen: usize,
    num_tokens: usize,
    next_token: usize,
}

impl<'a> SplitIter<'a> {
    pub fn new(src: &'a str, sep: char) -> Self {
        let mut num_tokens = 0;
        let mut in_token = false;
        for c in src.chars() {
            if c == sep {
                in_token = false;
            } else if !in_token {
                num_tokens += 1;
                in_token = true;
            }
        }

        let mut iter = Self {
            src,
            sep,
            cursor: 0,
            seps_seen: 0,
            num_tokens,
            next_token: 0,
        };
        iter.skip_seps();
        iter
    }

    pub fn token_count(&self) -> usize {
        self.num_tokens
    }

    /// Separators consumed so far.
    ///
    /// The cursor always rests on the first character of the next token, so
    /// with `'\n'` as separator `seen_seps() + 1` is the 1-based line of the
    /// token `next()` is about to return.
    pub fn seen_seps(&self) -> usize {
        self.seps_seen
    }

    /// Index of the token `next()` will return.
    pub fn position(&self) -> usize {
        self.next_token
    }

    pub fn restart(&mut self) {
        self.cursor = 0;
        self.seps_seen = 0;
        self.next_token = 0;
        self.skip_seps();
    }

    fn skip_seps(&mut self) {
        let rest = &self.src[self.cursor..];
        let trimmed = rest.trim_start_matches(self.sep);
        let skipped = rest.len() - trimmed.len();
        self.seps_seen += skipped / self.sep.len_utf8();
        self.cursor += skipped;
    }
}

impl<'a> Iterator for SplitIter<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        if self.cursor >= self.src.len() {
            return None;
        }

        let rest = &self.src[self.cursor..];
        let len = rest.find(self.sep).unwrap_or(rest.len());
        let token = &rest[..len];
        self.cursor += len;
        self.next_token += 1;
        self.skip_seps();
        Some(token)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.num_tokens - self.next_token;
        (left, Some(left))
    }
}

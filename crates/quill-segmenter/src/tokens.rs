//! Whitespace-preserving tokenizer.

/// Iterator over alternating whitespace and non-whitespace runs.
///
/// Whitespace runs are yielded as tokens of their own, so concatenating all
/// tokens reproduces the input exactly. No token is ever empty.
pub(crate) struct Tokens<'a> {
    rest: &'a str,
}

impl<'a> Tokens<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        Self { rest: text }
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let first = self.rest.chars().next()?;
        let is_space = first.is_whitespace();
        let end = self
            .rest
            .find(|c: char| c.is_whitespace() != is_space)
            .unwrap_or(self.rest.len());

        let (token, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(token)
    }
}

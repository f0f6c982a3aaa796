use regex::Regex;

/// Line terminator convention of a store blob
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Splitter {
    #[default]
    Lf,
    CrLf,
}

impl Splitter {
    pub fn as_str(self) -> &'static str {
        match self {
            Splitter::Lf => "\n",
            Splitter::CrLf => "\r\n",
        }
    }

    /// Separator placed between two blocks (one fully blank line)
    pub fn block_separator(self) -> &'static str {
        match self {
            Splitter::Lf => "\n\n",
            Splitter::CrLf => "\r\n\r\n",
        }
    }
}

/// Line-oriented view of task text.
///
/// The grammar remembers the last splitter it detected. Every split
/// helper uses that remembered splitter, so text handled after a
/// detection follows the same convention until the next `detect` call.
/// One grammar lives inside each `TaskStore`; a fresh load starts over
/// from `Splitter::Lf`.
#[derive(Debug, Clone, Default)]
pub struct LineGrammar {
    splitter: Splitter,
}

impl LineGrammar {
    pub fn new() -> Self {
        LineGrammar::default()
    }

    pub fn with_splitter(splitter: Splitter) -> Self {
        LineGrammar { splitter }
    }

    /// The splitter currently in effect
    pub fn splitter(&self) -> Splitter {
        self.splitter
    }

    /// Detect the convention of `text` and make it the sticky default.
    /// Any `\r\n` anywhere selects CRLF.
    pub fn detect(&mut self, text: &str) -> Splitter {
        self.splitter = if text.contains("\r\n") {
            Splitter::CrLf
        } else {
            Splitter::Lf
        };
        self.splitter
    }

    /// Split off the first line. `rest` is empty when there is no terminator.
    pub fn first_line_split<'a>(&self, text: &'a str) -> (&'a str, &'a str) {
        match text.split_once(self.splitter.as_str()) {
            Some((head, rest)) => (head, rest),
            None => (text, ""),
        }
    }

    /// All lines of `text`, split on the current terminator
    pub fn lines<'a>(&self, text: &'a str) -> Vec<&'a str> {
        text.split(self.splitter.as_str()).collect()
    }

    pub fn join<S: AsRef<str>>(&self, lines: &[S]) -> String {
        let parts: Vec<&str> = lines.iter().map(|l| l.as_ref()).collect();
        parts.join(self.splitter.as_str())
    }

    /// Rewrite every line ending in `text` to the current splitter
    pub fn normalize(&self, text: &str) -> String {
        let unified = text.replace("\r\n", "\n");
        match self.splitter {
            Splitter::Lf => unified,
            Splitter::CrLf => unified.replace('\n', "\r\n"),
        }
    }

    /// Split on runs of two or more terminators (lines holding only
    /// spaces or tabs count as blank). Empty blocks are dropped and each
    /// block is trimmed.
    pub fn block_split(&self, text: &str) -> Vec<String> {
        let term = regex::escape(self.splitter.as_str());
        let pattern = format!("{term}(?:[ \\t]*{term})+");
        let re = match Regex::new(&pattern) {
            Ok(re) => re,
            Err(_) => return vec![text.trim().to_string()],
        };
        re.split(text)
            .map(str::trim)
            .filter(|block| !block.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_prefers_crlf_when_present_anywhere() {
        let mut grammar = LineGrammar::new();
        assert_eq!(grammar.detect("a\nb\r\nc"), Splitter::CrLf);
        assert_eq!(grammar.detect("a\nb"), Splitter::Lf);
    }

    #[test]
    fn detected_splitter_is_sticky() {
        let mut grammar = LineGrammar::new();
        grammar.detect("one\r\ntwo");
        // No re-detection: LF-only text is not split on the CRLF default.
        assert_eq!(grammar.first_line_split("x\ny"), ("x\ny", ""));
        assert_eq!(grammar.first_line_split("x\r\ny\r\nz"), ("x", "y\r\nz"));
    }

    #[test]
    fn first_line_split_without_terminator() {
        let grammar = LineGrammar::new();
        assert_eq!(grammar.first_line_split("Buy milk"), ("Buy milk", ""));
        assert_eq!(grammar.first_line_split("a\nb\nc"), ("a", "b\nc"));
    }

    #[test]
    fn block_split_drops_empty_blocks_and_trims() {
        let grammar = LineGrammar::new();
        let blocks = grammar.block_split("\n\n first\nline two \n\n\n\nsecond\n  \nthird\n\n");
        assert_eq!(blocks, vec!["first\nline two", "second", "third"]);
    }

    #[test]
    fn block_split_crlf() {
        let mut grammar = LineGrammar::new();
        let text = "a\r\nb\r\n\r\nc\r\n";
        grammar.detect(text);
        assert_eq!(grammar.block_split(text), vec!["a\r\nb", "c"]);
    }

    #[test]
    fn single_terminator_does_not_split_blocks() {
        let grammar = LineGrammar::new();
        assert_eq!(grammar.block_split("a\nb\nc"), vec!["a\nb\nc"]);
    }

    #[test]
    fn normalize_converts_mixed_endings() {
        let crlf = LineGrammar::with_splitter(Splitter::CrLf);
        assert_eq!(crlf.normalize("a\nb\r\nc"), "a\r\nb\r\nc");
        assert_eq!(LineGrammar::new().normalize("a\r\nb\nc"), "a\nb\nc");
    }

    #[test]
    fn join_uses_current_splitter() {
        let grammar = LineGrammar::with_splitter(Splitter::CrLf);
        assert_eq!(grammar.join(&["a", "b"]), "a\r\nb");
        assert_eq!(grammar.splitter().block_separator(), "\r\n\r\n");
    }
}

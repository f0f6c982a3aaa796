use std::sync::LazyLock;

use crossterm::style::Stylize;
use regex::{Captures, Regex};

/// Turns one matched span into its styled form
pub type Transform = fn(&str) -> String;

/// One colorization rule: every match of `pattern` goes through `transform`
pub struct Rule {
    pub pattern: Regex,
    pub transform: Transform,
}

impl Rule {
    pub fn new(pattern: &str, transform: Transform) -> Result<Self, regex::Error> {
        Ok(Rule {
            pattern: Regex::new(pattern)?,
            transform,
        })
    }

    /// Wrap every non-overlapping match; text between matches is untouched.
    pub fn apply(&self, text: &str) -> String {
        self.pattern
            .replace_all(text, |caps: &Captures<'_>| (self.transform)(&caps[0]))
            .into_owned()
    }
}

/// Run `rules` in order. Each rule sees the output of the previous one,
/// markup included, so a later pattern can match inside an earlier span.
pub fn apply_rules(text: &str, rules: &[Rule]) -> String {
    rules
        .iter()
        .fold(text.to_string(), |current, rule| rule.apply(&current))
}

const EMPHASIS: &str = r"\b(?:IMPORTANT|URGENT)\b";
const URL: &str = r"(?:https?|ftp)://[\w\-]+(?:\.[\w\-]+)+(?:[\w\-.,@?^=%&:/~+#]*[\w\-@?^=%&/~+#])?";
const PENDING: &str = r"\b(?:PENDING|WAITING)\b";
const LOW_PRIORITY: &str = r"(?m)\b(?:LONGTERM|SOMEDAY)\b.*$";
const BOLD_MARKUP: &str = r"\*\*[^*\n]+\*\*";

fn emphasis(s: &str) -> String {
    s.black().on_yellow().to_string()
}

fn link(s: &str) -> String {
    s.blue().underlined().to_string()
}

fn pending(s: &str) -> String {
    s.magenta().to_string()
}

fn low_priority(s: &str) -> String {
    s.dark_grey().to_string()
}

fn bold(s: &str) -> String {
    s.bold().to_string()
}

fn highlight_match(s: &str) -> String {
    s.black().on_cyan().to_string()
}

static DEFAULT_RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    let table: [(&str, Transform); 5] = [
        (EMPHASIS, emphasis),
        (URL, link),
        (PENDING, pending),
        (LOW_PRIORITY, low_priority),
        (BOLD_MARKUP, bold),
    ];
    table
        .into_iter()
        .filter_map(|(pattern, transform)| Rule::new(pattern, transform).ok())
        .collect()
});

/// The built-in rules in priority order: emphasis keywords, URLs, pending
/// keywords, low-priority lines, `**bold**` markup.
pub fn default_rules() -> &'static [Rule] {
    &DEFAULT_RULES
}

pub fn colorize(text: &str) -> String {
    apply_rules(text, default_rules())
}

/// One rule per query token, matching the whole word around the token
pub fn highlight_rules<S: AsRef<str>>(queries: &[S], case_sensitive: bool) -> Vec<Rule> {
    let flags = if case_sensitive { "" } else { "(?i)" };
    queries
        .iter()
        .map(|q| q.as_ref())
        .filter(|q| !q.is_empty())
        .filter_map(|q| {
            let pattern = format!(r"{}\w*{}\w*", flags, regex::escape(q));
            Rule::new(&pattern, highlight_match).ok()
        })
        .collect()
}

pub fn highlight<S: AsRef<str>>(text: &str, queries: &[S], case_sensitive: bool) -> String {
    apply_rules(text, &highlight_rules(queries, case_sensitive))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brackets(s: &str) -> String {
        format!("[{}]", s)
    }

    fn angles(s: &str) -> String {
        format!("<{}>", s)
    }

    #[test]
    fn rule_wraps_every_match_and_leaves_gaps() {
        let rule = Rule::new(r"\d+", brackets).unwrap();
        assert_eq!(rule.apply("a 1 b 22 c"), "a [1] b [22] c");
        assert_eq!(rule.apply("no digits"), "no digits");
    }

    #[test]
    fn later_rules_see_earlier_markup() {
        // Accepted caveat: the second rule matches the bracket the first
        // rule inserted.
        let rules = vec![
            Rule::new(r"x+", brackets).unwrap(),
            Rule::new(r"\]", angles).unwrap(),
        ];
        assert_eq!(apply_rules("axxb", &rules), "a[xx<]>b");
    }

    #[test]
    fn default_rules_are_all_compiled_in_order() {
        let patterns: Vec<&str> = default_rules().iter().map(|r| r.pattern.as_str()).collect();
        assert_eq!(patterns, vec![EMPHASIS, URL, PENDING, LOW_PRIORITY, BOLD_MARKUP]);
    }

    #[test]
    fn url_pattern_matches_supported_schemes() {
        let re = Regex::new(URL).unwrap();
        let m = re.find("see https://example.com/a?b=c, then").unwrap();
        assert_eq!(m.as_str(), "https://example.com/a?b=c");
        assert!(re.is_match("ftp://files.example.org"));
        assert!(!re.is_match("mailto://example"));
    }

    #[test]
    fn low_priority_runs_to_end_of_line() {
        let re = Regex::new(LOW_PRIORITY).unwrap();
        let text = "a SOMEDAY learn lisp\nnext line";
        assert_eq!(re.find(text).unwrap().as_str(), "SOMEDAY learn lisp");
    }

    #[test]
    fn colorize_styles_keywords() {
        let out = colorize("IMPORTANT: file taxes");
        assert!(out.contains("IMPORTANT"));
        assert!(out.ends_with(": file taxes"));
        assert_eq!(colorize("plain words"), "plain words");
    }

    #[test]
    fn bold_markup_is_styled() {
        let out = colorize("call **now** please");
        assert!(out.starts_with("call "));
        assert!(out.contains("**now**"));
        assert!(out.contains("\u{1b}["));
        assert_ne!(out, "call **now** please");
    }

    #[test]
    fn highlight_covers_whole_word() {
        let rules = highlight_rules(&["ilk"], false);
        assert_eq!(rules.len(), 1);
        let m = rules[0].pattern.find("Buy MILKY way").unwrap();
        assert_eq!(m.as_str(), "MILKY");
        assert!(highlight_rules(&["ilk"], true)[0].pattern.find("MILKY").is_none());
    }

    #[test]
    fn empty_query_tokens_are_skipped() {
        assert!(highlight_rules(&[""], false).is_empty());
        assert_eq!(highlight("text", &[""], false), "text");
    }
}

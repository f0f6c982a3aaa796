use std::io::{self, BufRead, Write};

/// Interactive selection collaborator
pub trait Chooser {
    /// Let the user pick any number of `labels`. Returns the chosen
    /// indices in pick order, or `None` when the user cancels.
    fn choose(&mut self, title: &str, labels: &[String]) -> io::Result<Option<Vec<usize>>>;

    /// Ask a yes/no question
    fn confirm(&mut self, question: &str) -> io::Result<bool>;
}

/// Numbered-list prompt: labels go to `output`, one line of indices is
/// read from `input`.
pub struct PromptChooser<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> PromptChooser<R, W> {
    pub fn new(input: R, output: W) -> Self {
        PromptChooser { input, output }
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

impl PromptChooser<io::StdinLock<'static>, io::Stderr> {
    /// Prompt on stderr so stdout only carries rendered output
    pub fn stdio() -> Self {
        PromptChooser::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> Chooser for PromptChooser<R, W> {
    fn choose(&mut self, title: &str, labels: &[String]) -> io::Result<Option<Vec<usize>>> {
        writeln!(self.output, "{}", title)?;
        for (i, label) in labels.iter().enumerate() {
            writeln!(self.output, "{:>3}) {}", i + 1, label)?;
        }
        write!(self.output, "numbers (empty to cancel): ")?;
        self.output.flush()?;

        let Some(line) = self.read_line()? else {
            return Ok(None);
        };
        let picked = parse_indices(&line, labels.len());
        Ok(if picked.is_empty() { None } else { Some(picked) })
    }

    fn confirm(&mut self, question: &str) -> io::Result<bool> {
        write!(self.output, "{} [y/N] ", question)?;
        self.output.flush()?;
        Ok(match self.read_line()? {
            Some(answer) => is_yes(&answer),
            None => false,
        })
    }
}

/// 1-based indices separated by spaces or commas, converted to 0-based.
/// Tokens out of range or not numbers are skipped, repeats are dropped.
pub fn parse_indices(line: &str, count: usize) -> Vec<usize> {
    let mut picked = Vec::new();
    for token in line.split(|c: char| c == ',' || c.is_whitespace()) {
        let Ok(n) = token.parse::<usize>() else {
            continue;
        };
        if n == 0 || n > count {
            continue;
        }
        if !picked.contains(&(n - 1)) {
            picked.push(n - 1);
        }
    }
    picked
}

pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

//! Yes/no confirmation prompts

#[cfg(test)]
use mockall::automock;

use std::io::{self, BufRead, Write};

/// Trait for asking the user to confirm an action
#[cfg_attr(test, automock)]
pub trait Prompter {
    fn confirm(&self, message: &str) -> bool;
}

/// Prompter reading answers from stdin
#[derive(Debug, Default)]
pub struct StdinPrompter;

impl Prompter for StdinPrompter {
    fn confirm(&self, message: &str) -> bool {
        let stdin = io::stdin();
        let mut stderr = io::stderr();
        ask(&mut stdin.lock(), &mut stderr, message).unwrap_or(false)
    }
}

/// Prompter that accepts every action without asking
#[derive(Debug, Default)]
pub struct AssumeYes;

impl Prompter for AssumeYes {
    fn confirm(&self, _message: &str) -> bool {
        true
    }
}

/// Asks until the answer is yes or no; an empty answer or end of input counts as no
pub fn ask(input: &mut impl BufRead, output: &mut impl Write, message: &str) -> io::Result<bool> {
    let mut line = String::new();
    loop {
        write!(output, "{} [y/n]: ", message)?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            return Ok(false);
        }

        match line.trim().to_lowercase().as_str() {
            "y" | "yes" => return Ok(true),
            "" | "n" | "no" => return Ok(false),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Cursor;

    #[rstest]
    #[case("y\n", true)]
    #[case("YES\n", true)]
    #[case("n\n", false)]
    #[case("no\n", false)]
    #[case("maybe\ny\n", true)]
    #[case("\n", false)]
    #[case("", false)]
    #[case("what\n", false)]
    fn ask_reads_until_yes_or_no(#[case] input: &str, #[case] expected: bool) {
        let mut output = Vec::new();
        let answer = ask(&mut Cursor::new(input), &mut output, "Continue?").unwrap();
        assert_eq!(answer, expected);
    }

    #[test]
    fn ask_repeats_question_after_unrecognized_answer() {
        let mut output = Vec::new();
        ask(&mut Cursor::new("huh\nn\n"), &mut output, "Continue?").unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "Continue? [y/n]: Continue? [y/n]: "
        );
    }
}

use crate::question;

/// Free-text and choice questions asked while a command runs.
///
/// `None` means the user dismissed the question or left it empty.
pub trait Prompter {
    fn input(&self, prompt: &str, example: &str) -> anyhow::Result<Option<String>>;
    fn select(&self, prompt: &str, items: &[String]) -> anyhow::Result<Option<usize>>;
}

pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn input(&self, prompt: &str, example: &str) -> anyhow::Result<Option<String>> {
        let answer = dialoguer::Input::<String>::new()
            .with_prompt(question!("{} (ex) {})", prompt, example))
            .allow_empty(true)
            .interact_text()?;
        let answer = answer.trim();
        Ok((!answer.is_empty()).then(|| answer.to_string()))
    }

    fn select(&self, prompt: &str, items: &[String]) -> anyhow::Result<Option<usize>> {
        Ok(dialoguer::Select::new()
            .with_prompt(question!("{}", prompt))
            .items(items)
            .default(0)
            .interact_opt()?)
    }
}

pub const MAX_PROBLEMS: u8 = 26;

/// Asks for the number of problems of a contest the judge cannot list.
pub fn ask_problem_count(prompter: &impl Prompter) -> anyhow::Result<Option<u8>> {
    let answer = prompter.input("Enter the number of problems. (1-26)", "7")?;
    parse_problem_count(answer.as_deref())
}

pub fn parse_problem_count(answer: Option<&str>) -> anyhow::Result<Option<u8>> {
    let answer = match answer.map(str::trim) {
        None | Some("") => return Ok(None),
        Some(answer) => answer,
    };
    match answer.parse::<u8>() {
        Ok(count) if (1..=MAX_PROBLEMS).contains(&count) => Ok(Some(count)),
        _ => anyhow::bail!("Incorrect input. Enter an integer between 1 and 26."),
    }
}

#[cfg(test)]
pub mod fake {
    use std::cell::RefCell;
    use std::collections::VecDeque;

    use super::Prompter;

    /// Replays canned answers and records every question asked.
    #[derive(Default)]
    pub struct ScriptedPrompter {
        answers: RefCell<VecDeque<Option<String>>>,
        pub asked: RefCell<Vec<String>>,
    }

    impl ScriptedPrompter {
        pub fn answering(answers: &[Option<&str>]) -> Self {
            ScriptedPrompter {
                answers: RefCell::new(
                    answers
                        .iter()
                        .map(|answer| answer.map(str::to_string))
                        .collect(),
                ),
                asked: RefCell::new(vec![]),
            }
        }
    }

    impl Prompter for ScriptedPrompter {
        fn input(&self, prompt: &str, _example: &str) -> anyhow::Result<Option<String>> {
            self.asked.borrow_mut().push(prompt.to_string());
            self.answers
                .borrow_mut()
                .pop_front()
                .ok_or_else(|| anyhow::anyhow!("unexpected question: {}", prompt))
        }

        fn select(&self, prompt: &str, items: &[String]) -> anyhow::Result<Option<usize>> {
            let answer = self.input(prompt, "")?;
            Ok(answer.and_then(|answer| items.iter().position(|item| *item == answer)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_inside_range_are_accepted() {
        assert_eq!(parse_problem_count(Some("1")).unwrap(), Some(1));
        assert_eq!(parse_problem_count(Some(" 5 ")).unwrap(), Some(5));
        assert_eq!(parse_problem_count(Some("26")).unwrap(), Some(26));
    }

    #[test]
    fn empty_answers_abort() {
        assert_eq!(parse_problem_count(None).unwrap(), None);
        assert_eq!(parse_problem_count(Some("")).unwrap(), None);
    }

    #[test]
    fn malformed_counts_are_rejected() {
        for answer in ["0", "27", "abc", "-1", "2.5"] {
            let err = parse_problem_count(Some(answer)).unwrap_err();
            assert!(
                err.to_string().contains("between 1 and 26"),
                "{}: {}",
                answer,
                err
            );
        }
    }
}

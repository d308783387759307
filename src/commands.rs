pub mod add_problem;
pub mod bundle;
pub mod check;
pub mod create_dir;
pub mod login;
pub mod submit;
pub mod update;

use strum::IntoEnumIterator;

use crate::judge::Judge;
use crate::prompt::Prompter;

/// Lets the user pick a judge; `None` when the choice was dismissed.
pub fn select_judge(prompter: &impl Prompter) -> anyhow::Result<Option<Judge>> {
    let judges: Vec<Judge> = Judge::iter().collect();
    let names: Vec<String> = judges.iter().map(ToString::to_string).collect();
    Ok(prompter
        .select("Select the online judge", &names)?
        .map(|index| judges[index]))
}

/// Uses `given` when present, otherwise asks; `None` when the question was dismissed.
pub fn given_or_ask(
    prompter: &impl Prompter,
    given: Option<String>,
    prompt: &str,
    example: &str,
) -> anyhow::Result<Option<String>> {
    match given.filter(|value| !value.is_empty()) {
        Some(value) => Ok(Some(value)),
        None => prompter.input(prompt, example),
    }
}

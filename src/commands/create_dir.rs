use std::path::Path;

use crate::commands::{given_or_ask, select_judge};
use crate::fetch::fetch_contest;
use crate::judge::Judge;
use crate::prompt::TerminalPrompter;
use crate::scaffold::Scaffolder;
use crate::store::{Config, Template};
use crate::tools::OjTools;

pub async fn main(
    config: &Config,
    target: &Path,
    judge: Option<Judge>,
    contest_id: Option<String>,
) -> anyhow::Result<()> {
    let template = Template::resolve(config).await?;
    let prompter = TerminalPrompter;

    let judge = match judge {
        Some(judge) => judge,
        None => match select_judge(&prompter)? {
            Some(judge) => judge,
            None => return Ok(()),
        },
    };
    let Some(contest_id) = given_or_ask(&prompter, contest_id, "Enter the contest id.", "abc001")?
    else {
        return Ok(());
    };

    let Some(fetched) = fetch_contest(&OjTools::default(), &prompter, judge, &contest_id).await?
    else {
        return Ok(());
    };
    Scaffolder::new(template)
        .scaffold_contest(target, &fetched)
        .await?;
    Ok(())
}

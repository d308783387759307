use std::path::{Path, PathBuf};

use crate::commands::given_or_ask;
use crate::fetch::fetch_problem;
use crate::prompt::{Prompter, TerminalPrompter};
use crate::scaffold::{is_contest_dir, Placement, Scaffolder};
use crate::store::{Config, Template};
use crate::tools::{JudgeTools, OjTools};
use crate::{error, info};

pub async fn main(config: &Config, target: &Path, url: Option<String>) -> anyhow::Result<()> {
    if let Some(dir) = add_problem(&OjTools::default(), &TerminalPrompter, config, target, url).await? {
        info!("Created {}", dir.display());
    }
    Ok(())
}

/// Adds one problem under `target`; `None` when refused or dismissed.
async fn add_problem(
    tools: &impl JudgeTools,
    prompter: &impl Prompter,
    config: &Config,
    target: &Path,
    url: Option<String>,
) -> anyhow::Result<Option<PathBuf>> {
    if is_contest_dir(target).await {
        error!(
            "{} is managed as a contest, run `update` there instead",
            target.display()
        );
        return Ok(None);
    }

    let template = Template::resolve(config).await?;
    let Some(url) = given_or_ask(
        prompter,
        url,
        "Enter the problem url.",
        "https://codeforces.com/contest/1606/problem/A",
    )?
    else {
        return Ok(None);
    };

    if url.contains("judge.yosupo.jp") {
        info!("Please wait a moment...");
    }
    let fetched = fetch_problem(tools, &url).await?;
    match Scaffolder::new(template)
        .scaffold_problem(target, &fetched)
        .await?
    {
        Placement::Created(dir) => Ok(Some(dir)),
        Placement::Refused => Ok(None),
    }
}

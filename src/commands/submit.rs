use std::path::Path;

use crate::bundle::submit_code;
use crate::commands::given_or_ask;
use crate::prompt::TerminalPrompter;
use crate::store::Config;
use crate::tools::OjTools;

pub async fn main(config: &Config, file: &Path, url: Option<String>) -> anyhow::Result<()> {
    let Some(url) = given_or_ask(
        &TerminalPrompter,
        url,
        "Enter the problem url.",
        "https://codeforces.com/contest/1606/problem/A",
    )?
    else {
        return Ok(());
    };
    submit_code(&OjTools::default(), config, file, &url).await
}

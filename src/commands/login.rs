use crate::commands::select_judge;
use crate::judge::Judge;
use crate::prompt::TerminalPrompter;
use crate::tools::OjTools;
use crate::{debug, info};

pub async fn main(judge: Option<Judge>) -> anyhow::Result<()> {
    let judge = match judge {
        Some(judge) => judge,
        None => match select_judge(&TerminalPrompter)? {
            Some(judge) => judge,
            None => return Ok(()),
        },
    };
    let url = judge.base_url();
    debug!("Logging in to {}", url);

    OjTools::default().login(url).await?;

    info!("Logged in to {}", judge);
    Ok(())
}

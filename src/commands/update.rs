use std::path::Path;

use crate::prompt::TerminalPrompter;
use crate::reconcile::reconcile;
use crate::scaffold::Scaffolder;
use crate::store::{Config, Template};
use crate::tools::OjTools;

pub async fn main(config: &Config, target: &Path) -> anyhow::Result<()> {
    let scaffolder = Scaffolder::new(Template::resolve(config).await?);
    reconcile(&OjTools::default(), &TerminalPrompter, &scaffolder, target).await?;
    Ok(())
}

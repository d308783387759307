use crate::tools::OjTools;
use crate::{info, warn};

/// Reports which of the external tools can be run.
pub async fn main() -> anyhow::Result<()> {
    let tools = OjTools::default();
    let mut missing = vec![];
    for tool in [&tools.oj, &tools.oj_api, &tools.oj_bundle] {
        match tools.version(tool).await {
            Some(version) => info!("{}: {}", tool, version),
            None => {
                warn!("{} was not found", tool);
                missing.push(tool.as_str());
            }
        }
    }
    if !missing.is_empty() {
        anyhow::bail!(
            "Missing {}; install online-judge-tools, online-judge-api-client and online-judge-verify-helper",
            missing.join(", ")
        );
    }
    Ok(())
}

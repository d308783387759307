use std::io::Write;
use std::path::Path;

use crate::bundle::bundle_code;
use crate::info;
use crate::store::Config;
use crate::tools::OjTools;

pub async fn main(config: &Config, file: &Path, output: Option<&Path>) -> anyhow::Result<()> {
    let name = file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    info!("Bundling {}...", name);
    let bundled = bundle_code(&OjTools::default(), config, file).await?;

    match output {
        Some(output) => {
            fs_err::tokio::write(output, &bundled).await?;
            info!("Wrote {}", output.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(bundled.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

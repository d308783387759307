use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::Context;

use crate::store::Config;
use crate::tools::{JudgeTools, SubmitOptions};
use crate::{debug, info, warn};

static LINE_WITH_PATH: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r#"#line\s(\d+)\sR?".*""#).unwrap());
static LINE_DIRECTIVE: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r#"#line\s\d+(\sR?".*")?"#).unwrap());

/// Extensions `oj-bundle` knows how to expand.
const BUNDLED_EXTENSIONS: &[&str] = &[
    "c", "C", "cc", "cp", "cpp", "cxx", "c++", "h", "H", "hh", "hp", "hpp", "hxx", "h++",
];

/// Strips the file paths from `#line` directives, keeping the line numbers.
pub fn hide_filepath(code: &str) -> String {
    LINE_WITH_PATH.replace_all(code, "#line $1").into_owned()
}

pub fn erase_line_directives(code: &str) -> String {
    LINE_DIRECTIVE.replace_all(code, "").into_owned()
}

fn post_process(config: &Config, code: &str) -> String {
    if config.erase_line_directives {
        erase_line_directives(code)
    } else if config.hide_path {
        hide_filepath(code)
    } else {
        code.to_string()
    }
}

pub async fn bundle_code(
    tools: &impl JudgeTools,
    config: &Config,
    target: &Path,
) -> anyhow::Result<String> {
    let bundled = tools
        .run_bundle(target, &config.include_path)
        .await
        .map_err(|err| err.context("Failed to bundle the file."))?;
    Ok(post_process(config, &bundled))
}

fn is_bundleable(target: &Path) -> bool {
    target
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| BUNDLED_EXTENSIONS.contains(&ext))
}

/// `<file name>.bundled<.ext>` next to `target`.
fn bundled_path(target: &Path) -> anyhow::Result<PathBuf> {
    let file_name = target
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("{} is not a file", target.display()))?;
    let ext = target
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext))
        .unwrap_or_default();
    Ok(target.with_file_name(format!("{}.bundled{}", file_name, ext)))
}

/// Removes the temporary submission file once the submission is over.
struct Scratch(Option<PathBuf>);

impl Drop for Scratch {
    fn drop(&mut self) {
        if let Some(path) = &self.0 {
            if let Err(err) = fs_err::remove_file(path) {
                warn!("{}", err);
            }
        }
    }
}

/// Submits `target`, bundling or cleaning it up first according to `config`.
pub async fn submit_code(
    tools: &impl JudgeTools,
    config: &Config,
    target: &Path,
    problem_url: &str,
) -> anyhow::Result<()> {
    let rewritten = if config.bundle_before_submission && is_bundleable(target) {
        Some(bundle_code(tools, config, target).await?)
    } else if config.erase_line_directives || config.hide_path {
        let code = fs_err::tokio::read_to_string(target).await?;
        Some(post_process(config, &code))
    } else {
        None
    };

    let mut scratch = Scratch(None);
    let source = match rewritten {
        Some(code) => {
            let path = bundled_path(target)?;
            fs_err::tokio::write(&path, code).await?;
            debug!("Wrote {}", path.display());
            scratch.0 = Some(path.clone());
            path
        }
        None => target.to_path_buf(),
    };

    info!("Submitting {} to {}", source.display(), problem_url);
    tools
        .run_submit(problem_url, &source, &SubmitOptions::from_config(config))
        .await
        .map_err(|err| err.context("Something went wrong."))?;
    drop(scratch);
    info!("Submitted");
    Ok(())
}

use std::path::{Path, PathBuf};
use std::process::Stdio;

use anyhow::Context;

use crate::log::tool_output;
use crate::model::{ContestEnvelope, ProblemEnvelope};
use crate::debug;
use crate::store::{Config, CxxCompiler, PythonInterpreter, PythonVersion};

/// Language guessing and browser flags forwarded to `oj submit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOptions {
    pub cxx_latest: bool,
    pub cxx_compiler: CxxCompiler,
    pub python_version: PythonVersion,
    pub python_interpreter: PythonInterpreter,
    pub open_browser: bool,
}

impl SubmitOptions {
    pub fn from_config(config: &Config) -> Self {
        SubmitOptions {
            cxx_latest: config.guess_cxx_latest,
            cxx_compiler: config.guess_cxx_compiler,
            python_version: config.guess_python_version,
            python_interpreter: config.guess_python_interpreter,
            open_browser: config.open_browser,
        }
    }

    pub fn to_args(&self) -> Vec<String> {
        vec![
            if self.cxx_latest {
                "--guess-cxx-latest"
            } else {
                "--no-guess-latest"
            }
            .to_string(),
            "--guess-cxx-compiler".to_string(),
            self.cxx_compiler.to_string(),
            "--guess-python-version".to_string(),
            self.python_version.to_string(),
            "--guess-python-interpreter".to_string(),
            self.python_interpreter.to_string(),
            if self.open_browser { "--open" } else { "--no-open" }.to_string(),
        ]
    }
}

/// Everything the workspace asks of the external judge tools.
#[allow(async_fn_in_trait)]
pub trait JudgeTools {
    /// `Err` when the tool could not be run or printed something that is not an envelope.
    async fn run_contest_fetch(&self, contest_url: &str) -> anyhow::Result<ContestEnvelope>;
    async fn run_problem_fetch(&self, problem_url: &str) -> anyhow::Result<ProblemEnvelope>;
    /// Returns the bundled source exactly as `oj-bundle` printed it.
    async fn run_bundle(&self, source: &Path, include_paths: &[PathBuf]) -> anyhow::Result<String>;
    async fn run_submit(
        &self,
        problem_url: &str,
        source: &Path,
        options: &SubmitOptions,
    ) -> anyhow::Result<()>;
}

/// Runs the `online-judge-tools` executables found on `PATH`.
#[derive(Debug, Clone)]
pub struct OjTools {
    pub oj: String,
    pub oj_api: String,
    pub oj_bundle: String,
}

impl Default for OjTools {
    fn default() -> Self {
        OjTools {
            oj: "oj".to_string(),
            oj_api: "oj-api".to_string(),
            oj_bundle: "oj-bundle".to_string(),
        }
    }
}

struct Captured {
    success: bool,
    stdout: String,
}

async fn capture(mut command: tokio::process::Command, tool: &str) -> anyhow::Result<Captured> {
    debug!("Running {:?}", command.as_std());
    let output = command
        .stdin(Stdio::null())
        .output()
        .await
        .with_context(|| format!("Failed to run {}, is it installed?", tool))?;
    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    tool_output(tool, "stdout", &stdout);
    tool_output(tool, "stderr", &String::from_utf8_lossy(&output.stderr));
    Ok(Captured {
        success: output.status.success(),
        stdout,
    })
}

impl OjTools {
    fn oj_api(&self, operation: &str, url: &str) -> tokio::process::Command {
        let mut command = tokio::process::Command::new(&self.oj_api);
        command.args(["--wait=0.0", operation, url]);
        command
    }

    /// Hands the terminal to `oj login`, which asks for credentials itself.
    pub async fn login(&self, url: &str) -> anyhow::Result<()> {
        let status = tokio::process::Command::new(&self.oj)
            .args(["login", url])
            .status()
            .await
            .with_context(|| format!("Failed to run {}, is it installed?", self.oj))?;
        if !status.success() {
            anyhow::bail!("Login failed.");
        }
        Ok(())
    }

    /// First line of `<tool> --version`, or `None` when the tool is missing.
    ///
    /// Tools without a version flag are reported as "installed" when `--help` works.
    pub async fn version(&self, tool: &str) -> Option<String> {
        for flag in ["--version", "--help"] {
            let mut command = tokio::process::Command::new(tool);
            command.arg(flag);
            let captured = capture(command, tool).await.ok()?;
            if !captured.success {
                continue;
            }
            if flag == "--help" {
                return Some("installed".to_string());
            }
            return Some(captured.stdout.lines().next().unwrap_or_default().trim().to_string());
        }
        None
    }
}

impl JudgeTools for OjTools {
    async fn run_contest_fetch(&self, contest_url: &str) -> anyhow::Result<ContestEnvelope> {
        let captured = capture(self.oj_api("get-contest", contest_url), &self.oj_api).await?;
        serde_json::from_str(&captured.stdout)
            .with_context(|| format!("{} printed no contest envelope", self.oj_api))
    }

    async fn run_problem_fetch(&self, problem_url: &str) -> anyhow::Result<ProblemEnvelope> {
        let captured = capture(self.oj_api("get-problem", problem_url), &self.oj_api).await?;
        if !captured.success {
            anyhow::bail!("{} get-problem failed", self.oj_api);
        }
        serde_json::from_str(&captured.stdout)
            .with_context(|| format!("{} printed no problem envelope", self.oj_api))
    }

    async fn run_bundle(&self, source: &Path, include_paths: &[PathBuf]) -> anyhow::Result<String> {
        let source = fs_err::tokio::canonicalize(source).await?;
        let mut command = tokio::process::Command::new(&self.oj_bundle);
        command.arg(&source);
        for include in include_paths {
            command.arg("-I").arg(include);
        }
        if let Some(dir) = source.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            command.current_dir(dir);
        }
        let captured = capture(command, &self.oj_bundle).await?;
        if !captured.success {
            anyhow::bail!("{} exited with an error", self.oj_bundle);
        }
        Ok(captured.stdout)
    }

    async fn run_submit(
        &self,
        problem_url: &str,
        source: &Path,
        options: &SubmitOptions,
    ) -> anyhow::Result<()> {
        let mut command = tokio::process::Command::new(&self.oj);
        command
            .args(["submit", "--wait", "0", "--yes"])
            .args(options.to_args())
            .arg(problem_url)
            .arg(source);
        let captured = capture(command, &self.oj).await?;
        if !captured.success {
            anyhow::bail!("{} submit exited with an error", self.oj);
        }
        Ok(())
    }
}

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::fetch::{FetchedContest, FetchedProblem};
use crate::model::{self, Problem, Provenance, CONTEST_SIDECAR, PROBLEM_SIDECAR};
use crate::store::Template;
use crate::{debug, error, info, warn};

/// Makes `name` usable as a single path segment.
pub fn folder_name(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let trimmed = replaced.trim().trim_end_matches('.').trim_end();
    if trimmed.is_empty() || trimmed == "." || trimmed == ".." {
        "_".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Subdirectory of a problem inside its contest directory.
pub fn problem_dir_name(index: usize, problem: &Problem) -> String {
    match &problem.context.label {
        Some(label) => folder_name(label),
        None => folder_name(&format!(
            "{} {}",
            index,
            problem.name.as_deref().unwrap_or_default()
        )),
    }
}

/// Directories created by a run that has not finished yet.
///
/// Dropping it uncommitted removes them again, newest first.
#[derive(Default)]
pub struct Rollback {
    created: Mutex<Vec<PathBuf>>,
    committed: bool,
}

impl Rollback {
    /// Creates `dir` unless it exists, remembering it when it is new.
    pub async fn create_dir(&self, dir: &Path) -> anyhow::Result<bool> {
        if fs_err::tokio::metadata(dir).await.is_ok() {
            return Ok(false);
        }
        fs_err::tokio::create_dir_all(dir).await?;
        if let Ok(mut created) = self.created.lock() {
            created.push(dir.to_path_buf());
        }
        Ok(true)
    }

    pub fn commit(mut self) {
        self.committed = true;
    }
}

impl Drop for Rollback {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        let Ok(created) = self.created.get_mut() else {
            return;
        };
        for dir in created.iter().rev() {
            warn!("Removing {}", dir.display());
            if let Err(err) = fs_err::remove_dir_all(dir) {
                if dir.exists() {
                    error!("{}", err);
                }
            }
        }
    }
}

async fn write_sidecar<T: serde::Serialize>(path: &Path, value: &T) -> anyhow::Result<()> {
    fs_err::tokio::write(path, model::to_sidecar_json(value)?).await?;
    Ok(())
}

pub async fn write_problem_sidecar(dir: &Path, problem: &Problem) -> anyhow::Result<()> {
    write_sidecar(&dir.join(PROBLEM_SIDECAR), problem).await
}

pub async fn write_contest_sidecar(dir: &Path, fetched: &FetchedContest) -> anyhow::Result<()> {
    write_sidecar(&dir.join(CONTEST_SIDECAR), &fetched.contest).await
}

/// Whether `dir` holds a contest sidecar, in which case standalone problems are refused.
pub async fn is_contest_dir(dir: &Path) -> bool {
    fs_err::tokio::metadata(dir.join(CONTEST_SIDECAR)).await.is_ok()
}

/// Creates contest and problem directories from resolved metadata.
pub struct Scaffolder {
    pub template: Template,
}

/// Result of adding a standalone problem.
#[derive(Debug, PartialEq, Eq)]
pub enum Placement {
    Created(PathBuf),
    /// The target directory belongs to a contest.
    Refused,
}

impl Scaffolder {
    pub fn new(template: Template) -> Self {
        Scaffolder { template }
    }

    /// Creates a problem directory only when it is missing, then refreshes its sidecar.
    pub async fn place_problem(
        &self,
        rollback: &Rollback,
        contest_dir: &Path,
        index: usize,
        problem: &Problem,
        status: Provenance,
    ) -> anyhow::Result<()> {
        let dir = contest_dir.join(problem_dir_name(index, problem));
        if rollback.create_dir(&dir).await? {
            debug!("Created {}", dir.display());
            self.template.seed(&dir).await?;
        }
        let problem = Problem {
            status: Some(status),
            ..problem.clone()
        };
        write_problem_sidecar(&dir, &problem).await
    }

    /// Writes every problem of `fetched` below `contest_dir`, concurrently.
    pub async fn place_problems(
        &self,
        rollback: &Rollback,
        contest_dir: &Path,
        fetched: &FetchedContest,
    ) -> anyhow::Result<()> {
        let status = fetched.provenance();
        let tasks = fetched
            .contest
            .result
            .problems
            .iter()
            .enumerate()
            .map(|(index, problem)| self.place_problem(rollback, contest_dir, index, problem, status));
        futures::future::join_all(tasks)
            .await
            .into_iter()
            .collect::<anyhow::Result<Vec<()>>>()?;
        Ok(())
    }

    /// Materializes a contest under `target_dir` and returns the contest directory.
    ///
    /// Directories created here are removed again when any write fails.
    pub async fn scaffold_contest(
        &self,
        target_dir: &Path,
        fetched: &FetchedContest,
    ) -> anyhow::Result<PathBuf> {
        let rollback = Rollback::default();
        let dir = target_dir.join(&fetched.dirname);
        rollback.create_dir(&dir).await?;
        write_contest_sidecar(&dir, fetched).await?;
        self.place_problems(&rollback, &dir, fetched).await?;
        rollback.commit();

        info!(
            "Created {} with {} problem(s)",
            dir.display(),
            fetched.contest.result.problems.len()
        );
        Ok(dir)
    }

    /// Adds one standalone problem directory under `target_dir`.
    ///
    /// The template is only seeded into a directory created here, so re-adding keeps `Main`.
    pub async fn scaffold_problem(
        &self,
        target_dir: &Path,
        fetched: &FetchedProblem,
    ) -> anyhow::Result<Placement> {
        if is_contest_dir(target_dir).await {
            error!(
                "{} is managed as a contest, run `update` there instead",
                target_dir.display()
            );
            return Ok(Placement::Refused);
        }

        let rollback = Rollback::default();
        let dir = target_dir.join(folder_name(&fetched.name));
        let created = rollback.create_dir(&dir).await?;
        write_problem_sidecar(&dir, &fetched.problem).await?;
        if created {
            self.template.seed(&dir).await?;
        }
        rollback.commit();
        Ok(Placement::Created(dir))
    }
}

use crate::guess::{self, Guess};
use crate::judge::Judge;
use crate::model::{Contest, ContestEnvelope, ContestResult, Problem, Provenance};
use crate::prompt::{self, Prompter};
use crate::scaffold::folder_name;
use crate::tools::JudgeTools;
use crate::{debug, warn};

/// Context label of the AtCoder contest-final variant that never gets a directory.
pub const EXCLUDED_ATCODER_LABEL: &str = "A-Final";

#[derive(Debug, Clone, PartialEq)]
pub struct FetchedContest {
    pub contest: Contest,
    /// Folder name for the contest root.
    pub dirname: String,
}

impl FetchedContest {
    pub fn provenance(&self) -> Provenance {
        self.contest.status
    }
}

/// Resolves a contest through `oj-api`, falling back to the judge's naming conventions.
///
/// `Ok(None)` means the user dismissed a prompt and nothing should happen.
pub async fn fetch_contest(
    tools: &impl JudgeTools,
    prompter: &impl Prompter,
    judge: Judge,
    contest_id: &str,
) -> anyhow::Result<Option<FetchedContest>> {
    let url = judge.contest_url(contest_id);
    let envelope = match tools.run_contest_fetch(&url).await {
        Ok(envelope) => Some(envelope),
        Err(err) => {
            warn!("Could not fetch {}: {:#}", url, err);
            None
        }
    };

    let fetched = match envelope {
        Some(ContestEnvelope {
            status,
            result: Some(result),
        }) if status == "ok" => {
            let dirname = folder_name(result.name.as_deref().unwrap_or(contest_id));
            FetchedContest {
                contest: Contest {
                    status: Provenance::Confirmed,
                    result,
                },
                dirname,
            }
        }
        _ => {
            debug!("Guessing the problems of {} on {}", contest_id, judge);
            let Some(guessed) = guess_contest(prompter, judge, contest_id)? else {
                return Ok(None);
            };
            guessed
        }
    };

    Ok(Some(exclude_variants(judge, fetched)))
}

fn guess_contest(
    prompter: &impl Prompter,
    judge: Judge,
    contest_id: &str,
) -> anyhow::Result<Option<FetchedContest>> {
    let (display_name, problem_ids) = match guess::guess(judge, contest_id) {
        None => anyhow::bail!("Could not retrieve contest information."),
        Some(Guess::Problems {
            display_name,
            problem_ids,
        }) => (display_name, problem_ids),
        Some(Guess::NeedsCount {
            display_name,
            first_letter,
        }) => {
            let Some(count) = prompt::ask_problem_count(prompter)? else {
                return Ok(None);
            };
            (display_name, guess::counted_ids(first_letter, count))
        }
    };

    let contest_url = judge.guessed_contest_url(contest_id);
    let problems = problem_ids
        .iter()
        .map(|id| {
            Problem::guessed(
                judge.guessed_problem_url(contest_id, id),
                &contest_url,
                id.to_uppercase(),
            )
        })
        .collect();

    Ok(Some(FetchedContest {
        contest: Contest {
            status: Provenance::Guessed,
            result: ContestResult {
                url: contest_url,
                name: None,
                problems,
                extra: serde_json::Map::new(),
            },
        },
        dirname: folder_name(&display_name),
    }))
}

/// Drops problems that must never be scaffolded for this judge.
pub fn exclude_variants(judge: Judge, mut fetched: FetchedContest) -> FetchedContest {
    if judge == Judge::AtCoder {
        fetched
            .contest
            .result
            .problems
            .retain(|problem| problem.context.label.as_deref() != Some(EXCLUDED_ATCODER_LABEL));
    }
    fetched
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetchedProblem {
    pub problem: Problem,
    /// The tool's name for the problem, or one derived from its URL.
    pub name: String,
}

/// Resolves a single problem through `oj-api`; there is no fallback.
pub async fn fetch_problem(tools: &impl JudgeTools, url: &str) -> anyhow::Result<FetchedProblem> {
    let envelope = tools
        .run_problem_fetch(url)
        .await
        .map_err(|err| err.context("Something went wrong."))?;
    let problem = match envelope.result {
        Some(problem) if envelope.status == "ok" => problem,
        _ => anyhow::bail!("Something went wrong."),
    };
    let name = match &problem.name {
        Some(name) => name.clone(),
        None => name_from_url(&problem.url),
    };
    Ok(FetchedProblem {
        problem: Problem {
            status: Some(Provenance::Confirmed),
            ..problem
        },
        name,
    })
}

/// Derives a problem name from judge-specific URL shapes.
pub fn name_from_url(url: &str) -> String {
    fn last<'a>(url: &'a str, separator: char) -> &'a str {
        url.rsplit(separator).next().unwrap_or(url)
    }

    if url.starts_with("http://judge.u-aizu.ac.jp") {
        last(url, '=').to_string()
    } else if url.starts_with("http://golf.shinh.org") {
        last(url, '?').replace('+', " ")
    } else if url.starts_with("https://csacademy.com") {
        url.rsplit('/').nth(1).unwrap_or_default().to_string()
    } else if url.starts_with("https://www.facebook.com") {
        let segments: Vec<&str> = url.split('/').collect();
        let back = |n: usize| {
            segments
                .len()
                .checked_sub(n)
                .map(|i| segments[i])
                .unwrap_or("undefined")
        };
        format!("{}-{}-{}", back(4), back(3), back(1))
    } else if url.starts_with("http://poj.org/") {
        last(url, '?').to_string()
    } else {
        last(url, '/').to_string()
    }
}

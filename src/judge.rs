use strum::IntoEnumIterator;

/// Online judges the workspace knows how to address.
#[derive(
    Debug,
    Copy,
    Clone,
    PartialEq,
    Eq,
    strum::Display,
    strum::EnumIter,
    clap::ValueEnum,
)]
pub enum Judge {
    #[strum(serialize = "AtCoder")]
    #[value(name = "atcoder")]
    AtCoder,
    #[strum(serialize = "AtCoder Problems")]
    #[value(name = "atcoder-problems")]
    AtCoderProblems,
    #[strum(serialize = "CodeChef")]
    #[value(name = "codechef")]
    CodeChef,
    #[strum(serialize = "Codeforces")]
    #[value(name = "codeforces")]
    Codeforces,
    #[strum(serialize = "yukicoder")]
    #[value(name = "yukicoder")]
    Yukicoder,
}

impl Judge {
    pub fn base_url(self) -> &'static str {
        match self {
            Judge::AtCoder => "https://atcoder.jp/",
            Judge::AtCoderProblems => "https://kenkoooo.com/atcoder/",
            Judge::CodeChef => "https://www.codechef.com/",
            Judge::Codeforces => "https://codeforces.com/",
            Judge::Yukicoder => "https://yukicoder.me/",
        }
    }

    /// The listing URL handed to `oj-api get-contest`.
    pub fn contest_url(self, contest_id: &str) -> String {
        let path = match self {
            Judge::AtCoder | Judge::Yukicoder => format!("contests/{}/", contest_id),
            Judge::AtCoderProblems => format!("#/contest/show/{}/", contest_id),
            Judge::CodeChef => format!("{}/", contest_id),
            Judge::Codeforces => format!("contest/{}/", contest_id),
        };
        format!("{}{}", self.base_url(), path)
    }

    /// Finds the judge whose base URL prefixes `url`.
    pub fn of(url: &str) -> anyhow::Result<Judge> {
        Judge::iter()
            .find(|judge| url.starts_with(judge.base_url()))
            .ok_or_else(|| anyhow::anyhow!("No known judge serves {}", url))
    }

    /// Contest URL recorded for metadata synthesized without the judge's help.
    pub fn guessed_contest_url(self, contest_id: &str) -> String {
        match self {
            Judge::AtCoder => format!("https://atcoder.jp/contests/{}", contest_id),
            Judge::Codeforces => format!("https://codeforces.com/contest/{}", contest_id),
            Judge::CodeChef => format!("https://www.codechef.com/{}", contest_id),
            _ => self.contest_url(contest_id).trim_end_matches('/').to_string(),
        }
    }

    pub fn guessed_problem_url(self, contest_id: &str, problem_id: &str) -> String {
        match self {
            Judge::AtCoder => format!(
                "https://atcoder.jp/contests/{}/tasks/{}_{}",
                contest_id,
                contest_id.replace('-', "_"),
                problem_id
            ),
            Judge::Codeforces => format!(
                "https://codeforces.com/contest/{}/problem/{}",
                contest_id, problem_id
            ),
            _ => format!("{}/{}", self.guessed_contest_url(contest_id), problem_id),
        }
    }
}

//! Fallback rules used when a judge cannot list a contest's problems.

use std::ops::Range;

use crate::judge::Judge;

/// What a judge's naming conventions tell us about a contest id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Guess {
    /// The problem ids are known outright.
    Problems {
        display_name: String,
        problem_ids: Vec<String>,
    },
    /// Only the user knows how many problems there are.
    NeedsCount {
        display_name: String,
        first_letter: char,
    },
}

/// Problem ids `first..first+count` of a known contest size.
struct Bracket {
    /// Inclusive upper bound on the contest number.
    upto: u32,
    ids: Range<u8>,
}

struct Series {
    prefix: &'static str,
    title: &'static str,
    brackets: &'static [Bracket],
    /// Contests that carried an extra `f2` problem.
    with_f2: &'static [u32],
    /// Whether the title keeps the id's zero-padded digits.
    padded_title: bool,
}

const ATCODER_SERIES: &[Series] = &[
    Series {
        prefix: "abc",
        title: "AtCoder Beginner Contest",
        brackets: &[
            Bracket { upto: 125, ids: 0..4 },
            Bracket { upto: 211, ids: 0..6 },
            Bracket { upto: 318, ids: 0..8 },
            Bracket { upto: u32::MAX, ids: 0..7 },
        ],
        with_f2: &[],
        padded_title: false,
    },
    Series {
        prefix: "arc",
        title: "AtCoder Regular Contest",
        brackets: &[
            Bracket { upto: 57, ids: 0..4 },
            Bracket { upto: 104, ids: 2..6 },
            Bracket { upto: u32::MAX, ids: 0..6 },
        ],
        with_f2: &[120],
        padded_title: false,
    },
    Series {
        prefix: "agc",
        title: "AtCoder Grand Contest",
        brackets: &[Bracket { upto: u32::MAX, ids: 0..6 }],
        with_f2: &[28],
        padded_title: false,
    },
    Series {
        prefix: "ahc",
        title: "AtCoder Heuristic Contest",
        brackets: &[Bracket { upto: u32::MAX, ids: 0..1 }],
        with_f2: &[],
        padded_title: true,
    },
];

/// Returns `None` for judges that have no fallback at all.
pub fn guess(judge: Judge, contest_id: &str) -> Option<Guess> {
    match judge {
        Judge::AtCoder => Some(guess_atcoder(contest_id)),
        Judge::Codeforces => Some(Guess::NeedsCount {
            display_name: format!("Codeforces_{}", contest_id),
            first_letter: 'A',
        }),
        Judge::CodeChef => Some(Guess::Problems {
            display_name: contest_id.to_string(),
            problem_ids: vec![],
        }),
        Judge::AtCoderProblems | Judge::Yukicoder => None,
    }
}

fn guess_atcoder(contest_id: &str) -> Guess {
    for series in ATCODER_SERIES {
        let Some(digits) = series_number(series.prefix, contest_id) else {
            continue;
        };
        let Ok(number) = digits.parse::<u32>() else {
            continue;
        };
        let Some(bracket) = series.brackets.iter().find(|b| number <= b.upto) else {
            continue;
        };
        let mut problem_ids: Vec<String> = bracket.ids.clone().map(letter('a')).collect();
        if series.with_f2.contains(&number) {
            problem_ids.push("f2".to_string());
        }
        let display_name = if series.padded_title {
            format!("{} {}", series.title, digits)
        } else {
            format!("{} {}", series.title, number)
        };
        return Guess::Problems {
            display_name,
            problem_ids,
        };
    }
    Guess::NeedsCount {
        display_name: format!("Atcoder_{}", contest_id),
        first_letter: 'a',
    }
}

/// The digits after `prefix` when `contest_id` is `prefix` followed by three or more digits.
fn series_number<'a>(prefix: &str, contest_id: &'a str) -> Option<&'a str> {
    let digits = contest_id.strip_prefix(prefix)?;
    (digits.len() >= 3 && digits.bytes().all(|b| b.is_ascii_digit())).then_some(digits)
}

/// Problem ids for a user-supplied count.
pub fn counted_ids(first_letter: char, count: u8) -> Vec<String> {
    (0..count).map(letter(first_letter)).collect()
}

fn letter(first: char) -> impl Fn(u8) -> String {
    move |offset| char::from(first as u8 + offset).to_string()
}

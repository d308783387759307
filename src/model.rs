use serde::{Deserialize, Serialize};

pub const CONTEST_SIDECAR: &str = "contest.meta.json";
pub const PROBLEM_SIDECAR: &str = "problem.meta.json";

/// Where a piece of metadata came from.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    /// Reported by `oj-api`.
    Confirmed,
    /// Synthesized from naming conventions.
    Guessed,
}

/// Raw `oj-api get-contest` output.
#[derive(Debug, Clone, Deserialize)]
pub struct ContestEnvelope {
    pub status: String,
    #[serde(default)]
    pub result: Option<ContestResult>,
}

/// Raw `oj-api get-problem` output.
#[derive(Debug, Clone, Deserialize)]
pub struct ProblemEnvelope {
    pub status: String,
    #[serde(default)]
    pub result: Option<Problem>,
}

/// Contents of `contest.meta.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contest {
    pub status: Provenance,
    pub result: ContestResult,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContestResult {
    pub url: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub problems: Vec<Problem>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Contents of `problem.meta.json`, also one entry of a contest's problem list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Problem {
    pub url: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub context: ProblemContext,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Provenance>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProblemContext {
    #[serde(default)]
    pub contest: Option<ContestRef>,
    #[serde(
        default,
        rename = "label",
        alias = "alphabet",
        skip_serializing_if = "Option::is_none"
    )]
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContestRef {
    pub url: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl Problem {
    /// A problem synthesized for a guessed contest.
    pub fn guessed(url: String, contest_url: &str, label: String) -> Problem {
        Problem {
            url,
            name: None,
            context: ProblemContext {
                contest: Some(ContestRef {
                    url: contest_url.to_string(),
                    name: None,
                }),
                label: Some(label),
            },
            status: None,
            extra: serde_json::Map::new(),
        }
    }
}

/// Serializes sidecar contents with four-space indentation.
pub fn to_sidecar_json<T: Serialize>(value: &T) -> anyhow::Result<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;
    Ok(buf)
}

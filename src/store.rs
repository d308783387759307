use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

use crate::debug;

pub fn get_config_dir() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("oj-workspace");
    path
}

pub fn get_config_path() -> PathBuf {
    let mut path = get_config_dir();
    path.push("config.json");
    path
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Deserialize, strum::Display)]
pub enum CxxCompiler {
    #[default]
    #[serde(rename = "GCC")]
    #[strum(serialize = "gcc")]
    Gcc,
    #[serde(rename = "Clang")]
    #[strum(serialize = "clang")]
    Clang,
    #[serde(rename = "All")]
    #[strum(serialize = "all")]
    All,
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Deserialize, strum::Display)]
pub enum PythonVersion {
    #[serde(rename = "Python2")]
    #[strum(serialize = "2")]
    Python2,
    #[serde(rename = "Python3")]
    #[strum(serialize = "3")]
    Python3,
    #[default]
    #[serde(rename = "Auto")]
    #[strum(serialize = "auto")]
    Auto,
    #[serde(rename = "All")]
    #[strum(serialize = "all")]
    All,
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Deserialize, strum::Display)]
pub enum PythonInterpreter {
    #[serde(rename = "CPython")]
    #[strum(serialize = "cpython")]
    CPython,
    #[serde(rename = "PyPy")]
    #[strum(serialize = "pypy")]
    PyPy,
    #[default]
    #[serde(rename = "All")]
    #[strum(serialize = "all")]
    All,
}

/// User settings, read once at startup and handed to every command.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// File copied into every new problem directory.
    pub template_file: Option<PathBuf>,
    /// Extra `-I` directories for `oj-bundle`.
    pub include_path: Vec<PathBuf>,
    pub hide_path: bool,
    pub erase_line_directives: bool,
    pub bundle_before_submission: bool,
    pub open_browser: bool,
    pub guess_cxx_latest: bool,
    pub guess_cxx_compiler: CxxCompiler,
    pub guess_python_version: PythonVersion,
    pub guess_python_interpreter: PythonInterpreter,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            template_file: None,
            include_path: vec![],
            hide_path: false,
            erase_line_directives: false,
            bundle_before_submission: true,
            open_browser: true,
            guess_cxx_latest: true,
            guess_cxx_compiler: CxxCompiler::default(),
            guess_python_version: PythonVersion::default(),
            guess_python_interpreter: PythonInterpreter::default(),
        }
    }
}

/// Loads the config file, falling back to defaults when it does not exist.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(get_config_path);
    if !path.exists() {
        debug!("No config at {}, using defaults", path.display());
        return Ok(Config::default());
    }
    let text = fs_err::read_to_string(&path)?;
    let config = serde_json::from_str(&text)
        .with_context(|| format!("Malformed config file {}", path.display()))?;
    debug!("Loaded config from {}", path.display());
    Ok(config)
}

/// The solution file seeded into each problem directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub source: Option<PathBuf>,
    pub file_name: String,
}

impl Default for Template {
    fn default() -> Self {
        Template {
            source: None,
            file_name: "Main".to_string(),
        }
    }
}

impl Template {
    /// Checks the configured template path before anything is written.
    pub async fn resolve(config: &Config) -> anyhow::Result<Template> {
        let Some(path) = &config.template_file else {
            return Ok(Template::default());
        };
        if path.as_os_str().is_empty() {
            return Ok(Template::default());
        }
        let metadata = match fs_err::tokio::symlink_metadata(path).await {
            Ok(metadata) => metadata,
            Err(_) => anyhow::bail!("The file pointed to by \"templateFile\" does not exist."),
        };
        if metadata.is_dir() {
            anyhow::bail!("\"templateFile\" path is a directory, not a file.");
        }
        if metadata.file_type().is_symlink() {
            anyhow::bail!("\"templateFile\" path is a symbolic link, not a file.");
        }
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .context("\"templateFile\" has no usable file name")?
            .to_string();
        Ok(Template {
            source: Some(path.clone()),
            file_name,
        })
    }

    /// Writes the solution file into `dir`.
    pub async fn seed(&self, dir: &Path) -> anyhow::Result<()> {
        let file = dir.join(&self.file_name);
        match &self.source {
            Some(source) => {
                fs_err::tokio::copy(source, &file).await?;
            }
            None => fs_err::tokio::write(&file, b"").await?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"hidePath": true, "guessCxxCompiler": "Clang"}"#).unwrap();
        assert!(config.hide_path);
        assert_eq!(config.guess_cxx_compiler, CxxCompiler::Clang);
        assert!(config.bundle_before_submission);
        assert_eq!(config.template_file, None);
    }

    #[test]
    fn missing_config_file_means_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(Some(&dir.path().join("absent.json"))).unwrap();
        assert_eq!(config, Config::default());
    }

    #[tokio::test]
    async fn template_without_path_seeds_empty_main() {
        let dir = tempfile::tempdir().unwrap();
        let template = Template::resolve(&Config::default()).await.unwrap();
        template.seed(dir.path()).await.unwrap();
        assert_eq!(fs_err::read(dir.path().join("Main")).unwrap(), b"");
    }

    #[tokio::test]
    async fn template_is_copied_under_its_own_name() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("main.cpp");
        fs_err::write(&source, "int main() {}\n").unwrap();
        let config = Config {
            template_file: Some(source),
            ..Config::default()
        };
        let template = Template::resolve(&config).await.unwrap();
        assert_eq!(template.file_name, "main.cpp");

        let target = dir.path().join("A");
        fs_err::create_dir(&target).unwrap();
        template.seed(&target).await.unwrap();
        assert_eq!(
            fs_err::read_to_string(target.join("main.cpp")).unwrap(),
            "int main() {}\n"
        );
    }

    #[tokio::test]
    async fn template_pointing_at_a_directory_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            template_file: Some(dir.path().to_path_buf()),
            ..Config::default()
        };
        let err = Template::resolve(&config).await.unwrap_err();
        assert!(err.to_string().contains("directory"));

        let config = Config {
            template_file: Some(dir.path().join("nope.cpp")),
            ..Config::default()
        };
        assert!(Template::resolve(&config).await.is_err());
    }
}

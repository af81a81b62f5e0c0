use crate::app::cli::Cli;
use crate::app::models::{RuntimeConfig, DEFAULT_CONTENT_FILENAME, DEFAULT_PATTERN_STRING};
use crate::app::patterns::parse_patterns_or_default;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const SETTINGS_FILENAME: &str = "config.toml";
const STATE_FILENAME: &str = "state.json";

/// Optional user settings, `~/.config/folder_content/config.toml`.
#[derive(Deserialize, Debug, Default)]
struct SettingsFile {
    patterns: Option<String>,
    content_file: Option<String>,
}

/// Remembers where the collection lived on the previous run.
#[derive(Serialize, Deserialize, Debug, Default)]
struct StateFile {
    last_content_dir: Option<String>,
}

/// Where the collection directory came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentDirSource {
    Argument,
    Remembered,
    WorkingDir,
}

pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("folder_content"))
}

fn load_settings(config_dir: &Path) -> Result<SettingsFile> {
    let config_path = config_dir.join(SETTINGS_FILENAME);

    if !config_path.exists() {
        return Ok(SettingsFile::default());
    }

    let content = fs::read_to_string(&config_path)
        .context(format!("Failed to read config at {:?}", config_path))?;

    toml::from_str(&content).context("Failed to parse config.toml")
}

/// The directory remembered by the previous run, if any. A corrupt state file is ignored.
pub fn load_remembered_dir(config_dir: &Path) -> Option<PathBuf> {
    let state_path = config_dir.join(STATE_FILENAME);
    let content = fs::read_to_string(&state_path).ok()?;

    match serde_json::from_str::<StateFile>(&content) {
        Ok(state) => state
            .last_content_dir
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from),
        Err(err) => {
            log::warn!("State file {:?} is corrupt and will be ignored: {}", state_path, err);
            None
        }
    }
}

pub fn remember_dir(config_dir: &Path, content_dir: &Path) -> Result<()> {
    let state_path = config_dir.join(STATE_FILENAME);
    let state = StateFile {
        last_content_dir: Some(content_dir.to_string_lossy().into_owned()),
    };

    fs::create_dir_all(config_dir)
        .context(format!("Failed to create config directory {:?}", config_dir))?;
    let json = serde_json::to_string(&state).context("Failed to serialize state")?;
    fs::write(&state_path, json).context(format!("Failed to write state at {:?}", state_path))?;
    Ok(())
}

/// Location of the collection file: the argument directory beats the
/// remembered one, which beats the working directory.
pub fn resolve_content_path(
    arg: Option<&Path>,
    remembered: Option<&Path>,
    cwd: &Path,
    file_name: &str,
) -> (PathBuf, ContentDirSource) {
    let (dir, source) = match (arg, remembered) {
        (Some(dir), _) => (dir, ContentDirSource::Argument),
        (None, Some(dir)) => (dir, ContentDirSource::Remembered),
        (None, None) => (cwd, ContentDirSource::WorkingDir),
    };
    (dir.join(file_name), source)
}

/// Builds the runtime configuration.
///
/// `config_dir` is `None` when no home directory could be found; settings and
/// the remembered directory are then skipped.
pub fn resolve_config(cli: Cli, config_dir: Option<&Path>, cwd: &Path) -> Result<RuntimeConfig> {
    let settings = match config_dir {
        Some(dir) => load_settings(dir)?,
        None => SettingsFile::default(),
    };
    let remembered = config_dir.and_then(load_remembered_dir);

    let content_file = settings
        .content_file
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_CONTENT_FILENAME.to_string());

    let (content_path, source) = resolve_content_path(
        cli.output_dir.as_deref(),
        remembered.as_deref(),
        cwd,
        &content_file,
    );

    match source {
        ContentDirSource::Argument => {
            log::info!("Using directory from argument: {:?}", cli.output_dir);
            // Not fatal: the next run just won't remember it.
            if let (Some(config_dir), Some(arg)) = (config_dir, cli.output_dir.as_deref()) {
                if let Err(err) = remember_dir(config_dir, arg) {
                    log::warn!("{:#}", err);
                }
            }
        }
        ContentDirSource::Remembered => {
            log::info!("Using remembered directory: {:?}", remembered)
        }
        ContentDirSource::WorkingDir => {
            log::info!("Using current directory: {:?}", cwd)
        }
    }

    let patterns = parse_patterns_or_default(
        settings.patterns.as_deref().unwrap_or_default(),
        DEFAULT_PATTERN_STRING,
    );

    Ok(RuntimeConfig {
        patterns,
        content_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn cli(output_dir: Option<&Path>) -> Cli {
        Cli {
            output_dir: output_dir.map(Path::to_path_buf),
        }
    }

    #[test]
    fn argument_wins_and_is_remembered() {
        let config = TempDir::new().unwrap();
        let cwd = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();

        let resolved = resolve_config(cli(Some(out.path())), Some(config.path()), cwd.path()).unwrap();
        assert_eq!(resolved.content_path, out.path().join("content.json"));
        assert_eq!(load_remembered_dir(config.path()), Some(out.path().to_path_buf()));

        let next = resolve_config(cli(None), Some(config.path()), cwd.path()).unwrap();
        assert_eq!(next.content_path, out.path().join("content.json"));
    }

    #[test]
    fn falls_back_to_working_dir() {
        let config = TempDir::new().unwrap();
        let cwd = TempDir::new().unwrap();

        let resolved = resolve_config(cli(None), Some(config.path()), cwd.path()).unwrap();
        assert_eq!(resolved.content_path, cwd.path().join("content.json"));
        assert_eq!(
            resolved.patterns,
            vec!["*.cs", "*.csproj", "*.props*", "*.md"]
        );
    }

    #[test]
    fn missing_config_dir_still_resolves() {
        let cwd = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();

        let resolved = resolve_config(cli(Some(out.path())), None, cwd.path()).unwrap();
        assert_eq!(resolved.content_path, out.path().join("content.json"));

        let fallback = resolve_config(cli(None), None, cwd.path()).unwrap();
        assert_eq!(fallback.content_path, cwd.path().join("content.json"));
        assert_eq!(fallback.patterns.len(), 4);
    }

    #[test]
    fn content_path_precedence() {
        let cwd = Path::new("/work");
        let arg = Path::new("/arg");
        let remembered = Path::new("/remembered");

        assert_eq!(
            resolve_content_path(Some(arg), Some(remembered), cwd, "content.json"),
            (arg.join("content.json"), ContentDirSource::Argument)
        );
        assert_eq!(
            resolve_content_path(None, Some(remembered), cwd, "c.json"),
            (remembered.join("c.json"), ContentDirSource::Remembered)
        );
        assert_eq!(
            resolve_content_path(None, None, cwd, "content.json"),
            (cwd.join("content.json"), ContentDirSource::WorkingDir)
        );
    }

    #[test]
    fn corrupt_state_is_ignored() {
        let config = TempDir::new().unwrap();
        fs::write(config.path().join(STATE_FILENAME), "{ nope").unwrap();
        assert_eq!(load_remembered_dir(config.path()), None);
    }

    #[test]
    fn settings_override_patterns_and_file_name() {
        let config = TempDir::new().unwrap();
        let cwd = TempDir::new().unwrap();
        fs::write(
            config.path().join(SETTINGS_FILENAME),
            "patterns = \"*.rs, *.toml\"\ncontent_file = \"dump.json\"\n",
        )
        .unwrap();

        let resolved = resolve_config(cli(None), Some(config.path()), cwd.path()).unwrap();
        assert_eq!(resolved.patterns, vec!["*.rs", "*.toml"]);
        assert_eq!(resolved.content_path, cwd.path().join("dump.json"));
    }

    #[test]
    fn unparseable_settings_are_an_error() {
        let config = TempDir::new().unwrap();
        let cwd = TempDir::new().unwrap();
        fs::write(config.path().join(SETTINGS_FILENAME), "patterns = [").unwrap();
        assert!(resolve_config(cli(None), Some(config.path()), cwd.path()).is_err());
    }
}

//! Configuration loading and resolution.

use std::path::{Path, PathBuf};

use wbscope::SessionCookies;

/// File name looked up in the working directory and in `~/.wbscope/`.
pub const COOKIES_FILE_NAME: &str = "cookies.txt";

/// Errors while locating or reading analytics cookies.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("cannot read cookies file {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cookies file {0} is empty")]
    EmptyFile(PathBuf),

    #[error("--cookies value is empty")]
    EmptyInline,
}

/// Where the cookies were found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CookieOrigin {
    Inline,
    File(PathBuf),
    Env,
}

/// Inputs for cookie resolution, captured once so resolution is pure.
#[derive(Debug, Clone, Default)]
pub struct CookieLookup {
    pub inline: Option<String>,
    pub file: Option<PathBuf>,
    pub env_inline: Option<String>,
    pub env_file: Option<PathBuf>,
    pub cwd: PathBuf,
    pub home: Option<PathBuf>,
}

impl CookieLookup {
    /// Lookup from CLI flags plus the process environment.
    pub fn from_env(inline: Option<&str>, file: Option<&Path>) -> Self {
        Self {
            inline: inline.map(str::to_string),
            file: file.map(Path::to_path_buf),
            env_inline: std::env::var("WBSCOPE_COOKIES").ok(),
            env_file: std::env::var("WBSCOPE_COOKIES_FILE").ok().map(PathBuf::from),
            cwd: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            home: dirs::home_dir(),
        }
    }

    /// Resolve cookies.
    ///
    /// Priority: `--cookies` > `--cookies-file` > `WBSCOPE_COOKIES` >
    /// `WBSCOPE_COOKIES_FILE` > `./cookies.txt` > `~/.wbscope/cookies.txt`.
    /// Explicitly named files must exist and be non-empty; the fallback
    /// locations are skipped when missing. `Ok(None)` means nothing was found.
    pub fn resolve(&self) -> Result<Option<(SessionCookies, CookieOrigin)>, ConfigError> {
        if let Some(raw) = &self.inline {
            if raw.trim().is_empty() {
                return Err(ConfigError::EmptyInline);
            }
            return Ok(Some((SessionCookies::parse(raw), CookieOrigin::Inline)));
        }

        if let Some(path) = &self.file {
            return read_cookies_file(path).map(Some);
        }

        if let Some(raw) = self.env_inline.as_deref().filter(|s| !s.trim().is_empty()) {
            return Ok(Some((SessionCookies::parse(raw), CookieOrigin::Env)));
        }

        if let Some(path) = &self.env_file {
            return read_cookies_file(path).map(Some);
        }

        let fallbacks = [
            Some(self.cwd.join(COOKIES_FILE_NAME)),
            self.home
                .as_ref()
                .map(|h| h.join(".wbscope").join(COOKIES_FILE_NAME)),
        ];
        for path in fallbacks.into_iter().flatten() {
            if path.is_file() {
                return read_cookies_file(&path).map(Some);
            }
        }

        Ok(None)
    }
}

fn read_cookies_file(path: &Path) -> Result<(SessionCookies, CookieOrigin), ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;
    if raw.trim().is_empty() {
        return Err(ConfigError::EmptyFile(path.to_path_buf()));
    }
    Ok((
        SessionCookies::parse(raw.trim()),
        CookieOrigin::File(path.to_path_buf()),
    ))
}

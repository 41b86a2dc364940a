use std::{
    fmt,
    path::{Path, PathBuf},
};

use non_empty_string::NonEmptyString;
use reqwest::Url;
use serde::Deserialize;

/// Environment variable holding the API bearer token.
pub const TOKEN_VAR: &str = "PACHCA_API_TOKEN";

/// Environment variable overriding the directory endpoint.
pub const ENDPOINT_VAR: &str = "PACHCA_API_URL";

/// The shared-API endpoint listing every user of the workspace.
pub const DEFAULT_ENDPOINT: &str = "https://api.pachca.com/api/shared/v1/users";

/// Spreadsheet written in tabular mode when no path is given.
pub const DEFAULT_OUTPUT: &str = "pachca_users.xlsx";

/// How the directory is rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Write a spreadsheet file.
    #[default]
    Xlsx,
    /// Print one line per user to standard output.
    Text,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Xlsx => "xlsx",
            Self::Text => "text",
        })
    }
}

/// A bearer token for the Pachca API.
///
/// The secret never appears in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Token(NonEmptyString);

impl Token {
    /// Builds a token from raw input, trimming surrounding whitespace.
    ///
    /// Returns `None` if nothing is left after trimming.
    #[must_use]
    pub fn new(raw: &str) -> Option<Self> {
        NonEmptyString::new(raw.trim().to_string()).ok().map(Self)
    }

    /// The secret, for use in the `Authorization` header.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token(***)")
    }
}

/// Optional settings read from a TOML file.
///
/// Every key may be omitted. The token is deliberately not configurable here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "Versions")]
pub struct Settings {
    /// Directory endpoint.
    pub endpoint: Option<String>,
    /// Spreadsheet path for tabular mode.
    pub output: Option<PathBuf>,
    /// Default rendering mode.
    pub mode: Option<Mode>,
}

impl Settings {
    /// Loads settings from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| Error::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// The serialized versions of the settings file.
/// This allows the format to change without breaking existing files.
#[derive(Debug, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default)]
        endpoint: Option<String>,
        #[serde(default)]
        output: Option<PathBuf>,
        #[serde(default)]
        mode: Option<Mode>,
    },
}

impl From<Versions> for Settings {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                endpoint,
                output,
                mode,
            } => Self {
                endpoint,
                output,
                mode,
            },
        }
    }
}

/// Values given on the command line. They take precedence over everything
/// else.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// `--endpoint`
    pub endpoint: Option<String>,
    /// `--output`
    pub output: Option<PathBuf>,
    /// `--mode`
    pub mode: Option<Mode>,
}

/// Fully resolved run configuration.
#[derive(Debug, Clone)]
pub struct Config {
    token: Token,
    endpoint: Url,
    output: PathBuf,
    mode: Mode,
}

impl Config {
    /// Resolves the configuration from command-line overrides, the
    /// environment and an optional settings file.
    ///
    /// `env` looks up environment variables; pass
    /// `|name| std::env::var(name).ok()` for the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingToken`] if the token is unset or blank, and
    /// [`Error::Endpoint`] if the endpoint is not an absolute HTTP(S) URL.
    pub fn resolve<F>(overrides: Overrides, settings: Settings, env: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = env(TOKEN_VAR)
            .as_deref()
            .and_then(Token::new)
            .ok_or(Error::MissingToken)?;

        let endpoint = overrides
            .endpoint
            .or_else(|| env(ENDPOINT_VAR).filter(|value| !value.trim().is_empty()))
            .or(settings.endpoint)
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        let endpoint = parse_endpoint(endpoint.trim())?;

        let output = overrides
            .output
            .or(settings.output)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));

        let mode = overrides.mode.or(settings.mode).unwrap_or_default();

        Ok(Self {
            token,
            endpoint,
            output,
            mode,
        })
    }

    /// The bearer token.
    #[must_use]
    pub const fn token(&self) -> &Token {
        &self.token
    }

    /// The directory endpoint.
    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Where the spreadsheet is written in tabular mode.
    #[must_use]
    pub fn output(&self) -> &Path {
        &self.output
    }

    /// The rendering mode.
    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }
}

fn parse_endpoint(raw: &str) -> Result<Url, Error> {
    let url = Url::parse(raw).map_err(|e| Error::Endpoint {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(Error::Endpoint {
            url: raw.to_string(),
            reason: format!("unsupported scheme '{scheme}'"),
        }),
    }
}

/// Errors raised while assembling the configuration.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The token variable is unset or blank.
    #[error("Переменная окружения PACHCA_API_TOKEN не установлена")]
    MissingToken,

    /// The endpoint is not a usable URL.
    #[error("Некорректный адрес API '{url}': {reason}")]
    Endpoint {
        /// The rejected value.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The settings file could not be read.
    #[error("Не удалось прочитать файл настроек {}", path.display())]
    Read {
        /// Path of the settings file.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },

    /// The settings file is not valid TOML or has the wrong shape.
    #[error("Не удалось разобрать файл настроек {}", path.display())]
    Parse {
        /// Path of the settings file.
        path: PathBuf,
        /// Underlying parse failure.
        source: toml::de::Error,
    },
}

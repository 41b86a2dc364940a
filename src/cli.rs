use std::{path::PathBuf, time::Duration};

mod terminal;

use anyhow::Context;
use clap::ArgAction;
use indicatif::ProgressBar;
use pachca_directory::{
    Client, Config, Exporter, FetchDirectory, Mode, Outcome, client,
    domain::{Overrides, Settings},
};
use tracing::{debug, instrument, warn};

pub use terminal::Colorize;

/// Export the Pachca user directory.
///
/// The API token is read from `PACHCA_API_TOKEN` (a `.env` file in the
/// working directory is honoured).
#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Output mode [default: xlsx]
    #[arg(long, value_enum)]
    mode: Option<Mode>,

    /// Spreadsheet to write in xlsx mode [default: pachca_users.xlsx]
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Directory endpoint (overrides PACHCA_API_URL)
    #[arg(long, value_name = "URL")]
    endpoint: Option<String>,

    /// Optional TOML settings file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);
        load_dotenv();

        let settings = match &self.config {
            Some(path) => Settings::load(path).context("Ошибка конфигурации")?,
            None => Settings::default(),
        };
        let config = Config::resolve(self.overrides(), settings, |name| std::env::var(name).ok())
            .context("Ошибка конфигурации")?;
        debug!(?config, "configuration resolved");

        export(&config)
    }

    fn overrides(&self) -> Overrides {
        Overrides {
            endpoint: self.endpoint.clone(),
            output: self.output.clone(),
            mode: self.mode,
        }
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        // stdout is reserved for text-mode output
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

/// Loads `.env` from the working directory without overriding variables
/// that are already set.
fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => debug!(path = %path.display(), "loaded environment file"),
        Err(e) if e.not_found() => {}
        Err(e) => warn!("ignoring malformed .env file: {e}"),
    }
}

#[instrument(skip_all, fields(endpoint = %config.endpoint(), mode = %config.mode()))]
fn export(config: &Config) -> anyhow::Result<()> {
    let client = Client::from_config(config).context("Не удалось создать HTTP-клиент")?;
    let exporter = Exporter::from_config(config);

    let stdout = std::io::stdout();
    let outcome = exporter
        .run(&WithSpinner(&client), &mut stdout.lock())
        .context("Не удалось выгрузить список пользователей")?;

    if let Outcome::Saved { users, path } = outcome {
        eprintln!(
            "{}",
            format!("✅ Сохранено пользователей: {users} → {}", path.display()).success()
        );
    }
    Ok(())
}

/// Renders an error and its causes on one line, outermost first.
pub fn diagnostic(error: &anyhow::Error) -> String {
    format!("{error:#}")
}

/// Shows a spinner on stderr while the wrapped source is fetching.
struct WithSpinner<'a, S>(&'a S);

impl<S: FetchDirectory> FetchDirectory for WithSpinner<'_, S> {
    fn fetch(&self) -> Result<String, client::Error> {
        let spinner = ProgressBar::new_spinner();
        spinner.set_message("Загрузка списка пользователей…");
        spinner.enable_steady_tick(Duration::from_millis(100));
        let result = self.0.fetch();
        spinner.finish_and_clear();
        result
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::*;

    #[test]
    fn command_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn flags_map_to_overrides() {
        let cli = Cli::try_parse_from([
            "pachca-users",
            "--mode",
            "text",
            "-o",
            "out.xlsx",
            "--endpoint",
            "http://localhost:9000/users",
        ])
        .unwrap();

        let overrides = cli.overrides();

        assert_eq!(overrides.mode, Some(Mode::Text));
        assert_eq!(overrides.output, Some(PathBuf::from("out.xlsx")));
        assert_eq!(
            overrides.endpoint.as_deref(),
            Some("http://localhost:9000/users")
        );
    }

    #[test]
    fn no_flags_leave_everything_to_configuration() {
        let cli = Cli::try_parse_from(["pachca-users"]).unwrap();

        let overrides = cli.overrides();

        assert_eq!(overrides.mode, None);
        assert_eq!(overrides.output, None);
        assert_eq!(overrides.endpoint, None);
    }

    #[test]
    fn unknown_mode_is_rejected() {
        assert!(Cli::try_parse_from(["pachca-users", "--mode", "pdf"]).is_err());
    }

    #[test]
    fn diagnostic_includes_context_and_every_cause() {
        let decode = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let detail = decode.to_string();
        let error = Err::<(), _>(client::Error::Decode(decode))
            .context("Не удалось выгрузить список пользователей")
            .unwrap_err();

        let message = diagnostic(&error);

        assert!(message.starts_with("Не удалось выгрузить список пользователей: "));
        assert!(message.contains("Ошибка при разборе JSON: "));
        assert!(message.ends_with(&detail));
    }

    #[test]
    fn diagnostic_surfaces_raw_api_body() {
        let error = Err::<(), _>(client::Error::Api {
            status: 500,
            body: r#"{"error":"x"}"#.to_string(),
        })
        .context("Не удалось выгрузить список пользователей")
        .unwrap_err();

        assert_eq!(
            diagnostic(&error),
            r#"Не удалось выгрузить список пользователей: Ошибка API (HTTP 500): {"error":"x"}"#
        );
    }

    #[test]
    fn spinner_passes_result_through() {
        struct Fixed;

        impl FetchDirectory for Fixed {
            fn fetch(&self) -> Result<String, client::Error> {
                Ok("{\"data\":[]}".to_string())
            }
        }

        let body = WithSpinner(&Fixed).fetch().unwrap();

        assert_eq!(body, "{\"data\":[]}");
    }
}

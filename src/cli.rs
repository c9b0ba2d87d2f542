use std::ffi::OsString;
use std::path::PathBuf;

use crate::config::{AppConfig, AppConfigOverrides};
use crate::convert::{jira_to_org, org_to_jira_with, Conversion};
use crate::heading::HeadingPolicy;
use crate::logging;

pub const USAGE: &str = "usage: jira-org <to-org|to-jira> [--base-level N] \
[--heading-policy clamp|passthrough] [--json] [--debug] [--config PATH] [FILE]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Jira markup in, Org markup out.
    ToOrg,
    /// Org markup in, Jira markup out.
    ToJira,
}

#[derive(Debug)]
pub struct CliArgs {
    pub direction: Direction,
    /// `None` reads stdin.
    pub input: Option<PathBuf>,
    pub config_path: Option<PathBuf>,
    pub json: bool,
    pub overrides: AppConfigOverrides,
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{usage}", usage = USAGE)]
    Usage,
    #[error("unknown direction '{0}', expected to-org or to-jira\n{usage}", usage = USAGE)]
    UnknownDirection(String),
    #[error("unexpected argument '{0}'\n{usage}", usage = USAGE)]
    UnexpectedArgument(String),
    #[error("missing value for {0}")]
    MissingValue(&'static str),
    #[error("invalid value for {flag}: {message}")]
    InvalidValue { flag: &'static str, message: String },
    #[error("--json is only available with to-org")]
    JsonRequiresToOrg,
    #[error("failed to read input {path}: {source}")]
    ReadInput {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to encode conversion as JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parses arguments following the program name.
pub fn parse_args<I>(args: I) -> Result<CliArgs, CliError>
where
    I: IntoIterator<Item = OsString>,
{
    let mut args = args
        .into_iter()
        .map(|arg| arg.to_string_lossy().into_owned());

    let direction = match args.next().as_deref() {
        Some("to-org") => Direction::ToOrg,
        Some("to-jira") => Direction::ToJira,
        Some("-h") | Some("--help") | None => return Err(CliError::Usage),
        Some(other) => return Err(CliError::UnknownDirection(other.to_string())),
    };

    let mut parsed = CliArgs {
        direction,
        input: None,
        config_path: None,
        json: false,
        overrides: AppConfigOverrides::default(),
    };

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Err(CliError::Usage),
            "--json" => parsed.json = true,
            "--debug" => parsed.overrides.logging_debug = Some(true),
            "--base-level" => {
                let raw = args.next().ok_or(CliError::MissingValue("--base-level"))?;
                let level = raw
                    .trim()
                    .parse::<usize>()
                    .map_err(|err| CliError::InvalidValue {
                        flag: "--base-level",
                        message: format!("'{raw}': {err}"),
                    })?;
                parsed.overrides.heading_base_level = Some(level);
            }
            "--heading-policy" => {
                let raw = args
                    .next()
                    .ok_or(CliError::MissingValue("--heading-policy"))?;
                let policy = raw
                    .parse::<HeadingPolicy>()
                    .map_err(|message| CliError::InvalidValue {
                        flag: "--heading-policy",
                        message,
                    })?;
                parsed.overrides.heading_policy = Some(policy);
            }
            "--config" => {
                let raw = args.next().ok_or(CliError::MissingValue("--config"))?;
                parsed.config_path = Some(PathBuf::from(raw));
            }
            "-" if parsed.input.is_none() => {}
            other if !other.starts_with("--") && parsed.input.is_none() => {
                parsed.input = Some(PathBuf::from(other));
            }
            other => return Err(CliError::UnexpectedArgument(other.to_string())),
        }
    }

    if parsed.json && parsed.direction != Direction::ToOrg {
        return Err(CliError::JsonRequiresToOrg);
    }

    Ok(parsed)
}

pub fn read_input(path: Option<&std::path::Path>) -> Result<String, CliError> {
    use std::io::Read;

    match path {
        Some(path) => std::fs::read_to_string(path).map_err(|source| CliError::ReadInput {
            path: path.display().to_string(),
            source,
        }),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|source| CliError::ReadInput {
                    path: "<stdin>".to_string(),
                    source,
                })?;
            Ok(buf)
        }
    }
}

/// Converts `input` as requested and returns what the binary prints.
pub fn execute(args: &CliArgs, cfg: &AppConfig, input: &str) -> Result<String, CliError> {
    let conversion = match args.direction {
        Direction::ToOrg => jira_to_org(input),
        Direction::ToJira => org_to_jira_with(input, &cfg.convert.options()),
    };
    report(&conversion);

    if args.json {
        return Ok(serde_json::to_string_pretty(&conversion)?);
    }
    Ok(match args.direction {
        Direction::ToOrg => conversion.render_headings(cfg.convert.heading_base_level),
        Direction::ToJira => conversion.text,
    })
}

fn report(conversion: &Conversion) {
    for diagnostic in &conversion.diagnostics {
        logging::warn(diagnostic.to_string());
    }
    logging::debug(conversion.stats.summary());
    if conversion.is_blank() {
        logging::info("nothing to convert");
    }
}

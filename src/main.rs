use std::io::Write;

use jira_org::cli::{self, CliError};
use jira_org::{config, logging};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args_os();
    let _program = args.next();
    let parsed = match cli::parse_args(args) {
        Ok(parsed) => parsed,
        Err(CliError::Usage) => {
            println!("{}", cli::USAGE);
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    let mut cfg = config::load_or_default(parsed.config_path.as_deref())?;
    cfg.apply_overrides(&parsed.overrides)?;
    logging::init(cfg.logging.debug);
    logging::debug(format!(
        "direction={:?} heading_base_level={} heading_policy={:?}",
        parsed.direction, cfg.convert.heading_base_level, cfg.convert.heading_policy
    ));

    let input = cli::read_input(parsed.input.as_deref())?;
    let output = match cli::execute(&parsed, &cfg, &input) {
        Ok(output) => output,
        Err(err) => {
            logging::error(format!("conversion failed: {err}"));
            return Err(err.into());
        }
    };

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(output.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

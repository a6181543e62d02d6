//! Config subcommand handlers.

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat};
use crate::config;
use crate::error::CliError;
use crate::output;

pub fn handle(args: &ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            let path = growatt_config::config_path();
            output::print_output(&path.display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = config::load_with_overrides(global)?.redacted();
            let out = match global.output {
                OutputFormat::Table | OutputFormat::Plain => cfg.to_toml()?,
                _ => output::render_single(&global.output, &cfg, |_| String::new(), |_| {
                    String::new()
                }),
            };
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}

//! Services subcommand implementation.
//!
//! Lists the port-to-service table, looks up single ports, and writes the
//! built-in table out as an editable file.

use crate::config::{AppSettings, Paths};
use crate::error::{CliError, CliResult};
use crate::output;
use crate::services::ServiceTable;
use clap::Parser;
use console::style;
use std::path::PathBuf;

/// Show or export the port-to-service table.
#[derive(Parser, Debug)]
pub struct ServicesCommand {
    /// Look up a single port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Service table (JSON) to read instead of the configured one
    #[arg(long, value_name = "PATH")]
    pub services: Option<PathBuf>,

    /// Write the built-in table to the config directory (or --services) for editing
    #[arg(long, conflicts_with = "port")]
    pub init: bool,

    /// Overwrite an existing file with --init
    #[arg(long, requires = "init")]
    pub force: bool,
}

impl ServicesCommand {
    /// Execute the services command.
    pub fn execute(&self, settings: &AppSettings) -> CliResult<()> {
        if self.init {
            return self.init_file();
        }

        let mut settings = settings.clone();
        if let Some(path) = &self.services {
            settings.services_file = Some(path.clone());
        }
        let table = ServiceTable::load(&settings)?;

        match self.port {
            Some(port) => match table.get(port) {
                Some(name) => println!("{:>6}  {}", port, name),
                None => println!("{:>6}  {}", port, style("(not in table)").dim()),
            },
            None => {
                for (port, name) in table.sorted() {
                    println!("{:>6}  {}", port, name);
                }
            }
        }

        Ok(())
    }

    fn init_file(&self) -> CliResult<()> {
        let path = match &self.services {
            Some(path) => path.clone(),
            None => Paths::get()?.services_file(),
        };

        if path.exists() && !self.force {
            return Err(CliError::Other(format!(
                "{} already exists (use --force to overwrite)",
                path.display()
            )));
        }

        ServiceTable::builtin().save_to(&path)?;
        output::print_success(&format!("Service table written to {}", path.display()));
        Ok(())
    }
}

//! Persist the configuration

use colored::Colorize;
use papis_config::ConfigContext;

use crate::error::Result;

pub fn run_save(ctx: &mut ConfigContext) -> Result<()> {
    ctx.save()?;
    let file = ctx.configuration()?.file_location().display().to_string();
    println!("{} configuration to {}", "Saved".green().bold(), file);
    Ok(())
}

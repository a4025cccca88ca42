use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::ui::messages;

/// Handle the `setup` command: write the default config file and tell the
/// user what still needs to be filled in by hand.
pub fn handle(cmd: &Commands) -> AppResult<()> {
    if let Commands::Setup { force } = cmd {
        let path = Config::write_default(*force)?;

        messages::success(format!("Config file written: {}", path.display()));
        messages::info("Edit base_url and email in the file, then set AUTOPUNCH_PASSWORD in your environment.");
        println!();
        println!("  export AUTOPUNCH_PASSWORD='…'");
        println!("  autopunch login");
    }
    Ok(())
}

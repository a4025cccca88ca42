use crate::browser::Session;
use crate::cli::parser::Cli;
use crate::config::Config;
use crate::core::auth;
use crate::errors::AppResult;
use crate::ui::messages;

/// Handle the `login` command: authenticate once and report.
pub async fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let password = Config::password()?;

    messages::info(format!("Logging in to {} as {}…", cfg.base_url, cfg.email));

    let session = Session::launch(cfg, cli.headful).await?;
    let result = auth::login(&session, cfg, &password).await;
    session.close().await;

    result?;
    messages::success("Login OK");
    Ok(())
}

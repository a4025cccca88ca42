//! Login sequence. A single linear pass with early returns, no state machine:
//! the portal either lets us through or it does not.

use crate::browser::{wait::wait_until, Session};
use crate::config::Config;
use crate::core::selectors::{
    EMAIL_INPUT, LOGGED_IN_MARKERS, LOGIN_ERROR, LOGIN_SUBMIT, PASSWORD_INPUT,
};
use crate::errors::{AppError, AppResult};
use tracing::{debug, info};

/// Authenticate on the login page and wait until the portal looks logged in.
pub async fn login(session: &Session, cfg: &Config, password: &str) -> AppResult<()> {
    session.goto(&cfg.login_url()).await?;

    // Already authenticated from a previous session cookie? Then the login
    // form never renders and we are done.
    if is_logged_in(session, cfg).await {
        info!("already logged in");
        return Ok(());
    }

    let (email_el, sel) = session.wait_for(&EMAIL_INPUT).await?;
    debug!("email input via {sel}");
    email_el.click().await?;
    email_el.type_str(&cfg.email).await?;

    let (password_el, sel) = session.find_first(&PASSWORD_INPUT).await?;
    debug!("password input via {sel}");
    password_el.click().await?;
    password_el.type_str(password).await?;

    match session.find_first(&LOGIN_SUBMIT).await {
        Ok((submit, sel)) => {
            debug!("submit via {sel}");
            submit.click().await?;
        }
        Err(_) => {
            debug!("no submit button, pressing Enter");
            password_el.press_key("Enter").await?;
        }
    }

    // Success: a logged-in marker shows up, or the URL leaves the login path.
    let confirmed = wait_until("login confirmation", session.op_timeout(), || async move {
        is_logged_in(session, cfg).await.then_some(())
    })
    .await;

    match confirmed {
        Ok(()) => {
            info!("login confirmed");
            Ok(())
        }
        Err(_) => Err(AppError::AuthFailed {
            page_error: visible_error(session).await,
        }),
    }
}

async fn is_logged_in(session: &Session, cfg: &Config) -> bool {
    if session.find_first(&LOGGED_IN_MARKERS).await.is_ok() {
        return true;
    }
    match session.current_url().await {
        Ok(Some(url)) => !url.contains(&cfg.login_path),
        _ => false,
    }
}

/// Scrape whatever error text the login page is showing, if any.
async fn visible_error(session: &Session) -> Option<String> {
    let (el, _) = session.find_first(&LOGIN_ERROR).await.ok()?;
    let text = el.inner_text().await.ok()??;
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

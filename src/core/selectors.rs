//! Every selector the tool knows about, in one place.
//!
//! The vendor ships no stable API, so each target is a cascade of candidate
//! CSS selectors tried in order, first match wins. When the portal's markup
//! changes, this module is the only one that should need review.

use crate::errors::{AppError, AppResult};

/// An ordered list of candidate selectors for one UI target.
#[derive(Debug, Clone, Copy)]
pub struct Cascade {
    /// Human name used in errors and logs, e.g. "email input".
    pub what: &'static str,
    pub selectors: &'static [&'static str],
}

impl Cascade {
    /// Walk the list in order, handing each selector to `probe`; return the
    /// first hit together with the selector that won. Exhausting the list is
    /// an ElementNotFound naming the target.
    pub fn resolve_with<T>(
        &self,
        mut probe: impl FnMut(&str) -> Option<T>,
    ) -> AppResult<(T, &'static str)> {
        for sel in self.selectors {
            if let Some(hit) = probe(sel) {
                return Ok((hit, *sel));
            }
        }
        Err(self.not_found())
    }

    pub fn not_found(&self) -> AppError {
        AppError::ElementNotFound {
            what: self.what.to_string(),
            tried: self.selectors.len(),
        }
    }
}

// ---------------------------------------------------------------------------
// Login page
// ---------------------------------------------------------------------------

pub const EMAIL_INPUT: Cascade = Cascade {
    what: "email input",
    selectors: &[
        "input[type='email']",
        "input[name='email']",
        "input[name='user[email]']",
        "input[autocomplete='username']",
        "input[id*='email']",
    ],
};

pub const PASSWORD_INPUT: Cascade = Cascade {
    what: "password input",
    selectors: &[
        "input[type='password']",
        "input[name='password']",
        "input[name='user[password]']",
        "input[autocomplete='current-password']",
    ],
};

pub const LOGIN_SUBMIT: Cascade = Cascade {
    what: "login submit button",
    selectors: &[
        "button[type='submit']",
        "input[type='submit']",
        "form button",
        "[data-testid='login-submit']",
    ],
};

/// Any of these present means we are past the login wall.
pub const LOGGED_IN_MARKERS: Cascade = Cascade {
    what: "logged-in marker",
    selectors: &[
        "[data-testid='user-menu']",
        "nav [class*='avatar']",
        "[class*='user-menu']",
        "a[href*='logout']",
        "a[href*='sign_out']",
    ],
};

pub const LOGIN_ERROR: Cascade = Cascade {
    what: "login error text",
    selectors: &[
        "[role='alert']",
        ".flash-error",
        "[class*='error-message']",
        "[class*='alert']",
    ],
};

// ---------------------------------------------------------------------------
// Timesheet table
// ---------------------------------------------------------------------------

/// Row universe scanned for snapshots. Kept as one selector (not a cascade)
/// because the snapshot and the later click-by-index must agree on ordering.
pub const ROW_UNIVERSE: &str = "tr, [role='row']";

/// A data row owns one of these; header rows do not.
pub const ROW_TOGGLE: &str =
    "button[aria-expanded], [data-toggle], [class*='toggle'], [class*='expand'], [class*='chevron']";

pub const ADD_ENTRY: Cascade = Cascade {
    what: "add-entry button",
    selectors: &[
        "[data-testid='add-entry']",
        "button[class*='add']",
        "[class*='popover'] button",
        "[class*='popup'] button",
    ],
};

/// Text needles for the add affordance, used when no selector matches.
pub const ADD_ENTRY_TEXTS: &[&str] = &["add", "new entry", "+"];

/// Container the time inputs live in, once the popover is open.
pub const POPUP: Cascade = Cascade {
    what: "entry popover",
    selectors: &[
        "[role='dialog']",
        "[class*='popover']",
        "[class*='popup']",
        "[class*='modal']",
    ],
};

pub const FORM_SUBMIT: Cascade = Cascade {
    what: "entry submit button",
    selectors: &[
        "[role='dialog'] button[type='submit']",
        "[class*='popover'] button[type='submit']",
        "[class*='popup'] button[type='submit']",
        "button[type='submit']",
    ],
};

pub const FORM_SUBMIT_TEXTS: &[&str] = &["save", "submit", "ok", "done"];

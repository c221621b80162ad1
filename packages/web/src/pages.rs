//! Server-rendered pages.

use authn::Session;

/// Body of the admin page.
pub fn admin_greeting(session: Option<&Session>) -> String {
    match session {
        Some(session) => format!(
            "admin page - welcome back {}",
            session.display_name().unwrap_or_default()
        ),
        None => "Please login to see this page".to_string(),
    }
}

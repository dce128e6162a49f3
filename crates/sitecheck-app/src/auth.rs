//! Static credential check
//!
//! Clients log in with their roster id and password; managers share one
//! password from the configuration.

use sitecheck_types::{Client, Error, Result};

use crate::config::Config;
use crate::roster::ClientRoster;

/// Logged-in user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Session {
    Client { client: Client },
    Manager { name: String },
}

impl Session {
    pub fn display_name(&self) -> &str {
        match self {
            Session::Client { client } => &client.name,
            Session::Manager { name } => name,
        }
    }

    /// Client id whose inspections this session may see, `None` for managers
    pub fn client_scope(&self) -> Option<&str> {
        match self {
            Session::Client { client } => Some(&client.id),
            Session::Manager { .. } => None,
        }
    }
}

pub fn login_client(roster: &ClientRoster, client_id: &str, password: &str) -> Result<Session> {
    match roster.find(client_id) {
        Some(client) if client.password == password => {
            tracing::info!(client = client_id, "client logged in");
            Ok(Session::Client {
                client: client.clone(),
            })
        }
        _ => {
            tracing::warn!(client = client_id, "client login rejected");
            Err(Error::Auth("Invalid credentials".to_string()))
        }
    }
}

pub fn login_manager(config: &Config, name: &str, password: &str) -> Result<Session> {
    if password != config.manager_password {
        tracing::warn!(manager = name, "manager login rejected");
        return Err(Error::Auth("Invalid password".to_string()));
    }
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::Validation("manager name is required".to_string()));
    }

    tracing::info!(manager = name, "manager logged in");
    Ok(Session::Manager {
        name: name.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_login() {
        let roster = ClientRoster::demo();
        let session = login_client(&roster, "bcs-office", "test123").unwrap();
        assert_eq!(session.display_name(), "BCS Headquarters");
        assert_eq!(session.client_scope(), Some("bcs-office"));
    }

    #[test]
    fn test_client_login_rejects_wrong_password_or_id() {
        let roster = ClientRoster::demo();
        assert!(matches!(
            login_client(&roster, "bcs-office", "nope"),
            Err(Error::Auth(_))
        ));
        assert!(matches!(
            login_client(&roster, "other", "test123"),
            Err(Error::Auth(_))
        ));
    }

    #[test]
    fn test_manager_login() {
        let config = Config::default();
        let session = login_manager(&config, " Dana ", "bcs2026").unwrap();
        assert_eq!(session, Session::Manager { name: "Dana".to_string() });
        assert_eq!(session.client_scope(), None);

        assert!(matches!(
            login_manager(&config, "Dana", "wrong"),
            Err(Error::Auth(_))
        ));
        assert!(matches!(
            login_manager(&config, "  ", "bcs2026"),
            Err(Error::Validation(_))
        ));
    }
}

//! Client roster loaded from TOML
//!
//! ```toml
//! [[clients]]
//! id = "bcs-office"
//! name = "BCS Headquarters"
//! password = "test123"
//! sites = ["Main Office", "Conference Floor"]
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;

use sitecheck_types::{Client, ConfigError, Result};

use crate::config::Config;

/// Container for parsing the roster file
#[derive(Debug, Deserialize)]
struct RosterFile {
    #[serde(default)]
    clients: Vec<Client>,
}

/// Static client list, supplied whole
#[derive(Debug, Clone, Default)]
pub struct ClientRoster {
    clients: Vec<Client>,
}

impl ClientRoster {
    pub fn new(clients: Vec<Client>) -> Self {
        Self { clients }
    }

    /// Built-in roster used when no roster file is configured
    pub fn demo() -> Self {
        Self::new(vec![Client {
            id: "bcs-office".to_string(),
            name: "BCS Headquarters".to_string(),
            password: "test123".to_string(),
            sites: vec!["Main Office".to_string(), "Conference Floor".to_string()],
        }])
    }

    /// Roster named by the configuration, or the demo roster
    pub fn from_config(config: &Config) -> Result<Self> {
        match config.roster_path {
            Some(ref path) => Self::load_from_file(path),
            None => Ok(Self::demo()),
        }
    }

    /// Load roster from a TOML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Roster {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        Self::load_from_str(&content).map_err(|reason| {
            ConfigError::Roster {
                path: path.display().to_string(),
                reason,
            }
            .into()
        })
    }

    /// Parse roster TOML
    pub fn load_from_str(toml_content: &str) -> std::result::Result<Self, String> {
        let file: RosterFile = toml::from_str(toml_content).map_err(|e| e.to_string())?;

        for (idx, client) in file.clients.iter().enumerate() {
            if client.id.trim().is_empty() {
                return Err(format!("client #{} has an empty id", idx + 1));
            }
            if file.clients[..idx].iter().any(|c| c.id == client.id) {
                return Err(format!("duplicate client id '{}'", client.id));
            }
        }

        Ok(Self::new(file.clients))
    }

    pub fn clients(&self) -> &[Client] {
        &self.clients
    }

    pub fn find(&self, client_id: &str) -> Option<&Client> {
        self.clients.iter().find(|c| c.id == client_id)
    }

    /// Display name for a client id, falling back to the id itself
    pub fn display_name<'a>(&'a self, client_id: &'a str) -> &'a str {
        self.find(client_id)
            .map(|c| c.name.as_str())
            .unwrap_or(client_id)
    }
}

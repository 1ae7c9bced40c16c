// Runtime configuration and the small profile persisted between runs.
//
// `Config` is assembled from command line flags (with environment
// fallbacks, see `main.rs`). `Profile` remembers the contact email so the
// user is not asked for it every time.

use crate::api::DEFAULT_BASE_URL;
use crate::error::ProfileError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

const PROFILE_FILE: &str = ".pubmed_sheet.json";

/// Settings for one run of the program.
#[derive(Debug, Clone)]
pub struct Config {
    /// Entrez E-utilities root URL.
    pub base_url: String,
    /// Contact email given up front; skips the email prompt.
    pub email: Option<String>,
    /// Optional NCBI API key (raises the rate limit).
    pub api_key: Option<String>,
    /// Sheet name given up front; skips the name prompt.
    pub sheet_name: Option<String>,
    /// Save here instead of opening the folder picker.
    pub output_dir: Option<PathBuf>,
    pub clear_screen: bool,
    pub profile_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            base_url: DEFAULT_BASE_URL.to_string(),
            email: None,
            api_key: None,
            sheet_name: None,
            output_dir: None,
            clear_screen: true,
            profile_path: default_profile_path(),
        }
    }
}

/// Profile file in the user's home directory, or the working directory
/// when no home can be determined.
pub fn default_profile_path() -> PathBuf {
    let dir = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    dir.join(PROFILE_FILE)
}

/// Values remembered between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Profile {
    /// Load the profile. A missing file is an empty profile, not an error.
    pub fn load(path: &Path) -> Result<Self, ProfileError> {
        let data = match std::fs::read_to_string(path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no saved profile");
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_str(&data)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), ProfileError> {
        let data = serde_json::to_string_pretty(self)?;
        std::fs::write(path, data)?;
        debug!(path = %path.display(), "profile saved");
        Ok(())
    }
}

/// Loose sanity check for a contact address.
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    let email = email.trim();
    match email.split_once('@') {
        _ if email.is_empty() => Err("Email cannot be empty"),
        _ if email.chars().any(char::is_whitespace) => Err("Email cannot contain spaces"),
        Some((user, host)) if !user.is_empty() && !host.is_empty() => Ok(()),
        _ => Err("Email must look like name@host"),
    }
}

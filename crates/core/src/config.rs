use crate::paths::expand_home;
use simplesheet_remote::ServiceAccountKey;
use std::path::PathBuf;

/// Worksheet used when none is configured.
pub const DEFAULT_WORKSHEET: &str = "Sheet1";

pub const ENV_SPREADSHEET_ID: &str = "GOOGLE_SPREADSHEET_ID";
pub const ENV_WORKSHEET_NAME: &str = "GOOGLE_WORKSHEET_NAME";
pub const ENV_APPLICATION_CREDENTIALS: &str = "GOOGLE_APPLICATION_CREDENTIALS";

/// Settings for opening sheets, normally read from the environment.
///
/// Every field is optional; explicit [`crate::OpenOptions`] values win over
/// anything found here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetConfig {
    /// `GOOGLE_SPREADSHEET_ID`
    pub spreadsheet_id: Option<String>,
    /// `GOOGLE_WORKSHEET_NAME`, falling back to `Sheet1`
    pub worksheet: Option<String>,
    /// `GOOGLE_APPLICATION_CREDENTIALS`, with a leading `~` expanded
    pub credentials_path: Option<PathBuf>,
    /// Key assembled from `GOOGLE_PRIVATE_KEY` and friends
    pub service_account: Option<ServiceAccountKey>,
}

impl SheetConfig {
    /// Read the configuration from the process environment
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through an arbitrary key lookup.
    ///
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        SheetConfig {
            spreadsheet_id: get(ENV_SPREADSHEET_ID),
            worksheet: get(ENV_WORKSHEET_NAME),
            credentials_path: get(ENV_APPLICATION_CREDENTIALS)
                .map(|path| expand_home(path, dirs::home_dir().as_deref())),
            service_account: ServiceAccountKey::from_lookup(&get),
        }
    }

    /// Configured worksheet name or the default
    #[must_use]
    pub fn worksheet_or_default(&self) -> &str {
        self.worksheet.as_deref().unwrap_or(DEFAULT_WORKSHEET)
    }
}

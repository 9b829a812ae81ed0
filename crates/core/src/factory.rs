use crate::config::SheetConfig;
use crate::paths::resolve_path;
use simplesheet_remote::{open_google_sheet, ClientOptions, Credentials};
use simplesheet_sheet::{Result, Sheet, SheetError};
use std::path::PathBuf;
use tracing::info;

/// CSV file opened in local mode when no path is given, relative to the base
/// directory.
pub const DEFAULT_CSV_PATH: &str = "sheets/attendance.csv";

/// Which backend to open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SheetMode {
    /// CSV file on the local filesystem
    #[default]
    Local,
    /// Google Sheets worksheet
    Online,
}

/// Options for [`open_sheet`]. Unset fields fall back to [`SheetConfig`].
#[derive(Debug, Clone, Default)]
pub struct OpenOptions {
    pub mode: SheetMode,
    /// Directory that relative paths resolve against (defaults to the
    /// current working directory)
    pub base_dir: Option<PathBuf>,
    /// CSV path for local mode
    pub path: Option<PathBuf>,
    pub spreadsheet_id: Option<String>,
    pub worksheet: Option<String>,
    /// Explicit credentials; beat anything in the configuration
    pub credentials: Option<Credentials>,
    pub client: ClientOptions,
}

impl OpenOptions {
    #[must_use]
    pub fn new(mode: SheetMode) -> Self {
        OpenOptions {
            mode,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(base_dir.into());
        self
    }

    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_spreadsheet_id(mut self, spreadsheet_id: impl Into<String>) -> Self {
        self.spreadsheet_id = Some(spreadsheet_id.into());
        self
    }

    #[must_use]
    pub fn with_worksheet(mut self, worksheet: impl Into<String>) -> Self {
        self.worksheet = Some(worksheet.into());
        self
    }

    #[must_use]
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    #[must_use]
    pub fn with_client_options(mut self, client: ClientOptions) -> Self {
        self.client = client;
        self
    }

    fn base_dir(&self) -> Result<PathBuf> {
        match &self.base_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(std::env::current_dir()?),
        }
    }
}

/// Open a sheet on the backend selected by `options.mode`.
///
/// Local mode opens (or creates) a CSV file; online mode connects to a Google
/// Sheets worksheet and fails with `InvalidParameter` when no spreadsheet id
/// can be found in the options or the configuration.
pub fn open_sheet(options: &OpenOptions, config: &SheetConfig) -> Result<Sheet> {
    match options.mode {
        SheetMode::Local => open_local(options),
        SheetMode::Online => open_online(options, config),
    }
}

fn open_local(options: &OpenOptions) -> Result<Sheet> {
    let base = options.base_dir()?;
    let path = match &options.path {
        Some(path) => resolve_path(&base, path),
        None => resolve_path(&base, DEFAULT_CSV_PATH),
    };
    info!(path = %path.display(), "opening csv sheet");
    Sheet::open_csv(path)
}

fn open_online(options: &OpenOptions, config: &SheetConfig) -> Result<Sheet> {
    let spreadsheet_id = options
        .spreadsheet_id
        .as_deref()
        .or(config.spreadsheet_id.as_deref())
        .ok_or_else(|| {
            SheetError::invalid(
                "online mode needs a spreadsheet id; pass one or set GOOGLE_SPREADSHEET_ID",
            )
        })?;
    let worksheet = options
        .worksheet
        .as_deref()
        .unwrap_or_else(|| config.worksheet_or_default());

    let base = options.base_dir()?;
    let credentials = Credentials::resolve(
        options.credentials.clone(),
        config.service_account.clone(),
        config
            .credentials_path
            .as_ref()
            .map(|path| resolve_path(&base, path)),
    )?;

    info!(spreadsheet_id, worksheet, "opening google sheet");
    open_google_sheet(spreadsheet_id, worksheet, credentials, &options.client)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_default_path() {
        let dir = tempfile::tempdir().unwrap();
        let options = OpenOptions::new(SheetMode::Local).with_base_dir(dir.path());

        let mut sheet = open_sheet(&options, &SheetConfig::default()).unwrap();
        sheet.set_cell(1, 1, "12月").unwrap();

        let written = std::fs::read_to_string(dir.path().join(DEFAULT_CSV_PATH)).unwrap();
        assert_eq!(written, "12月\n");
    }

    #[test]
    fn test_local_relative_path_uses_base_dir() {
        let dir = tempfile::tempdir().unwrap();
        let options = OpenOptions::default()
            .with_base_dir(dir.path())
            .with_path("data/out.csv");

        let mut sheet = open_sheet(&options, &SheetConfig::default()).unwrap();
        sheet.append_row(["a"]).unwrap();

        let expected = dir.path().join("data/out.csv");
        assert!(expected.is_file());
        assert_eq!(
            sheet.store_description(),
            format!("csv:{}", expected.display())
        );
    }

    #[test]
    fn test_online_requires_spreadsheet_id() {
        let options = OpenOptions::new(SheetMode::Online)
            .with_credentials(Credentials::AccessToken("t".to_string()));
        let err = open_sheet(&options, &SheetConfig::default()).unwrap_err();
        assert!(err.is_invalid_parameter());
    }

    #[test]
    fn test_online_requires_credentials() {
        let options = OpenOptions::new(SheetMode::Online).with_spreadsheet_id("doc-1");
        let err = open_sheet(&options, &SheetConfig::default()).unwrap_err();
        assert!(err.is_invalid_parameter());
    }

    #[test]
    fn test_online_missing_credentials_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = SheetConfig {
            spreadsheet_id: Some("doc-1".to_string()),
            credentials_path: Some(PathBuf::from("missing.json")),
            ..Default::default()
        };
        let options = OpenOptions::new(SheetMode::Online).with_base_dir(dir.path());

        let err = open_sheet(&options, &config).unwrap_err();
        assert!(err.is_invalid_parameter());
    }

    #[test]
    fn test_online_unreadable_credentials_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("key.json"), [0xff, 0xfe]).unwrap();
        let config = SheetConfig {
            spreadsheet_id: Some("doc-1".to_string()),
            credentials_path: Some(PathBuf::from("key.json")),
            ..Default::default()
        };
        let options = OpenOptions::new(SheetMode::Online).with_base_dir(dir.path());

        let err = open_sheet(&options, &config).unwrap_err();
        assert!(err.is_invalid_parameter());
    }
}

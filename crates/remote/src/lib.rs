//! # simplesheet-remote
//!
//! Google Sheets backend for simplesheet.
//!
//! Provides a blocking client for the Sheets v4 `values` endpoints, OAuth2
//! service-account authentication, and [`GoogleSheetStore`], a
//! [`simplesheet_sheet::SheetStore`] that mirrors every mutation to a worksheet.
//!
//! ```no_run
//! use simplesheet_remote::{open_google_sheet, ClientOptions, Credentials};
//!
//! let credentials = Credentials::File("service_account.json".into());
//! let mut sheet =
//!     open_google_sheet("spreadsheet-id", "Sheet1", credentials, &ClientOptions::default())
//!         .unwrap();
//! sheet.set_cell(1, 1, "12月").unwrap();
//! ```

mod client;
mod credentials;
mod error;
mod store;
mod token;

pub use client::{
    build_http_client, cell_range, quote_sheet_name, sheet_range, ClientOptions, SheetsClient,
    ValueRange, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS,
};
pub use credentials::{Credentials, ServiceAccountKey};
pub use error::{RemoteError, RemoteResult};
pub use store::{open_google_sheet, GoogleSheetStore};
pub use token::{
    token_source_for, ServiceAccountTokenSource, StaticToken, TokenSource, SPREADSHEETS_SCOPE,
};

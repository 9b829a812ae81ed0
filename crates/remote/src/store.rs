use crate::client::{build_http_client, cell_range, sheet_range, ClientOptions, SheetsClient};
use crate::credentials::Credentials;
use crate::token::{token_source_for, TokenSource};
use simplesheet_sheet::{Grid, Result, Sheet, SheetStore};
use tracing::{debug, info};

/// Store that mirrors each mutation to one worksheet of a Google spreadsheet.
///
/// `set_cell` pushes only the changed cell, `append_row` only the new row, and
/// `clear` clears the whole worksheet. A failed push leaves the local grid
/// ahead of the remote one.
pub struct GoogleSheetStore {
    client: SheetsClient,
    spreadsheet_id: String,
    worksheet: String,
}

impl GoogleSheetStore {
    /// Create a store from a ready client
    pub fn new(
        client: SheetsClient,
        spreadsheet_id: impl Into<String>,
        worksheet: impl Into<String>,
    ) -> Self {
        GoogleSheetStore {
            client,
            spreadsheet_id: spreadsheet_id.into(),
            worksheet: worksheet.into(),
        }
    }

    /// Resolve credentials into a token source and build the client.
    ///
    /// Credential problems are reported here, before any request is sent.
    pub fn connect(
        spreadsheet_id: impl Into<String>,
        worksheet: impl Into<String>,
        credentials: Credentials,
        options: &ClientOptions,
    ) -> Result<Self> {
        let http = build_http_client(options.timeout_secs)?;
        let tokens: Box<dyn TokenSource> = token_source_for(credentials, &http)?;
        let client = SheetsClient::new(http, tokens, &options.base_url)?;
        Ok(Self::new(client, spreadsheet_id, worksheet))
    }
}

impl SheetStore for GoogleSheetStore {
    fn describe(&self) -> String {
        format!("google-sheets:{}/{}", self.spreadsheet_id, self.worksheet)
    }

    fn load(&mut self) -> Result<Grid> {
        let values = self
            .client
            .get_values(&self.spreadsheet_id, &sheet_range(&self.worksheet))?;
        let grid = Grid::from_records(values);
        info!(
            spreadsheet_id = %self.spreadsheet_id,
            worksheet = %self.worksheet,
            rows = grid.max_row(),
            "loaded remote worksheet"
        );
        Ok(grid)
    }

    fn on_set_cell(&mut self, _grid: &Grid, row: usize, col: usize, value: &str) -> Result<()> {
        let range = cell_range(&self.worksheet, row, col);
        self.client
            .update_cell(&self.spreadsheet_id, &range, value)?;
        Ok(())
    }

    fn on_append_row(&mut self, _grid: &Grid, row: usize, values: &[String]) -> Result<()> {
        debug!(row, "mirroring appended row");
        self.client
            .append_row(&self.spreadsheet_id, &sheet_range(&self.worksheet), values)?;
        Ok(())
    }

    fn on_clear(&mut self, _grid: &Grid) -> Result<()> {
        self.client
            .clear(&self.spreadsheet_id, &sheet_range(&self.worksheet))?;
        Ok(())
    }
}

/// Open a worksheet as a [`Sheet`], loading its current values.
pub fn open_google_sheet(
    spreadsheet_id: &str,
    worksheet: &str,
    credentials: Credentials,
    options: &ClientOptions,
) -> Result<Sheet> {
    let store = GoogleSheetStore::connect(spreadsheet_id, worksheet, credentials, options)?;
    Sheet::with_store(store)
}

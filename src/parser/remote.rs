//! Remote dataset loader
//!
//! The remote source is a `;`-delimited text file using `,` as its decimal
//! separator. Lines whose width does not match the header are skipped.

use std::time::Duration;

use reqwest::blocking::Client;
use tracing::{debug, info};

use crate::error::{CleanError, Result};
use crate::model::Table;

use super::{parse_delimited, DelimitedOptions};

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Blocking HTTP loader for remote datasets
pub struct RemoteLoader {
    client: Client,
}

impl RemoteLoader {
    /// Build a loader with the default timeout
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(|e| CleanError::RemoteFetch {
                url: String::new(),
                message: e.to_string(),
            })?;
        Ok(Self { client })
    }

    /// Fetch `url` and parse its body
    pub fn fetch(&self, url: &str) -> Result<Table> {
        let fetch_error = |message: String| CleanError::RemoteFetch {
            url: url.to_string(),
            message,
        };

        debug!(url, "fetching remote dataset");
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| fetch_error(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(fetch_error(format!("HTTP status {}", status)));
        }

        let body = response.bytes().map_err(|e| fetch_error(e.to_string()))?;
        let text = String::from_utf8(body.to_vec())
            .map_err(|e| fetch_error(format!("response is not valid UTF-8: {}", e)))?;

        let table = parse_remote_text(&text)?;
        info!(url, rows = table.row_count(), "loaded remote dataset");
        Ok(table)
    }
}

/// Parse the text of a remote dataset
pub fn parse_remote_text(text: &str) -> Result<Table> {
    parse_delimited(
        text.as_bytes(),
        &DelimitedOptions {
            delimiter: b';',
            decimal_comma: true,
            skip_malformed: true,
        },
    )
}

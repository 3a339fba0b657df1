use crate::model::ChartEntry;
use scraper::{Html, Selector};
use thiserror::Error;

const DEFAULT_BASE_URL: &str = "https://musicchartsarchive.com";
const ROW_SELECTOR: &str = "table.chart-table tr";
const CELL_SELECTOR: &str = "td";

// Chart rows carry [rank, title, artist, ...]; anything shorter (header and
// spacer rows) cannot yield a complete entry and is skipped.
const MIN_ROW_CELL_COUNT: usize = 3;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("chart page request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("chart page returned status {0}")]
    Status(u16),
}

/// Scrapes the singles chart for a given date and extracts the ranked
/// (title, artist) pairs from the chart table.
pub struct Extractor {
    http_client: reqwest::Client,
    base_url: String,
    user_agent: String,
}

impl Extractor {
    pub fn new(http_client: reqwest::Client, user_agent: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url: DEFAULT_BASE_URL.to_owned(),
            user_agent: user_agent.into(),
        }
    }

    #[cfg(test)]
    fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Fetches the chart page for `date` (URL date segment, e.g.
    /// "1978-02-04") and returns its entries in chart rank order. One GET,
    /// no retries; a malformed date surfaces as whatever status the origin
    /// returns.
    pub async fn fetch(&self, date: &str) -> Result<Vec<ChartEntry>, FetchError> {
        let url = format!("{}/singles-chart/{}", self.base_url, date);
        tracing::debug!(url = %url, "fetching chart page");

        let response = self
            .http_client
            .get(&url)
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let entries = parse_chart(&body);
        tracing::info!(date = %date, count = entries.len(), "extracted chart entries");

        Ok(entries)
    }
}

/// Extracts (title, artist) pairs from the chart table markup. Rows with
/// fewer than [`MIN_ROW_CELL_COUNT`] cells are skipped.
fn parse_chart(html: &str) -> Vec<ChartEntry> {
    let document = Html::parse_document(html);
    let row_selector = Selector::parse(ROW_SELECTOR).unwrap();
    let cell_selector = Selector::parse(CELL_SELECTOR).unwrap();

    let mut entries = Vec::new();
    for row in document.select(&row_selector) {
        let cells = row.select(&cell_selector).collect::<Vec<_>>();
        if cells.len() < MIN_ROW_CELL_COUNT {
            continue;
        }

        entries.push(ChartEntry::new(cell_text(&cells[1]), cell_text(&cells[2])));
    }

    entries
}

fn cell_text(cell: &scraper::ElementRef) -> String {
    cell.text().collect::<String>().trim().to_owned()
}

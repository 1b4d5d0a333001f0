//! HTML extraction for upstream results pages.
//!
//! The upstream renders results as a `.tmptabela` table of four-cell rows
//! and reports the total match count as loose text inside the
//! `.ctrlcontent` container. Malformed rows are dropped silently; a missing
//! summary count is a structural failure and fails the whole page.

use crate::error::CepError;
use crate::types::{AddressRecord, PageResult};
use scraper::{ElementRef, Html, Selector};

/// Parse one results page into a [`PageResult`].
///
/// Extracted as a separate function for testability with mock HTML.
///
/// # Errors
///
/// Returns [`CepError::Parse`] if the summary count cannot be extracted.
/// Individual malformed table rows are dropped, never fatal.
pub(crate) fn parse_page(html: &str, offset: u64) -> Result<PageResult, CepError> {
    let document = Html::parse_document(html);

    let records = parse_records(&document)?;
    let total_count = parse_total_count(&document)?;

    tracing::debug!(
        offset,
        total_count,
        count = records.len(),
        "results page parsed"
    );

    Ok(PageResult {
        offset,
        total_count,
        records,
    })
}

/// Extract address records from the results table.
///
/// Rows containing a `th` cell are column headers and are skipped. A data
/// row must have four cells with a `city/state` third cell; rows failing
/// that shape are dropped.
fn parse_records(document: &Html) -> Result<Vec<AddressRecord>, CepError> {
    let row_sel = Selector::parse(".tmptabela tr")
        .map_err(|e| CepError::Parse(format!("invalid row selector: {e:?}")))?;
    let header_sel = Selector::parse("th")
        .map_err(|e| CepError::Parse(format!("invalid header selector: {e:?}")))?;
    let cell_sel = Selector::parse("td")
        .map_err(|e| CepError::Parse(format!("invalid cell selector: {e:?}")))?;

    let mut records = Vec::new();

    for row in document.select(&row_sel) {
        if row.select(&header_sel).next().is_some() {
            continue;
        }

        let cells: Vec<String> = row.select(&cell_sel).map(cell_text).collect();
        if cells.len() < 4 {
            continue;
        }

        // Third cell carries "city/state"; rows without the separator are
        // malformed and dropped like any other shape failure.
        let Some((city, state)) = cells[2].split_once('/') else {
            continue;
        };

        records.push(AddressRecord {
            place: cells[0].clone(),
            neighborhood: cells[1].clone(),
            city: city.trim().to_string(),
            state: state.trim().to_string(),
            number: cells[3].chars().filter(char::is_ascii_digit).collect(),
        });
    }

    Ok(records)
}

/// Collect a cell's text with non-breaking spaces stripped and trimmed.
fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text()
        .collect::<String>()
        .replace('\u{a0}', "")
        .trim()
        .to_string()
}

/// Extract the reported total match count from the summary container.
///
/// Concatenates the `.ctrlcontent` element's direct text-node children
/// (child elements like the page title do not count), then takes the last
/// whitespace-separated token that is a non-negative integer. The count is
/// not always the final token — `"Foram encontrados 237 CEP(s)."` reports
/// 237.
fn parse_total_count(document: &Html) -> Result<u64, CepError> {
    let summary_sel = Selector::parse(".ctrlcontent")
        .map_err(|e| CepError::Parse(format!("invalid summary selector: {e:?}")))?;

    let summary = document
        .select(&summary_sel)
        .next()
        .ok_or_else(|| CepError::Parse("summary element .ctrlcontent not found".into()))?;

    let text: String = summary
        .children()
        .filter_map(|child| child.value().as_text().map(|t| &**t))
        .collect();
    let text = text.trim();

    text.split_whitespace()
        .rev()
        .find_map(|token| token.parse::<u64>().ok())
        .ok_or_else(|| {
            CepError::Parse(format!("no result count in summary text {text:?}"))
        })
}

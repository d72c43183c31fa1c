use super::ui;
use crate::core::format::{format_rate, format_timestamp};
use crate::core::{Asset, RateError, RatePair, RateResolver};
use anyhow::Result;
use comfy_table::Cell;

const CROSS_PAIRS: [(Asset, Asset); 2] = [(Asset::Btc, Asset::Rub), (Asset::Eth, Asset::Rub)];

/// One line of the rates overview.
#[derive(Debug)]
pub struct RateRow {
    pub label: String,
    pub rate: Result<String, RateError>,
    pub source: String,
    pub fetched_at: Option<String>,
}

/// Resolves every direct pair, then the cross pairs composed from them.
pub async fn collect_rows(resolver: &RateResolver) -> Vec<RateRow> {
    let mut rows = Vec::new();

    for pair in RatePair::ALL {
        let row = match resolver.quote(pair).await {
            Ok(quote) => RateRow {
                label: pair.to_string(),
                rate: Ok(format_rate(pair, quote.rate)),
                source: quote.source.to_string(),
                fetched_at: Some(format_timestamp(quote.fetched_at)),
            },
            Err(e) => RateRow {
                label: pair.to_string(),
                rate: Err(e),
                source: String::new(),
                fetched_at: None,
            },
        };
        rows.push(row);
    }

    for (base, quote) in CROSS_PAIRS {
        rows.push(RateRow {
            label: format!("{base}→{quote}"),
            rate: resolver
                .rate_value(base, quote)
                .await
                .map(|rate| format!("{rate:.4}")),
            source: "derived".to_string(),
            fetched_at: None,
        });
    }

    rows
}

pub fn render(rows: &[RateRow]) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Pair"),
        ui::header_cell("Rate"),
        ui::header_cell("Source"),
        ui::header_cell("Fetched (UTC)"),
    ]);

    for row in rows {
        let rate = match &row.rate {
            Ok(rate) => ui::value_cell(rate.clone()),
            Err(e) => ui::error_cell(&e.to_string()),
        };
        table.add_row(vec![
            Cell::new(&row.label),
            rate,
            Cell::new(&row.source),
            Cell::new(row.fetched_at.as_deref().unwrap_or("-")),
        ]);
    }

    format!(
        "{}\n\n{}",
        ui::style_text("Exchange rates", ui::StyleType::Title),
        table
    )
}

pub async fn run(resolver: &RateResolver) -> Result<()> {
    let rows = collect_rows(resolver).await;
    println!("{}", render(&rows));
    Ok(())
}

//! Fixed-width sales table.

use wbscope::EnrichedRecord;

use super::{group_money, group_thousands};

const RULE_WIDTH: usize = 80;

/// Render records as a ranked table, optionally showing only the first `limit`.
pub fn sales_table(records: &[EnrichedRecord], limit: Option<usize>) -> String {
    if records.is_empty() {
        return "No product data\n".to_string();
    }

    let shown = limit.unwrap_or(records.len()).min(records.len());
    let heavy = "=".repeat(RULE_WIDTH);
    let light = "-".repeat(RULE_WIDTH);

    let mut lines = vec![
        "PRODUCTS BY SALES".to_string(),
        heavy.clone(),
        format!(
            "{:>3} | {:>10} | {:>8} | {:>14} | {:>10} | {:>6}",
            "#", "Product ID", "Sales", "Revenue", "Avg price", "Photos"
        ),
        light.clone(),
    ];

    for (i, r) in records[..shown].iter().enumerate() {
        lines.push(format!(
            "{:>3} | {:>10} | {:>8} | {:>14} | {:>10} | {:>6}",
            i + 1,
            r.id,
            group_thousands(r.sales),
            group_money(r.revenue),
            group_money(r.avg_price),
            r.image_count
        ));
    }

    if shown < records.len() {
        lines.push(light);
        lines.push(format!("... and {} more", records.len() - shown));
    }

    lines.push(heavy);
    lines.push(format!("Total products: {}", records.len()));

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

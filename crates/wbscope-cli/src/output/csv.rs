//! CSV exports.
//!
//! The sales export mirrors the spreadsheet layout: product link, name,
//! sales, then one column per image up to the largest image count.

use wbscope::EnrichmentReport;

use super::IdListing;

/// Quote a field when it contains a delimiter, quote, or line break.
pub fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn push_row<I, S>(out: &mut String, fields: I)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let row: Vec<String> = fields
        .into_iter()
        .map(|f| escape_field(f.as_ref()))
        .collect();
    out.push_str(&row.join(","));
    out.push('\n');
}

/// `url,name,sales,image_1..image_N`, short rows padded with empty cells.
pub fn sales_csv(report: &EnrichmentReport) -> String {
    let max_images = report.max_image_count();

    let mut out = String::new();
    let header = ["url", "name", "sales"]
        .into_iter()
        .map(str::to_string)
        .chain((1..=max_images).map(|i| format!("image_{i}")));
    push_row(&mut out, header);

    for r in &report.records {
        let images = r
            .image_urls
            .iter()
            .cloned()
            .chain(std::iter::repeat(String::new()))
            .take(max_images);
        let row = [r.product_url(), r.name.clone(), r.sales.to_string()]
            .into_iter()
            .chain(images);
        push_row(&mut out, row);
    }
    out
}

/// `query,product_id` rows.
pub fn id_csv(listing: &IdListing) -> String {
    let mut out = String::from("query,product_id\n");
    for id in &listing.product_ids {
        push_row(&mut out, [listing.query.clone(), id.to_string()]);
    }
    out
}

//! Plain-text listings.

use wbscope::EnrichedRecord;

use super::{group_thousands, IdListing};

/// `id | sales | photos` lines in report order.
pub fn sales_list(records: &[EnrichedRecord]) -> String {
    let mut out = String::from("Product ID | Sales | Photos\n");
    out.push_str(&"-".repeat(30));
    out.push('\n');
    for r in records {
        out.push_str(&format!(
            "{} | {} | {}\n",
            r.id,
            group_thousands(r.sales),
            r.image_count
        ));
    }
    out
}

/// Per-product numbered image URL blocks. Products without images are skipped.
pub fn image_blocks(records: &[EnrichedRecord]) -> String {
    let mut out = String::new();
    for r in records.iter().filter(|r| !r.image_urls.is_empty()) {
        out.push_str(&format!(
            "\nProduct {} ({} images):\n",
            r.id,
            r.image_urls.len()
        ));
        for (i, url) in r.image_urls.iter().enumerate() {
            out.push_str(&format!("  {}. {url}\n", i + 1));
        }
    }
    out
}

/// Every image URL, one per line.
pub fn image_urls_only(records: &[EnrichedRecord]) -> String {
    records
        .iter()
        .flat_map(|r| r.image_urls.iter())
        .map(|url| format!("{url}\n"))
        .collect()
}

/// Numbered identifier list with a short header.
pub fn id_list(listing: &IdListing) -> String {
    let mut out = format!(
        "Query: {}\nFound: {} products\nProduct IDs:\n",
        listing.query, listing.count
    );
    for (i, id) in listing.product_ids.iter().enumerate() {
        out.push_str(&format!("{:3}. {id}\n", i + 1));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u64, urls: &[&str]) -> EnrichedRecord {
        EnrichedRecord {
            id,
            name: String::new(),
            sales: 12450,
            revenue: 0.0,
            lost_revenue: 0.0,
            avg_price: 0.0,
            image_count: urls.len() as u32,
            image_urls: urls.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_sales_list() {
        let out = sales_list(&[record(7, &["a", "b"])]);
        assert!(out.ends_with("7 | 12,450 | 2\n"));
    }

    #[test]
    fn test_image_blocks_skip_empty() {
        let out = image_blocks(&[record(1, &[]), record(2, &["u1", "u2"])]);
        assert!(!out.contains("Product 1"));
        assert!(out.contains("Product 2 (2 images):\n  1. u1\n  2. u2\n"));
    }

    #[test]
    fn test_image_urls_only() {
        let out = image_urls_only(&[record(1, &["a"]), record(2, &["b", "c"])]);
        assert_eq!(out, "a\nb\nc\n");
    }

    #[test]
    fn test_id_list() {
        let listing = IdListing::new("iphone", Some(1), None, vec![11, 22]);
        let out = id_list(&listing);
        assert!(out.starts_with("Query: iphone\nFound: 2 products\n"));
        assert!(out.contains("  1. 11\n  2. 22\n"));
    }
}

//! `wbscope search -q <query>`: list catalog product ids.

use anyhow::{bail, Result};
use clap::Args;

use wbscope::SearchClient;

use super::{emit, OutputArgs, RunContext};
use crate::output::{self, csv, list, Format, IdListing};

#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    /// Search query.
    #[arg(short, long)]
    pub query: String,

    /// Page number.
    #[arg(short, long, default_value_t = 1, conflicts_with = "pages")]
    pub page: u32,

    /// Load pages 1..=N, stopping at the first empty page.
    #[arg(long)]
    pub pages: Option<u32>,

    /// Also print the total number of matches.
    #[arg(long)]
    pub total: bool,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Run the search command.
pub async fn run(ctx: &RunContext, args: &SearchArgs, out: &mut dyn std::io::Write) -> Result<()> {
    let client = SearchClient::new(ctx.config.clone());
    ctx.status(format!("Searching for '{}'", args.query));

    if args.total {
        let total = client.get_total_count(&args.query).await;
        ctx.status(format!("Total matches: {total}"));
    }

    let listing = match args.pages {
        Some(pages) => {
            let ids = client.search_pages(&args.query, pages).await;
            IdListing::new(&args.query, None, Some(pages), ids)
        }
        None => {
            let ids = client.search_products(&args.query, args.page).await;
            IdListing::new(&args.query, Some(args.page), None, ids)
        }
    };

    if listing.product_ids.is_empty() {
        bail!("no products found for '{}'", args.query);
    }
    ctx.status(format!("Found {} product ids", listing.count));

    let content = match args.output.format {
        Format::Json => output::to_json(&listing)?,
        Format::Csv => csv::id_csv(&listing),
        Format::List | Format::Table => list::id_list(&listing),
    };

    emit(ctx, &args.output, Some(&args.query), &content, out)
}

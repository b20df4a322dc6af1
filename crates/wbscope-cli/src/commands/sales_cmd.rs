//! `wbscope sales -q <query>`: catalog page enriched with sales figures.

use anyhow::{bail, Context, Result};
use clap::Args;

use wbscope::{Aggregator, EnrichmentReport, SessionCookies};

use super::{emit, CookieArgs, OutputArgs, RunContext};
use crate::output::{self, csv, list, table, Format};

#[derive(Args, Debug, Clone)]
pub struct SalesArgs {
    /// Search query.
    #[arg(short, long)]
    pub query: String,

    /// Catalog page to enrich.
    #[arg(short, long, default_value_t = 1)]
    pub page: u32,

    /// Keep only the first N catalog products before fetching sales (0 = all).
    #[arg(long, default_value_t = 20)]
    pub max_products: usize,

    #[command(flatten)]
    pub images: ImageArgs,

    #[command(flatten)]
    pub cookies: CookieArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

impl SalesArgs {
    /// Truncation limit for the catalog page; `None` keeps every product.
    pub fn product_limit(&self) -> Option<usize> {
        (self.max_products > 0).then_some(self.max_products)
    }
}

/// Image URL display flags.
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct ImageArgs {
    /// Append image URLs after the table or list.
    #[arg(long)]
    pub show_images: bool,

    /// Print only image URLs, one per line.
    #[arg(long, conflicts_with = "show_images")]
    pub images_only: bool,
}

/// Render a report in the requested format.
pub fn render_report(
    report: &EnrichmentReport,
    format: Format,
    images: ImageArgs,
) -> Result<String> {
    if images.images_only {
        return Ok(list::image_urls_only(&report.records));
    }

    let mut content = match format {
        Format::Json => return output::to_json(report),
        Format::Csv => return Ok(csv::sales_csv(report)),
        Format::Table => table::sales_table(&report.records, None),
        Format::List => list::sales_list(&report.records),
    };

    if images.show_images {
        content.push_str(&list::image_blocks(&report.records));
    }
    Ok(content)
}

/// Status lines shared by the sales and ids commands.
pub fn report_status(ctx: &RunContext, report: &EnrichmentReport) {
    if let Some(total) = report.total {
        ctx.status(format!("Catalog total: {total}"));
    }
    ctx.status(format!(
        "Found {} products, {} with sales data",
        report.found_count, report.detailed_count
    ));
    if !report.analytics_complete {
        ctx.status(format!(
            "Warning: {} analytics request(s) failed, results are partial",
            report.failed_chunks
        ));
    }
}

/// Run the sales command with already-resolved cookies.
pub async fn run_with_cookies(
    ctx: &RunContext,
    args: &SalesArgs,
    cookies: Option<SessionCookies>,
    out: &mut dyn std::io::Write,
) -> Result<()> {
    let aggregator = Aggregator::from_config(ctx.config.clone(), cookies);
    ctx.status(format!("Enriching '{}' (page {})", args.query, args.page));

    let report = aggregator
        .enrich(&args.query, args.page, args.product_limit())
        .await
        .context("pass --cookies or --cookies-file, or create cookies.txt")?;

    report_status(ctx, &report);
    if report.records.is_empty() {
        if !report.catalog_available {
            bail!("catalog search failed for '{}'", args.query);
        }
        bail!("no sales data received for '{}'", args.query);
    }

    let content = render_report(&report, args.output.format, args.images)?;
    emit(ctx, &args.output, Some(&args.query), &content, out)
}

/// Run the sales command.
pub async fn run(ctx: &RunContext, args: &SalesArgs, out: &mut dyn std::io::Write) -> Result<()> {
    let cookies = args.cookies.load()?;
    run_with_cookies(ctx, args, cookies, out).await
}

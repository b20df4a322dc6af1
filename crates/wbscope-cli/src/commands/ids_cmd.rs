//! `wbscope ids --ids 1,2,3`: sales figures for explicit product ids.

use anyhow::{bail, Context, Result};
use clap::Args;

use wbscope::{Aggregator, SessionCookies};

use super::sales_cmd::{render_report, report_status, ImageArgs};
use super::{emit, CookieArgs, OutputArgs, RunContext};

#[derive(Args, Debug, Clone)]
pub struct IdsArgs {
    /// Comma-separated product ids.
    #[arg(long, value_delimiter = ',', required = true)]
    pub ids: Vec<u64>,

    #[command(flatten)]
    pub cookies: CookieArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Run the ids command with already-resolved cookies.
pub async fn run_with_cookies(
    ctx: &RunContext,
    args: &IdsArgs,
    cookies: Option<SessionCookies>,
    out: &mut dyn std::io::Write,
) -> Result<()> {
    let aggregator = Aggregator::from_config(ctx.config.clone(), cookies);
    ctx.status(format!("Fetching sales for {} products", args.ids.len()));

    let report = aggregator
        .enrich_ids(&args.ids)
        .await
        .context("pass --cookies or --cookies-file, or create cookies.txt")?;

    report_status(ctx, &report);
    if report.records.is_empty() {
        bail!("no sales data received for the given ids");
    }

    let content = render_report(&report, args.output.format, ImageArgs::default())?;
    emit(ctx, &args.output, None, &content, out)
}

/// Run the ids command.
pub async fn run(ctx: &RunContext, args: &IdsArgs, out: &mut dyn std::io::Write) -> Result<()> {
    let cookies = args.cookies.load()?;
    run_with_cookies(ctx, args, cookies, out).await
}

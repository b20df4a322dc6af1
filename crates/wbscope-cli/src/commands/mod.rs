//! Subcommand implementations.
//!
//! Commands write their primary output to the supplied writer and status
//! lines to stderr, so results can be piped while progress stays visible.

pub mod ids_cmd;
pub mod sales_cmd;
pub mod search_cmd;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use wbscope::{ScoutConfig, SessionCookies};

use crate::config::{CookieLookup, CookieOrigin};
use crate::output::Format;

/// Settings shared by every command.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub config: ScoutConfig,
    pub quiet: bool,
}

impl RunContext {
    /// Print a status line to stderr unless `--quiet`.
    pub fn status(&self, msg: impl AsRef<str>) {
        if !self.quiet {
            eprintln!("{}", msg.as_ref());
        }
    }
}

/// Cookie flags for commands that talk to the analytics API.
#[derive(Args, Debug, Clone, Default)]
pub struct CookieArgs {
    /// Analytics session cookies as "name=value; name2=value2".
    #[arg(long, conflicts_with = "cookies_file")]
    pub cookies: Option<String>,

    /// File holding the analytics session cookies.
    #[arg(long)]
    pub cookies_file: Option<PathBuf>,
}

impl CookieArgs {
    /// Resolve cookies from flags, environment, and default files.
    pub fn load(&self) -> Result<Option<SessionCookies>> {
        let lookup = CookieLookup::from_env(self.cookies.as_deref(), self.cookies_file.as_deref());
        let resolved = lookup.resolve().context("failed to load analytics cookies")?;
        Ok(resolved.map(|(cookies, origin)| {
            match origin {
                CookieOrigin::File(path) => {
                    tracing::info!(path = %path.display(), "loaded cookies from file")
                }
                CookieOrigin::Inline => tracing::debug!("using cookies from --cookies"),
                CookieOrigin::Env => tracing::debug!("using cookies from WBSCOPE_COOKIES"),
            }
            cookies
        }))
    }
}

/// Output flags shared by every command.
#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// Output format.
    #[arg(long, value_enum, default_value = "list")]
    pub format: Format,

    /// Save output to a file. Without a value the name is derived from the query.
    #[arg(short, long, num_args = 0..=1, default_missing_value = "auto")]
    pub save: Option<String>,
}

/// Write `content` to `out`, and to the `--save` target when given.
pub fn emit(
    ctx: &RunContext,
    output: &OutputArgs,
    query: Option<&str>,
    content: &str,
    out: &mut dyn std::io::Write,
) -> Result<()> {
    out.write_all(content.as_bytes())
        .context("failed to write output")?;

    if let Some(arg) = &output.save {
        let path = crate::output::save_path(arg, query, output.format);
        crate::output::save_to(&path, content)?;
        ctx.status(format!("Saved results to {}", path.display()));
    }
    Ok(())
}

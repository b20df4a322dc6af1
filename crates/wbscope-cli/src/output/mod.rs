//! Rendering of reports and id listings, and saving them to disk.

pub mod csv;
pub mod list;
pub mod table;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

/// Output format selected with `--format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    Table,
    List,
    Json,
    Csv,
}

impl Format {
    /// File extension used for auto-named saves.
    pub fn extension(self) -> &'static str {
        match self {
            Format::Table | Format::List => "txt",
            Format::Json => "json",
            Format::Csv => "csv",
        }
    }
}

/// Identifiers found by a plain catalog search.
#[derive(Debug, Clone, Serialize)]
pub struct IdListing {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pages: Option<u32>,
    pub count: usize,
    pub product_ids: Vec<u64>,
}

impl IdListing {
    pub fn new(query: &str, page: Option<u32>, pages: Option<u32>, ids: Vec<u64>) -> Self {
        Self {
            query: query.to_string(),
            page,
            pages,
            count: ids.len(),
            product_ids: ids,
        }
    }
}

/// Pretty JSON with a trailing newline.
pub fn to_json<T: Serialize>(value: &T) -> Result<String> {
    let mut s = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    s.push('\n');
    Ok(s)
}

/// Make a query safe to embed in a file name.
pub fn safe_file_stem(query: &str) -> String {
    query
        .trim()
        .chars()
        .map(|c| match c {
            ' ' | '/' | '\\' => '_',
            c => c,
        })
        .collect()
}

/// Default save path: `wb_{query}.{ext}`, or a timestamped name without a query.
pub fn auto_filename(query: Option<&str>, format: Format) -> PathBuf {
    let stem = match query.map(safe_file_stem).filter(|s| !s.is_empty()) {
        Some(q) => format!("wb_{q}"),
        None => format!("wb_ids_{}", chrono::Local::now().format("%Y%m%d_%H%M%S")),
    };
    PathBuf::from(format!("{stem}.{}", format.extension()))
}

/// Resolve the `-s/--save` argument. `"auto"` asks for an auto-generated name.
pub fn save_path(arg: &str, query: Option<&str>, format: Format) -> PathBuf {
    if arg == "auto" {
        auto_filename(query, format)
    } else {
        PathBuf::from(arg)
    }
}

/// Write rendered output to a file, creating parent directories.
pub fn save_to(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
}

/// `1234567` → `"1,234,567"`.
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Money rounded to whole units with thousands separators.
pub fn group_money(value: f64) -> String {
    if value.is_finite() && value > 0.0 {
        group_thousands(value.round() as u64)
    } else {
        "0".to_string()
    }
}

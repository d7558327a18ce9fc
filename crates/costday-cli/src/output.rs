//! Terminal rendering of assets and totals
//!
//! Every command prints through [`Output`], which picks between a table for
//! people, JSON with `--json`, and bare IDs or numbers with `--quiet`.

use serde::Serialize;

use costday_core::{AssetRow, Totals};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
    /// Symbol printed before amounts
    currency: String,
}

impl Output {
    pub fn new(format: OutputFormat, currency: impl Into<String>) -> Self {
        Self {
            format,
            currency: currency.into(),
        }
    }

    /// Check if output is in quiet mode
    pub fn is_quiet(&self) -> bool {
        matches!(self.format, OutputFormat::Quiet)
    }

    /// Check if we should prompt for confirmation
    pub fn should_prompt(&self) -> bool {
        self.format == OutputFormat::Human
    }

    /// Format an amount with the configured currency symbol
    pub fn money(&self, amount: f64) -> String {
        format!("{}{:.2}", self.currency, amount)
    }

    /// Print a single asset with its derived values
    pub fn print_asset(&self, row: &AssetRow) {
        match self.format {
            OutputFormat::Human => {
                let asset = &row.asset;
                println!("ID:            {}", asset.id);
                println!("Name:          {}", asset.name);
                println!("Purchased:     {}", asset.purchase_date.format("%Y-%m-%d"));
                println!("Price:         {}", self.money(asset.purchase_price));
                println!("Days owned:    {}", row.days_since_purchase);
                println!("Cost per day:  {}/day", self.money(row.average_daily_price));
            }
            OutputFormat::Json => print_json(row),
            OutputFormat::Quiet => println!("{}", row.asset.id),
        }
    }

    /// Print a list of assets followed by the totals over that list
    pub fn print_assets(&self, rows: &[AssetRow], totals: &Totals) {
        match self.format {
            OutputFormat::Human => {
                if rows.is_empty() {
                    println!("No assets found.");
                    return;
                }
                for row in rows {
                    println!(
                        "{} | {:<30} | {} | {:>5} days | {:>12} | {:>12}/day",
                        &row.asset.id.to_string()[..8],
                        truncate(&row.asset.name, 30),
                        row.asset.purchase_date.format("%Y-%m-%d"),
                        row.days_since_purchase,
                        self.money(row.asset.purchase_price),
                        self.money(row.average_daily_price),
                    );
                }
                println!();
                self.print_totals_human(totals);
                println!("\n{} asset(s)", rows.len());
            }
            OutputFormat::Json => {
                print_json(&serde_json::json!({ "assets": rows, "totals": totals }));
            }
            OutputFormat::Quiet => {
                for row in rows {
                    println!("{}", row.asset.id);
                }
            }
        }
    }

    /// Print only the totals
    pub fn print_totals(&self, totals: &Totals, count: usize) {
        match self.format {
            OutputFormat::Human => {
                self.print_totals_human(totals);
                println!("\n{} asset(s)", count);
            }
            OutputFormat::Json => {
                print_json(&serde_json::json!({ "count": count, "totals": totals }));
            }
            OutputFormat::Quiet => {
                println!(
                    "{:.2} {:.2}",
                    totals.total_value, totals.total_average_daily_price
                );
            }
        }
    }

    fn print_totals_human(&self, totals: &Totals) {
        println!("Total Asset Value:         {}", self.money(totals.total_value));
        println!(
            "Total Average Daily Price: {}",
            self.money(totals.total_average_daily_price)
        );
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }
}

/// Pretty-print any serializable value as JSON
pub fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to render JSON: {}", e),
    }
}

/// Truncate a string to max characters, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

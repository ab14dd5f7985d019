use crate::runner::types::{RunResult, RunSummary};
use colored::Colorize;

/// Coloured terminal output for a run
pub struct RunReporter {
    verbose: bool,
}

impl RunReporter {
    /// With `verbose`, decoded bodies are printed under each result
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Print the run banner
    pub fn print_header(&self, collection_name: &str, total: usize) {
        println!(
            "\nRunning {} requests from {}...\n",
            total,
            collection_name.bold()
        );
    }

    /// Print one request line, then its warnings and error
    pub fn print_result(&self, result: &RunResult) {
        let symbol = if result.success { "✓".green() } else { "✗".red() };
        let status = match result.status {
            Some(status) if status.is_success() => status.code().to_string().green(),
            Some(status) => status.code().to_string().yellow(),
            None => "---".dimmed(),
        };

        println!(
            " {} [{}] {} - {} {} {} ({}ms)",
            symbol,
            result.request_number,
            result.name,
            result.method.cyan(),
            result.url,
            status,
            result.duration.as_millis()
        );

        for warning in &result.warnings {
            println!("   {}: {}", "Warning".yellow(), warning);
        }

        if let Some(error) = &result.error {
            println!("   {}: {}", "Error".red().bold(), error);
        }

        if self.verbose {
            if let Some(json) = &result.json {
                let pretty = serde_json::to_string_pretty(json).unwrap_or_else(|_| json.to_string());
                for line in pretty.lines() {
                    println!("   {}", line.dimmed());
                }
            }
        }
    }

    /// Print pass/fail counts and total time
    pub fn print_summary(&self, summary: &RunSummary) {
        println!("\n{}", "━".repeat(50));
        println!("{}", "Summary".bold());
        println!("{}", "━".repeat(50));

        if summary.failed == 0 {
            println!(
                "  {}: {} passed, {} total",
                "Requests".bold(),
                summary.passed.to_string().green(),
                summary.total
            );
        } else {
            println!(
                "  {}: {} passed, {} failed, {} total",
                "Requests".bold(),
                summary.passed.to_string().green(),
                summary.failed.to_string().red(),
                summary.total
            );
        }

        if summary.non_success_status > 0 {
            println!(
                "  {}: {} responses outside 2xx",
                "Status".bold(),
                summary.non_success_status.to_string().yellow()
            );
        }

        println!(
            "  {}: {:.3}s",
            "Duration".bold(),
            summary.total_duration.as_secs_f64()
        );
        println!();
    }
}

impl Default for RunReporter {
    fn default() -> Self {
        Self::new(false)
    }
}

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

/// Percentage of the range covered, `current / total * 100`.
pub fn progress_percent(current: u32, total: u32) -> f64 {
    if total == 0 {
        100.0
    } else {
        current as f64 / total as f64 * 100.0
    }
}

/// Format progress as `12.34% (7404/60000)`
pub fn format_progress(current: u32, total: u32) -> String {
    format!("{:.2}% ({}/{})", progress_percent(current, total), current, total)
}

/// Announcement for a freshly found valid document
pub fn format_valid_announcement(line: &str, progress: &str) -> String {
    format!("{} | Progress: {}", line.green(), progress)
}

pub fn format_error_announcement(message: &str) -> String {
    message.red().to_string()
}

/// Progress bar for a sweep of `total` identifiers, or a hidden one in quiet mode.
pub fn sweep_progress_bar(total: u32, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(total as u64);
    let style = ProgressStyle::with_template("{spinner:.cyan} [{elapsed_precise}] {bar:40.cyan/blue} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ");
    bar.set_style(style);
    bar
}

/// Print a formatted table border
pub fn print_table_border(width: usize) {
    println!("{}", "=".repeat(width));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_percent() {
        assert_eq!(progress_percent(0, 60_000), 0.0);
        assert_eq!(progress_percent(30_000, 60_000), 50.0);
        assert_eq!(progress_percent(250, 250), 100.0);
        assert_eq!(progress_percent(0, 0), 100.0);
    }

    #[test]
    fn test_format_progress() {
        assert_eq!(format_progress(100, 60_000), "0.17% (100/60000)");
        assert_eq!(format_progress(200, 250), "80.00% (200/250)");
    }
}

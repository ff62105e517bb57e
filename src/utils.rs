use std::time::Duration;

pub fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

/// Human-readable size, in MB with two decimals above 1 MB and in bytes below.
pub fn format_size(bytes: u64) -> String {
    const MB: u64 = 1_048_576;
    if bytes < MB {
        format!("{bytes} B")
    } else {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    }
}

/// Format a millisecond duration as `MM:SS`, or `HH:MM:SS` once it
/// crosses the hour mark.
pub fn format_duration(ms: u64) -> String {
    let hours = ms / (1000 * 60 * 60);
    let minutes = (ms % (1000 * 60 * 60)) / (1000 * 60);
    let seconds = (ms % (1000 * 60)) / 1000;

    if hours > 0 {
        format!("{hours:02}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes:02}:{seconds:02}")
    }
}

/// Live display form with centiseconds: `HH:MM:SS:CC`.
pub fn format_clock(ms: u64) -> String {
    let hours = ms / (1000 * 60 * 60);
    let minutes = (ms % (1000 * 60 * 60)) / (1000 * 60);
    let seconds = (ms % (1000 * 60)) / 1000;
    let centis = (ms % 1000) / 10;

    format!("{hours:02}:{minutes:02}:{seconds:02}:{centis:02}")
}

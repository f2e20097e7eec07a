//----------------------------------------------------------------------------------------- std lib
use std::io::Write;
use std::time::Instant;
//--------------------------------------------------------------------------------- other libraries
use env_logger::fmt::style::Style;
use log::info;
use once_cell::sync::Lazy;

use crate::format_duration;

// This will get initialized below.
/// Returns the init [`Instant`]
pub static INIT_INSTANT: Lazy<Instant> = Lazy::new(Instant::now);

/// The filter used when `RUST_LOG` isn't set:
/// everything is off except for mviz and its sub-crates.
#[must_use]
pub fn default_filter(filter: log::LevelFilter) -> String {
    format!("off,mviz={filter}")
}

/// One-letter tag for a log level.
#[must_use]
pub const fn level_tag(level: log::Level) -> &'static str {
    match level {
        log::Level::Error => "E",
        log::Level::Warn => "W",
        log::Level::Info => "I",
        log::Level::Debug => "D",
        log::Level::Trace => "T",
    }
}

//---------------------------------------------------------------------------------------------------- Logger init function
#[allow(clippy::module_name_repetitions)]
/// Initializes the logger.
///
/// This enables console logging on all the internals of `mviz`.
///
/// Functionality is provided by [`log`].
///
/// The levels are:
/// - ERROR
/// - WARN
/// - INFO
/// - DEBUG
/// - TRACE
///
/// If `RUST_LOG` is set it takes precedence over `filter`.
///
/// # Panics
/// This must only be called _once_.
#[cfg(not(tarpaulin_include))]
pub fn init_logger(filter: log::LevelFilter) {
    // Initialize timer.
    let now = Lazy::force(&INIT_INSTANT);

    let env = std::env::var("RUST_LOG").unwrap_or_default();

    let mut builder = env_logger::Builder::new();
    if env.is_empty() {
        builder.parse_filters(&default_filter(filter));
    } else {
        builder.parse_filters(&env);
    }

    builder
        .format(move |buf, record| {
            let level_style = buf.default_level_style(record.level()).bold();
            let dimmed = Style::new().dimmed();
            writeln!(
                buf,
                // Longest PATH in the repo: `analysis/src/visualization.rs` - `29` characters
                // Longest file in the repo: `analysis/src/bars.rs`          - `3` digits
                //
                //      Longest PATH ---|        |--- Longest file
                //                      |        |
                //                      v        v
                "| {level_style}{}{level_style:#} | {dimmed}{}{dimmed:#} | {dimmed}{: >29} @ {: <3}{dimmed:#} | {}",
                level_tag(record.level()),
                format_duration(&now.elapsed()),
                record.file_static().unwrap_or("???"),
                record.line().unwrap_or(0),
                record.args(),
            )
        })
        .write_style(env_logger::WriteStyle::Auto)
        .init();

    if env.is_empty() {
        info!("Log Level (Flag) ... {filter}");
    } else {
        info!("Log Level (RUST_LOG) ... {env}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_str_eq;
    use rstest::rstest;

    #[rstest]
    #[case(log::LevelFilter::Info, "off,mviz=INFO")]
    #[case(log::LevelFilter::Trace, "off,mviz=TRACE")]
    #[case(log::LevelFilter::Off, "off,mviz=OFF")]
    fn test_default_filter(#[case] filter: log::LevelFilter, #[case] expected: &str) {
        assert_str_eq!(default_filter(filter), expected);
    }

    #[test]
    fn test_level_tags_are_distinct() {
        let tags = [
            log::Level::Error,
            log::Level::Warn,
            log::Level::Info,
            log::Level::Debug,
            log::Level::Trace,
        ]
        .map(level_tag);
        for (i, tag) in tags.iter().enumerate() {
            assert_eq!(tag.len(), 1);
            assert!(!tags[i + 1..].contains(tag));
        }
    }
}

//! Logger setup.
//!
//! Logs go to stderr through `fern`. The level defaults to `info` and can be
//! changed with the `BP_LOG` environment variable.

use log::LevelFilter;

pub const LOG_ENV: &str = "BP_LOG";

/// Parses a level name such as `debug`. Unknown names yield `None`.
pub fn parse_level(value: &str) -> Option<LevelFilter> {
    value.trim().parse().ok()
}

pub fn init() -> Result<(), log::SetLoggerError> {
    let requested = std::env::var(LOG_ENV).ok();
    let level = requested
        .as_deref()
        .and_then(parse_level)
        .unwrap_or(LevelFilter::Info);

    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}][{}][{}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        .chain(std::io::stderr())
        .apply()?;

    if let Some(value) = requested
        && parse_level(&value).is_none()
    {
        log::warn!("Unknown log level {value:?} in {LOG_ENV}, using info");
    }
    Ok(())
}

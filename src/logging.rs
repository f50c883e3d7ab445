use std::env;
use std::io::Write;

use colored::Colorize;
use env_logger::Builder;
use log::{Level, LevelFilter};

fn level_for(verbosity: u8, debug_env: bool) -> LevelFilter {
    let level = match verbosity {
        0 => LevelFilter::Error, // default: only errors
        1 => LevelFilter::Info,  // -v: info and up
        2 => LevelFilter::Debug, // -vv: debug and up
        _ => LevelFilter::Trace, // -vvv: trace and up
    };

    if debug_env {
        level.max(LevelFilter::Debug)
    } else {
        level
    }
}

/// Install the global logger. A non-empty `DEBUG` env var raises the level to at least debug.
pub fn init_logger(verbosity: u8) {
    let debug_env = env::var("DEBUG").is_ok_and(|v| !v.is_empty());

    let mut builder = Builder::new();
    builder.filter_level(level_for(verbosity, debug_env));
    // Keep dependency chatter out of -vvv output.
    builder.filter_module("reqwest", LevelFilter::Warn);
    builder.filter_module("rustls", LevelFilter::Warn);

    builder.format(|buf, record| {
        let level = record.level();

        let level_label = match level {
            Level::Error => "ERROR".red().bold(),
            Level::Warn  => "WARN ".yellow().bold(),
            Level::Info  => "INFO ".white().bold(),
            Level::Debug => "DEBUG".bright_black(),
            Level::Trace => "TRACE".bright_black(),
        };

        writeln!(
            buf,
            "{} {}",
            level_label,
            record.args()
        )
    });

    builder.init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_maps_to_levels() {
        assert_eq!(level_for(0, false), LevelFilter::Error);
        assert_eq!(level_for(1, false), LevelFilter::Info);
        assert_eq!(level_for(2, false), LevelFilter::Debug);
        assert_eq!(level_for(7, false), LevelFilter::Trace);
    }

    #[test]
    fn debug_env_raises_but_never_lowers() {
        assert_eq!(level_for(0, true), LevelFilter::Debug);
        assert_eq!(level_for(3, true), LevelFilter::Trace);
    }
}

use std::sync::Once;
use tracing::Level;

static INIT: Once = Once::new();

/// Maps a `-v` count to a tracing level.
pub fn level_for(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Installs the global fmt subscriber once. Later calls are ignored, as is
/// any call made after another subscriber was set elsewhere.
pub fn init_logging(verbosity: u8) {
    if !tracing::dispatcher::has_been_set() {
        INIT.call_once(|| {
            tracing_subscriber::fmt()
                .with_max_level(level_for(verbosity))
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for() {
        assert_eq!(level_for(0), Level::WARN);
        assert_eq!(level_for(1), Level::INFO);
        assert_eq!(level_for(2), Level::DEBUG);
        assert_eq!(level_for(9), Level::TRACE);
    }

    #[test]
    fn test_init_logging_is_idempotent() {
        init_logging(1);
        init_logging(3);
        assert!(tracing::dispatcher::has_been_set());
    }
}

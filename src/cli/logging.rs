use log::LevelFilter;
use simple_logger::SimpleLogger;

/// Environment variables that turn on debug output like `--debug`
const DEBUG_ENV_VARS: [&str; 2] = ["ALVU_DEBUG", "DEBUG"];

/// Initialize logging with the specified level
pub fn init_logging(debug: bool) -> LevelFilter {
    let log_level = if debug || debug_from_env() {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    // Only fails when a logger is already installed
    let _ = SimpleLogger::new()
        .with_level(LevelFilter::Warn)
        .with_module_level("alvu", log_level)
        .init();

    log_level
}

fn debug_from_env() -> bool {
    DEBUG_ENV_VARS
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .any(|value| is_truthy(&value))
}

fn is_truthy(value: &str) -> bool {
    let value = value.trim();
    !value.is_empty() && value != "0" && !value.eq_ignore_ascii_case("false")
}

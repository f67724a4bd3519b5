/// Initializes env_logger. Verbose runs log everything; otherwise only warnings,
/// which is how per-file materialization failures reach the user.
pub fn init_logger(verbose: bool) {
    env_logger::Builder::new()
        .filter_level(if verbose {
            log::LevelFilter::Trace
        } else {
            log::LevelFilter::Warn
        })
        .format_timestamp(None)
        .init();
}

use grc_desk::logger;


#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    // Logger state is process-global, so everything touching it lives in one test
    #[test]
    fn test_logger_writes_only_while_enabled() {
        let _ = logger::init();
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("grc-desk.log");
        logger::set_log_file(path.to_str().expect("utf-8 path")).expect("log file opens");

        logger::disable_logging();
        assert!(!logger::is_logging_enabled());
        log::warn!(target: "grc_desk::tests", "written while disabled");

        logger::enable_logging();
        assert!(logger::is_logging_enabled());
        log::warn!(target: "grc_desk::tests", "written while enabled");
        logger::disable_logging();

        let content = fs::read_to_string(&path).expect("log file readable");
        assert!(content.contains("written while enabled"));
        assert!(!content.contains("written while disabled"));
    }
}

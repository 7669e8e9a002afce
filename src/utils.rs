//! Process-wide logging macros backed by [`crate::logging::Logger::global`].

#[macro_export]
macro_rules! debug_enabled {
    () => {
        if let Ok(logger) = $crate::logging::Logger::global().try_lock() {
            logger.is_debug_enabled()
        } else {
            false
        }
    };
}

#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {{
        if let Ok(logger) = $crate::logging::Logger::global().try_lock() {
            let _ = logger.log($crate::logging::LogLevel::Debug, &format!($($arg)*));
        }
    }};
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {{
        if let Ok(logger) = $crate::logging::Logger::global().try_lock() {
            let _ = logger.log($crate::logging::LogLevel::Info, &format!($($arg)*));
        }
    }};
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {{
        if let Ok(logger) = $crate::logging::Logger::global().try_lock() {
            let _ = logger.log($crate::logging::LogLevel::Warning, &format!($($arg)*));
        }
    }};
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {{
        if let Ok(logger) = $crate::logging::Logger::global().try_lock() {
            let _ = logger.log($crate::logging::LogLevel::Error, &format!($($arg)*));
        }
    }};
}

#[macro_export]
macro_rules! log_ssh {
    ($($arg:tt)*) => {{
        if let Ok(logger) = $crate::logging::Logger::global().lock() {
            let _ = logger.log_ssh(&format!($($arg)*));
        }
    }};
}

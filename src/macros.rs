//! Emit macros.
//!
//! The format variants take `format!`-style arguments; the `*ln` variants
//! join their arguments with spaces. Neither formats anything when the
//! level is filtered out.
//!
//! ```no_run
//! use named_log::{log_info, log_errorln, Registry};
//!
//! let registry = Registry::new();
//! log_info!(registry, "svc", "started on port {}", 8080);
//! log_errorln!(registry, "svc", "lost", 3, "connections");
//! ```

#[macro_export]
macro_rules! log_at {
    ($registry:expr, $level:expr, $name:expr, $($arg:tt)+) => {
        $registry.log($level, $name, ::std::format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! log_at_ln {
    ($registry:expr, $level:expr, $name:expr, $($part:expr),+ $(,)?) => {
        $registry.log_join($level, $name, &[$(&$part as &dyn ::std::fmt::Display),+])
    };
}

#[macro_export]
macro_rules! log_debug {
    ($registry:expr, $name:expr, $($arg:tt)+) => {
        $crate::log_at!($registry, $crate::Level::Debug, $name, $($arg)+)
    };
}

#[macro_export]
macro_rules! log_info {
    ($registry:expr, $name:expr, $($arg:tt)+) => {
        $crate::log_at!($registry, $crate::Level::Info, $name, $($arg)+)
    };
}

#[macro_export]
macro_rules! log_warning {
    ($registry:expr, $name:expr, $($arg:tt)+) => {
        $crate::log_at!($registry, $crate::Level::Warning, $name, $($arg)+)
    };
}

#[macro_export]
macro_rules! log_error {
    ($registry:expr, $name:expr, $($arg:tt)+) => {
        $crate::log_at!($registry, $crate::Level::Error, $name, $($arg)+)
    };
}

#[macro_export]
macro_rules! log_debugln {
    ($registry:expr, $name:expr, $($part:expr),+ $(,)?) => {
        $crate::log_at_ln!($registry, $crate::Level::Debug, $name, $($part),+)
    };
}

#[macro_export]
macro_rules! log_infoln {
    ($registry:expr, $name:expr, $($part:expr),+ $(,)?) => {
        $crate::log_at_ln!($registry, $crate::Level::Info, $name, $($part),+)
    };
}

#[macro_export]
macro_rules! log_warningln {
    ($registry:expr, $name:expr, $($part:expr),+ $(,)?) => {
        $crate::log_at_ln!($registry, $crate::Level::Warning, $name, $($part),+)
    };
}

#[macro_export]
macro_rules! log_errorln {
    ($registry:expr, $name:expr, $($part:expr),+ $(,)?) => {
        $crate::log_at_ln!($registry, $crate::Level::Error, $name, $($part),+)
    };
}

pub use crate::{logging_critical, logging_debug, logging_emergency, logging_error, logging_information, logging_notice, logging_warning};
pub use common::utils::log_entry::inference::InferenceEntry;
pub use common::utils::log_entry::io::IOEntry;
pub use common::utils::log_entry::network::NetworkEntry;
pub use common::utils::log_entry::request::RequestEntry;
pub use common::utils::log_entry::system::SystemEntry;
pub use common::utils::logging::*;
pub use common::{critical_entry, debug_entry, emergency_entry, error_entry, information_entry, notice_entry, warning_entry};

use chrono::{DateTime, Local};
use lazy_static::lazy_static;
use std::collections::VecDeque;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

const DEFAULT_CAPACITY: usize = 10000;

lazy_static! {
    static ref LOGGER: RwLock<Logger> = RwLock::new(Logger::new());
}

pub struct Logger {
    system_log: VecDeque<LogEntry>,
    capacity: usize,
    minimum_level: LogLevel,
}

impl Logger {
    fn new() -> Self {
        let mut system_log = VecDeque::new();
        let log_entry = LogEntry::new(LogLevel::Information, "Logger", "Online now", "");
        system_log.push_back(log_entry);
        Self {
            system_log,
            capacity: DEFAULT_CAPACITY,
            minimum_level: LogLevel::Information,
        }
    }

    pub async fn instance() -> RwLockReadGuard<'static, Logger> {
        LOGGER.read().await
    }

    pub async fn instance_mut() -> RwLockWriteGuard<'static, Logger> {
        LOGGER.write().await
    }

    pub async fn configure(debug: bool, capacity: usize) {
        let mut logger = Self::instance_mut().await;
        logger.minimum_level = if debug { LogLevel::Debug } else { LogLevel::Information };
        logger.capacity = capacity.max(1);
        logger.truncate();
    }

    pub async fn add_system_log_entry(log_entry: LogEntry) {
        let mut logger = Self::instance_mut().await;
        if log_entry.level < logger.minimum_level {
            return;
        }
        Self::logging_console(log_entry.clone());
        logger.system_log.push_back(log_entry);
        logger.truncate();
    }

    fn truncate(&mut self) {
        while self.system_log.len() > self.capacity {
            self.system_log.pop_front();
        }
    }

    pub fn logging_console(log_entry: LogEntry) {
        println!("{}", log_entry.to_colored_string());
    }

    pub async fn get_system_logs() -> Vec<LogEntry> {
        Self::instance().await.system_log.iter().cloned().collect()
    }

    pub async fn get_system_logs_since(time: DateTime<Local>) -> Vec<LogEntry> {
        Self::instance().await.logs_since(time)
    }

    // Entries are stamped before the lock is taken, so the deque is not sorted by time.
    fn logs_since(&self, time: DateTime<Local>) -> Vec<LogEntry> {
        self.system_log.iter()
            .filter(|entry| entry.timestamp >= time)
            .cloned()
            .collect()
    }
}

#[macro_export]
macro_rules! logging_debug {
    ($message:expr) => {
        $crate::utils::logging::Logger::add_system_log_entry($crate::utils::logging::debug_entry!($message)).await
    };
    ($message:expr, $debug_info:expr) => {
        $crate::utils::logging::Logger::add_system_log_entry($crate::utils::logging::debug_entry!($message, $debug_info)).await
    };
}

#[macro_export]
macro_rules! logging_information {
    ($message:expr) => {
        $crate::utils::logging::Logger::add_system_log_entry($crate::utils::logging::information_entry!($message)).await
    };
    ($message:expr, $debug_info:expr) => {
        $crate::utils::logging::Logger::add_system_log_entry($crate::utils::logging::information_entry!($message, $debug_info)).await
    };
}

#[macro_export]
macro_rules! logging_notice {
    ($message:expr) => {
        $crate::utils::logging::Logger::add_system_log_entry($crate::utils::logging::notice_entry!($message)).await
    };
    ($message:expr, $debug_info:expr) => {
        $crate::utils::logging::Logger::add_system_log_entry($crate::utils::logging::notice_entry!($message, $debug_info)).await
    };
}

#[macro_export]
macro_rules! logging_warning {
    ($message:expr) => {
        $crate::utils::logging::Logger::add_system_log_entry($crate::utils::logging::warning_entry!($message)).await
    };
    ($message:expr, $debug_info:expr) => {
        $crate::utils::logging::Logger::add_system_log_entry($crate::utils::logging::warning_entry!($message, $debug_info)).await
    };
}

#[macro_export]
macro_rules! logging_error {
    ($message:expr) => {
        $crate::utils::logging::Logger::add_system_log_entry($crate::utils::logging::error_entry!($message)).await
    };
    ($message:expr, $debug_info:expr) => {
        $crate::utils::logging::Logger::add_system_log_entry($crate::utils::logging::error_entry!($message, $debug_info)).await
    };
}

#[macro_export]
macro_rules! logging_critical {
    ($message:expr) => {
        $crate::utils::logging::Logger::add_system_log_entry($crate::utils::logging::critical_entry!($message)).await
    };
    ($message:expr, $debug_info:expr) => {
        $crate::utils::logging::Logger::add_system_log_entry($crate::utils::logging::critical_entry!($message, $debug_info)).await
    };
}

#[macro_export]
macro_rules! logging_emergency {
    ($message:expr) => {
        $crate::utils::logging::Logger::add_system_log_entry($crate::utils::logging::emergency_entry!($message)).await
    };
    ($message:expr, $debug_info:expr) => {
        $crate::utils::logging::Logger::add_system_log_entry($crate::utils::logging::emergency_entry!($message, $debug_info)).await
    };
}

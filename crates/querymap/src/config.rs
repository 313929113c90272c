//! Entity manager configuration and SQL logging.

use crate::compiler::Compiled;
use tracing::Level;

/// The kind of statement being executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Select,
    Update,
    Delete,
}

/// Configuration for [`crate::EntityManager`].
#[derive(Debug, Clone)]
pub struct ManagerConfig {
    /// Whether to emit a `querymap.sql` event before each statement.
    pub logging_enabled: bool,
    /// Tracing event level to emit at.
    pub log_level: Level,
    /// Truncate long SQL strings (in bytes). `None` means no truncation.
    pub max_sql_length: Option<usize>,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            logging_enabled: true,
            log_level: Level::DEBUG,
            max_sql_length: Some(200),
        }
    }
}

impl ManagerConfig {
    /// Create a new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable SQL logging.
    pub fn logging(mut self, enabled: bool) -> Self {
        self.logging_enabled = enabled;
        self
    }

    /// Override the tracing event level.
    pub fn log_level(mut self, level: Level) -> Self {
        self.log_level = level;
        self
    }

    /// Set maximum SQL length to display.
    pub fn max_sql_length(mut self, len: usize) -> Self {
        self.max_sql_length = Some(len);
        self
    }

    /// Disable SQL truncation.
    pub fn no_truncate(mut self) -> Self {
        self.max_sql_length = None;
        self
    }

    pub(crate) fn truncate_sql(&self, sql: &str) -> String {
        match self.max_sql_length {
            Some(max) if sql.len() > max => format!("{}...", truncate_sql_bytes(sql, max)),
            _ => sql.to_string(),
        }
    }

    pub(crate) fn log_statement(&self, kind: StatementKind, entity: &str, compiled: &Compiled) {
        if !self.logging_enabled {
            return;
        }

        /// Dispatch a tracing event at a runtime-determined level.
        macro_rules! emit_at_level {
            ($level:expr, $($field:tt)*) => {
                match $level {
                    Level::ERROR => tracing::error!($($field)*),
                    Level::WARN  => tracing::warn!($($field)*),
                    Level::INFO  => tracing::info!($($field)*),
                    Level::DEBUG => tracing::debug!($($field)*),
                    Level::TRACE => tracing::trace!($($field)*),
                }
            };
        }

        let sql = self.truncate_sql(&compiled.sql);
        emit_at_level!(
            self.log_level,
            target: "querymap.sql",
            statement = ?kind,
            entity,
            param_count = compiled.params.len(),
            sql = %sql,
        );
    }
}

/// Cut `sql` to at most `max_bytes`, backing off to a char boundary.
fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::param::ParamList;

    #[test]
    fn test_defaults() {
        let config = ManagerConfig::default();
        assert!(config.logging_enabled);
        assert_eq!(config.log_level, Level::DEBUG);
        assert_eq!(config.max_sql_length, Some(200));
    }

    #[test]
    fn test_setters_chain() {
        let config = ManagerConfig::new()
            .logging(false)
            .log_level(Level::INFO)
            .max_sql_length(10);
        assert!(!config.logging_enabled);
        assert_eq!(config.log_level, Level::INFO);
        assert_eq!(config.max_sql_length, Some(10));
        assert_eq!(config.no_truncate().max_sql_length, None);
    }

    #[test]
    fn test_truncate_sql() {
        let config = ManagerConfig::new().max_sql_length(8);
        assert_eq!(config.truncate_sql("SELECT 1"), "SELECT 1");
        assert_eq!(config.truncate_sql("SELECT * FROM users"), "SELECT *...");
        assert_eq!(
            ManagerConfig::new().no_truncate().truncate_sql("SELECT * FROM users"),
            "SELECT * FROM users"
        );
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        // 'é' is two bytes; cutting at byte 2 would split it.
        assert_eq!(truncate_sql_bytes("aé", 2), "a");
        assert_eq!(truncate_sql_bytes("abc", 5), "abc");
    }

    #[test]
    fn test_log_statement_without_subscriber() {
        let compiled = Compiled::new("SELECT * FROM tags".to_string(), ParamList::new());
        ManagerConfig::new()
            .log_level(Level::TRACE)
            .log_statement(StatementKind::Select, "Tag", &compiled);
        ManagerConfig::new()
            .logging(false)
            .log_statement(StatementKind::Delete, "Tag", &compiled);
    }
}

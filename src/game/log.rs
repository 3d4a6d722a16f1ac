use serde::{Deserialize, Serialize};
use std::fmt;

/// 单条对局日志：渲染好的时间戳加叙述文本。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogEntry {
    pub timestamp: String,
    pub message: String,
}

impl LogEntry {
    pub fn new(timestamp: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            timestamp: timestamp.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.timestamp, self.message)
    }
}

/// 追加式对局日志。按写入顺序保存，展示时最新在前。
/// 无容量上限，不持久化，只服务于本次会话内的人工回看。
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EventLog {
    entries: Vec<LogEntry>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, timestamp: impl Into<String>, message: impl Into<String>) {
        self.entries.push(LogEntry::new(timestamp, message));
    }

    /// 仅在重置时调用。
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn newest(&self) -> Option<&LogEntry> {
        self.entries.last()
    }

    /// 展示顺序：最近的条目在最前。
    pub fn entries_newest_first(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter().rev()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_come_back_newest_first() {
        let mut log = EventLog::new();
        log.append("10:00:00", "Game start");
        log.append("10:00:05", "It is now the opponent's turn.");
        log.append("10:00:05", "Max cost is now 1.");

        let messages: Vec<&str> = log
            .entries_newest_first()
            .map(|entry| entry.message.as_str())
            .collect();
        assert_eq!(
            messages,
            vec![
                "Max cost is now 1.",
                "It is now the opponent's turn.",
                "Game start",
            ]
        );
        assert_eq!(log.newest().expect("log is not empty").timestamp, "10:00:05");
    }

    #[test]
    fn clear_empties_the_log() {
        let mut log = EventLog::new();
        log.append("10:00:00", "Game start");
        assert_eq!(log.len(), 1);

        log.clear();
        assert!(log.is_empty());
        assert!(log.newest().is_none());
    }

    #[test]
    fn entry_renders_with_bracketed_timestamp() {
        let entry = LogEntry::new("10:00:00", "Game reset");
        assert_eq!(entry.to_string(), "[10:00:00] Game reset");
    }
}

//! 计数核心模块（回合/资源状态机、迁移规则与对局日志）。

pub mod log;
pub mod rules;
pub mod state;

pub use log::{EventLog, LogEntry};
pub use rules::{
    AlwaysConfirm,
    ConfirmGate,
    Intent,
    IntentResolution,
    NeverConfirm,
    TrackerConfig,
    TrackerEngine,
    RESET_PROMPT,
    ULTIMATE_CANCEL_PROMPT,
};
pub use state::{
    CostClampPolicy,
    Direction,
    MatchState,
    Notification,
    Party,
    PartySide,
    Resource,
    TrackerEvent,
    MAX_COST_CEILING,
    NOTIFICATION_DURATION_SECS,
    STARTING_HP,
};

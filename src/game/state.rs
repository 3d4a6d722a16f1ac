use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 双方初始生命值。
pub const STARTING_HP: i16 = 20;
/// 每回合费用上限的封顶值。
pub const MAX_COST_CEILING: u8 = 10;
/// 通知的固定展示时长（秒）。
pub const NOTIFICATION_DURATION_SECS: u32 = 3;

/// 对局双方的标识。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PartySide {
    Player,
    Opponent,
}

impl PartySide {
    pub fn other(self) -> Self {
        match self {
            PartySide::Player => PartySide::Opponent,
            PartySide::Opponent => PartySide::Player,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PartySide::Player => "player",
            PartySide::Opponent => "opponent",
        }
    }
}

impl fmt::Display for PartySide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PartySide {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "player" | "p1" | "first" => Ok(PartySide::Player),
            "opponent" | "p2" | "second" => Ok(PartySide::Opponent),
            _ => Err(()),
        }
    }
}

/// 可调整的资源类别。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    Hp,
    Cost,
    Charge,
}

impl FromStr for Resource {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hp" | "health" => Ok(Resource::Hp),
            "cost" => Ok(Resource::Cost),
            "charge" => Ok(Resource::Charge),
            _ => Err(()),
        }
    }
}

/// 资源调整方向。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Increment,
    Decrement,
}

impl FromStr for Direction {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "increment" | "incr" | "up" => Ok(Direction::Increment),
            "decrement" | "decr" | "down" => Ok(Direction::Decrement),
            _ => Err(()),
        }
    }
}

/// cost 递增时的上限策略。两种历史输入界面的行为不一致，这里显式化为配置。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CostClampPolicy {
    /// 仅在低于 max_cost 时允许递增。
    Clamped,
    /// 无条件递增，不检查上限。
    Unbounded,
}

impl Default for CostClampPolicy {
    fn default() -> Self {
        CostClampPolicy::Clamped
    }
}

impl FromStr for CostClampPolicy {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "clamped" | "clamp" => Ok(CostClampPolicy::Clamped),
            "unbounded" | "free" => Ok(CostClampPolicy::Unbounded),
            _ => Err(()),
        }
    }
}

/// 单方的计数器与一次性标记。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Party {
    pub hp: i16,
    pub cost: u8,
    pub max_cost: u8,
    pub charge: u8,
    #[serde(default)]
    pub ultimate_used: bool,
    #[serde(default)]
    pub zero_cost_used: bool,
}

impl Party {
    pub fn starting(cost: u8) -> Self {
        Self {
            hp: STARTING_HP,
            cost,
            max_cost: cost,
            charge: 0,
            ultimate_used: false,
            zero_cost_used: false,
        }
    }

    /// 回合开始时提升上限（封顶 10）并回满 cost。
    pub(crate) fn refresh_for_turn(&mut self) {
        self.max_cost = self.max_cost.saturating_add(1).min(MAX_COST_CEILING);
        self.cost = self.max_cost;
    }
}

/// 对局整体状态。先手从 cost 1 开始，后手从 0 开始。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MatchState {
    pub player: Party,
    pub opponent: Party,
    pub is_player_turn: bool,
}

impl MatchState {
    pub fn initial() -> Self {
        Self {
            player: Party::starting(1),
            opponent: Party::starting(0),
            is_player_turn: true,
        }
    }

    pub fn party(&self, side: PartySide) -> &Party {
        match side {
            PartySide::Player => &self.player,
            PartySide::Opponent => &self.opponent,
        }
    }

    pub fn party_mut(&mut self, side: PartySide) -> &mut Party {
        match side {
            PartySide::Player => &mut self.player,
            PartySide::Opponent => &mut self.opponent,
        }
    }

    pub fn active_side(&self) -> PartySide {
        if self.is_player_turn {
            PartySide::Player
        } else {
            PartySide::Opponent
        }
    }
}

impl Default for MatchState {
    fn default() -> Self {
        Self::initial()
    }
}

/// 状态迁移产生的叙述事件流，由持有方写入对局日志。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum TrackerEvent {
    GameStarted,
    GameReset,
    TurnAdvanced {
        side: PartySide,
    },
    MaxCostRaised {
        side: PartySide,
        value: u8,
    },
    UltimateUsed {
        side: PartySide,
    },
    UltimateCancelled {
        side: PartySide,
    },
    SkillUsed {
        side: PartySide,
        prior_charge: u8,
    },
    SkillChargeInsufficient {
        side: PartySide,
    },
    ZeroCostToggled {
        side: PartySide,
        value: bool,
    },
}

impl TrackerEvent {
    /// 渲染为日志用的叙述文本。
    pub fn narrate(&self) -> String {
        match self {
            TrackerEvent::GameStarted => "Game start".to_string(),
            TrackerEvent::GameReset => "Game reset".to_string(),
            TrackerEvent::TurnAdvanced { side } => format!("It is now the {side}'s turn."),
            TrackerEvent::MaxCostRaised { value, .. } => format!("Max cost is now {value}."),
            TrackerEvent::UltimateUsed { side } => format!("The {side} used their ultimate."),
            TrackerEvent::UltimateCancelled { side } => {
                format!("The {side} cancelled their ultimate.")
            }
            TrackerEvent::SkillUsed { side, prior_charge } => {
                format!("The {side} used their leader skill (charge: {prior_charge} → 0).")
            }
            TrackerEvent::SkillChargeInsufficient { side } => {
                format!("The {side} does not have enough charge to use their leader skill.")
            }
            TrackerEvent::ZeroCostToggled { side, value } => {
                let flag = if *value { "ON" } else { "OFF" };
                format!("The {side}'s zero-cost flag is now {flag}.")
            }
        }
    }

    /// 需要弹出通知的事件映射到通知文本。
    pub fn notification(&self) -> Option<Notification> {
        match self {
            TrackerEvent::UltimateUsed { .. } => Some(Notification::new("Ultimate activated")),
            TrackerEvent::SkillUsed { .. } => Some(Notification::new("Leader skill activated")),
            _ => None,
        }
    }
}

/// 一次性的界面提示，到期移除由视图负责。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub message: String,
    pub duration_secs: u32,
}

impl Notification {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            duration_secs: NOTIFICATION_DURATION_SECS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_state_matches_fresh_game() {
        let state = MatchState::initial();

        assert!(state.is_player_turn, "player acts first");
        assert_eq!(state.player.hp, 20);
        assert_eq!(state.player.cost, 1);
        assert_eq!(state.player.max_cost, 1);
        assert_eq!(state.opponent.hp, 20);
        assert_eq!(state.opponent.cost, 0);
        assert_eq!(state.opponent.max_cost, 0);

        for side in [PartySide::Player, PartySide::Opponent] {
            let party = state.party(side);
            assert_eq!(party.charge, 0);
            assert!(!party.ultimate_used);
            assert!(!party.zero_cost_used);
        }
    }

    #[test]
    fn refresh_for_turn_caps_max_cost_at_ceiling() {
        let mut party = Party::starting(0);
        for _ in 0..20 {
            party.refresh_for_turn();
        }
        assert_eq!(party.max_cost, MAX_COST_CEILING);
        assert_eq!(party.cost, MAX_COST_CEILING);
    }

    #[test]
    fn skill_narration_shows_prior_charge() {
        let event = TrackerEvent::SkillUsed {
            side: PartySide::Player,
            prior_charge: 3,
        };
        assert!(
            event.narrate().contains("3 → 0"),
            "narration should show the charge transition"
        );
    }

    #[test]
    fn only_ultimate_and_skill_events_notify() {
        let notifying = [
            TrackerEvent::UltimateUsed {
                side: PartySide::Player,
            },
            TrackerEvent::SkillUsed {
                side: PartySide::Opponent,
                prior_charge: 1,
            },
        ];
        for event in &notifying {
            let notification = event.notification().expect("event should notify");
            assert_eq!(notification.duration_secs, NOTIFICATION_DURATION_SECS);
        }

        let silent = [
            TrackerEvent::GameStarted,
            TrackerEvent::TurnAdvanced {
                side: PartySide::Opponent,
            },
            TrackerEvent::UltimateCancelled {
                side: PartySide::Player,
            },
            TrackerEvent::SkillChargeInsufficient {
                side: PartySide::Player,
            },
        ];
        for event in &silent {
            assert!(event.notification().is_none());
        }
    }

    #[test]
    fn state_serializes_with_js_property_names() {
        let json = serde_json::to_string(&MatchState::initial()).expect("state should serialize");
        assert!(json.contains("\"isPlayerTurn\":true"));
        assert!(json.contains("\"maxCost\":1"));
        assert!(json.contains("\"ultimateUsed\":false"));
        assert!(json.contains("\"zeroCostUsed\":false"));
    }
}

use serde::{Deserialize, Serialize};

use super::state::{
    CostClampPolicy, Direction, MatchState, Notification, PartySide, Resource, TrackerEvent,
};

/// 重置对局前的确认提示。
pub const RESET_PROMPT: &str = "Reset the game? All counters and the log will be cleared.";
/// 取消奥义使用前的确认提示。
pub const ULTIMATE_CANCEL_PROMPT: &str = "Cancel the ultimate use?";

/// 确认类操作的注入式能力。浏览器宿主用同步的 confirm 弹窗实现，
/// 测试里用固定应答的桩实现。
pub trait ConfirmGate {
    fn confirm(&self, prompt: &str) -> bool;
}

/// 总是同意的确认门。
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysConfirm;

impl ConfirmGate for AlwaysConfirm {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

/// 总是拒绝的确认门，也用于未接线确认回调的宿主。
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverConfirm;

impl ConfirmGate for NeverConfirm {
    fn confirm(&self, _prompt: &str) -> bool {
        false
    }
}

/// 引擎配置。
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrackerConfig {
    #[serde(default)]
    pub cost_clamp: CostClampPolicy,
}

/// 用户意图，前端可以通过单一 JSON 入口下发。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum Intent {
    AdvanceTurn,
    AdjustResource {
        side: PartySide,
        resource: Resource,
        direction: Direction,
    },
    ToggleUltimate {
        side: PartySide,
    },
    UseSkill {
        side: PartySide,
    },
    ToggleZeroCostFlag {
        side: PartySide,
    },
    Reset,
}

/// 一次迁移的完整结果：新状态快照、事件序列与至多一条通知。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentResolution {
    pub state: MatchState,
    pub events: Vec<TrackerEvent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification: Option<Notification>,
}

impl IntentResolution {
    pub fn new(state: MatchState, events: Vec<TrackerEvent>) -> Self {
        let notification = events.iter().find_map(TrackerEvent::notification);
        Self {
            state,
            events,
            notification,
        }
    }
}

/// 迁移函数的集合。所有迁移都不会失败：非法尝试退化为
/// 无操作加一条说明性事件，或什么都不发生。
#[derive(Debug, Clone, Copy, Default)]
pub struct TrackerEngine {
    config: TrackerConfig,
}

impl TrackerEngine {
    pub fn new(config: TrackerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> TrackerConfig {
        self.config
    }

    /// 覆盖为初始状态并宣告开局。
    pub fn initialize(&self, state: &mut MatchState) -> Vec<TrackerEvent> {
        *state = MatchState::initial();
        vec![TrackerEvent::GameStarted]
    }

    /// 确认后重置。拒绝等价于意图从未发出：返回 `None`，状态与日志原样保留。
    /// 确认后持有方需要先清空日志，使 `GameReset` 成为新日志的第一条。
    pub fn reset(
        &self,
        state: &mut MatchState,
        gate: &dyn ConfirmGate,
    ) -> Option<Vec<TrackerEvent>> {
        if !gate.confirm(RESET_PROMPT) {
            return None;
        }
        *state = MatchState::initial();
        Some(vec![TrackerEvent::GameReset])
    }

    /// 结束当前回合：清掉结束方的零费标记，交换先后手，
    /// 新行动方费用上限 +1（封顶 10）且费用回满。永不失败。
    pub fn advance_turn(&self, state: &mut MatchState) -> Vec<TrackerEvent> {
        let ending = state.active_side();
        state.party_mut(ending).zero_cost_used = false;

        state.is_player_turn = !state.is_player_turn;
        let side = state.active_side();
        let party = state.party_mut(side);
        party.refresh_for_turn();
        let value = party.max_cost;

        vec![
            TrackerEvent::TurnAdvanced { side },
            TrackerEvent::MaxCostRaised { side, value },
        ]
    }

    /// 单步调整资源。不产生事件，只触发重绘。
    pub fn adjust_resource(
        &self,
        state: &mut MatchState,
        side: PartySide,
        resource: Resource,
        direction: Direction,
    ) -> Vec<TrackerEvent> {
        let policy = self.config.cost_clamp;
        let party = state.party_mut(side);
        match (resource, direction) {
            (Resource::Hp, Direction::Increment) => party.hp += 1,
            (Resource::Hp, Direction::Decrement) => party.hp -= 1,
            (Resource::Cost, Direction::Increment) => match policy {
                CostClampPolicy::Clamped => {
                    if party.cost < party.max_cost {
                        party.cost += 1;
                    }
                }
                CostClampPolicy::Unbounded => party.cost = party.cost.saturating_add(1),
            },
            (Resource::Cost, Direction::Decrement) => {
                if party.cost > 0 {
                    party.cost -= 1;
                }
            }
            (Resource::Charge, Direction::Increment) => {
                party.charge = party.charge.saturating_add(1);
            }
            (Resource::Charge, Direction::Decrement) => {
                if party.charge > 0 {
                    party.charge -= 1;
                }
            }
        }
        Vec::new()
    }

    /// 奥义开关。未使用时置位并通知；已使用时需确认才能撤销，
    /// 拒绝则什么都不发生。这是唯一带撤销路径的迁移。
    pub fn toggle_ultimate(
        &self,
        state: &mut MatchState,
        side: PartySide,
        gate: &dyn ConfirmGate,
    ) -> Vec<TrackerEvent> {
        let party = state.party_mut(side);
        if !party.ultimate_used {
            party.ultimate_used = true;
            vec![TrackerEvent::UltimateUsed { side }]
        } else if gate.confirm(ULTIMATE_CANCEL_PROMPT) {
            party.ultimate_used = false;
            vec![TrackerEvent::UltimateCancelled { side }]
        } else {
            Vec::new()
        }
    }

    /// 队长技能：有充能时全部消耗并通知；没有充能时仅记一条说明。
    pub fn use_skill(&self, state: &mut MatchState, side: PartySide) -> Vec<TrackerEvent> {
        let party = state.party_mut(side);
        if party.charge > 0 {
            let prior_charge = party.charge;
            party.charge = 0;
            vec![TrackerEvent::SkillUsed { side, prior_charge }]
        } else {
            vec![TrackerEvent::SkillChargeInsufficient { side }]
        }
    }

    /// 手动翻转零费标记。与回合结束时的自动清除互相独立。
    pub fn toggle_zero_cost_flag(
        &self,
        state: &mut MatchState,
        side: PartySide,
    ) -> Vec<TrackerEvent> {
        let party = state.party_mut(side);
        party.zero_cost_used = !party.zero_cost_used;
        vec![TrackerEvent::ZeroCostToggled {
            side,
            value: party.zero_cost_used,
        }]
    }

    /// 统一的意图分发入口。`None` 仅出现在重置被拒绝时，
    /// 表示日志也要保持原样。
    pub fn apply(
        &self,
        state: &mut MatchState,
        gate: &dyn ConfirmGate,
        intent: Intent,
    ) -> Option<Vec<TrackerEvent>> {
        match intent {
            Intent::AdvanceTurn => Some(self.advance_turn(state)),
            Intent::AdjustResource {
                side,
                resource,
                direction,
            } => Some(self.adjust_resource(state, side, resource, direction)),
            Intent::ToggleUltimate { side } => Some(self.toggle_ultimate(state, side, gate)),
            Intent::UseSkill { side } => Some(self.use_skill(state, side)),
            Intent::ToggleZeroCostFlag { side } => Some(self.toggle_zero_cost_flag(state, side)),
            Intent::Reset => self.reset(state, gate),
        }
    }
}

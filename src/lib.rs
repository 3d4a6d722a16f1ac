pub mod game;

use gloo_timers::future::TimeoutFuture;
use serde_wasm_bindgen::{from_value, to_value};
use std::str::FromStr;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;
use web_sys::js_sys::{Date, Function, Promise};

pub use game::{
    AlwaysConfirm, ConfirmGate, CostClampPolicy, Direction, EventLog, Intent, IntentResolution,
    LogEntry, MatchState, NeverConfirm, Notification, Party, PartySide, Resource, TrackerConfig,
    TrackerEngine, TrackerEvent, MAX_COST_CEILING, NOTIFICATION_DURATION_SECS, RESET_PROMPT,
    STARTING_HP, ULTIMATE_CANCEL_PROMPT,
};

#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn start() {
    set_panic_hook();
}

fn serde_to_js_error<E: std::fmt::Display>(error: E) -> JsValue {
    JsValue::from_str(&error.to_string())
}

fn resolution_json(resolution: &IntentResolution) -> Result<String, JsValue> {
    serde_json::to_string(resolution).map_err(serde_to_js_error)
}

/// 日志时间戳，宿主环境的本地时刻。
fn now_timestamp() -> String {
    Date::new_0().to_locale_time_string("en-US").into()
}

fn parse_side(value: &str) -> Result<PartySide, JsValue> {
    PartySide::from_str(value).map_err(|_| JsValue::from_str(&format!("unknown side: {value}")))
}

fn parse_resource(value: &str) -> Result<Resource, JsValue> {
    Resource::from_str(value).map_err(|_| JsValue::from_str(&format!("unknown resource: {value}")))
}

fn parse_direction(value: &str) -> Result<Direction, JsValue> {
    Direction::from_str(value)
        .map_err(|_| JsValue::from_str(&format!("unknown direction: {value}")))
}

fn parse_policy(value: &str) -> Result<CostClampPolicy, JsValue> {
    CostClampPolicy::from_str(value)
        .map_err(|_| JsValue::from_str(&format!("unknown cost clamp policy: {value}")))
}

/// 把注入的 JS 回调适配成同步确认门。未接线时一律视为拒绝，
/// 这样没有确认界面的宿主里重置和奥义撤销只是无操作。
struct JsConfirmGate<'a> {
    handler: Option<&'a Function>,
}

impl ConfirmGate for JsConfirmGate<'_> {
    fn confirm(&self, prompt: &str) -> bool {
        match self.handler {
            Some(handler) => handler
                .call1(&JsValue::NULL, &JsValue::from_str(prompt))
                .map(|value| value.is_truthy())
                .unwrap_or(false),
            None => false,
        }
    }
}

/// 有状态的计数器入口：持有唯一的对局状态与日志，
/// 每个方法对应一个用户意图，返回序列化的迁移结果。
#[wasm_bindgen]
pub struct Tracker {
    state: MatchState,
    log: EventLog,
    engine: TrackerEngine,
    confirm: Option<Function>,
}

#[wasm_bindgen]
impl Tracker {
    #[wasm_bindgen(constructor)]
    pub fn new(initial_state_json: Option<String>) -> Result<Tracker, JsValue> {
        let engine = TrackerEngine::default();
        let mut log = EventLog::new();
        let state = if let Some(json) = initial_state_json {
            serde_json::from_str(&json).map_err(serde_to_js_error)?
        } else {
            let mut state = MatchState::initial();
            for event in engine.initialize(&mut state) {
                log.append(now_timestamp(), event.narrate());
            }
            state
        };
        Ok(Tracker {
            state,
            log,
            engine,
            confirm: None,
        })
    }

    pub fn state_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.state).map_err(serde_to_js_error)
    }

    pub fn set_state_json(&mut self, json: &str) -> Result<(), JsValue> {
        let state: MatchState = serde_json::from_str(json).map_err(serde_to_js_error)?;
        self.state = state;
        Ok(())
    }

    /// 注入确认回调（接收提示文本，返回真值表示同意）。
    pub fn set_confirm_handler(&mut self, handler: Function) {
        self.confirm = Some(handler);
    }

    /// 切换 cost 递增策略："clamped" 或 "unbounded"。
    pub fn set_cost_clamp(&mut self, policy: &str) -> Result<(), JsValue> {
        let cost_clamp = parse_policy(policy)?;
        self.engine = TrackerEngine::new(TrackerConfig { cost_clamp });
        Ok(())
    }

    /// 最新在前的日志，供浮层展示。
    pub fn log_json(&self) -> Result<String, JsValue> {
        let entries: Vec<&LogEntry> = self.log.entries_newest_first().collect();
        serde_json::to_string(&entries).map_err(serde_to_js_error)
    }

    pub fn advance_turn(&mut self) -> Result<String, JsValue> {
        let events = self.engine.advance_turn(&mut self.state);
        self.resolve(events)
    }

    pub fn adjust_resource(
        &mut self,
        side: &str,
        resource: &str,
        direction: &str,
    ) -> Result<String, JsValue> {
        let side = parse_side(side)?;
        let resource = parse_resource(resource)?;
        let direction = parse_direction(direction)?;
        let events = self
            .engine
            .adjust_resource(&mut self.state, side, resource, direction);
        self.resolve(events)
    }

    pub fn toggle_ultimate(&mut self, side: &str) -> Result<String, JsValue> {
        let side = parse_side(side)?;
        let engine = self.engine;
        let events = {
            let gate = JsConfirmGate {
                handler: self.confirm.as_ref(),
            };
            engine.toggle_ultimate(&mut self.state, side, &gate)
        };
        self.resolve(events)
    }

    pub fn use_skill(&mut self, side: &str) -> Result<String, JsValue> {
        let side = parse_side(side)?;
        let events = self.engine.use_skill(&mut self.state, side);
        self.resolve(events)
    }

    pub fn toggle_zero_cost_flag(&mut self, side: &str) -> Result<String, JsValue> {
        let side = parse_side(side)?;
        let events = self.engine.toggle_zero_cost_flag(&mut self.state, side);
        self.resolve(events)
    }

    /// 确认后重置并清空日志；拒绝时返回 `null`。
    pub fn reset(&mut self) -> Result<JsValue, JsValue> {
        let engine = self.engine;
        let outcome = {
            let gate = JsConfirmGate {
                handler: self.confirm.as_ref(),
            };
            engine.reset(&mut self.state, &gate)
        };
        match outcome {
            Some(events) => {
                self.log.clear();
                let json = self.resolve(events)?;
                Ok(JsValue::from_str(&json))
            }
            None => Ok(JsValue::NULL),
        }
    }

    /// 单一 JSON 意图入口。被拒绝的重置返回 `null`。
    pub fn apply_intent_json(&mut self, intent_json: &str) -> Result<JsValue, JsValue> {
        let intent: Intent = serde_json::from_str(intent_json).map_err(serde_to_js_error)?;
        if matches!(intent, Intent::Reset) {
            return self.reset();
        }
        let engine = self.engine;
        let events = {
            let gate = JsConfirmGate {
                handler: self.confirm.as_ref(),
            };
            engine
                .apply(&mut self.state, &gate, intent)
                .unwrap_or_default()
        };
        let json = self.resolve(events)?;
        Ok(JsValue::from_str(&json))
    }

    fn resolve(&mut self, events: Vec<TrackerEvent>) -> Result<String, JsValue> {
        for event in &events {
            self.log.append(now_timestamp(), event.narrate());
        }
        resolution_json(&IntentResolution::new(self.state, events))
    }
}

/// 返回初始对局状态，便于前端初始化或调试。
#[wasm_bindgen(js_name = "createMatchState")]
pub fn create_match_state() -> Result<JsValue, JsValue> {
    to_value(&MatchState::initial()).map_err(JsValue::from)
}

/// 将传入的对局状态深拷贝后返回。
#[wasm_bindgen(js_name = "cloneMatchState")]
pub fn clone_match_state(state: JsValue) -> Result<JsValue, JsValue> {
    let state: MatchState = from_value(state).map_err(JsValue::from)?;
    to_value(&state).map_err(JsValue::from)
}

#[wasm_bindgen(js_name = "advanceTurn")]
pub fn advance_turn(state: JsValue) -> Result<JsValue, JsValue> {
    let mut state: MatchState = from_value(state).map_err(JsValue::from)?;
    let engine = TrackerEngine::default();
    let events = engine.advance_turn(&mut state);
    to_value(&IntentResolution::new(state, events)).map_err(JsValue::from)
}

#[wasm_bindgen(js_name = "adjustResource")]
pub fn adjust_resource(
    state: JsValue,
    side: &str,
    resource: &str,
    direction: &str,
    policy: Option<String>,
) -> Result<JsValue, JsValue> {
    let mut state: MatchState = from_value(state).map_err(JsValue::from)?;
    let side = parse_side(side)?;
    let resource = parse_resource(resource)?;
    let direction = parse_direction(direction)?;
    let cost_clamp = match policy {
        Some(value) => parse_policy(&value)?,
        None => CostClampPolicy::default(),
    };
    let engine = TrackerEngine::new(TrackerConfig { cost_clamp });
    let events = engine.adjust_resource(&mut state, side, resource, direction);
    to_value(&IntentResolution::new(state, events)).map_err(JsValue::from)
}

#[wasm_bindgen(js_name = "useSkill")]
pub fn use_skill(state: JsValue, side: &str) -> Result<JsValue, JsValue> {
    let mut state: MatchState = from_value(state).map_err(JsValue::from)?;
    let side = parse_side(side)?;
    let engine = TrackerEngine::default();
    let events = engine.use_skill(&mut state, side);
    to_value(&IntentResolution::new(state, events)).map_err(JsValue::from)
}

/// 无状态版的奥义开关：调用方自行弹确认框，把结果作为布尔传入。
#[wasm_bindgen(js_name = "toggleUltimate")]
pub fn toggle_ultimate(
    state: JsValue,
    side: &str,
    confirm_cancel: bool,
) -> Result<JsValue, JsValue> {
    let mut state: MatchState = from_value(state).map_err(JsValue::from)?;
    let side = parse_side(side)?;
    let engine = TrackerEngine::default();
    let events = if confirm_cancel {
        engine.toggle_ultimate(&mut state, side, &AlwaysConfirm)
    } else {
        engine.toggle_ultimate(&mut state, side, &NeverConfirm)
    };
    to_value(&IntentResolution::new(state, events)).map_err(JsValue::from)
}

#[wasm_bindgen(js_name = "toggleZeroCostFlag")]
pub fn toggle_zero_cost_flag(state: JsValue, side: &str) -> Result<JsValue, JsValue> {
    let mut state: MatchState = from_value(state).map_err(JsValue::from)?;
    let side = parse_side(side)?;
    let engine = TrackerEngine::default();
    let events = engine.toggle_zero_cost_flag(&mut state, side);
    to_value(&IntentResolution::new(state, events)).map_err(JsValue::from)
}

/// 通知展示到期后兑现的 Promise，视图据此移除对应元素。
/// 计时一旦开始不可取消，与后续状态变化互不影响。
#[wasm_bindgen(js_name = "notificationTimer")]
pub fn notification_timer(duration_ms: Option<u32>) -> Promise {
    let delay = duration_ms.unwrap_or(NOTIFICATION_DURATION_SECS * 1_000);
    future_to_promise(async move {
        if delay > 0 {
            TimeoutFuture::new(delay).await;
        }
        Ok(JsValue::UNDEFINED)
    })
}

#[cfg(feature = "console_error_panic_hook")]
fn set_panic_hook() {
    console_error_panic_hook::set_once();
}

#[cfg(not(feature = "console_error_panic_hook"))]
fn set_panic_hook() {}

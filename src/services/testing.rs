//! Тестовые реализации сервисов: сценарный WindowDirectory, записывающая клавиатура
//! и статический источник сочетаний.

use crate::error::{MinimzdError, Result};
use crate::minimzd_error;
use crate::services::keybind_settings::KeybindSource;
use crate::services::virtual_device::VirtualKeyboard;
use crate::services::window_directory::WindowDirectory;
use crate::types::Window;
use evdev::KeyCode;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Down(KeyCode),
    Press(KeyCode),
    Up(KeyCode),
}

/// Клавиатура, записывающая все события. Клоны разделяют журнал.
#[derive(Clone, Default)]
pub struct RecordingKeyboard {
    actions: Arc<Mutex<Vec<KeyAction>>>,
    failing_on: Option<KeyCode>,
}

impl RecordingKeyboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Любое событие для `key` завершается ошибкой
    pub fn failing_on(key: KeyCode) -> Self {
        Self {
            failing_on: Some(key),
            ..Self::default()
        }
    }

    pub fn actions(&self) -> Vec<KeyAction> {
        self.actions.lock().clone()
    }

    fn record(&self, action: KeyAction, key: KeyCode) -> Result<()> {
        if self.failing_on == Some(key) {
            return Err(minimzd_error!(device_unavailable, "сбой записи {:?}", key));
        }
        self.actions.lock().push(action);
        Ok(())
    }
}

impl VirtualKeyboard for RecordingKeyboard {
    fn key_down(&self, key: KeyCode) -> Result<()> {
        self.record(KeyAction::Down(key), key)
    }

    fn key_up(&self, key: KeyCode) -> Result<()> {
        self.record(KeyAction::Up(key), key)
    }

    fn key_press(&self, key: KeyCode) -> Result<()> {
        self.record(KeyAction::Press(key), key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    List,
    Activate(u32),
    Minimize(u32),
    Close(u32),
}

#[derive(Default)]
struct Script {
    lists: VecDeque<Option<Vec<Window>>>,
    failing_action: Option<u32>,
    calls: Vec<Call>,
}

/// WindowDirectory со сценарием ответов на `List`.
///
/// Каждый вызов `List` берёт следующий ответ сценария; последний ответ повторяется
/// бесконечно. `None` в сценарии означает транспортную ошибку.
#[derive(Clone, Default)]
pub struct ScriptedDirectory {
    script: Arc<Mutex<Script>>,
}

impl ScriptedDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then_list(self, windows: Vec<Window>) -> Self {
        self.script.lock().lists.push_back(Some(windows));
        self
    }

    pub fn then_fail(self) -> Self {
        self.script.lock().lists.push_back(None);
        self
    }

    /// Activate/Minimize/Close для окна `id` завершаются ошибкой
    pub fn failing_action_on(self, id: u32) -> Self {
        self.script.lock().failing_action = Some(id);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.script.lock().calls.clone()
    }

    /// Все вызовы кроме `List`
    pub fn actions(&self) -> Vec<Call> {
        self.calls().into_iter().filter(|c| *c != Call::List).collect()
    }

    pub fn list_count(&self) -> usize {
        self.calls().iter().filter(|c| **c == Call::List).count()
    }

    fn transport_failure(method: &'static str) -> MinimzdError {
        MinimzdError::transport(method, zbus::Error::Failure("сценарий: сервис недоступен".to_string()))
    }

    fn act(&self, call: Call, id: u32, method: &'static str) -> Result<()> {
        let mut script = self.script.lock();
        script.calls.push(call);
        if script.failing_action == Some(id) {
            return Err(Self::transport_failure(method));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl WindowDirectory for ScriptedDirectory {
    async fn list(&self) -> Result<Vec<Window>> {
        let mut script = self.script.lock();
        script.calls.push(Call::List);

        let response = if script.lists.len() > 1 {
            script.lists.pop_front().flatten()
        } else {
            script.lists.front().cloned().unwrap_or(Some(Vec::new()))
        };

        response.ok_or_else(|| Self::transport_failure("List"))
    }

    async fn activate(&self, id: u32) -> Result<()> {
        self.act(Call::Activate(id), id, "Activate")
    }

    async fn minimize(&self, id: u32) -> Result<()> {
        self.act(Call::Minimize(id), id, "Minimize")
    }

    async fn close(&self, id: u32) -> Result<()> {
        self.act(Call::Close(id), id, "Close")
    }
}

/// Источник сочетаний с заранее заданными значениями; неизвестный ключ даёт ошибку
#[derive(Default)]
pub struct StaticKeybindSource {
    values: HashMap<String, Vec<String>>,
}

impl StaticKeybindSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, values: &[&str]) -> Self {
        self.values
            .insert(key.to_string(), values.iter().map(|v| v.to_string()).collect());
        self
    }
}

impl KeybindSource for StaticKeybindSource {
    fn get_strv(&self, key: &str) -> Result<Vec<String>> {
        self.values
            .get(key)
            .cloned()
            .ok_or_else(|| minimzd_error!(settings, "нет ключа {}", key))
    }
}

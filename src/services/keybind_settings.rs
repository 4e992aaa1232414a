use crate::error::Result;
use crate::minimzd_error;
use crate::types::Keybind;
use std::process::Command;
use tracing::{debug, info};

/// Схема GNOME с сочетаниями оконного менеджера
pub const KEYBINDINGS_SCHEMA: &str = "org.gnome.desktop.wm.keybindings";

/// Действие, для которого извлекается сочетание из настроек
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeybindAction {
    Minimize,
    Close,
}

impl KeybindAction {
    pub fn settings_key(self) -> &'static str {
        match self {
            KeybindAction::Minimize => "minimize",
            KeybindAction::Close => "close",
        }
    }
}

/// Хранилище настроек, отдающее массив строк по ключу
pub trait KeybindSource {
    fn get_strv(&self, key: &str) -> Result<Vec<String>>;
}

/// Чтение настроек через утилиту `gsettings`
pub struct GSettingsSource {
    schema: String,
}

impl Default for GSettingsSource {
    fn default() -> Self {
        Self {
            schema: KEYBINDINGS_SCHEMA.to_string(),
        }
    }
}

impl KeybindSource for GSettingsSource {
    fn get_strv(&self, key: &str) -> Result<Vec<String>> {
        debug!("gsettings get {} {}", self.schema, key);

        let output = Command::new("gsettings")
            .args(["get", &self.schema, key])
            .output()
            .map_err(|e| minimzd_error!(settings, "gsettings не найден: {}", e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(minimzd_error!(settings, "gsettings get {} {}: {}", self.schema, key, stderr.trim()));
        }

        parse_strv(&String::from_utf8_lossy(&output.stdout))
    }
}

/// Извлечь первое сочетание для действия. Пустой массив в настройках даёт `None`.
pub fn extract_keybind(source: &dyn KeybindSource, action: KeybindAction) -> Result<Option<Keybind>> {
    let keybinds = source.get_strv(action.settings_key())?;
    let keybind = keybinds.first().map(|s| Keybind::parse(s));

    match &keybind {
        Some(k) => info!("Сочетание для '{}' из настроек: {}", action.settings_key(), k),
        None => info!("В настройках нет сочетания для '{}'", action.settings_key()),
    }
    Ok(keybind)
}

/// Разобрать текстовое представление GVariant массива строк: `['<Super>h', '<Alt>F4']`, `@as []`.
pub fn parse_strv(text: &str) -> Result<Vec<String>> {
    let text = text.trim();
    let text = text.strip_prefix("@as").map(str::trim_start).unwrap_or(text);

    let inner = text
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .ok_or_else(|| minimzd_error!(settings, "ожидался массив строк, получено: {}", text))?;

    let mut items = Vec::new();
    let mut chars = inner.chars().peekable();

    loop {
        while chars.next_if(|c| c.is_whitespace() || *c == ',').is_some() {}

        let Some(quote) = chars.next() else {
            break;
        };
        if quote != '\'' && quote != '"' {
            return Err(minimzd_error!(settings, "ожидалась строка в кавычках: {}", text));
        }

        let mut item = String::new();
        let mut closed = false;
        while let Some(c) = chars.next() {
            match c {
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        item.push(escaped);
                    }
                }
                c if c == quote => {
                    closed = true;
                    break;
                }
                c => item.push(c),
            }
        }

        if !closed {
            return Err(minimzd_error!(settings, "незакрытая строка: {}", text));
        }
        items.push(item);
    }

    Ok(items)
}

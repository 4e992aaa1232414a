use evdev::KeyCode;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Преобразование имён клавиш в evdev коды.
///
/// Имена берутся в том виде, в каком их хранит GNOME (`<Super>`, `<Alt>`, `F4`, `Page_Up`),
/// а также в привычном для конфигурации виде (`super`, `pageup`). Поиск регистронезависимый.
pub struct KeyNameToCode;

// Порядок важен для обратного поиска: первое имя кода считается каноническим
const KEY_NAMES: &[(&str, KeyCode)] = &[
    // Модификаторы
    ("super", KeyCode::KEY_LEFTMETA),
    ("leftmeta", KeyCode::KEY_LEFTMETA),
    ("meta", KeyCode::KEY_LEFTMETA),
    ("alt", KeyCode::KEY_LEFTALT),
    ("leftalt", KeyCode::KEY_LEFTALT),
    ("control", KeyCode::KEY_LEFTCTRL),
    ("ctrl", KeyCode::KEY_LEFTCTRL),
    ("primary", KeyCode::KEY_LEFTCTRL),
    ("leftctrl", KeyCode::KEY_LEFTCTRL),
    ("shift", KeyCode::KEY_LEFTSHIFT),
    ("leftshift", KeyCode::KEY_LEFTSHIFT),

    // Буквенные клавиши
    ("a", KeyCode::KEY_A),
    ("b", KeyCode::KEY_B),
    ("c", KeyCode::KEY_C),
    ("d", KeyCode::KEY_D),
    ("e", KeyCode::KEY_E),
    ("f", KeyCode::KEY_F),
    ("g", KeyCode::KEY_G),
    ("h", KeyCode::KEY_H),
    ("i", KeyCode::KEY_I),
    ("j", KeyCode::KEY_J),
    ("k", KeyCode::KEY_K),
    ("l", KeyCode::KEY_L),
    ("m", KeyCode::KEY_M),
    ("n", KeyCode::KEY_N),
    ("o", KeyCode::KEY_O),
    ("p", KeyCode::KEY_P),
    ("q", KeyCode::KEY_Q),
    ("r", KeyCode::KEY_R),
    ("s", KeyCode::KEY_S),
    ("t", KeyCode::KEY_T),
    ("u", KeyCode::KEY_U),
    ("v", KeyCode::KEY_V),
    ("w", KeyCode::KEY_W),
    ("x", KeyCode::KEY_X),
    ("y", KeyCode::KEY_Y),
    ("z", KeyCode::KEY_Z),

    // Цифровые клавиши (верхний ряд)
    ("1", KeyCode::KEY_1),
    ("2", KeyCode::KEY_2),
    ("3", KeyCode::KEY_3),
    ("4", KeyCode::KEY_4),
    ("5", KeyCode::KEY_5),
    ("6", KeyCode::KEY_6),
    ("7", KeyCode::KEY_7),
    ("8", KeyCode::KEY_8),
    ("9", KeyCode::KEY_9),
    ("0", KeyCode::KEY_0),

    // Функциональные клавиши
    ("f1", KeyCode::KEY_F1),
    ("f2", KeyCode::KEY_F2),
    ("f3", KeyCode::KEY_F3),
    ("f4", KeyCode::KEY_F4),
    ("f5", KeyCode::KEY_F5),
    ("f6", KeyCode::KEY_F6),
    ("f7", KeyCode::KEY_F7),
    ("f8", KeyCode::KEY_F8),
    ("f9", KeyCode::KEY_F9),
    ("f10", KeyCode::KEY_F10),
    ("f11", KeyCode::KEY_F11),
    ("f12", KeyCode::KEY_F12),

    // Специальные клавиши
    ("space", KeyCode::KEY_SPACE),
    ("return", KeyCode::KEY_ENTER),
    ("enter", KeyCode::KEY_ENTER),
    ("escape", KeyCode::KEY_ESC),
    ("backspace", KeyCode::KEY_BACKSPACE),
    ("tab", KeyCode::KEY_TAB),
    ("print", KeyCode::KEY_SYSRQ),

    // Навигация/редакция
    ("home", KeyCode::KEY_HOME),
    ("end", KeyCode::KEY_END),
    ("page_up", KeyCode::KEY_PAGEUP),
    ("pageup", KeyCode::KEY_PAGEUP),
    ("page_down", KeyCode::KEY_PAGEDOWN),
    ("pagedown", KeyCode::KEY_PAGEDOWN),
    ("insert", KeyCode::KEY_INSERT),
    ("delete", KeyCode::KEY_DELETE),
    ("up", KeyCode::KEY_UP),
    ("down", KeyCode::KEY_DOWN),
    ("left", KeyCode::KEY_LEFT),
    ("right", KeyCode::KEY_RIGHT),

    // Знаки пунктуации
    ("minus", KeyCode::KEY_MINUS),
    ("equal", KeyCode::KEY_EQUAL),
    ("leftbrace", KeyCode::KEY_LEFTBRACE),
    ("bracketleft", KeyCode::KEY_LEFTBRACE),
    ("rightbrace", KeyCode::KEY_RIGHTBRACE),
    ("bracketright", KeyCode::KEY_RIGHTBRACE),
    ("semicolon", KeyCode::KEY_SEMICOLON),
    ("apostrophe", KeyCode::KEY_APOSTROPHE),
    ("grave", KeyCode::KEY_GRAVE),
    ("backslash", KeyCode::KEY_BACKSLASH),
    ("comma", KeyCode::KEY_COMMA),
    ("period", KeyCode::KEY_DOT),
    ("dot", KeyCode::KEY_DOT),
    ("slash", KeyCode::KEY_SLASH),

    // Numpad
    ("kp_multiply", KeyCode::KEY_KPASTERISK),
    ("kp_subtract", KeyCode::KEY_KPMINUS),
    ("kp_add", KeyCode::KEY_KPPLUS),
    ("kp_divide", KeyCode::KEY_KPSLASH),

    // Мультимедиа
    ("audiomute", KeyCode::KEY_MUTE),
    ("audiolowervolume", KeyCode::KEY_VOLUMEDOWN),
    ("audioraisevolume", KeyCode::KEY_VOLUMEUP),
    ("calculator", KeyCode::KEY_CALC),
];

static KEY_NAME_TO_CODE: Lazy<HashMap<&'static str, KeyCode>> =
    Lazy::new(|| KEY_NAMES.iter().copied().collect());

static CODE_TO_KEY_NAME: Lazy<HashMap<KeyCode, &'static str>> = Lazy::new(|| {
    let mut map = HashMap::new();
    for &(name, code) in KEY_NAMES {
        map.entry(code).or_insert(name);
    }
    map
});

impl KeyNameToCode {
    /// Получить код клавиши по имени.
    ///
    /// Неизвестное имя молча превращается в `KEY_RESERVED` (код 0): строгая проверка,
    /// если она нужна, остаётся на вызывающей стороне через [`KeyNameToCode::is_known`].
    pub fn translate(key_name: &str) -> KeyCode {
        KEY_NAME_TO_CODE
            .get(Self::normalize(key_name).as_str())
            .copied()
            .unwrap_or(KeyCode::KEY_RESERVED)
    }

    pub fn is_known(key_name: &str) -> bool {
        KEY_NAME_TO_CODE.contains_key(Self::normalize(key_name).as_str())
    }

    /// Получить каноническое имя клавиши по коду
    pub fn reverse_translate(code: KeyCode) -> Option<&'static str> {
        CODE_TO_KEY_NAME.get(&code).copied()
    }

    fn normalize(key_name: &str) -> String {
        let lower = key_name.trim().to_lowercase();
        // Мультимедийные клавиши GNOME хранит с префиксом XF86
        match lower.strip_prefix("xf86") {
            Some(rest) => rest.to_string(),
            None => lower,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_key_mapping() {
        assert_eq!(KeyNameToCode::translate("h"), KeyCode::KEY_H);
        assert_eq!(KeyNameToCode::translate("f4"), KeyCode::KEY_F4);
        assert_eq!(KeyNameToCode::translate("super"), KeyCode::KEY_LEFTMETA);
        assert_eq!(KeyNameToCode::translate("space").code(), 57);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(KeyNameToCode::translate("Super"), KeyCode::KEY_LEFTMETA);
        assert_eq!(KeyNameToCode::translate("LEFTMETA"), KeyCode::KEY_LEFTMETA);
        assert_eq!(KeyNameToCode::translate("Page_Up"), KeyCode::KEY_PAGEUP);
        assert_eq!(KeyNameToCode::translate("Alt"), KeyCode::KEY_LEFTALT);
    }

    #[test]
    fn test_xf86_prefix() {
        assert_eq!(KeyNameToCode::translate("XF86AudioMute"), KeyCode::KEY_MUTE);
        assert_eq!(KeyNameToCode::translate("XF86Calculator"), KeyCode::KEY_CALC);
    }

    #[test]
    fn test_unknown_key_is_unmapped() {
        assert_eq!(KeyNameToCode::translate("hyper_launch"), KeyCode::KEY_RESERVED);
        assert_eq!(KeyNameToCode::translate("").code(), 0);
        assert!(!KeyNameToCode::is_known("hyper_launch"));
        assert!(KeyNameToCode::is_known("Primary"));
    }

    #[test]
    fn test_reverse_mapping_uses_canonical_name() {
        assert_eq!(KeyNameToCode::reverse_translate(KeyCode::KEY_LEFTMETA), Some("super"));
        assert_eq!(KeyNameToCode::reverse_translate(KeyCode::KEY_LEFTCTRL), Some("control"));
        assert_eq!(KeyNameToCode::reverse_translate(KeyCode::KEY_ENTER), Some("return"));
        assert_eq!(KeyNameToCode::reverse_translate(KeyCode::KEY_RESERVED), None);
    }
}

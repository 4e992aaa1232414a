use crate::mappings::KeyNameToCode;
use evdev::KeyCode;
use smallvec::SmallVec;
use std::fmt;
use tracing::warn;

/// Сочетание клавиш: упорядоченный список кодов, последний код нажимается, остальные удерживаются.
///
/// Пустое сочетание допустимо и означает "ничего не нажимать".
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Keybind(SmallVec<[KeyCode; 4]>);

impl Keybind {
    pub fn new(codes: impl IntoIterator<Item = KeyCode>) -> Self {
        Self(codes.into_iter().collect())
    }

    /// Сочетание по умолчанию для сворачивания (Super+H)
    pub fn default_minimize() -> Self {
        Self::new([KeyCode::KEY_LEFTMETA, KeyCode::KEY_H])
    }

    /// Сочетание по умолчанию для закрытия (Alt+F4)
    pub fn default_close() -> Self {
        Self::new([KeyCode::KEY_LEFTALT, KeyCode::KEY_F4])
    }

    /// Разобрать строку вида `<Super><H>` или `<Alt>F4`.
    /// Неизвестные имена превращаются в код 0 без ошибки (с предупреждением в лог).
    pub fn parse(keybind_string: &str) -> Self {
        Self::new(split_keybind_string(keybind_string).into_iter().map(|name| {
            if !KeyNameToCode::is_known(name) {
                warn!("Неизвестная клавиша '{}' в сочетании {}", name, keybind_string);
            }
            KeyNameToCode::translate(name)
        }))
    }

    pub fn codes(&self) -> &[KeyCode] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Разбить строку сочетания на имена клавиш: `<` и `>` служат разделителями,
/// пустые фрагменты между ними отбрасываются.
pub fn split_keybind_string(keybind_string: &str) -> Vec<&str> {
    keybind_string
        .split(['<', '>'])
        .filter(|token| !token.is_empty())
        .collect()
}

impl fmt::Display for Keybind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "<none>");
        }
        for code in &self.0 {
            match KeyNameToCode::reverse_translate(*code) {
                Some(name) => write!(f, "<{}>", name)?,
                None => write!(f, "<{}>", code.code())?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_keybind_string() {
        assert_eq!(split_keybind_string("<Leftmeta><H>"), vec!["Leftmeta", "H"]);
        assert_eq!(split_keybind_string("<Alt>F4"), vec!["Alt", "F4"]);
        assert_eq!(split_keybind_string("<Primary><Alt>Delete"), vec!["Primary", "Alt", "Delete"]);
        assert!(split_keybind_string("").is_empty());
        assert!(split_keybind_string("<><>").is_empty());
    }

    #[test]
    fn test_parse_keybind() {
        assert_eq!(Keybind::parse("<Super>h"), Keybind::default_minimize());
        assert_eq!(Keybind::parse("<Alt>F4"), Keybind::default_close());
        assert!(Keybind::parse("").is_empty());
    }

    #[test]
    fn test_parse_unknown_key_keeps_position() {
        let keybind = Keybind::parse("<Super><Unknownkey>");
        assert_eq!(keybind.codes(), &[KeyCode::KEY_LEFTMETA, KeyCode::KEY_RESERVED]);
    }

    #[test]
    fn test_display() {
        assert_eq!(Keybind::default_close().to_string(), "<alt><f4>");
        assert_eq!(Keybind::default().to_string(), "<none>");
    }
}

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Снимок окна, как его отдаёт метод `List` расширения GNOME Shell.
///
/// Запись неизменяема: на каждом тике опроса список окон запрашивается заново.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Window {
    pub in_current_workspace: bool,
    #[serde(rename = "wm_class", deserialize_with = "nullable_string")]
    pub class: String,
    #[serde(rename = "wm_class_instance", deserialize_with = "nullable_string")]
    pub class_instance: String,
    pub pid: i32,
    pub id: u32,
    pub frame_type: i32,
    pub window_type: i32,
    pub focus: bool,
}

// Расширение отдаёт null для окон без WM_CLASS
fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl Window {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            in_current_workspace: true,
            ..Self::default()
        }
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = class.into();
        self
    }

    pub fn with_class_instance(mut self, class_instance: impl Into<String>) -> Self {
        self.class_instance = class_instance.into();
        self
    }

    pub fn with_pid(mut self, pid: i32) -> Self {
        self.pid = pid;
        self
    }

    pub fn with_focus(mut self, focus: bool) -> Self {
        self.focus = focus;
        self
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} \"{}\" ({}, pid {})", self.id, self.class, self.class_instance, self.pid)?;
        if self.focus {
            write!(f, " [focus]")?;
        }
        Ok(())
    }
}

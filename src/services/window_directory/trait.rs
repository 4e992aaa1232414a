use crate::error::Result;
use crate::types::Window;

/// Источник списка окон и исполнитель действий над ними
#[async_trait::async_trait]
pub trait WindowDirectory: Send + Sync {
    /// Запросить актуальный список окон
    async fn list(&self) -> Result<Vec<Window>>;

    /// Активировать (развернуть и передать фокус) окно
    async fn activate(&self, id: u32) -> Result<()>;

    async fn minimize(&self, id: u32) -> Result<()>;

    async fn close(&self, id: u32) -> Result<()>;

    /// Освободить соединение
    async fn disconnect(self: Box<Self>) {}
}

/// Factory function to create an appropriate window directory based on the dry_run flag
pub async fn create_window_directory(dry_run: bool) -> Result<Box<dyn WindowDirectory>> {
    if dry_run {
        Ok(Box::new(super::dry_run::DryRunDirectory::with_fake_windows()))
    } else {
        Ok(Box::new(
            super::shell_extension::ShellExtensionDirectory::connect().await?,
        ))
    }
}

/// Разобрать JSON ответа `List`
pub fn parse_window_list(payload: &str) -> Result<Vec<Window>> {
    Ok(serde_json::from_str(payload)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MinimzdError;

    #[test]
    fn test_parse_window_list() {
        let windows = parse_window_list(r#"[{"id": 1, "wm_class": "Steam", "focus": true}]"#).unwrap();
        let expected = Window {
            id: 1,
            class: "Steam".to_string(),
            focus: true,
            ..Window::default()
        };
        assert_eq!(windows, vec![expected]);
    }

    #[test]
    fn test_malformed_payload_is_distinct_error() {
        let err = parse_window_list("not json").unwrap_err();
        assert!(matches!(err, MinimzdError::MalformedResponse(_)));

        let err = parse_window_list(r#"{"id": 1}"#).unwrap_err();
        assert!(matches!(err, MinimzdError::MalformedResponse(_)));
    }
}

use crate::error::Result;
use crate::minimzd_error;
use std::fs::OpenOptions;
use std::path::Path;
use tracing::{info, warn};

pub const UINPUT_DEVICE: &str = "/dev/uinput";

/// Проверить, что виртуальную клавиатуру можно создать.
///
/// Нужна только в режиме сочетаний клавиш; без доступа к uinput этот режим невозможен.
pub fn check_uinput_access() -> Result<()> {
    info!("Проверка доступа к {}...", UINPUT_DEVICE);
    check_device_access(Path::new(UINPUT_DEVICE))?;
    check_not_root();
    info!("Доступ к {} подтвержден", UINPUT_DEVICE);
    Ok(())
}

fn check_device_access(device: &Path) -> Result<()> {
    if !device.exists() {
        return Err(minimzd_error!(
            permission,
            "{} не существует, возможно модуль uinput не загружен (sudo modprobe uinput)",
            device.display()
        ));
    }

    OpenOptions::new().write(true).open(device).map_err(|e| {
        minimzd_error!(
            permission,
            "нет доступа на запись к {}: {}. Добавьте пользователя в группу 'input' или 'uinput'",
            device.display(),
            e
        )
    })?;

    Ok(())
}

fn check_not_root() {
    if let Ok(user) = std::env::var("USER") {
        if user == "root" {
            warn!("⚠️  Приложение запущено от имени root!");
            for line in get_setup_commands() {
                warn!("   {}", line);
            }
        }
    }
}

/// Команды для настройки доступа к uinput без root
pub fn get_setup_commands() -> Vec<String> {
    vec![
        "sudo usermod -a -G input $USER".to_string(),
        "sudo modprobe uinput".to_string(),
        "echo 'uinput' | sudo tee /etc/modules-load.d/uinput.conf".to_string(),
        "(затем перезайдите в систему)".to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MinimzdError;

    #[test]
    fn test_setup_commands() {
        let commands = get_setup_commands();
        assert!(commands.iter().any(|cmd| cmd.contains("usermod")));
        assert!(commands.iter().any(|cmd| cmd.contains("modprobe")));
    }

    #[test]
    fn test_missing_device_is_permission_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = check_device_access(&dir.path().join("uinput")).unwrap_err();
        assert!(matches!(err, MinimzdError::Permission(_)));
    }

    #[test]
    fn test_writable_device_passes() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(check_device_access(file.path()).is_ok());
    }
}

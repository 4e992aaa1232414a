use crate::error::{MinimzdError, Result};
use crate::mappings::KeyNameToCode;
use crate::minimzd_error;
use evdev::{EventType, KeyCode};
use parking_lot::Mutex;
use tracing::{debug, info};

/// Виртуальная клавиатура, через которую воспроизводятся сочетания клавиш.
pub trait VirtualKeyboard: Send + Sync {
    fn key_down(&self, key: KeyCode) -> Result<()>;
    fn key_up(&self, key: KeyCode) -> Result<()>;

    /// Нажатие с отпусканием
    fn key_press(&self, key: KeyCode) -> Result<()> {
        self.key_down(key)?;
        self.key_up(key)
    }
}

/// Фабрика: uinput устройство или заглушка для сухого запуска
pub fn create_virtual_keyboard(device_name: &str, dry_run: bool) -> Result<Box<dyn VirtualKeyboard>> {
    if dry_run {
        Ok(Box::new(DryRunKeyboard))
    } else {
        Ok(Box::new(UinputKeyboard::open(device_name)?))
    }
}

/// Клавиатура на базе /dev/uinput. Устройство удаляется из системы при drop.
pub struct UinputKeyboard {
    device: Mutex<uinput::Device>,
    device_name: String,
}

impl UinputKeyboard {
    pub fn open(device_name: &str) -> Result<Self> {
        info!("Создание виртуального устройства uinput '{}' для инъекции клавиш", device_name);

        let unavailable = |e: uinput::Error| {
            minimzd_error!(device_unavailable, "не удалось создать '{}': {}", device_name, e)
        };

        let device = uinput::default()
            .map_err(unavailable)?
            .name(device_name)
            .map_err(unavailable)?
            .event(uinput::event::Keyboard::All)
            .map_err(unavailable)?
            .create()
            .map_err(unavailable)?;

        info!("Виртуальное устройство '{}' создано успешно", device_name);
        Ok(Self {
            device: Mutex::new(device),
            device_name: device_name.to_string(),
        })
    }

    fn send(&self, key: KeyCode, value: i32) -> Result<()> {
        let mut device = self.device.lock();
        device
            .write(EventType::KEY.0 as i32, key.code() as i32, value)
            .map_err(MinimzdError::Uinput)?;
        device.synchronize().map_err(MinimzdError::Uinput)?;
        Ok(())
    }
}

impl VirtualKeyboard for UinputKeyboard {
    fn key_down(&self, key: KeyCode) -> Result<()> {
        debug!("KeyDown {:?}", KeyNameToCode::reverse_translate(key).unwrap_or("?"));
        self.send(key, 1)
    }

    fn key_up(&self, key: KeyCode) -> Result<()> {
        debug!("KeyUp {:?}", KeyNameToCode::reverse_translate(key).unwrap_or("?"));
        self.send(key, 0)
    }
}

impl Drop for UinputKeyboard {
    fn drop(&mut self) {
        info!("Закрытие виртуального устройства '{}'", self.device_name);
    }
}

/// Клавиатура сухого запуска: только логирует события
pub struct DryRunKeyboard;

impl VirtualKeyboard for DryRunKeyboard {
    fn key_down(&self, key: KeyCode) -> Result<()> {
        info!("[DRY RUN] KeyDown {}", KeyNameToCode::reverse_translate(key).unwrap_or("?"));
        Ok(())
    }

    fn key_up(&self, key: KeyCode) -> Result<()> {
        info!("[DRY RUN] KeyUp {}", KeyNameToCode::reverse_translate(key).unwrap_or("?"));
        Ok(())
    }
}

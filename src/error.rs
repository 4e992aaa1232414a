use crate::types::Window;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MinimzdError {
    #[error("Ошибка конфигурации: {0}")]
    Config(#[from] anyhow::Error),

    #[error("Ошибка ввода-вывода: {0}")]
    Io(#[from] std::io::Error),

    #[error("Ошибка uinput: {0}")]
    Uinput(#[from] uinput::Error),

    #[error("Не удалось подключиться к сессионной шине D-Bus: {0}")]
    Connect(#[source] zbus::Error),

    #[error("Не удалось вызвать метод {method}, убедитесь, что расширение GNOME \"Window Calls\" установлено и включено: {source}")]
    Transport {
        method: &'static str,
        #[source]
        source: zbus::Error,
    },

    #[error("Некорректный JSON в ответе List: {0}")]
    MalformedResponse(#[from] serde_json::Error),

    #[error("Неожиданный ответ D-Bus: {0}")]
    UnexpectedReply(String),

    #[error("Виртуальная клавиатура недоступна: {0}")]
    DeviceUnavailable(String),

    #[error("Не удалось получить сочетание клавиш из настроек: {0}")]
    Settings(String),

    #[error("Не удалось запустить команду: {0}")]
    Launch(String),

    #[error("Недостаточно прав доступа: {0}")]
    Permission(String),
}

impl MinimzdError {
    pub fn transport(method: &'static str, source: zbus::Error) -> Self {
        MinimzdError::Transport { method, source }
    }
}

pub type Result<T> = std::result::Result<T, MinimzdError>;

/// Фатальная ошибка операции над несколькими окнами.
///
/// `acted` содержит окна, обработанные до ошибки: уже выполненные действия не откатываются.
#[derive(Error, Debug)]
#[error("{source} (успешно обработано окон до ошибки: {})", .acted.len())]
pub struct Interrupted {
    pub acted: Vec<Window>,
    #[source]
    pub source: MinimzdError,
}

impl Interrupted {
    pub fn new(acted: Vec<Window>, source: MinimzdError) -> Self {
        Self { acted, source }
    }
}

impl From<MinimzdError> for Interrupted {
    fn from(source: MinimzdError) -> Self {
        Self::new(Vec::new(), source)
    }
}

impl From<Interrupted> for MinimzdError {
    fn from(interrupted: Interrupted) -> Self {
        interrupted.source
    }
}

pub type ActionResult<T> = std::result::Result<T, Interrupted>;

// Удобные макросы для создания ошибок
#[macro_export]
macro_rules! minimzd_error {
    (device_unavailable, $($arg:tt)*) => {
        $crate::error::MinimzdError::DeviceUnavailable(format!($($arg)*))
    };
    (permission, $($arg:tt)*) => {
        $crate::error::MinimzdError::Permission(format!($($arg)*))
    };
    (settings, $($arg:tt)*) => {
        $crate::error::MinimzdError::Settings(format!($($arg)*))
    };
    (launch, $($arg:tt)*) => {
        $crate::error::MinimzdError::Launch(format!($($arg)*))
    };
}

//! WindowManipulator: поиск окон опросом и действия над ними
//!
//! Четыре независимых переключателя контекста (закрыть/свернуть, прямой вызов/сочетание
//! клавиш, проверка/доверие, первое совпадение/все до таймаута) сводятся здесь к одному
//! протоколу действия и проверки. Все внешние эффекты идут через WindowDirectory и
//! VirtualKeyboard.

use crate::config::Config;
use crate::debug_if_enabled;
use crate::error::{ActionResult, Interrupted, Result};
use crate::minimzd_error;
use crate::services::key_sequencer::use_keybind;
use crate::services::keybind_settings::{extract_keybind, KeybindAction, KeybindSource};
use crate::services::poll_schedule::{PollSchedule, Wake};
use crate::services::virtual_device::{create_virtual_keyboard, VirtualKeyboard};
use crate::services::window_directory::{create_window_directory, WindowDirectory};
use crate::types::{Context, Keybind, Window};
use once_cell::sync::OnceCell;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub struct WindowManipulator {
    directory: Box<dyn WindowDirectory>,
    keyboard: Option<Box<dyn VirtualKeyboard>>,
    // Заполняются не более одного раза за запуск, только на этапе настройки
    minimize_keybind: OnceCell<Keybind>,
    close_keybind: OnceCell<Keybind>,
    fallback_minimize: Keybind,
    fallback_close: Keybind,
    poll_interval: Duration,
    default_timeout: Duration,
}

impl WindowManipulator {
    pub fn new(directory: Box<dyn WindowDirectory>, keyboard: Option<Box<dyn VirtualKeyboard>>) -> Self {
        Self {
            directory,
            keyboard,
            minimize_keybind: OnceCell::new(),
            close_keybind: OnceCell::new(),
            fallback_minimize: Keybind::default_minimize(),
            fallback_close: Keybind::default_close(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            default_timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Подключиться к GNOME Shell и, в режиме сочетаний клавиш, открыть виртуальную клавиатуру
    pub async fn connect(config: &Config, context: &Context) -> Result<Self> {
        let directory = create_window_directory(context.dry_run).await?;

        let keyboard = if context.keybind {
            Some(create_virtual_keyboard(&config.keybind.device_name, context.dry_run)?)
        } else {
            None
        };

        Ok(Self::new(directory, keyboard)
            .with_poll_interval(Duration::from_millis(config.window.poll_interval_ms))
            .with_default_timeout(Duration::from_millis(config.window.default_timeout_ms))
            .with_fallback_keybinds(
                Keybind::parse(&config.keybind.minimize),
                Keybind::parse(&config.keybind.close),
            ))
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn with_default_timeout(mut self, default_timeout: Duration) -> Self {
        self.default_timeout = default_timeout;
        self
    }

    pub fn with_fallback_keybinds(mut self, minimize: Keybind, close: Keybind) -> Self {
        self.fallback_minimize = minimize;
        self.fallback_close = close;
        self
    }

    /// Прочитать сочетания из настроек. Повторный вызов ничего не меняет;
    /// пустой массив в настройках оставляет сочетание по умолчанию.
    pub fn extract_keybinds(&self, source: &dyn KeybindSource) -> Result<()> {
        if self.minimize_keybind.get().is_none() {
            if let Some(keybind) = extract_keybind(source, KeybindAction::Minimize)? {
                let _ = self.minimize_keybind.set(keybind);
            }
        }
        if self.close_keybind.get().is_none() {
            if let Some(keybind) = extract_keybind(source, KeybindAction::Close)? {
                let _ = self.close_keybind.set(keybind);
            }
        }
        Ok(())
    }

    pub fn minimize_keybind(&self) -> &Keybind {
        self.minimize_keybind.get().unwrap_or(&self.fallback_minimize)
    }

    pub fn close_keybind(&self) -> &Keybind {
        self.close_keybind.get().unwrap_or(&self.fallback_close)
    }

    pub async fn list(&self) -> Result<Vec<Window>> {
        self.directory.list().await
    }

    /// Свернуть или закрыть одно окно.
    ///
    /// Возвращает `false`, если окно пропущено (сочетание клавиш, окно не в фокусе)
    /// или проверка показала, что действие не сработало.
    pub async fn minimize(&self, context: &Context, window: &Window) -> Result<bool> {
        // Сочетание сработает на окне в фокусе, каким бы оно ни было
        if context.keybind && !window.focus {
            debug_if_enabled!("Окно {} не в фокусе, сочетание клавиш не применяется", window);
            return Ok(false);
        }

        let keybind = match (context.close_window, context.keybind) {
            (false, false) => {
                self.directory.minimize(window.id).await?;
                None
            }
            (false, true) => Some(self.minimize_keybind()),
            (true, false) => {
                self.directory.close(window.id).await?;
                None
            }
            (true, true) => Some(self.close_keybind()),
        };

        if let Some(keybind) = keybind {
            self.directory.activate(window.id).await?;
            self.press_keybind(keybind)?;
        }

        let action = if context.close_window { "Закрыто" } else { "Свёрнуто" };
        info!("{} окно {}", action, window);

        if !context.verify {
            return Ok(true);
        }
        Ok(self.verify(context, window).await)
    }

    fn press_keybind(&self, keybind: &Keybind) -> Result<()> {
        let keyboard = self
            .keyboard
            .as_deref()
            .ok_or_else(|| minimzd_error!(device_unavailable, "клавиатура не подключена"))?;

        debug!("Воспроизведение сочетания {}", keybind);
        use_keybind(keyboard, keybind)
    }

    /// Проверка наудачу: ошибка повторного запроса списка не прерывает операцию,
    /// а даёт отрицательный результат.
    async fn verify(&self, context: &Context, window: &Window) -> bool {
        let windows = match self.directory.list().await {
            Ok(windows) => windows,
            Err(e) => {
                warn!("Не удалось проверить окно {}: {}", window, e);
                return false;
            }
        };

        let success = match windows.iter().find(|w| w.id == window.id) {
            Some(_) => !(context.close_window || window.focus),
            None => true,
        };

        if !success {
            warn!("Проверка: окно {} всё ещё на месте", window);
        }
        success
    }

    /// Действие над окном либо, если условие `skip` выполнено, только его активация
    async fn act_or_activate(&self, context: &Context, window: &Window, skip: bool) -> Result<bool> {
        if skip {
            debug_if_enabled!("Окно {} пропущено, выполняется только активация", window);
            self.directory.activate(window.id).await?;
            return Ok(false);
        }
        self.minimize(context, window).await
    }

    async fn windows_or_list(&self, windows: Option<Vec<Window>>) -> Result<Vec<Window>> {
        match windows {
            Some(windows) => Ok(windows),
            None => self.directory.list().await,
        }
    }

    /// Обработать окна: не в фокусе при закрытии только активируются, остальные сворачиваются.
    /// Без `windows` обрабатывается актуальный список.
    pub async fn minimize_focused(&self, context: &Context, windows: Option<Vec<Window>>) -> ActionResult<Vec<Window>> {
        let windows = self.windows_or_list(windows).await?;
        self.minimize_each(context, windows, |w| !w.focus && context.close_window)
            .await
    }

    /// Обработать все окна: в режиме сочетаний окна не в фокусе только активируются.
    pub async fn minimize_all(&self, context: &Context, windows: Option<Vec<Window>>) -> ActionResult<Vec<Window>> {
        let windows = self.windows_or_list(windows).await?;
        self.minimize_each(context, windows, |w| !w.focus && context.keybind)
            .await
    }

    async fn minimize_each<S>(&self, context: &Context, windows: Vec<Window>, skip: S) -> ActionResult<Vec<Window>>
    where
        S: Fn(&Window) -> bool,
    {
        let mut minimized = Vec::new();
        for window in windows {
            match self.act_or_activate(context, &window, skip(&window)).await {
                Ok(true) => minimized.push(window),
                Ok(false) => {}
                Err(e) => return Err(Interrupted::new(minimized, e)),
            }
        }
        Ok(minimized)
    }

    /// Опрашивать список окон до таймаута, обрабатывая каждое совпадение.
    ///
    /// Таймаут - нормальное завершение. Фатальная ошибка на тике прерывает цикл и
    /// возвращается вместе с окнами, обработанными до неё. Окно попадает в результат
    /// один раз, сколько бы тиков оно ни совпадало.
    pub async fn minimize_match<M>(&self, context: &Context, matcher: M) -> ActionResult<Vec<Window>>
    where
        M: Fn(&Window) -> bool,
    {
        let timeout = context.timeout.resolve(self.default_timeout);
        let mut schedule = PollSchedule::new(self.poll_interval, timeout);
        let mut minimized: Vec<Window> = Vec::new();

        info!("Поиск окон (таймаут: {})", describe_timeout(timeout));

        loop {
            if schedule.next().await == Wake::Deadline {
                info!("Таймаут поиска, обработано окон: {}", minimized.len());
                return Ok(minimized);
            }

            let windows = match self.directory.list().await {
                Ok(windows) => windows,
                Err(e) => return Err(Interrupted::new(minimized, e)),
            };

            for window in windows.into_iter().filter(|w| matcher(w)) {
                let skip = !window.focus && context.keybind;
                match self.act_or_activate(context, &window, skip).await {
                    Ok(true) => {
                        if !minimized.iter().any(|w| w.id == window.id) {
                            minimized.push(window);
                        }
                    }
                    Ok(false) => {}
                    Err(e) => return Err(Interrupted::new(minimized, e)),
                }
            }
        }
    }

    /// Опрашивать список окон до первого успешно обработанного совпадения.
    /// `None` означает, что таймаут наступил раньше.
    pub async fn minimize_first_match<M>(&self, context: &Context, matcher: M) -> Result<Option<Window>>
    where
        M: Fn(&Window) -> bool,
    {
        let timeout = context.timeout.resolve(self.default_timeout);
        let mut schedule = PollSchedule::new(self.poll_interval, timeout);

        info!("Поиск первого окна (таймаут: {})", describe_timeout(timeout));

        loop {
            if schedule.next().await == Wake::Deadline {
                info!("Таймаут поиска, окно не найдено");
                return Ok(None);
            }

            let windows = self.directory.list().await?;
            for window in windows.into_iter().filter(|w| matcher(w)) {
                let skip = !window.focus && context.keybind;
                if self.act_or_activate(context, &window, skip).await? {
                    return Ok(Some(window));
                }
            }
        }
    }

    /// Вернуть окно из свёрнутого состояния
    pub async fn unminimize(&self, window: &Window) -> Result<()> {
        info!("Восстановление окна {}", window);
        self.directory.activate(window.id).await
    }

    pub async fn unminimize_all(&self, windows: Option<Vec<Window>>) -> ActionResult<Vec<Window>> {
        let windows = self.windows_or_list(windows).await?;

        let mut unminimized = Vec::new();
        for window in windows {
            if let Err(e) = self.unminimize(&window).await {
                return Err(Interrupted::new(unminimized, e));
            }
            unminimized.push(window);
        }
        Ok(unminimized)
    }

    /// Закрыть соединение и освободить виртуальную клавиатуру
    pub async fn close(self) {
        if let Some(keyboard) = self.keyboard {
            drop(keyboard);
            debug!("Виртуальная клавиатура освобождена");
        }
        self.directory.disconnect().await;
        info!("WindowManipulator завершил работу");
    }
}

fn describe_timeout(timeout: Option<Duration>) -> String {
    match timeout {
        Some(duration) => format!("{}мс", duration.as_millis()),
        None => "без ограничения".to_string(),
    }
}

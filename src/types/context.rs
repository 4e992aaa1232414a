use std::time::Duration;

/// Ограничение времени на поиск окна.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Timeout {
    /// Значение из конфигурации (10 секунд по умолчанию)
    #[default]
    Default,
    After(Duration),
    /// Без ограничения: цикл завершается только совпадением или фатальной ошибкой
    Unbounded,
}

impl Timeout {
    /// Ноль означает таймаут по умолчанию, отрицательное значение снимает ограничение.
    pub fn from_millis(millis: i64) -> Self {
        match millis {
            0 => Timeout::Default,
            m if m < 0 => Timeout::Unbounded,
            m => Timeout::After(Duration::from_millis(m as u64)),
        }
    }

    /// Разобрать значение `--timeout`: `0`, `-1`, `1500ms`, `10s`, `2m`, `1h`.
    /// Число без суффикса трактуется как секунды.
    pub fn parse(value: &str) -> Result<Self, String> {
        let value = value.trim();
        if value.is_empty() {
            return Err("пустое значение таймаута".to_string());
        }
        if value.starts_with('-') {
            return Ok(Timeout::Unbounded);
        }

        let split = value
            .find(|c: char| !c.is_ascii_digit() && c != '.')
            .unwrap_or(value.len());
        let (number, unit) = value.split_at(split);
        let number: f64 = number
            .parse()
            .map_err(|_| format!("некорректный таймаут: {}", value))?;

        let millis = match unit {
            "ms" => number,
            "" | "s" => number * 1_000.0,
            "m" => number * 60_000.0,
            "h" => number * 3_600_000.0,
            _ => return Err(format!("неизвестная единица времени '{}' в таймауте {}", unit, value)),
        };

        Ok(Self::from_millis(millis.round() as i64))
    }

    /// Итоговая длительность: `None` означает отсутствие ограничения.
    pub fn resolve(self, default: Duration) -> Option<Duration> {
        match self {
            Timeout::Default => Some(default),
            Timeout::After(duration) if duration.is_zero() => Some(default),
            Timeout::After(duration) => Some(duration),
            Timeout::Unbounded => None,
        }
    }
}

/// Параметры одного запуска. Собираются один раз из аргументов командной строки
/// и передаются по ссылке во все операции над окнами.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Context {
    pub first: bool,
    pub verify: bool,
    pub close_window: bool,
    pub keybind: bool,
    pub extract_keybind: bool,
    pub match_pid: bool,
    pub match_process_name: bool,
    pub list: bool,
    pub background: bool,
    pub dry_run: bool,
    pub pid: i32,
    pub process_name: Option<String>,
    pub window_class_instance: Option<String>,
    pub window_class: Option<String>,
    pub timeout: Timeout,
    pub command: Option<String>,
    pub command_args: Vec<String>,
}

impl Context {
    /// Разбить строку команды на программу и аргументы и подставить имя программы
    /// в незаданные идентификаторы окна.
    pub fn with_command_line(mut self, command_line: Option<&str>) -> Self {
        let mut parts = command_line
            .unwrap_or_default()
            .split(' ')
            .filter(|part| !part.is_empty())
            .map(str::to_string);

        self.command = parts.next();
        self.command_args = parts.collect();

        if let Some(command) = &self.command {
            self.process_name.get_or_insert_with(|| command.clone());
            self.window_class_instance.get_or_insert_with(|| command.clone());
            self.window_class.get_or_insert_with(|| command.clone());
        }
        self
    }

    /// Контекст для прямого сворачивания без сочетаний клавиш и проверки:
    /// используется для временного сворачивания окна в фокусе вокруг основного поиска.
    pub fn direct_minimize(&self) -> Self {
        Self {
            close_window: false,
            keybind: false,
            verify: false,
            ..self.clone()
        }
    }
}

use anyhow::{Context as _, Result};
use clap::Parser;
use tracing::{info, warn};

mod config;
mod error;
pub mod mappings;
mod services;
mod types;
mod utils;

use config::{Config, DEFAULT_CONFIG_PATH};
use services::{GSettingsSource, LaunchedCommand, WindowManipulator, WindowMatcher};
use types::{Context, Timeout, Window};

#[derive(Parser, Debug)]
#[command(name = "minimzd")]
#[command(about = "Запускает программу и сворачивает (или закрывает) её окно, как только оно появится")]
struct Args {
    /// Команда для запуска; строка делится по пробелам на программу и аргументы
    command: Option<String>,

    /// Остановиться после первого обработанного окна
    #[arg(short = 'F', long)]
    first: bool,

    /// Проверять, что окно действительно свёрнуто или закрыто
    #[arg(short = 'V', long)]
    verify: bool,

    /// Закрывать окна вместо сворачивания
    #[arg(short = 'x', long)]
    close_window: bool,

    /// Действовать сочетанием клавиш через виртуальную клавиатуру, а не вызовом D-Bus
    #[arg(short = 'k', long)]
    keybind: bool,

    /// Взять сочетания клавиш из настроек GNOME
    #[arg(short = 'e', long)]
    extract_keybind: bool,

    /// Искать окна по pid (при --pid 0 берётся pid запущенной команды)
    #[arg(long)]
    match_pid: bool,

    /// Искать окна по имени процесса владельца
    #[arg(long)]
    match_process_name: bool,

    #[arg(long, default_value_t = 0)]
    pid: i32,

    #[arg(long)]
    process_name: Option<String>,

    #[arg(long)]
    window_class_instance: Option<String>,

    #[arg(long)]
    window_class: Option<String>,

    /// Таймаут поиска: 0 - по умолчанию, отрицательный - без ограничения, "500ms", "10s", "2m"
    #[arg(short = 't', long, value_parser = Timeout::parse, default_value = "0", allow_hyphen_values = true)]
    timeout: Timeout,

    /// Вывести список окон
    #[arg(short = 'l', long)]
    list: bool,

    /// Не ждать завершения команды, её вывод отправляется в /dev/null
    #[arg(short = 'B', long)]
    background: bool,

    /// Режим сухого запуска (фиктивные окна, без реальных действий)
    #[arg(long)]
    dry_run: bool,

    /// Путь к файлу конфигурации
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: String,

    /// Уровень логирования (перекрывает конфигурацию)
    #[arg(long)]
    log_level: Option<String>,
}

impl Args {
    fn into_context(self) -> Context {
        Context {
            first: self.first,
            verify: self.verify,
            close_window: self.close_window,
            keybind: self.keybind,
            extract_keybind: self.extract_keybind,
            match_pid: self.match_pid,
            match_process_name: self.match_process_name,
            list: self.list,
            background: self.background,
            dry_run: self.dry_run,
            pid: self.pid,
            process_name: self.process_name,
            window_class_instance: self.window_class_instance,
            window_class: self.window_class,
            timeout: self.timeout,
            command: None,
            command_args: Vec::new(),
        }
        .with_command_line(self.command.as_deref())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = Config::load(&args.config)?;

    let level = args.log_level.clone().unwrap_or_else(|| config.logging.level.clone());
    init_tracing(&level, &config.logging.format)?;

    info!("Запуск minimzd v{}", env!("CARGO_PKG_VERSION"));
    info!("Конфигурация загружена из: {}", args.config);

    let context = args.into_context();
    if context.dry_run {
        warn!("Режим сухого запуска - реальные действия отключены");
    }

    let code = run(&config, context).await?;
    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}

/// Основной сценарий. Возвращает код выхода запущенной команды (0 в фоновом режиме).
async fn run(config: &Config, mut context: Context) -> Result<i32> {
    if context.keybind && !context.dry_run {
        utils::check_uinput_access()?;
    }

    let manipulator = WindowManipulator::connect(config, &context)
        .await
        .context("Не удалось инициализировать WindowManipulator")?;

    if context.list {
        let windows = manipulator.list().await?;
        utils::print_windows(&windows)?;
    }

    let launched = LaunchedCommand::spawn(&context)?;

    if context.match_pid && context.pid == 0 {
        if let Some(pid) = launched.as_ref().and_then(LaunchedCommand::pid) {
            context.pid = pid;
        }
    }

    if context.extract_keybind {
        if let Err(e) = manipulator.extract_keybinds(&GSettingsSource::default()) {
            warn!("{}, используются сочетания по умолчанию", e);
        }
    }

    let bracketed = if context.keybind {
        bracket_focused(&manipulator, &context).await?
    } else {
        Vec::new()
    };

    let outcome = match WindowMatcher::from_context(&context) {
        Some(matcher) => search(&manipulator, &context, &matcher).await,
        None => {
            if !context.list {
                warn!("Не задано ни команды, ни признаков окна - искать нечего");
            }
            Ok(())
        }
    };

    if !bracketed.is_empty() {
        if let Err(e) = manipulator.unminimize_all(Some(bracketed)).await {
            warn!("Не удалось восстановить окна: {}", e);
        }
    }

    manipulator.close().await;
    outcome?;

    match launched {
        Some(launched) if !context.background => Ok(launched.wait().await?),
        Some(launched) => {
            info!("{} продолжает работу в фоне", launched.program());
            Ok(0)
        }
        None => Ok(0),
    }
}

/// Временно свернуть окно в фокусе, чтобы новое окно получило фокус
async fn bracket_focused(manipulator: &WindowManipulator, context: &Context) -> Result<Vec<Window>> {
    let focused: Vec<Window> = manipulator
        .list()
        .await?
        .into_iter()
        .filter(|w| w.focus)
        .collect();

    let minimized = manipulator
        .minimize_focused(&context.direct_minimize(), Some(focused))
        .await
        .context("Не удалось временно свернуть окно в фокусе")?;
    Ok(minimized)
}

async fn search(manipulator: &WindowManipulator, context: &Context, matcher: &WindowMatcher) -> Result<()> {
    info!("Критерий поиска: {}", matcher);

    if context.first {
        match manipulator.minimize_first_match(context, |w| matcher.matches(w)).await? {
            Some(window) => info!("Обработано окно {}", window),
            None => warn!("Подходящее окно не найдено"),
        }
        return Ok(());
    }

    match manipulator.minimize_match(context, |w| matcher.matches(w)).await {
        Ok(windows) if windows.is_empty() => warn!("Подходящие окна не найдены"),
        Ok(windows) => info!("Обработано окон: {}", windows.len()),
        Err(interrupted) => {
            for window in &interrupted.acted {
                info!("Обработано до ошибки: {}", window);
            }
            return Err(interrupted.into());
        }
    }
    Ok(())
}

fn init_tracing(level: &str, format: &str) -> Result<()> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?;
    let registry = tracing_subscriber::registry().with(filter);

    if format == "json" {
        registry.with(fmt::layer().json().with_writer(std::io::stderr)).init();
    } else {
        registry.with(fmt::layer().compact().with_writer(std::io::stderr)).init();
    }

    Ok(())
}

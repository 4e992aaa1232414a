//! WindowDirectory: доступ к списку окон и действиям над ними
//!
//! Модуль отвечает ТОЛЬКО за один вызов к внешнему сервису на операцию: без кэширования
//! и без повторов. Логика выбора окон, таймауты и проверка результата живут в
//! WindowManipulator.

mod dry_run;
mod shell_extension;
mod r#trait;

pub use self::r#trait::{create_window_directory, WindowDirectory};

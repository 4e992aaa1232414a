pub mod listing;
pub mod permissions;

pub use listing::print_windows;
pub use permissions::check_uinput_access;

// Условное логирование для подробной диагностики по каждому окну
#[macro_export]
macro_rules! debug_if_enabled {
    ($($arg:tt)*) => {
        if tracing::enabled!(tracing::Level::DEBUG) {
            tracing::debug!($($arg)*);
        }
    };
}

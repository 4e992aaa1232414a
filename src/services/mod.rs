pub mod key_sequencer;
pub mod keybind_settings;
pub mod launcher;
pub mod manipulator;
pub mod matcher;
pub mod poll_schedule;
pub mod virtual_device;
pub mod window_directory;

#[cfg(test)]
pub mod testing;

pub use keybind_settings::GSettingsSource;
pub use launcher::LaunchedCommand;
pub use manipulator::WindowManipulator;
pub use matcher::WindowMatcher;

use crate::types::Window;
use std::io::{self, IsTerminal, Write};

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const GREEN: &str = "\x1b[32m";
const CYAN: &str = "\x1b[36m";
const DIM: &str = "\x1b[2m";

/// Вывести список окон в stdout, с цветом если stdout - терминал
pub fn print_windows(windows: &[Window]) -> io::Result<()> {
    let stdout = io::stdout();
    let color = stdout.is_terminal();
    let mut out = stdout.lock();

    for window in windows {
        writeln!(out, "{}", format_window(window, color))?;
    }
    out.flush()
}

pub fn format_window(window: &Window, color: bool) -> String {
    let paint = |code: &str, text: String| {
        if color {
            format!("{}{}{}", code, text, RESET)
        } else {
            text
        }
    };

    let mut line = format!(
        "{} {} {} {} {}",
        paint(BOLD, format!("{:>10}", window.id)),
        paint(CYAN, format!("{:<24}", window.class)),
        format!("{:<24}", window.class_instance),
        format!("pid={:<8}", window.pid),
        if window.in_current_workspace {
            "workspace=current".to_string()
        } else {
            paint(DIM, "workspace=other".to_string())
        },
    );
    if window.focus {
        line.push(' ');
        line.push_str(&paint(GREEN, "[focus]".to_string()));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_format() {
        let window = Window::new(7).with_class("Steam").with_class_instance("steam").with_pid(42).with_focus(true);
        let line = format_window(&window, false);

        assert!(line.contains("Steam"));
        assert!(line.contains("steam"));
        assert!(line.contains("pid=42"));
        assert!(line.contains("workspace=current"));
        assert!(line.ends_with("[focus]"));
        assert!(!line.contains('\x1b'));
    }

    #[test]
    fn test_colored_format() {
        let window = Window {
            in_current_workspace: false,
            ..Window::new(7)
        };
        let line = format_window(&window, true);

        assert!(line.contains(BOLD));
        assert!(line.contains("workspace=other"));
        assert!(!line.contains("[focus]"));
    }
}

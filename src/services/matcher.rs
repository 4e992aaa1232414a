use crate::types::{Context, Window};
use std::fmt;
use std::fs;

/// Правило выбора целевых окон. На один запуск активно ровно одно правило.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowMatcher {
    Pid(i32),
    /// Имя процесса владельца окна (`/proc/<pid>/comm`)
    ProcessName(String),
    ClassInstance(String),
    Class(String),
}

impl WindowMatcher {
    /// Выбрать правило по приоритету: pid (если не 0) > имя процесса (если запрошено)
    /// > class instance > class. Пустые строки не считаются заданными.
    pub fn from_context(context: &Context) -> Option<Self> {
        let non_empty = |value: &Option<String>| value.as_deref().filter(|v| !v.is_empty()).map(str::to_string);

        if context.pid != 0 {
            return Some(WindowMatcher::Pid(context.pid));
        }
        if context.match_process_name {
            if let Some(name) = non_empty(&context.process_name) {
                return Some(WindowMatcher::ProcessName(name));
            }
        }
        if let Some(instance) = non_empty(&context.window_class_instance) {
            return Some(WindowMatcher::ClassInstance(instance));
        }
        non_empty(&context.window_class).map(WindowMatcher::Class)
    }

    pub fn matches(&self, window: &Window) -> bool {
        match self {
            WindowMatcher::Pid(pid) => match_pid(window, *pid),
            WindowMatcher::ProcessName(name) => match_process_name(window, name),
            WindowMatcher::ClassInstance(instance) => match_class_instance(window, instance),
            WindowMatcher::Class(class) => match_class(window, class),
        }
    }
}

impl fmt::Display for WindowMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WindowMatcher::Pid(pid) => write!(f, "pid == {}", pid),
            WindowMatcher::ProcessName(name) => write!(f, "process == \"{}\"", name),
            WindowMatcher::ClassInstance(instance) => write!(f, "wm_class_instance == \"{}\"", instance),
            WindowMatcher::Class(class) => write!(f, "wm_class == \"{}\"", class),
        }
    }
}

pub fn match_pid(window: &Window, pid: i32) -> bool {
    window.pid == pid
}

pub fn match_class_instance(window: &Window, class_instance: &str) -> bool {
    window.class_instance == class_instance
}

pub fn match_class(window: &Window, class: &str) -> bool {
    window.class == class
}

/// Ядро обрезает comm до 15 байт, поэтому ожидаемое имя сравнивается с тем же префиксом.
pub fn match_process_name(window: &Window, process_name: &str) -> bool {
    let mut end = process_name.len().min(COMM_LEN);
    while !process_name.is_char_boundary(end) {
        end -= 1;
    }
    process_name_of(window.pid).is_some_and(|name| name == process_name[..end])
}

const COMM_LEN: usize = 15;

/// Имя процесса по pid
pub fn process_name_of(pid: i32) -> Option<String> {
    if pid <= 0 {
        return None;
    }
    let comm = fs::read_to_string(format!("/proc/{}/comm", pid)).ok()?;
    Some(comm.trim_end_matches('\n').to_string())
}

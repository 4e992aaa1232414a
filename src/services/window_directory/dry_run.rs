use crate::error::Result;
use crate::types::Window;
use parking_lot::Mutex;
use tracing::info;

use super::r#trait::WindowDirectory;

/// Эмуляция GNOME Shell для сухого запуска: набор фиктивных окон в памяти.
///
/// Activate переносит фокус, Close удаляет окно из списка, Minimize только снимает фокус.
pub struct DryRunDirectory {
    windows: Mutex<Vec<Window>>,
}

impl DryRunDirectory {
    pub fn new(windows: Vec<Window>) -> Self {
        Self {
            windows: Mutex::new(windows),
        }
    }

    pub fn with_fake_windows() -> Self {
        info!("Dry-run режим - WindowDirectory работает в режиме эмуляции");

        Self::new(vec![
            Window::new(1001).with_class("Terminal").with_class_instance("terminal").with_pid(1).with_focus(true),
            Window::new(1002).with_class("Firefox").with_class_instance("firefox").with_pid(2),
            Window::new(1003).with_class("Steam").with_class_instance("steam").with_pid(3),
        ])
    }
}

#[async_trait::async_trait]
impl WindowDirectory for DryRunDirectory {
    async fn list(&self) -> Result<Vec<Window>> {
        Ok(self.windows.lock().clone())
    }

    async fn activate(&self, id: u32) -> Result<()> {
        info!("[DRY RUN] Activate #{}", id);
        for window in self.windows.lock().iter_mut() {
            window.focus = window.id == id;
        }
        Ok(())
    }

    async fn minimize(&self, id: u32) -> Result<()> {
        info!("[DRY RUN] Minimize #{}", id);
        if let Some(window) = self.windows.lock().iter_mut().find(|w| w.id == id) {
            window.focus = false;
        }
        Ok(())
    }

    async fn close(&self, id: u32) -> Result<()> {
        info!("[DRY RUN] Close #{}", id);
        self.windows.lock().retain(|w| w.id != id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_dry_run_directory_state() {
        let directory = DryRunDirectory::with_fake_windows();

        directory.activate(1003).await.unwrap();
        let windows = directory.list().await.unwrap();
        assert!(windows.iter().find(|w| w.id == 1003).unwrap().focus);
        assert!(!windows.iter().find(|w| w.id == 1001).unwrap().focus);

        directory.minimize(1003).await.unwrap();
        assert!(directory.list().await.unwrap().iter().all(|w| !w.focus));

        directory.close(1002).await.unwrap();
        assert_eq!(directory.list().await.unwrap().len(), 2);
    }
}

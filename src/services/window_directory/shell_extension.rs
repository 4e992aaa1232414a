use crate::error::{MinimzdError, Result};
use crate::types::Window;
use tracing::{debug, info, warn};
use zbus::zvariant::DynamicType;
use zbus::Connection;

use super::r#trait::{parse_window_list, WindowDirectory};

const DBUS_DESTINATION: &str = "org.gnome.Shell";
const DBUS_OBJECT: &str = "/org/gnome/Shell/Extensions/Windows";
const DBUS_INTERFACE: &str = "org.gnome.Shell.Extensions.Windows";

/// Окна GNOME Shell через D-Bus интерфейс расширения "Window Calls"
pub struct ShellExtensionDirectory {
    connection: Connection,
}

impl ShellExtensionDirectory {
    pub async fn connect() -> Result<Self> {
        info!("Подключение к GNOME Shell через D-Bus");

        let connection = Connection::session()
            .await
            .map_err(MinimzdError::Connect)?;

        Ok(Self { connection })
    }

    async fn call<B>(&self, method: &'static str, body: &B) -> Result<zbus::Message>
    where
        B: serde::Serialize + DynamicType,
    {
        debug!("D-Bus вызов {}.{}", DBUS_INTERFACE, method);

        self.connection
            .call_method(
                Some(DBUS_DESTINATION),
                DBUS_OBJECT,
                Some(DBUS_INTERFACE),
                method,
                body,
            )
            .await
            .map_err(|e| MinimzdError::transport(method, e))
    }
}

#[async_trait::async_trait]
impl WindowDirectory for ShellExtensionDirectory {
    async fn list(&self) -> Result<Vec<Window>> {
        let reply = self.call("List", &()).await?;
        let payload: String = reply
            .body()
            .deserialize()
            .map_err(|e| MinimzdError::UnexpectedReply(format!("List вернул не строку: {}", e)))?;

        parse_window_list(&payload)
    }

    async fn activate(&self, id: u32) -> Result<()> {
        self.call("Activate", &(id,)).await.map(drop)
    }

    async fn minimize(&self, id: u32) -> Result<()> {
        self.call("Minimize", &(id,)).await.map(drop)
    }

    async fn close(&self, id: u32) -> Result<()> {
        self.call("Close", &(id,)).await.map(drop)
    }

    async fn disconnect(self: Box<Self>) {
        if let Err(e) = self.connection.close().await {
            warn!("Не удалось корректно закрыть соединение D-Bus: {}", e);
        }
    }
}

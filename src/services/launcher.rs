use crate::error::Result;
use crate::minimzd_error;
use crate::types::Context;
use std::os::unix::process::ExitStatusExt;
use std::process::{Child, Command, ExitStatus, Stdio};
use tracing::{debug, info};

/// Запущенная команда, окна которой ищутся
pub struct LaunchedCommand {
    program: String,
    child: Option<Child>,
}

impl LaunchedCommand {
    /// Запустить команду из контекста. Без команды ничего не запускается.
    ///
    /// В фоновом режиме stdout/stderr потомка отправляются в /dev/null, иначе наследуются.
    pub fn spawn(context: &Context) -> Result<Option<Self>> {
        let Some(program) = context.command.clone() else {
            return Ok(None);
        };

        if context.dry_run {
            info!("[DRY RUN] Запуск: {} {:?}", program, context.command_args);
            return Ok(Some(Self { program, child: None }));
        }

        let mut command = Command::new(&program);
        command.args(&context.command_args);
        if context.background {
            command.stdout(Stdio::null()).stderr(Stdio::null());
        }

        let child = command
            .spawn()
            .map_err(|e| minimzd_error!(launch, "{}: {}", program, e))?;

        info!("Запущен {} (pid {})", program, child.id());
        Ok(Some(Self {
            program,
            child: Some(child),
        }))
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// PID потомка; в сухом режиме `None`
    pub fn pid(&self) -> Option<i32> {
        self.child.as_ref().map(|child| child.id() as i32)
    }

    /// Дождаться завершения и вернуть код выхода (128 + номер сигнала при гибели от сигнала)
    pub async fn wait(self) -> Result<i32> {
        let Some(mut child) = self.child else {
            return Ok(0);
        };

        debug!("Ожидание завершения {}", self.program);
        let status = tokio::task::spawn_blocking(move || child.wait())
            .await
            .map_err(|e| minimzd_error!(launch, "ожидание {} прервано: {}", self.program, e))??;

        let code = exit_code(status);
        info!("{} завершился с кодом {}", self.program, code);
        Ok(code)
    }
}

pub fn exit_code(status: ExitStatus) -> i32 {
    match (status.code(), status.signal()) {
        (Some(code), _) => code,
        (None, Some(signal)) => 128 + signal,
        (None, None) => 1,
    }
}

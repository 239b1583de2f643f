use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::task::JoinHandle;

use sodar_core::backend::BackendError;
use sodar_core::config::SessionConfig;

use crate::discover;

pub struct CdpClient {
    pub browser: Browser,
    pub handler_task: JoinHandle<()>,
    pub page: Page,
    user_data_dir: Option<PathBuf>,
    cleanup_user_data_dir: bool,
}

impl CdpClient {
    pub async fn launch(config: &SessionConfig) -> Result<Self, BackendError> {
        let executable = discover::chromium_binary().ok_or_else(|| {
            BackendError::BrowserUnavailable(
                "no Chromium binary on PATH or at a known install location \
                 (set CHROME_BIN to override)"
                    .into(),
            )
        })?;

        let (user_data_dir, cleanup_user_data_dir) = isolated_user_data_dir()?;

        let mut builder = BrowserConfig::builder()
            .chrome_executable(&executable)
            .no_sandbox()
            .window_size(config.window_width, config.window_height)
            .user_data_dir(&user_data_dir)
            .args(vec![
                "--disable-dev-shm-usage",
                "--disable-gpu",
                "--disable-extensions",
                "--disable-plugins",
            ]);

        if config.headless {
            tracing::info!("Launching browser in headless mode");
        } else {
            tracing::info!("Launching browser in visible mode");
            builder = builder.with_head();
        }
        if config.block_images() {
            builder = builder.arg("--blink-settings=imagesEnabled=false");
        }

        let (browser, mut handler) =
            Browser::launch(builder.build().map_err(BackendError::Launch)?)
                .await
                .map_err(|e| BackendError::Launch(e.to_string()))?;

        // Drive the CDP message loop for the lifetime of the session.
        let handler_task = tokio::spawn(async move {
            while let Some(h) = handler.next().await {
                if let Err(e) = h {
                    tracing::error!("Browser handler error (ignoring): {}", e);
                    continue;
                }
            }
            tracing::debug!("Browser handler task ended");
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| BackendError::Launch(format!("Failed to create page: {e}")))?;

        Ok(Self {
            browser,
            handler_task,
            page,
            user_data_dir: Some(user_data_dir),
            cleanup_user_data_dir,
        })
    }

    pub async fn close(mut self) -> Result<(), BackendError> {
        self.browser
            .close()
            .await
            .map_err(|e| BackendError::Other(format!("Error closing browser: {e}")))?;
        self.handler_task
            .await
            .map_err(|e| BackendError::Other(format!("Error awaiting handler: {e}")))?;

        if self.cleanup_user_data_dir {
            if let Some(dir) = &self.user_data_dir {
                if let Err(e) = std::fs::remove_dir_all(dir) {
                    tracing::debug!("Failed to clean up user-data-dir {}: {}", dir.display(), e);
                }
            }
        }
        Ok(())
    }
}

fn isolated_user_data_dir() -> Result<(PathBuf, bool), BackendError> {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| BackendError::Launch(format!("System clock error: {e}")))?
        .as_nanos();
    let unique = format!("sodar-chromium-profile-{}-{}", std::process::id(), nanos);
    let path = std::env::temp_dir().join(unique);
    std::fs::create_dir_all(&path)
        .map_err(|e| BackendError::Launch(format!("Failed to create user-data-dir: {e}")))?;
    tracing::debug!("Using isolated user data dir: {}", path.display());
    Ok((path, true))
}

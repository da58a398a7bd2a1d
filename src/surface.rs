use std::future::Future;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;

use crate::models::SurfaceEvent;

pub const LOAD_TIMEOUT_ARG: &str = "--load-timeout-ms";

fn helper_exe_name() -> &'static str {
    if std::env::consts::OS == "windows" {
        "storefront-web.exe"
    } else {
        "storefront-web"
    }
}

fn locate_helper() -> Result<PathBuf> {
    let current_exe = std::env::current_exe().context("get current exe")?;
    let exe_dir = current_exe
        .parent()
        .context("resolve exe directory")?
        .to_path_buf();

    // Release installs place the helper next to the shell.
    let candidate = exe_dir.join(helper_exe_name());
    let helper = if candidate.exists() {
        candidate
    } else {
        // Dev fallback: cargo-built path
        let mut p = PathBuf::from("target");
        p.push("debug");
        p.push(helper_exe_name());
        p
    };

    if !helper.exists() {
        anyhow::bail!(
            "web surface helper not found (expected {}). Reinstall the application.",
            helper.display()
        );
    }
    Ok(helper)
}

/// A running web surface. Events arrive in order; the last one is always
/// [`SurfaceEvent::Closed`].
pub struct SurfaceHandle {
    url: String,
    events: mpsc::UnboundedReceiver<SurfaceEvent>,
}

impl SurfaceHandle {
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn try_next(&mut self) -> Option<SurfaceEvent> {
        self.events.try_recv().ok()
    }
}

/// Spawns the web surface helper for `url`. Must be called from within a
/// tokio runtime context.
pub fn open_surface(url: &str, load_timeout: Duration) -> Result<SurfaceHandle> {
    let helper = locate_helper()?;
    let check = check_main_frame(url.to_string(), load_timeout);
    spawn_surface(Command::new(helper), url, load_timeout, check)
}

/// Transport-level check of the main-frame URL. Webviews render their own
/// error page for DNS and connection failures and still report the load as
/// finished, so a `loaded` report only counts once this passes.
pub async fn check_main_frame(url: String, timeout: Duration) -> Result<(), String> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| format!("build http client: {e}"))?;
    let resp = client
        .get(&url)
        .send()
        .await
        .map_err(|e| format!("main frame request failed: {e}"))?;
    let status = resp.status();
    if !status.is_success() {
        return Err(format!("main frame returned HTTP {status}"));
    }
    Ok(())
}

/// Turns a helper `loaded` report into the event the shell acts on.
pub(crate) fn gate_loaded(url: String, verdict: &Result<(), String>) -> SurfaceEvent {
    match verdict {
        Ok(()) => SurfaceEvent::Loaded { url },
        Err(reason) => SurfaceEvent::LoadFailed {
            url,
            reason: reason.clone(),
        },
    }
}

/// Runs `command` as the helper with the standard arguments appended and
/// forwards its events. `check` gates every `loaded` report.
pub fn spawn_surface<F>(
    mut command: Command,
    url: &str,
    load_timeout: Duration,
    check: F,
) -> Result<SurfaceHandle>
where
    F: Future<Output = Result<(), String>> + Send + 'static,
{
    let mut child = command
        .arg(url)
        .arg(LOAD_TIMEOUT_ARG)
        .arg(load_timeout.as_millis().to_string())
        .stdout(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .context("launch web surface helper")?;
    let stdout = child
        .stdout
        .take()
        .context("capture web surface stdout")?;

    let (tx, rx) = mpsc::unbounded_channel();
    let watched = url.to_string();
    let mut check = Some(tokio::spawn(check));
    tokio::spawn(async move {
        let mut lines = BufReader::new(stdout).lines();
        let mut verdict: Option<Result<(), String>> = None;
        let mut settled = false;
        let mut closed = false;
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    let Some(ev) = SurfaceEvent::parse_line(&line) else {
                        tracing::debug!(line = %line, "web surface output");
                        continue;
                    };
                    let ev = match ev {
                        SurfaceEvent::Loaded { url } => {
                            if verdict.is_none() {
                                verdict = Some(match check.take() {
                                    Some(h) => h
                                        .await
                                        .unwrap_or_else(|e| Err(format!("main frame check lost: {e}"))),
                                    None => Err("main frame check missing".to_string()),
                                });
                            }
                            let outcome = verdict
                                .clone()
                                .unwrap_or_else(|| Err("main frame check missing".to_string()));
                            let ev = gate_loaded(url, &outcome);
                            if outcome.is_err() {
                                // The helper is showing an error page; take it down.
                                let _ = child.start_kill();
                            }
                            ev
                        }
                        other => other,
                    };
                    match &ev {
                        SurfaceEvent::Loaded { .. } | SurfaceEvent::LoadFailed { .. } => {
                            settled = true
                        }
                        SurfaceEvent::Closed => closed = true,
                    }
                    if tx.send(ev).is_err() {
                        return;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!(error = %e, "read web surface output failed");
                    break;
                }
            }
        }

        let status = child.wait().await;
        if !settled {
            let reason = match status {
                Ok(s) => format!("web surface exited before loading ({s})"),
                Err(e) => format!("web surface lost: {e}"),
            };
            let _ = tx.send(SurfaceEvent::LoadFailed {
                url: watched,
                reason,
            });
        }
        if !closed {
            let _ = tx.send(SurfaceEvent::Closed);
        }
    });

    Ok(SurfaceHandle {
        url: url.to_string(),
        events: rx,
    })
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    async fn drain(mut handle: SurfaceHandle) -> Vec<SurfaceEvent> {
        let mut out = Vec::new();
        while let Some(ev) =
            tokio::time::timeout(Duration::from_secs(10), handle.events.recv())
                .await
                .expect("surface events stalled")
        {
            out.push(ev);
        }
        out
    }

    fn script(body: &str) -> Command {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(body);
        cmd
    }

    #[test]
    fn gate_turns_failed_check_into_load_failure() {
        assert_eq!(
            gate_loaded("https://x".into(), &Ok(())),
            SurfaceEvent::Loaded {
                url: "https://x".into()
            }
        );
        assert_eq!(
            gate_loaded("https://x".into(), &Err("dns error".into())),
            SurfaceEvent::LoadFailed {
                url: "https://x".into(),
                reason: "dns error".into()
            }
        );
    }

    #[tokio::test]
    async fn early_exit_reports_failure_then_closed() {
        let handle = spawn_surface(
            script("exit 1"),
            "https://x",
            Duration::from_secs(1),
            async { Ok(()) },
        )
        .unwrap();

        let events = drain(handle).await;
        assert_eq!(events.len(), 2, "{events:?}");
        match &events[0] {
            SurfaceEvent::LoadFailed { url, reason } => {
                assert_eq!(url, "https://x");
                assert!(reason.contains("exited before loading"), "{reason}");
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(events[1], SurfaceEvent::Closed);
    }

    #[tokio::test]
    async fn checked_load_is_forwarded_and_closed_is_last() {
        let handle = spawn_surface(
            script(r#"echo 'starting webview'; echo '{"event":"loaded","url":"https://x"}'"#),
            "https://x",
            Duration::from_secs(1),
            async { Ok(()) },
        )
        .unwrap();

        assert_eq!(
            drain(handle).await,
            vec![
                SurfaceEvent::Loaded {
                    url: "https://x".into()
                },
                SurfaceEvent::Closed,
            ]
        );
    }

    #[tokio::test]
    async fn loaded_error_page_becomes_load_failure() {
        // `exec` so killing the child also ends the process holding stdout.
        let handle = spawn_surface(
            script(r#"echo '{"event":"loaded","url":"https://x"}'; exec sleep 30"#),
            "https://x",
            Duration::from_secs(1),
            async { Err("main frame request failed: dns error".to_string()) },
        )
        .unwrap();

        assert_eq!(
            drain(handle).await,
            vec![
                SurfaceEvent::LoadFailed {
                    url: "https://x".into(),
                    reason: "main frame request failed: dns error".into()
                },
                SurfaceEvent::Closed,
            ]
        );
    }

    #[tokio::test]
    async fn helper_reported_failure_is_not_duplicated() {
        let handle = spawn_surface(
            script(
                r#"echo '{"event":"load_failed","url":"https://x","reason":"timeout"}'; echo '{"event":"closed"}'"#,
            ),
            "https://x",
            Duration::from_secs(1),
            async { Ok(()) },
        )
        .unwrap();

        assert_eq!(
            drain(handle).await,
            vec![
                SurfaceEvent::LoadFailed {
                    url: "https://x".into(),
                    reason: "timeout".into()
                },
                SurfaceEvent::Closed,
            ]
        );
    }

    #[tokio::test]
    async fn unreachable_main_frame_fails_check() {
        let verdict =
            check_main_frame("http://127.0.0.1:9/".to_string(), Duration::from_millis(300)).await;
        assert!(verdict.is_err());
    }
}

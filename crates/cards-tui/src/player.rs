//! External video player — one child process at a time.
//!
//! Each launch gets a generation number so that exit notices from a process
//! that was already replaced or stopped can be told apart from the live one.

use std::process::Stdio;

use anyhow::anyhow;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use cards_proto::config::PlayerConfig;
use cards_proto::platform;

/// Sent when a player process ends, whether by itself or by `stop`.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerExit {
    pub video_id: String,
    pub generation: u64,
    /// True when the process was killed by `stop`.
    pub killed: bool,
    pub code: Option<i32>,
}

struct Running {
    generation: u64,
    video_id: String,
    kill_tx: oneshot::Sender<()>,
}

pub struct VideoPlayer {
    config: PlayerConfig,
    generation: u64,
    running: Option<Running>,
}

impl VideoPlayer {
    pub fn new(config: PlayerConfig) -> Self {
        Self {
            config,
            generation: 0,
            running: None,
        }
    }

    /// Start the player on `src`, replacing any running instance.
    /// The exit notice is delivered on `tx`.
    pub fn launch<M>(&mut self, video_id: &str, src: &str, tx: mpsc::Sender<M>) -> anyhow::Result<()>
    where
        M: From<PlayerExit> + Send + 'static,
    {
        self.stop();

        let binary = platform::find_player_binary(&self.config.command)
            .ok_or_else(|| anyhow!("video player `{}` not found", self.config.command))?;

        let mut child = tokio::process::Command::new(&binary)
            .args(&self.config.args)
            .arg(src)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()?;

        self.generation += 1;
        let generation = self.generation;
        info!(
            "player: started {} for {} (pid {:?}, gen {})",
            binary.display(),
            video_id,
            child.id(),
            generation
        );

        let (kill_tx, kill_rx) = oneshot::channel::<()>();
        let exit_id = video_id.to_string();
        tokio::spawn(async move {
            let (killed, code) = tokio::select! {
                status = child.wait() => match status {
                    Ok(s) => (false, s.code()),
                    Err(e) => {
                        warn!("player: wait failed: {}", e);
                        (false, None)
                    }
                },
                _ = kill_rx => {
                    if let Err(e) = child.kill().await {
                        warn!("player: kill failed: {}", e);
                    }
                    (true, None)
                }
            };
            debug!("player: gen {} exited (killed={}, code={:?})", generation, killed, code);
            let _ = tx
                .send(M::from(PlayerExit {
                    video_id: exit_id,
                    generation,
                    killed,
                    code,
                }))
                .await;
        });

        self.running = Some(Running {
            generation,
            video_id: video_id.to_string(),
            kill_tx,
        });
        Ok(())
    }

    /// Kill the running player, if any.
    pub fn stop(&mut self) {
        if let Some(run) = self.running.take() {
            info!("player: stopping {} (gen {})", run.video_id, run.generation);
            let _ = run.kill_tx.send(());
        }
    }

    /// Record an exit notice. Returns true when it belongs to the live process.
    pub fn exited(&mut self, exit: &PlayerExit) -> bool {
        match &self.running {
            Some(run) if run.generation == exit.generation => {
                self.running = None;
                true
            }
            _ => false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::time::Duration;

    fn player(command: &str) -> VideoPlayer {
        VideoPlayer::new(PlayerConfig {
            command: command.to_string(),
            args: Vec::new(),
        })
    }

    #[tokio::test]
    async fn test_exit_is_reported() {
        let mut p = player("true");
        let (tx, mut rx) = mpsc::channel::<PlayerExit>(4);
        p.launch("abc12345678", "ignored", tx).unwrap();
        assert!(p.is_running());

        let exit = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(exit.video_id, "abc12345678");
        assert!(!exit.killed);
        assert_eq!(exit.code, Some(0));
        assert!(p.exited(&exit));
        assert!(!p.is_running());
    }

    #[tokio::test]
    async fn test_stop_kills_and_exit_is_stale() {
        let mut p = player("sleep");
        let (tx, mut rx) = mpsc::channel::<PlayerExit>(4);
        p.launch("abc12345678", "30", tx).unwrap();
        p.stop();
        assert!(!p.is_running());

        let exit = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert!(exit.killed);
        assert!(!p.exited(&exit));
    }

    #[tokio::test]
    async fn test_relaunch_replaces_previous() {
        let mut p = player("sleep");
        let (tx, mut rx) = mpsc::channel::<PlayerExit>(4);
        p.launch("first", "30", tx.clone()).unwrap();
        p.launch("second", "30", tx).unwrap();

        let first = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(first.video_id, "first");
        assert!(!p.exited(&first));
        assert!(p.is_running());
        p.stop();
    }

    #[tokio::test]
    async fn test_missing_binary_is_an_error() {
        let mut p = player("definitely-not-a-real-player-binary");
        let (tx, _rx) = mpsc::channel::<PlayerExit>(1);
        assert!(p.launch("abc12345678", "src", tx).is_err());
        assert!(!p.is_running());
    }
}

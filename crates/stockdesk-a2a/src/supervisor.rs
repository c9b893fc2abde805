//! Keeps one server process per specialist and watches them.

use std::path::Path;
use std::process::ExitStatus;
use std::time::Duration;

use stockdesk_models::{A2aConfig, Domain};
use tokio::process::{Child, Command};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::cards;
use crate::error::A2aError;

/// One supervised server process.
#[derive(Debug)]
pub struct ManagedServer {
    pub name: String,
    pub port: u16,
    child: Child,
    exit: Option<ExitStatus>,
}

impl ManagedServer {
    pub fn pid(&self) -> Option<u32> {
        self.child.id()
    }

    pub fn exit_status(&self) -> Option<ExitStatus> {
        self.exit
    }
}

/// A process that was found to have exited during a liveness check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exited {
    pub name: String,
    pub port: u16,
    pub code: Option<i32>,
}

pub struct Supervisor {
    servers: Vec<ManagedServer>,
    liveness_interval: Duration,
    shutdown_timeout: Duration,
}

impl Supervisor {
    pub fn new(liveness_interval: Duration, shutdown_timeout: Duration) -> Self {
        Self {
            servers: Vec::new(),
            liveness_interval,
            shutdown_timeout,
        }
    }

    pub fn from_config(config: &A2aConfig) -> Self {
        Self::new(
            Duration::from_secs(config.liveness_interval_seconds),
            Duration::from_secs(config.shutdown_timeout_seconds),
        )
    }

    pub fn servers(&self) -> &[ManagedServer] {
        &self.servers
    }

    /// Start `command` and track it under `name`.
    pub fn spawn(&mut self, name: &str, port: u16, mut command: Command) -> Result<(), A2aError> {
        let child = command.kill_on_drop(true).spawn().map_err(|source| A2aError::Spawn {
            agent: name.to_string(),
            source,
        })?;
        info!(agent = name, port, pid = ?child.id(), "Started agent server");
        self.servers.push(ManagedServer {
            name: name.to_string(),
            port,
            child,
            exit: None,
        });
        Ok(())
    }

    /// Start a `serve` process of `program` for every specialist, pausing
    /// `stagger` between starts.
    pub async fn launch_all(
        &mut self,
        program: &Path,
        config: &A2aConfig,
        config_path: &Path,
    ) -> Result<(), A2aError> {
        let stagger = Duration::from_millis(config.stagger_millis);
        let ports = Domain::PIPELINE
            .into_iter()
            .map(|domain| cards::default_port(domain, config.base_port).map(|port| (domain, port)))
            .collect::<Result<Vec<_>, _>>()?;

        for (i, (domain, port)) in ports.into_iter().enumerate() {
            if i > 0 {
                tokio::time::sleep(stagger).await;
            }
            let mut command = Command::new(program);
            command
                .arg("--config")
                .arg(config_path)
                .arg("serve")
                .arg("--agent")
                .arg(domain.agent_id())
                .arg("--port")
                .arg(port.to_string())
                .arg("--host")
                .arg(&config.host);
            self.spawn(domain.agent_id(), port, command)?;
        }
        Ok(())
    }

    /// Poll every process once. Each exit is reported the first time it is seen.
    pub fn check_liveness(&mut self) -> Vec<Exited> {
        let mut exited = Vec::new();
        for server in &mut self.servers {
            if server.exit.is_some() {
                continue;
            }
            match server.child.try_wait() {
                Ok(Some(status)) => {
                    warn!(agent = %server.name, port = server.port, code = ?status.code(), "Agent server exited");
                    server.exit = Some(status);
                    exited.push(Exited {
                        name: server.name.clone(),
                        port: server.port,
                        code: status.code(),
                    });
                }
                Ok(None) => {}
                Err(e) => warn!(agent = %server.name, error = %e, "Failed to poll agent server"),
            }
        }
        exited
    }

    pub fn running(&self) -> usize {
        self.servers.iter().filter(|s| s.exit.is_none()).count()
    }

    /// Check liveness on a fixed interval until `cancel` fires, then shut down.
    pub async fn run_until(&mut self, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval(self.liveness_interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("Shutting down all agent servers");
                    break;
                }
                _ = ticker.tick() => {
                    self.check_liveness();
                }
            }
        }
        self.shutdown().await;
    }

    /// Kill every live process and wait for each, bounded by the shutdown timeout.
    pub async fn shutdown(&mut self) {
        for server in &mut self.servers {
            if server.exit.is_some() {
                continue;
            }
            if let Err(e) = server.child.start_kill() {
                warn!(agent = %server.name, error = %e, "Failed to signal agent server");
            }
        }

        for server in &mut self.servers {
            if server.exit.is_some() {
                continue;
            }
            match tokio::time::timeout(self.shutdown_timeout, server.child.wait()).await {
                Ok(Ok(status)) => {
                    info!(agent = %server.name, port = server.port, "Stopped agent server");
                    server.exit = Some(status);
                }
                Ok(Err(e)) => warn!(agent = %server.name, error = %e, "Failed to reap agent server"),
                Err(_) => warn!(
                    agent = %server.name,
                    timeout_secs = self.shutdown_timeout.as_secs(),
                    "Agent server did not stop in time"
                ),
            }
        }
    }
}

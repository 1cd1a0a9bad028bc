//! Transport implementations: OpenSSH clients, or local processes for
//! debugging without a network.

use std::path::PathBuf;

use crate::application::ports::Transport;
use crate::domain::{Target, quote};

/// Remote shell client.
pub const SSH_PROGRAM: &str = "ssh";
/// Batch file-transfer client.
pub const SFTP_PROGRAM: &str = "sftp";

/// Reaches the target through `ssh` and `sftp`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SshTransport {
    target: Target,
    identity: Option<PathBuf>,
    options: Vec<String>,
}

impl SshTransport {
    #[must_use]
    pub fn new(target: Target, identity: Option<PathBuf>, options: Vec<String>) -> Self {
        Self {
            target,
            identity,
            options,
        }
    }

    #[cfg(test)]
    pub(crate) fn target(&self) -> &Target {
        &self.target
    }

    /// `[-i ID] [-o OPT]...`, shared by both clients.
    fn common_flags(&self, argv: &mut Vec<String>) {
        if let Some(identity) = &self.identity {
            argv.push("-i".to_string());
            argv.push(identity.display().to_string());
        }
        for option in &self.options {
            argv.push("-o".to_string());
            argv.push(option.clone());
        }
    }
}

impl Transport for SshTransport {
    fn remote_invocation(&self, command: &[String]) -> Vec<String> {
        // -n: never forward our stdin to the remote command.
        let mut argv = vec![SSH_PROGRAM.to_string(), "-n".to_string()];
        if let Some(port) = self.target.port {
            argv.push("-p".to_string());
            argv.push(port.to_string());
        }
        self.common_flags(&mut argv);
        argv.push(self.target.host.clone());
        argv.push("--".to_string());
        argv.extend(command.iter().map(|arg| quote(arg)));
        argv
    }

    fn transfer_invocation(&self) -> Vec<String> {
        let mut argv = vec![
            SFTP_PROGRAM.to_string(),
            "-b".to_string(),
            "-".to_string(),
            "-q".to_string(),
        ];
        if let Some(port) = self.target.port {
            argv.push("-P".to_string());
            argv.push(port.to_string());
        }
        self.common_flags(&mut argv);
        argv.push(self.target.host.clone());
        argv
    }
}

/// Runs commands as local processes and transfers through a local
/// `sftp-server` binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalTransport {
    sftp_server: PathBuf,
}

impl LocalTransport {
    #[must_use]
    pub fn new(sftp_server: PathBuf) -> Self {
        Self { sftp_server }
    }
}

impl Transport for LocalTransport {
    fn remote_invocation(&self, command: &[String]) -> Vec<String> {
        command.to_vec()
    }

    fn transfer_invocation(&self) -> Vec<String> {
        vec![
            SFTP_PROGRAM.to_string(),
            "-b".to_string(),
            "-".to_string(),
            "-q".to_string(),
            "-D".to_string(),
            self.sftp_server.display().to_string(),
        ]
    }
}

/// Transport selected once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportKind {
    Ssh(SshTransport),
    Local(LocalTransport),
}

impl Transport for TransportKind {
    fn remote_invocation(&self, command: &[String]) -> Vec<String> {
        match self {
            Self::Ssh(t) => t.remote_invocation(command),
            Self::Local(t) => t.remote_invocation(command),
        }
    }

    fn transfer_invocation(&self) -> Vec<String> {
        match self {
            Self::Ssh(t) => t.transfer_invocation(),
            Self::Local(t) => t.transfer_invocation(),
        }
    }
}

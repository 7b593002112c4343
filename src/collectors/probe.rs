use std::process::ExitStatus;
use std::time::Duration;

use thiserror::Error;
use tokio::process::Command;

/// Upper bound on any single external probe command.
pub const COMMAND_TIMEOUT: Duration = Duration::from_secs(10);

pub type ProbeResult<T> = std::result::Result<T, ProbeError>;

/// Soft failure of one hardware probe. Variants keep "the probe crashed"
/// (Launch/Failed/TimedOut/Read) distinguishable from "the probe ran but
/// produced nothing recognizable" (Unmatched) in the diagnostics.
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("`{command}` could not be started: {source}")]
    Launch {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` exited with {status}")]
    Failed { command: String, status: ExitStatus },

    #[error("`{command}` timed out after {timeout:?}")]
    TimedOut { command: String, timeout: Duration },

    #[error("could not read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{source_name}` produced no recognizable output")]
    Unmatched { source_name: String },

    #[error("no hardware probe for this platform")]
    Unsupported,
}

impl ProbeError {
    pub fn unmatched(source_name: impl Into<String>) -> Self {
        Self::Unmatched {
            source_name: source_name.into(),
        }
    }
}

/// Run an external command under the probe timeout and return its stdout.
pub async fn run_command(program: &str, args: &[&str]) -> ProbeResult<String> {
    let rendered = if args.is_empty() {
        program.to_string()
    } else {
        format!("{program} {}", args.join(" "))
    };

    let output = tokio::time::timeout(COMMAND_TIMEOUT, Command::new(program).args(args).output())
        .await
        .map_err(|_| ProbeError::TimedOut {
            command: rendered.clone(),
            timeout: COMMAND_TIMEOUT,
        })?
        .map_err(|source| ProbeError::Launch {
            command: rendered.clone(),
            source,
        })?;

    if !output.status.success() {
        return Err(ProbeError::Failed {
            command: rendered,
            status: output.status,
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Read a file-backed probe source (procfs, sysfs) as text.
pub async fn read_source(path: &str) -> ProbeResult<String> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ProbeError::Read {
            path: path.to_string(),
            source,
        })
}

//! External Go tooling: post-processing of generated files and tool installation.
//!
//! Nothing here interprets tool output. Stdout and stderr are inherited so the user
//! sees what the tools print; only the exit status matters.

use std::path::Path;
use std::process::Command;

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::types::GenerateConfig;

/// Run `argv[0] argv[1..] extra` and map a spawn failure or non-zero exit to a message.
fn run_command(argv: &[String], extra: Option<&Path>, cwd: Option<&Path>) -> std::result::Result<(), String> {
    let Some((program, args)) = argv.split_first() else {
        return Err("empty command".to_string());
    };
    let mut cmd = Command::new(program);
    cmd.args(args);
    if let Some(extra) = extra {
        cmd.arg(extra);
    }
    if let Some(cwd) = cwd {
        cmd.current_dir(cwd);
    }
    debug!(command = ?cmd, "Running tool");
    match cmd.status() {
        Ok(status) if status.success() => Ok(()),
        Ok(status) => Err(match status.code() {
            Some(code) => format!("exit code {code}"),
            None => "terminated by signal".to_string(),
        }),
        Err(e) => Err(format!("could not run `{program}`: {e}")),
    }
}

// ---------------------------------------------------------------------------
// Post-processing
// ---------------------------------------------------------------------------

/// Cosmetic pass over a written test file.
pub trait PostProcessor {
    fn process(&self, path: &Path) -> Result<()>;
}

/// Runs the configured formatter, then the import organizer, on each file.
pub struct CommandPostProcessor {
    formatter: Vec<String>,
    import_organizer: Vec<String>,
}

impl CommandPostProcessor {
    pub fn new(formatter: Vec<String>, import_organizer: Vec<String>) -> Self {
        Self { formatter, import_organizer }
    }

    pub fn from_config(config: &GenerateConfig) -> Self {
        Self::new(config.formatter.clone(), config.import_organizer.clone())
    }
}

impl PostProcessor for CommandPostProcessor {
    fn process(&self, path: &Path) -> Result<()> {
        for argv in [&self.formatter, &self.import_organizer] {
            run_command(argv, Some(path), None).map_err(|status| Error::PostProcess {
                tool: argv.join(" "),
                path: path.to_path_buf(),
                status,
            })?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tool installation (`tabletest init`)
// ---------------------------------------------------------------------------

/// Commands `init` runs, in order: install goimports and mockery, then generate mocks.
pub fn install_steps() -> Vec<Vec<String>> {
    [
        &["go", "install", "golang.org/x/tools/cmd/goimports@latest"][..],
        &["go", "install", "github.com/vektra/mockery/v2@v2.38.0"][..],
        &["mockery", "--all"][..],
    ]
    .iter()
    .map(|argv| argv.iter().map(|s| s.to_string()).collect())
    .collect()
}

/// Install the auxiliary tools and generate mocks in `root`. With `dry_run` the commands
/// are only logged.
pub fn run_init(root: &Path, dry_run: bool) -> Result<()> {
    for argv in install_steps() {
        let line = argv.join(" ");
        if dry_run {
            info!(command = line.as_str(), "Would run");
            continue;
        }
        info!(command = line.as_str(), "Running");
        run_command(&argv, None, Some(root))
            .map_err(|status| Error::ToolInstall { command: line.clone(), status })?;
    }
    Ok(())
}

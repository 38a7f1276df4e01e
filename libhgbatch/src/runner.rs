// Copyright 2018-2019 Joe Neeman.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
//
// See the LICENSE-APACHE or LICENSE-MIT files at the top-level directory
// of this distribution.

//! Running external commands to completion.
//!
//! Everything that touches the working copy goes through [`CommandRunner`]. Its calls block until
//! the child exits, which is what we want: each `hg` step depends on the previous one.

use {
    itertools::Itertools,
    std::{
        ffi::{OsStr, OsString},
        fs::OpenOptions,
        io::{self, Write},
        path::PathBuf,
        process::Command,
    },
};

use crate::Error;

/// What a finished command left behind.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CommandOutput {
    /// The exit code, or -1 if the process was killed by a signal.
    pub code: i32,
    /// Everything written to stdout.
    pub stdout: Vec<u8>,
    /// Everything written to stderr.
    pub stderr: Vec<u8>,
}

impl CommandOutput {
    /// Did the command exit with code zero?
    pub fn success(&self) -> bool {
        self.code == 0
    }
}

/// Something that can run a command and wait for it.
pub trait CommandRunner {
    /// Runs `args` (the program followed by its arguments) to completion.
    ///
    /// If `log` is set, the command line, exit code and captured output are appended to the audit
    /// log. If `check` is set, a non-zero exit code is turned into [`Error::CommandFailed`];
    /// otherwise it is returned for the caller to look at.
    fn run(&mut self, args: &[OsString], check: bool, log: bool) -> Result<CommandOutput, Error>;
}

/// Joins a command into a single line for messages and logs.
pub fn command_line<S: AsRef<OsStr>>(args: &[S]) -> String {
    args.iter().map(|a| a.as_ref().to_string_lossy()).join(" ")
}

/// Runs commands as child processes of this one.
#[derive(Clone, Debug)]
pub struct ProcessRunner {
    cwd: PathBuf,
    log_file: Option<PathBuf>,
}

impl ProcessRunner {
    /// Creates a runner whose commands run in `cwd`, logging to `log_file` (if there is one).
    pub fn new<P: Into<PathBuf>>(cwd: P, log_file: Option<PathBuf>) -> ProcessRunner {
        ProcessRunner {
            cwd: cwd.into(),
            log_file,
        }
    }

    fn append_log(&self, command: &str, output: &CommandOutput) -> Result<(), Error> {
        let Some(path) = &self.log_file else {
            return Ok(());
        };
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(Error::io(path))?;
        write!(
            file,
            "-----\n{}\nexitcode: {}\n{}\n{}\n",
            command,
            output.code,
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr),
        )
        .map_err(Error::io(path))
    }
}

impl CommandRunner for ProcessRunner {
    fn run(&mut self, args: &[OsString], check: bool, log: bool) -> Result<CommandOutput, Error> {
        let command = command_line(args);
        let Some((program, rest)) = args.split_first() else {
            return Err(Error::Spawn {
                command,
                source: io::Error::new(io::ErrorKind::InvalidInput, "empty command line"),
            });
        };

        debug!("running `{}` in {:?}", command, self.cwd);
        let output = Command::new(program)
            .args(rest)
            .current_dir(&self.cwd)
            .output()
            .map_err(|source| Error::Spawn {
                command: command.clone(),
                source,
            })?;
        let output = CommandOutput {
            code: output.status.code().unwrap_or(-1),
            stdout: output.stdout,
            stderr: output.stderr,
        };
        debug!("`{}` exited with code {}", command, output.code);

        if log {
            self.append_log(&command, &output)?;
        }
        if check && !output.success() {
            return Err(Error::CommandFailed {
                command,
                code: output.code,
            });
        }
        Ok(output)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> Vec<OsString> {
        ["sh", "-c", script].into_iter().map(OsString::from).collect()
    }

    #[test]
    fn captures_output() {
        let dir = tempfile::tempdir().unwrap();
        let mut runner = ProcessRunner::new(dir.path(), None);
        let out = runner
            .run(&sh("echo out; echo err >&2; exit 3"), false, false)
            .unwrap();
        assert_eq!(out.code, 3);
        assert_eq!(out.stdout, b"out\n");
        assert_eq!(out.stderr, b"err\n");
        assert!(!out.success());
    }

    #[test]
    fn runs_in_cwd() {
        let dir = tempfile::tempdir().unwrap();
        let mut runner = ProcessRunner::new(dir.path(), None);
        runner.run(&sh("touch here"), true, false).unwrap();
        assert!(dir.path().join("here").exists());
    }

    #[test]
    fn check_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut runner = ProcessRunner::new(dir.path(), None);
        let err = runner.run(&sh("exit 2"), true, false).unwrap_err();
        match err {
            Error::CommandFailed { command, code } => {
                assert_eq!(command, "sh -c exit 2");
                assert_eq!(code, 2);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn appends_to_log() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("patchlog.log");
        let mut runner = ProcessRunner::new(dir.path(), Some(log.clone()));

        runner.run(&sh("echo one"), false, true).unwrap();
        runner.run(&sh("echo two >&2; exit 1"), false, true).unwrap();
        runner.run(&sh("echo unlogged"), false, false).unwrap();

        assert_eq!(
            std::fs::read_to_string(&log).unwrap(),
            "-----\nsh -c echo one\nexitcode: 0\none\n\n\n\
             -----\nsh -c echo two >&2; exit 1\nexitcode: 1\n\ntwo\n\n"
        );
    }

    #[test]
    fn logs_before_failing() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("patchlog.log");
        let mut runner = ProcessRunner::new(dir.path(), Some(log.clone()));
        assert!(runner.run(&sh("exit 4"), true, true).is_err());
        assert!(std::fs::read_to_string(&log).unwrap().contains("exitcode: 4"));
    }

    #[test]
    fn missing_program() {
        let dir = tempfile::tempdir().unwrap();
        let mut runner = ProcessRunner::new(dir.path(), None);
        let args = vec![OsString::from("hgbatch-no-such-program")];
        assert!(matches!(
            runner.run(&args, false, false),
            Err(Error::Spawn { .. })
        ));
        assert!(matches!(runner.run(&[], false, false), Err(Error::Spawn { .. })));
    }
}

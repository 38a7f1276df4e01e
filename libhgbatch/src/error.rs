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

use {
    itertools::Itertools,
    std::{io, path::PathBuf},
};

/// The ways in which importing a batch of patches can fail.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Every remaining patch depends on another remaining patch, so there is no way to pick the
    /// next one.
    #[error("Could not find a patch to apply next; the remaining patches depend on each other: {}", display_paths(.remaining))]
    CyclicOrUnresolvedDependency {
        /// The patches that were still waiting to be placed.
        remaining: Vec<PathBuf>,
    },
    /// A command that was required to succeed exited with a non-zero code.
    #[error("Failed to run {command} (exit code {code})")]
    CommandFailed {
        /// The full command line.
        command: String,
        /// The exit code, or -1 if the process was killed by a signal.
        code: i32,
    },
    /// Reading or writing one of our files failed.
    #[error("I/O error on {path:?}")]
    Io {
        /// The file we were working with.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: io::Error,
    },
    /// The external command couldn't be started at all.
    #[error("Could not start {command}")]
    Spawn {
        /// The full command line.
        command: String,
        /// The underlying error.
        #[source]
        source: io::Error,
    },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Error {
        let path = path.into();
        move |source| Error::Io { path, source }
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths.iter().map(|p| p.display()).join(", ")
}

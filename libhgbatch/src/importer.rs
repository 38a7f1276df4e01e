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
    std::{ffi::OsString, path::Path},
};

use crate::{
    CommandOutput, CommandRunner, Config, Error, Notification, Notifier, PatchFile, reorder,
};

/// The revision that `hg update` falls back to when a patch's parent is unusable.
const CURRENT_REV: &str = "@";

/// How an import turned out, when it didn't fail outright.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Outcome {
    /// There were no patches.
    NothingToPatch,
    /// `hg import` applied every patch, possibly with fuzz.
    Applied {
        /// The number of patches.
        count: usize,
        /// The revision the patches were applied on top of.
        base: String,
        /// The bookmark that was created at `base`.
        bookmark: String,
        /// Whether some hunks only applied with fuzz.
        fuzz: bool,
    },
    /// `hg import` gave up.
    ImportFailed {
        /// The exit code of `hg import`.
        code: i32,
        /// The bookmark that was created before importing.
        bookmark: String,
    },
}

impl Outcome {
    /// The code that the process should exit with.
    pub fn exit_code(&self) -> i32 {
        match self {
            Outcome::NothingToPatch | Outcome::Applied { .. } => 0,
            Outcome::ImportFailed { code, .. } => *code,
        }
    }
}

/// Imports batches of patches into a working copy.
pub struct Importer<R, N> {
    config: Config,
    runner: R,
    notifier: N,
}

impl<R: CommandRunner, N: Notifier> Importer<R, N> {
    /// Creates a new importer.
    pub fn new(config: Config, runner: R, notifier: N) -> Importer<R, N> {
        Importer {
            config,
            runner,
            notifier,
        }
    }

    /// The configuration this importer was created with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The command runner.
    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// The notifier.
    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    fn hg<I, S>(&mut self, args: I, check: bool) -> Result<CommandOutput, Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        let args = std::iter::once(OsString::from(&self.config.hg))
            .chain(args.into_iter().map(Into::into))
            .collect::<Vec<_>>();
        self.runner.run(&args, check, true)
    }

    fn write_manifest(&self, patches: &[PatchFile]) -> Result<(), Error> {
        let mut contents = patches.iter().map(|p| p.path.display()).join("\n");
        contents.push('\n');
        std::fs::write(&self.config.manifest, contents).map_err(Error::io(&self.config.manifest))
    }

    /// Updates the working copy to `parent` if possible, or to the current revision otherwise.
    ///
    /// Returns the revision that we ended up updating to.
    fn update_to_base(&mut self, parent: Option<String>) -> Result<String, Error> {
        if let Some(rev) = parent {
            if self.hg(["update", "-C", rev.as_str()], false)?.success() {
                return Ok(rev);
            }
            warn!("could not update to {rev}, falling back to {CURRENT_REV}");
        }
        self.hg(["update", "-C", CURRENT_REV], false)?;
        Ok(CURRENT_REV.to_owned())
    }

    /// Applies a batch of patches.
    ///
    /// The working copy is first updated to the parent of the first patch (or to `@` if that
    /// doesn't work), then a bookmark is forced onto that revision, and then all the patches are
    /// imported in one `hg import --partial` invocation. Exit code 1 from the import means that
    /// some hunks needed fuzz; we count that as a success.
    ///
    /// Errors are only returned for things that stop us from getting as far as the import:
    /// unreadable patches, inconsistent ordering, or a failure to set the bookmark.
    pub fn apply_patches<P: AsRef<Path>>(&mut self, paths: &[P]) -> Result<Outcome, Error> {
        if paths.is_empty() {
            self.notifier.notify(
                &Notification::new("Applying patches", "Nothing to patch").icon("none"),
            );
            return Ok(Outcome::NothingToPatch);
        }

        let mut patches = paths
            .iter()
            .map(PatchFile::load)
            .collect::<Result<Vec<_>, _>>()?;
        if self.config.reorder {
            patches = reorder(patches)?;
        }
        self.write_manifest(&patches)?;

        let first = &patches[0];
        let bookmark = self.config.naming.bookmark_name(&first.path);
        let parent = first.header.parent_id.as_ref().map(ToString::to_string);

        let base = self.update_to_base(parent)?;
        info!("updated to {base}");

        self.hg(["bookmark", "-f", bookmark.as_str()], true)?;
        info!("created bookmark {bookmark}");

        let import_args = ["import", "--partial"]
            .into_iter()
            .map(OsString::from)
            .chain(patches.iter().map(|p| p.path.clone().into_os_string()));
        let code = self.hg(import_args, false)?.code;

        let outcome = match code {
            0 | 1 => Outcome::Applied {
                count: patches.len(),
                base,
                bookmark,
                fuzz: code == 1,
            },
            code => Outcome::ImportFailed { code, bookmark },
        };
        info!("import finished: {outcome:?}");
        self.notifier.notify(&notification(&outcome, &patches));
        Ok(outcome)
    }
}

fn short_rev(rev: &str) -> &str {
    rev.char_indices().nth(7).map_or(rev, |(idx, _)| &rev[..idx])
}

fn notification(outcome: &Outcome, patches: &[PatchFile]) -> Notification {
    match outcome {
        Outcome::NothingToPatch => {
            Notification::new("Applying patches", "Nothing to patch").icon("none")
        }
        Outcome::Applied {
            count,
            base,
            bookmark,
            fuzz,
        } => {
            let body = format!(
                "{} patches applied at {}{}\n\n{}",
                count,
                short_rev(base),
                if *fuzz { " (with fuzz)" } else { "" },
                patches.iter().map(|p| p.header.title.as_str()).join("\n"),
            );
            Notification::new(format!("Patched branch: {bookmark}"), body).icon("edit-copy")
        }
        Outcome::ImportFailed { code, bookmark } => Notification::new(
            format!("Failed to patch branch: {bookmark}"),
            format!("hg import exited with code {code}"),
        )
        .icon("dialog-error"),
    }
}

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

use std::path::PathBuf;

use crate::BookmarkNaming;

/// Everything that an [`Importer`](crate::Importer) needs to know about its surroundings.
///
/// Apart from the location of the temporary directory, nothing in this crate reads the
/// environment; the caller is expected to fill this in.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    /// The working copy that the patches are imported into.
    pub dest: PathBuf,
    /// The Mercurial executable.
    pub hg: String,
    /// Where to append the output of every command we run, if anywhere.
    pub log_file: Option<PathBuf>,
    /// Where to write the list of patches, in the order they are applied.
    pub manifest: PathBuf,
    /// Whether to sort the batch by its parent/child headers before importing.
    pub reorder: bool,
    /// How to name the bookmark.
    pub naming: BookmarkNaming,
}

impl Config {
    /// The default configuration for importing into `dest`.
    pub fn new<P: Into<PathBuf>>(dest: P) -> Config {
        let tmp = std::env::temp_dir();
        Config {
            dest: dest.into(),
            hg: "hg".to_owned(),
            log_file: Some(tmp.join("patchlog.log")),
            manifest: tmp.join("plist"),
            reorder: false,
            naming: BookmarkNaming::Numeric,
        }
    }
}

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

//! Reading the metadata that `hg export` writes at the top of a patch.
//!
//! An exported patch starts like this:
//!
//! ```text
//! # HG changeset patch
//! # User Someone <someone@example.com>
//! # Date 1426258456 -32400
//! # Node ID 5c0ff2fa36d04fcec9ec3ba9d46df3b3e2bc3d21
//! # Parent  6a26eb1a2fa08bf1ed4e6ca5fe46b88d8b2b2d9e
//! commandserver: extract method to create commandserver instance per request
//! ```
//!
//! Everything here is a pure function of the text, except for [`PatchFile::load`].

use {
    regex::Regex,
    std::{
        fmt,
        path::{Path, PathBuf},
        sync::LazyLock,
    },
};

use crate::Error;

/// The marker that opens the header of an exported changeset.
pub const HEADER_MARKER: &str = "# HG changeset patch";

/// What [`extract_title`] returns for a patch without a recognizable summary line.
pub const UNKNOWN_TITLE: &str = "<unknown title>";

static NODE_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^# Node ID\s+([a-f0-9]{40})").expect("valid node id regex"));
static PARENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^# Parent\s+([a-f0-9]{40})").expect("valid parent regex"));

/// A full 40-character hexadecimal changeset hash.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct RevId(String);

impl RevId {
    /// The hash as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The abbreviated (7-character) form that people usually read.
    pub fn short(&self) -> &str {
        &self.0[..7]
    }
}

impl fmt::Display for RevId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn capture(re: &Regex, text: &str) -> Option<RevId> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| RevId(m.as_str().to_owned()))
}

/// Finds the `# Node ID` line of a patch header.
pub fn extract_node_id(text: &str) -> Option<RevId> {
    capture(&NODE_ID_RE, text)
}

/// Finds the `# Parent` line of a patch header.
pub fn extract_parent_id(text: &str) -> Option<RevId> {
    capture(&PARENT_RE, text)
}

/// Returns the first line after the header marker that isn't a `#` comment.
///
/// The title is positional: it is whatever comes right after the header block, so this is a scan
/// over the lines rather than a pattern match.
pub fn extract_title(text: &str) -> String {
    let mut in_header = false;
    for line in text.lines() {
        if !in_header {
            in_header = line.contains(HEADER_MARKER);
        } else if !line.starts_with('#') {
            return line.to_owned();
        }
    }
    UNKNOWN_TITLE.to_owned()
}

/// The metadata we care about from a single patch.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PatchHeader {
    /// The hash of the changeset this patch was exported from.
    pub node_id: Option<RevId>,
    /// The hash of the changeset it was made on top of.
    pub parent_id: Option<RevId>,
    /// The one-line summary.
    pub title: String,
}

impl PatchHeader {
    /// Extracts all of the metadata from the text of a patch.
    pub fn parse(text: &str) -> PatchHeader {
        PatchHeader {
            node_id: extract_node_id(text),
            parent_id: extract_parent_id(text),
            title: extract_title(text),
        }
    }
}

/// A patch on disk, together with its parsed header.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PatchFile {
    /// Where the patch lives.
    pub path: PathBuf,
    /// What we found in its header.
    pub header: PatchHeader,
}

impl PatchFile {
    /// Reads a patch from disk.
    ///
    /// Non-UTF-8 bytes (a binary diff, say) are replaced rather than rejected, since only the
    /// header needs to be readable.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<PatchFile, Error> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(Error::io(path))?;
        Ok(PatchFile::from_text(path, &String::from_utf8_lossy(&bytes)))
    }

    /// Builds a `PatchFile` from text that has already been read.
    pub fn from_text<P: Into<PathBuf>>(path: P, text: &str) -> PatchFile {
        PatchFile {
            path: path.into(),
            header: PatchHeader::parse(text),
        }
    }
}

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
    regex::Regex,
    std::{path::Path, sync::LazyLock},
};

static SERIES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+-of-\d+-").expect("valid series regex"));

/// How to name the bookmark that marks an imported batch.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum BookmarkNaming {
    /// `p` followed by the number at the start of the file name: `0042-fix.patch` becomes `p42`.
    #[default]
    Numeric,
    /// `p` followed by the first three dash-separated words of the file name, after dropping any
    /// `N-of-M-` series marker: `15693-yuya-commandserver-extract-method.patch` becomes
    /// `p15693-yuya-commandserver`.
    Slug,
}

impl BookmarkNaming {
    /// Derives a bookmark name from the path of the first patch in a batch.
    pub fn bookmark_name<P: AsRef<Path>>(self, path: P) -> String {
        let file_name = path
            .as_ref()
            .file_name()
            .map(|name| name.to_string_lossy())
            .unwrap_or_default();
        match self {
            BookmarkNaming::Numeric => numeric_name(&file_name),
            BookmarkNaming::Slug => slug_name(&file_name),
        }
    }
}

fn numeric_name(file_name: &str) -> String {
    let digits = file_name
        .chars()
        .take_while(char::is_ascii_digit)
        .collect::<String>();
    let digits = digits.trim_start_matches('0');
    format!("p{}", if digits.is_empty() { "0" } else { digits })
}

fn slug_name(file_name: &str) -> String {
    let stripped = SERIES_RE.replace_all(file_name, "");
    format!("p{}", stripped.split('-').take(3).join("-"))
}

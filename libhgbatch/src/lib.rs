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

#![deny(missing_docs)]

//! A library for applying a batch of exported Mercurial patches to a working copy.
//!
//! The heavy lifting (applying hunks, committing, moving bookmarks) is done by the `hg`
//! executable. This crate figures out what to ask it for: it reads the `# HG changeset patch`
//! header of every patch, puts the batch into parent-before-child order, picks the revision to
//! update to, names a bookmark, runs the import and finally tells the user how it went.
//!
//! The entry point is [`Importer`], which is configured by a [`Config`] and talks to the outside
//! world only through a [`CommandRunner`] (blocking) and a [`Notifier`] (fire-and-forget).

#[macro_use]
extern crate log;

#[cfg(test)]
#[macro_use]
extern crate pretty_assertions;

mod config;
mod error;
pub mod header;
mod importer;
mod naming;
pub mod notify;
mod reorder;
pub mod runner;

pub use crate::{
    config::Config,
    error::Error,
    header::{PatchFile, PatchHeader, RevId},
    importer::{Importer, Outcome},
    naming::BookmarkNaming,
    notify::{DesktopNotifier, Notification, Notifier, SilentNotifier},
    reorder::reorder,
    runner::{CommandOutput, CommandRunner, ProcessRunner},
};

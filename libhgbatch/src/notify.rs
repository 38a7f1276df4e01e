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

//! Telling the user how things went.
//!
//! Unlike [`CommandRunner`](crate::CommandRunner), a [`Notifier`] never blocks and never fails:
//! a notification that doesn't show up is not worth aborting (or delaying) an import for.

use std::process::{Command, Stdio};

/// A desktop notification.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Notification {
    /// The summary line.
    pub title: String,
    /// The body text.
    pub body: String,
    /// The name of a freedesktop icon, if any.
    pub icon: Option<String>,
}

impl Notification {
    /// Creates a notification without an icon.
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Notification {
        Notification {
            title: title.into(),
            body: body.into(),
            icon: None,
        }
    }

    /// Sets the icon.
    pub fn icon(mut self, icon: impl Into<String>) -> Notification {
        self.icon = Some(icon.into());
        self
    }
}

/// Best-effort, fire-and-forget delivery of notifications.
pub trait Notifier {
    /// Sends a notification without waiting for it to be shown.
    fn notify(&mut self, notification: &Notification);
}

impl<N: Notifier + ?Sized> Notifier for Box<N> {
    fn notify(&mut self, notification: &Notification) {
        (**self).notify(notification)
    }
}

/// Shows notifications on the desktop by spawning `notify-send` (or a compatible program).
#[derive(Clone, Debug)]
pub struct DesktopNotifier {
    program: String,
}

impl DesktopNotifier {
    /// Creates a notifier that runs `program -i <icon> <title> <body>`.
    pub fn new(program: impl Into<String>) -> DesktopNotifier {
        DesktopNotifier {
            program: program.into(),
        }
    }
}

impl Default for DesktopNotifier {
    fn default() -> DesktopNotifier {
        DesktopNotifier::new("notify-send")
    }
}

impl Notifier for DesktopNotifier {
    fn notify(&mut self, notification: &Notification) {
        let icon = notification.icon.as_deref().unwrap_or("none");
        debug!("notifying: {:?}", notification.title);
        // The child is deliberately not waited on.
        let spawned = Command::new(&self.program)
            .args([
                "-i",
                icon,
                notification.title.as_str(),
                notification.body.as_str(),
            ])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();
        if let Err(e) = spawned {
            warn!("could not run {}: {}", self.program, e);
        }
    }
}

/// A notifier that only writes to the log.
#[derive(Clone, Copy, Debug, Default)]
pub struct SilentNotifier;

impl Notifier for SilentNotifier {
    fn notify(&mut self, notification: &Notification) {
        info!("{}: {}", notification.title, notification.body);
    }
}

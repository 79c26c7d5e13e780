//! Page navigation capability used by the shared read failure handler

use std::fmt;

use tracing::warn;
use url::Url;

/// Performs a full navigation away from the current console to `url`.
///
/// A browser host would replace the current page; other hosts decide what
/// "leaving for the legacy console" means for them.
pub trait Navigator: Send + Sync + fmt::Debug {
    fn navigate(&self, url: &Url);
}

/// Navigator that only records the redirect in the log
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNavigator;

impl Navigator for TracingNavigator {
    fn navigate(&self, url: &Url) {
        warn!(%url, "Request landed on the legacy console, navigating away");
    }
}

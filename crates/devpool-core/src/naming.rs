//! Session-scoped instance naming
//!
//! Instances started by a session are named `<prefix>.<session_id>.<millis>`.
//! Any instance carrying the same `<prefix>.<session_id>.` head belongs to the
//! session's family and may be reused by it.

use crate::provider::InstanceNaming;
use chrono::Utc;

pub const DEFAULT_PREFIX: &str = "Detox";

/// Naming scheme bound to one session id
pub struct SessionNaming {
    prefix: String,
    session_id: String,
    now_millis: Box<dyn Fn() -> i64 + Send + Sync>,
}

impl SessionNaming {
    pub fn new(prefix: impl Into<String>, session_id: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            session_id: session_id.into(),
            now_millis: Box::new(|| Utc::now().timestamp_millis()),
        }
    }

    /// Replace the clock used by [`generate_name`](Self::generate_name)
    pub fn with_clock(mut self, now_millis: impl Fn() -> i64 + Send + Sync + 'static) -> Self {
        self.now_millis = Box::new(now_millis);
        self
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    fn family_head(&self) -> String {
        format!("{}.{}.", self.prefix, self.session_id)
    }

    /// Name for a new instance of this session
    pub fn generate_name(&self) -> String {
        format!("{}{}", self.family_head(), (self.now_millis)())
    }
}

impl InstanceNaming for SessionNaming {
    fn is_familial(&self, name: &str) -> bool {
        name.starts_with(&self.family_head())
    }
}

impl std::fmt::Debug for SessionNaming {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionNaming")
            .field("prefix", &self.prefix)
            .field("session_id", &self.session_id)
            .finish()
    }
}

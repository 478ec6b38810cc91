//! Session affinity for concurrent requests sharing one outer session.
//!
//! Several requests made against the same outer session (e.g. one browser
//! session) share a single [`InteractionSession`]. It is opened by the first
//! [`SessionLease`] and closed when the last concurrent lease is dropped.

use std::{collections::HashMap, fmt, hash::Hash, sync::Arc};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractionSession {
  pub id:        Uuid,
  pub opened_at: DateTime<Utc>,
}

impl InteractionSession {
  fn open() -> Self {
    Self {
      id:        Uuid::new_v4(),
      opened_at: Utc::now(),
    }
  }
}

struct Entry {
  session: Arc<InteractionSession>,
  usage:   usize,
}

/// Reference-counted sessions keyed by outer session. Opening, sharing and
/// closing are atomic per registry.
pub struct SessionRegistry<K> {
  entries: Mutex<HashMap<K, Entry>>,
}

impl<K> Default for SessionRegistry<K> {
  fn default() -> Self {
    Self {
      entries: Mutex::new(HashMap::new()),
    }
  }
}

impl<K> SessionRegistry<K>
where
  K: Eq + Hash + Clone + fmt::Debug,
{
  pub fn new() -> Self { Self::default() }

  /// Join the session of `key`, opening it if no other lease holds it.
  pub fn attach(&self, key: K) -> SessionLease<'_, K> {
    let mut entries = self.entries.lock();
    let entry = entries.entry(key.clone()).or_insert_with(|| {
      let session = InteractionSession::open();
      debug!(?key, session = %session.id, "session opened");
      Entry {
        session: Arc::new(session),
        usage:   0,
      }
    });
    entry.usage += 1;
    SessionLease {
      registry: self,
      session: Arc::clone(&entry.session),
      key,
    }
  }

  /// Number of live leases on the session of `key`.
  pub fn usage(&self, key: &K) -> usize {
    self.entries.lock().get(key).map_or(0, |entry| entry.usage)
  }

  pub fn is_open(&self, key: &K) -> bool {
    self.entries.lock().contains_key(key)
  }

  pub fn open_sessions(&self) -> usize { self.entries.lock().len() }

  fn release(&self, key: &K) {
    let mut entries = self.entries.lock();
    let Some(entry) = entries.get_mut(key) else {
      return;
    };
    entry.usage = entry.usage.saturating_sub(1);
    if entry.usage == 0
      && let Some(entry) = entries.remove(key)
    {
      debug!(?key, session = %entry.session.id, "session closed");
    }
  }
}

impl<K> fmt::Debug for SessionRegistry<K> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("SessionRegistry")
      .field("open_sessions", &self.entries.lock().len())
      .finish()
  }
}

/// One request's hold on a shared session.
pub struct SessionLease<'a, K>
where
  K: Eq + Hash + Clone + fmt::Debug,
{
  registry: &'a SessionRegistry<K>,
  session:  Arc<InteractionSession>,
  key:      K,
}

impl<K> SessionLease<'_, K>
where
  K: Eq + Hash + Clone + fmt::Debug,
{
  pub fn session(&self) -> &InteractionSession { &self.session }

  pub fn key(&self) -> &K { &self.key }
}

impl<K> Drop for SessionLease<'_, K>
where
  K: Eq + Hash + Clone + fmt::Debug,
{
  fn drop(&mut self) { self.registry.release(&self.key); }
}

#[cfg(test)]
mod tests {
  use std::{sync::Barrier, thread};

  use super::*;

  #[test]
  fn concurrent_leases_share_one_session() {
    let registry = SessionRegistry::new();
    let first = registry.attach("browser-1");
    let second = registry.attach("browser-1");
    assert_eq!(first.session().id, second.session().id);
    assert_eq!(registry.usage(&"browser-1"), 2);

    let other = registry.attach("browser-2");
    assert_ne!(first.session().id, other.session().id);
    assert_eq!(registry.open_sessions(), 2);
  }

  #[test]
  fn session_closes_after_the_last_lease() {
    let registry = SessionRegistry::new();
    let first = registry.attach(7_u32);
    let second = registry.attach(7_u32);
    let id = first.session().id;

    drop(first);
    assert!(registry.is_open(&7));
    drop(second);
    assert!(!registry.is_open(&7));

    let reopened = registry.attach(7_u32);
    assert_ne!(reopened.session().id, id);
  }

  #[test]
  fn threads_never_close_a_session_in_use() {
    let registry = SessionRegistry::new();
    let held = registry.attach("shared");
    let id = held.session().id;
    let barrier = Barrier::new(8);

    thread::scope(|scope| {
      for _ in 0..8 {
        scope.spawn(|| {
          barrier.wait();
          for _ in 0..100 {
            let lease = registry.attach("shared");
            assert_eq!(lease.session().id, id);
          }
        });
      }
    });

    assert_eq!(registry.usage(&"shared"), 1);
    drop(held);
    assert_eq!(registry.open_sessions(), 0);
  }
}

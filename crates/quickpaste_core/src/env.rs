//! Process-global environment overrides for tests and tooling.

use std::sync::{Mutex, MutexGuard, OnceLock};

/// Return the process-wide lock serializing environment mutation.
pub fn env_lock() -> &'static Mutex<()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(()))
}

#[allow(unused_unsafe)]
fn write_var(key: &str, value: Option<&str>) {
    // SAFETY: every writer holds `env_lock` for the lifetime of its ScopedEnv.
    unsafe {
        match value {
            Some(value) => std::env::set_var(key, value),
            None => std::env::remove_var(key),
        }
    }
}

/// A set of environment overrides held under [`env_lock`].
///
/// Every touched variable is restored to its prior value (or removed) when the
/// scope drops, in reverse order of mutation.
pub struct ScopedEnv {
    saved: Vec<(String, Option<String>)>,
    _lock: MutexGuard<'static, ()>,
}

impl ScopedEnv {
    /// Acquire the environment lock. A lock poisoned by a panicking test is
    /// recovered since the previous holder already restored its variables.
    pub fn new() -> Self {
        let lock = env_lock()
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Self {
            saved: Vec::new(),
            _lock: lock,
        }
    }

    /// Set `key=value` until the scope drops.
    pub fn set(&mut self, key: &str, value: &str) -> &mut Self {
        self.remember(key);
        write_var(key, Some(value));
        self
    }

    /// Remove `key` until the scope drops.
    pub fn remove(&mut self, key: &str) -> &mut Self {
        self.remember(key);
        write_var(key, None);
        self
    }

    fn remember(&mut self, key: &str) {
        if self.saved.iter().any(|(saved, _)| saved == key) {
            return;
        }
        self.saved.push((key.to_string(), std::env::var(key).ok()));
    }
}

impl Default for ScopedEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (key, previous) in self.saved.drain(..).rev() {
            write_var(&key, previous.as_deref());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ScopedEnv;

    #[test]
    fn scoped_env_restores_previous_values() {
        let key = "QUICKPASTE_TEST_SCOPED_ENV_RESTORE";
        assert!(std::env::var(key).is_err());
        let mut scope = ScopedEnv::new();
        scope.set(key, "first").set(key, "second");
        assert_eq!(std::env::var(key).ok().as_deref(), Some("second"));
        drop(scope);
        assert!(std::env::var(key).is_err());
    }

    #[test]
    fn scoped_env_remove_is_undone_on_drop() {
        let key = "PATH";
        let Ok(previous) = std::env::var(key) else {
            return;
        };
        let mut scope = ScopedEnv::new();
        scope.remove(key);
        assert!(std::env::var(key).is_err());
        drop(scope);
        assert_eq!(std::env::var(key).ok(), Some(previous));
    }
}

// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::sync::{MutexGuard, PoisonError};

/// Disambiguate the type of `StdMutex` from stdlib and tokio to avoid conflicts.
pub type StdMutex<T> = std::sync::Mutex<T>;

/// Lock a [`StdMutex`], recovering the guard if a previous holder panicked.
///
/// Terminal restoration has to run while a panic is unwinding, so a poisoned lock is
/// not treated as fatal anywhere in this crate. The protected data is plain state
/// (mode flags, diagnostics strings) that stays consistent between statements.
pub fn lock_or_recover<T>(mutex: &StdMutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_lock_or_recover_after_poison() {
        let mutex = Arc::new(StdMutex::new(1));
        let mutex_clone = Arc::clone(&mutex);

        let join_result = std::thread::spawn(move || {
            let _guard = mutex_clone.lock().unwrap();
            panic!("poison the lock");
        })
        .join();
        assert!(join_result.is_err());
        assert!(mutex.is_poisoned());

        *lock_or_recover(&mutex) += 1;
        assert_eq!(*lock_or_recover(&mutex), 2);
    }
}

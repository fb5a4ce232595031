//! The reentrancy guard: a per-thread set of providers currently executing
//! on this thread, preventing a provider from being re-entered by its own
//! nested lookup.
//!
//! Unlike the teacher's circular-dependency detector (which treats
//! re-entry as a fatal, panic-worthy condition because a DI factory cycle
//! can never terminate), the spec here treats re-entry as routine: a
//! provider that calls back into the resolver while already on the stack is
//! simply skipped for that inner call, as if it had returned no value. The
//! mechanism — a thread-local set plus an RAII guard that releases on every
//! exit path — is the same one `internal::circular` uses; only the policy
//! on detection differs.

use std::cell::RefCell;
use std::collections::HashSet;

use crate::value::ProviderId;

thread_local! {
    static ACTIVE: RefCell<HashSet<ProviderId>> = RefCell::new(HashSet::new());
}

/// True if `id` is currently executing on this thread.
pub(crate) fn is_active(id: ProviderId) -> bool {
    ACTIVE.with(|active| active.borrow().contains(&id))
}

/// RAII guard marking `id` active for the lifetime of the guard. Dropping
/// the guard deactivates `id` on every exit path, including unwinding from
/// a provider panic — this is what keeps the per-thread set empty at the
/// end of any top-level `resolve` call (spec invariant, and
/// `Resolver::guard_is_empty` asserts it in tests).
///
/// Activation is idempotent: entering a guard for an already-active id is a
/// logic error on the caller's part (the collection pass checks
/// [`is_active`] before constructing one), but the guard itself tolerates
/// it by simply removing the id once, which is harmless because the
/// [`resolver`](crate::resolver) module never nests a guard for the same id
/// within itself.
pub(crate) struct ActiveGuard {
    id: ProviderId,
}

impl ActiveGuard {
    pub(crate) fn enter(id: ProviderId) -> Self {
        ACTIVE.with(|active| {
            active.borrow_mut().insert(id);
        });
        Self { id }
    }
}

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        ACTIVE.with(|active| {
            active.borrow_mut().remove(&self.id);
        });
    }
}

/// True if no provider is active on this thread. Exposed for tests that
/// verify the post-resolve invariant from spec.md's testable properties.
pub(crate) fn is_empty_on_this_thread() -> bool {
    ACTIVE.with(|active| active.borrow().is_empty())
}

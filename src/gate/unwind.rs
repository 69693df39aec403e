// Panic absorption for the gate's fail-safe paths.
//
// `catch_unwind` stops the unwind but not the panic hook, which prints to
// stderr before unwinding starts. The hook installed here skips panics raised
// inside `absorb` and hands every other panic to the hook it replaced.

use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Once;

thread_local! {
    static ABSORBING: Cell<bool> = const { Cell::new(false) };
}

static INSTALL: Once = Once::new();

/// Chain a panic hook that stays silent for panics caught by [`absorb`].
///
/// Safe to call more than once; only the first call installs anything.
pub fn install_quiet_hook() {
    INSTALL.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if !ABSORBING.with(Cell::get) {
                previous(info);
            }
        }));
    });
}

/// Run `f`, turning a panic into `None`
pub fn absorb<T>(f: impl FnOnce() -> T) -> Option<T> {
    let outer = ABSORBING.with(|flag| flag.replace(true));
    let result = panic::catch_unwind(AssertUnwindSafe(f));
    ABSORBING.with(|flag| flag.set(outer));
    result.ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panic_inside_absorb_is_none() {
        install_quiet_hook();
        let result: Option<u8> = absorb(|| panic!("decoder blew up"));
        assert!(result.is_none());
        assert!(!ABSORBING.with(Cell::get));
    }

    #[test]
    fn values_pass_through() {
        assert_eq!(absorb(|| 7), Some(7));
        assert!(!ABSORBING.with(Cell::get));
    }

    #[test]
    fn nested_absorb_restores_outer_flag() {
        let inner = absorb(|| {
            let nested: Option<()> = absorb(|| panic!("inner"));
            assert!(nested.is_none());
            ABSORBING.with(Cell::get)
        });
        assert_eq!(inner, Some(true));
        assert!(!ABSORBING.with(Cell::get));
    }

    #[test]
    fn installing_twice_is_harmless() {
        install_quiet_hook();
        install_quiet_hook();
        let result: Option<()> = absorb(|| panic!("quiet"));
        assert!(result.is_none());
    }
}

//! Fault containment
//!
//! With the `std` feature, a panic inside a screen call is caught and turned
//! into [`ScreenFault::Panicked`]. Without it, only returned errors are
//! contained.

use super::screen::ScreenFault;

/// Run one screen call, converting a panic into a fault
#[cfg(feature = "std")]
pub fn contain<T>(phase: &'static str, f: impl FnOnce() -> Result<T, ScreenFault>) -> Result<T, ScreenFault> {
    // Caller drops the screen on any fault
    match std::panic::catch_unwind(std::panic::AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(_) => Err(ScreenFault::Panicked(phase)),
    }
}

/// Run one screen call
#[cfg(not(feature = "std"))]
pub fn contain<T>(_phase: &'static str, f: impl FnOnce() -> Result<T, ScreenFault>) -> Result<T, ScreenFault> {
    f()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passes_through_result() {
        assert_eq!(contain("update", || Ok(3)), Ok(3));
        assert_eq!(
            contain::<()>("draw", || Err(ScreenFault::Draw("boom"))),
            Err(ScreenFault::Draw("boom"))
        );
    }

    #[cfg(feature = "std")]
    #[test]
    fn test_panic_becomes_fault() {
        let result: Result<(), ScreenFault> = contain("handle", || panic!("screen bug"));
        assert_eq!(result, Err(ScreenFault::Panicked("handle")));
    }
}

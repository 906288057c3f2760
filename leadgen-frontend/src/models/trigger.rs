use std::sync::atomic::{AtomicBool, Ordering};

/// Server-side twin of a form's submit button.
///
/// Pressing disables the trigger until the returned guard drops; pressing a
/// disabled trigger does nothing. Two near-simultaneous posts from the same
/// browser therefore start at most one operation.
#[derive(Debug, Default)]
pub struct SubmitTrigger {
    disabled: AtomicBool,
}

#[must_use = "the trigger re-enables when the guard is dropped"]
pub struct Pressed<'a>(&'a AtomicBool);

impl SubmitTrigger {
    pub fn try_press(&self) -> Option<Pressed<'_>> {
        self.disabled
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| Pressed(&self.disabled))
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled.load(Ordering::SeqCst)
    }
}

impl Drop for Pressed<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_press_is_ignored_until_release() {
        let trigger = SubmitTrigger::default();

        let first = trigger.try_press();
        assert!(first.is_some());
        assert!(trigger.is_disabled());
        assert!(trigger.try_press().is_none());

        drop(first);
        assert!(!trigger.is_disabled());
        assert!(trigger.try_press().is_some());
    }
}

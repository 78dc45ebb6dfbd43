//! Mock watchdog implementation for testing

use crate::platform::traits::WatchdogInterface;
use std::cell::RefCell;
use std::rc::Rc;

/// Counts feeds; the count is readable through [`super::MockPlatform`].
#[derive(Debug)]
pub struct MockWatchdog {
    feeds: Rc<RefCell<u32>>,
}

impl MockWatchdog {
    pub(super) fn new(feeds: Rc<RefCell<u32>>) -> Self {
        Self { feeds }
    }
}

impl WatchdogInterface for MockWatchdog {
    fn feed(&mut self) {
        *self.feeds.borrow_mut() += 1;
    }
}

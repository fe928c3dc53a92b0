use std::sync::atomic::{AtomicBool, Ordering};

static STOP: AtomicBool = AtomicBool::new(false);

/// Requests cooperative shutdown. Trainers check [`interrupted`] between
/// iterations, never mid-traversal, so the information-set store is always
/// left at a coherent checkpoint.
pub fn request_stop() {
    STOP.store(true, Ordering::Relaxed);
}

/// True once [`request_stop`] has been called. A driver binary is expected
/// to poll this between training iterations.
pub fn interrupted() -> bool {
    STOP.load(Ordering::Relaxed)
}

/// Initialize the global tracing subscriber.
///
/// Safe to call more than once; subsequent calls are no-ops so tests can
/// share it freely.
pub fn init() {
    let _ = tracing_subscriber::fmt::try_init();
}

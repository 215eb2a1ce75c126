/// Handle to an open server-push log connection. The owner calls `close` at
/// most once.
pub trait LogConnection {
    fn close(&mut self);
}

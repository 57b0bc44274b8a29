/// User-facing notices raised by the gateway.
pub trait Notifier: Send + Sync {
    /// Blocking notice shown when a request exceeds its deadline.
    fn server_not_responding(&self);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionMsg {
    /// User asked to download `source_url` into `destination_path`.
    StartRequested {
        source_url: String,
        destination_path: String,
    },
    /// The transfer primitive returned successfully.
    TransferSucceeded,
    /// The transfer primitive reported a fault.
    TransferFailed { reason: String },
    /// One progress step interval has passed.
    StepElapsed,
    /// The post-outcome display delay has passed.
    ResetElapsed,
}

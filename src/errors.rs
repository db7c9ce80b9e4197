//! Error types for the speed test.
//!
//! Every sub-measurement reports failure through [`SpeedTestError`]. Only
//! connectivity and composite failures ever reach the user; the others are
//! absorbed by the runner and turned into zero values.

use std::error::Error;
use std::fmt;

/// Error type produced by a single HTTP exchange.
pub type TransportError = Box<dyn Error + Send + Sync>;

/// Categories of errors that can occur during speed testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The network never became reachable before the gate timed out.
    Connectivity,
    /// None of the latency targets answered.
    Probe,
    /// A single request failed.
    Transfer,
    /// A measurement window produced too little data.
    Measurement,
    /// Every measurement of a composite run came back empty.
    Composite,
    /// The notification could not be delivered.
    Notification,
}

impl ErrorKind {
    /// Get a user-friendly description of this error kind.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorKind::Connectivity => "No network connection",
            ErrorKind::Probe => "Latency probe failed",
            ErrorKind::Transfer => "Transfer error",
            ErrorKind::Measurement => "Measurement error",
            ErrorKind::Composite => "Speed test failed",
            ErrorKind::Notification => "Notification error",
        }
    }
}

/// A user-friendly error type for speed test operations.
#[derive(Debug)]
pub struct SpeedTestError {
    /// The kind of error.
    pub kind: ErrorKind,
    /// User-friendly error message.
    pub message: String,
    /// Optional suggestion for how to resolve the error.
    pub suggestion: Option<String>,
    /// The underlying error, if any.
    pub source: Option<TransportError>,
}

impl SpeedTestError {
    /// Create a new SpeedTestError.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into(), suggestion: None, source: None }
    }

    /// Add a suggestion for how to resolve the error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add the underlying error source.
    pub fn with_source(mut self, source: TransportError) -> Self {
        self.source = Some(source);
        self
    }

    pub fn connectivity(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Connectivity, message)
            .with_suggestion("Check your internet connection and try again.")
    }

    pub fn probe(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Probe, message)
    }

    pub fn transfer(source: TransportError) -> Self {
        let kind = classify_error(source.as_ref());
        Self::new(ErrorKind::Transfer, format!("{}: {}", kind, source))
            .with_source(source)
    }

    pub fn measurement(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Measurement, message)
    }

    pub fn composite(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Composite, message).with_suggestion(
            "The test servers may be unreachable. Try again later.",
        )
    }

    pub fn notification(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Notification, message)
    }
}

impl fmt::Display for SpeedTestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind.description(), self.message)?;

        if let Some(ref suggestion) = self.suggestion {
            write!(f, "\n  Suggestion: {}", suggestion)?;
        }

        Ok(())
    }
}

impl Error for SpeedTestError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source.as_ref().map(|e| e.as_ref() as &(dyn Error + 'static))
    }
}

/// Rough cause of a failed request, used to make transfer logs readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportFailure {
    Dns,
    Timeout,
    Tls,
    Network,
    Status,
    Unknown,
}

impl fmt::Display for TransportFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransportFailure::Dns => "DNS resolution error",
            TransportFailure::Timeout => "request timed out",
            TransportFailure::Tls => "TLS/SSL error",
            TransportFailure::Network => "network error",
            TransportFailure::Status => "server returned an error status",
            TransportFailure::Unknown => "request failed",
        };
        f.write_str(name)
    }
}

/// Classify a transport error based on its message chain.
pub fn classify_error(error: &(dyn Error + 'static)) -> TransportFailure {
    let mut text = error.to_string();
    let mut source = error.source();
    while let Some(inner) = source {
        text.push_str(": ");
        text.push_str(&inner.to_string());
        source = inner.source();
    }
    let error_str = text.to_lowercase();

    if error_str.contains("dns")
        || error_str.contains("resolve")
        || error_str.contains("no such host")
    {
        return TransportFailure::Dns;
    }

    if error_str.contains("timeout")
        || error_str.contains("timed out")
        || error_str.contains("deadline")
    {
        return TransportFailure::Timeout;
    }

    if error_str.contains("tls")
        || error_str.contains("ssl")
        || error_str.contains("certificate")
        || error_str.contains("handshake")
    {
        return TransportFailure::Tls;
    }

    if error_str.contains("connection refused")
        || error_str.contains("connection reset")
        || error_str.contains("network unreachable")
        || error_str.contains("host unreachable")
        || error_str.contains("no route")
        || error_str.contains("broken pipe")
    {
        return TransportFailure::Network;
    }

    if error_str.contains("status client error")
        || error_str.contains("status server error")
        || error_str.contains("http status")
    {
        return TransportFailure::Status;
    }

    TransportFailure::Unknown
}

use core::fmt;

/// One wire communication error type.
///
/// Protocol outcomes such as a missing presence pulse or an exhausted search are reported
/// through return values; this type only carries failures of the underlying platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum OneWireError<E> {
    /// Encapsulates the error type from the underlying hardware.
    Other(E),
}

impl<E> From<E> for OneWireError<E> {
    fn from(other: E) -> Self {
        Self::Other(other)
    }
}

impl<E: fmt::Debug> fmt::Display for OneWireError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Other(e) => write!(f, "1-Wire platform error: {e:?}"),
        }
    }
}

impl<E: fmt::Debug> core::error::Error for OneWireError<E> {}

//! Conditional tracing macros (zero-cost when the feature is disabled).
//!
//! The decode pipeline reports spans and per-frame counters through these
//! macros. With the `tracing` feature enabled they forward to `tracing`;
//! without it they compile to nothing.

/// Create an info-level span for a decode stage.
///
/// When the `tracing` feature is enabled this creates a
/// `tracing::info_span!`. When disabled it compiles to a no-op that
/// returns a dummy guard.
#[cfg(feature = "tracing")]
macro_rules! trace_span {
    ($name:expr $(, $($field:tt)*)?) => {
        tracing::info_span!($name $(, $($field)*)?)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_span {
    ($name:expr $(, $($field:tt)*)?) => {
        $crate::trace::NoopSpan
    };
}

/// Emit an info-level event for per-frame measurements.
///
/// When the `tracing` feature is enabled this calls `tracing::info!`.
/// When disabled the field values are evaluated and discarded so call
/// sites do not accumulate unused-variable warnings.
#[cfg(feature = "tracing")]
macro_rules! trace_event {
    ($name:expr, $($key:ident = $value:expr),+ $(,)?) => {
        tracing::info!(name: $name, $($key = $value),+)
    };
    ($name:expr) => {
        tracing::info!(name: $name)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_event {
    ($name:expr, $($key:ident = $value:expr),+ $(,)?) => {
        let _ = ($($value,)+);
    };
    ($name:expr) => {};
}

pub(crate) use trace_event;
pub(crate) use trace_span;

/// A no-op span guard used when tracing is disabled.
///
/// Lets `trace_span!` appear in `let _guard = trace_span!(...).entered();`
/// positions without conditional compilation at call sites.
#[cfg(not(feature = "tracing"))]
pub struct NoopSpan;

#[cfg(not(feature = "tracing"))]
impl NoopSpan {
    /// Returns self, mimicking `Span::entered()`.
    #[inline]
    pub fn entered(self) -> Self {
        self
    }
}

//! Thin wrappers over the `metrics` crate macros, compiled out entirely
//! unless the `metrics` feature is enabled.

#[cfg(feature = "metrics")]
macro_rules! increment {
    ( $counter:expr ) => {
        ::metrics::counter!($counter).increment(1)
    };
}

#[cfg(not(feature = "metrics"))]
macro_rules! increment {
    ( $( $args:expr ),+ ) => {};
}

#[cfg(feature = "metrics")]
macro_rules! sample {
    ( $histogram:expr, $value:expr ) => {
        ::metrics::histogram!($histogram).record($value)
    };
}

#[cfg(not(feature = "metrics"))]
macro_rules! sample {
    ( $( $args:expr ),+ ) => {};
}

pub(crate) use increment;
pub(crate) use sample;

//! Diagnostic tracing helpers.
//!
//! Trace lines go to the application's `defmt` global logger when the `defmt`
//! feature is enabled and the driver instance has diagnostic logging switched
//! on. Without the feature the macro compiles to nothing.

macro_rules! trace {
    ($enabled:expr, $fmt:literal $(, $arg:expr)* $(,)?) => {{
        #[cfg(feature = "defmt")]
        {
            if $enabled {
                defmt::trace!($fmt $(, $arg)*);
            }
        }
        #[cfg(not(feature = "defmt"))]
        {
            let _ = ($enabled, $(&$arg),*);
        }
    }};
}

pub(crate) use trace;

#[macro_export]
#[cfg(feature = "debug-print")]
macro_rules! debug_print {
    ($( $args:expr ),*) => { log::debug!( $( $args ),* ); }
}

#[macro_export]
// Arguments are still borrowed so that callers don't trip over unused warnings
#[cfg(not(feature = "debug-print"))]
macro_rules! debug_print {
    ($( $args:expr ),*) => {
        $( let _ = &$args; )*
    };
}

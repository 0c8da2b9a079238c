//! Platform Selection
//!
//! Each supported SoC provides an [`IrqBoard`](crate::hal::board::IrqBoard)
//! implementation, selected through a Cargo feature.

cfg_if::cfg_if! {
    if #[cfg(feature = "max32660")] {
        pub mod max32660;
        pub use max32660::Max32660 as CurrentBoard;
    } else {
        compile_error!(
            "No platform selected!\n\
            Use: cargo build --features max32660"
        );
    }
}

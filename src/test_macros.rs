//! Support macros shared by the integration tests and benches

/// Resolve a path relative to the crate root
#[macro_export]
macro_rules! relative_file {
    ($f : expr) => {{
        let base = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        base.join($f)
    }};
}

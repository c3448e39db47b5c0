use std::sync::OnceLock;

static QUIET: OnceLock<bool> = OnceLock::new();

/// `FOLLOWKIT_QUIET=1` silences human-readable status lines; errors and
/// requested data (tables, JSON) are still printed.
pub fn is_quiet() -> bool {
    *QUIET.get_or_init(|| {
        std::env::var("FOLLOWKIT_QUIET")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    })
}

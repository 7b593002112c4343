use tracing::warn;

/// User owning the current session, from the session environment. Headless
/// and non-interactive invocations (cron, service managers) often strip
/// these variables; that degrades the field to NULL rather than aborting
/// the run.
pub fn collect() -> Option<String> {
    let username = ["USER", "USERNAME", "LOGNAME"]
        .iter()
        .find_map(|var| std::env::var(var).ok().filter(|value| !value.is_empty()));

    if username.is_none() {
        warn!(
            collector = "username",
            "no session user in environment (headless invocation?)"
        );
    }
    username
}

//! Optional Sentry error tracking.
//!
//! Only panics are reported; `tracing` events stay in the log output.
//! Hold the returned guard for the lifetime of the process so pending
//! reports are flushed before exit.

pub fn init(dsn: &str, environment: Option<&str>) -> sentry::ClientInitGuard {
    let dsn = dsn
        .parse::<sentry::types::Dsn>()
        .map_err(|e| tracing::warn!(error = %e, "invalid Sentry DSN, error tracking disabled"))
        .ok();

    sentry::init(sentry::ClientOptions {
        dsn,
        environment: environment.map(|e| e.to_string().into()),
        release: sentry::release_name!(),
        attach_stacktrace: true,
        ..Default::default()
    })
}

pub(crate) mod logging;
pub(crate) mod metrics;

const GLOBAL_LABELS: &[(&str, &str)] = &[
    ("app_version", env!("CARGO_PKG_VERSION")),
    ("app_git_commit", env!("VERGEN_GIT_SHA")),
];

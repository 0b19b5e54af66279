//! Command-line parsing tests.

use clap::Parser;
use loadtest_populate::ErrorPolicy;
use registry_populate::{Cli, Mode};
use std::time::Duration;

#[test]
fn test_modes() {
    for (arg, mode) in [
        ("catalog", Mode::Catalog),
        ("kv", Mode::Kv),
        ("kvclean", Mode::KvClean),
    ] {
        let cli = Cli::try_parse_from(["registry-populate", arg]).unwrap();
        assert_eq!(cli.mode, mode);
    }
}

#[test]
fn test_missing_or_unknown_mode_is_usage_error() {
    let missing = Cli::try_parse_from(["registry-populate"]).unwrap_err();
    assert!(missing.use_stderr());

    let unknown = Cli::try_parse_from(["registry-populate", "services"]).unwrap_err();
    assert!(unknown.use_stderr());
}

#[test]
fn test_help_is_not_an_error_exit() {
    let help = Cli::try_parse_from(["registry-populate", "--help"]).unwrap_err();
    assert!(!help.use_stderr());
}

#[test]
fn test_defaults() {
    let cli = Cli::try_parse_from(["registry-populate", "catalog"]).unwrap();

    if std::env::var("CONSUL_HTTP_ADDR").is_err() {
        assert_eq!(cli.registry.http_addr, "http://127.0.0.1:8500");
    }
    assert!(!cli.registry.dry_run);
    assert_eq!(cli.registry.request_timeout, None);

    assert_eq!(cli.catalog.nodes, 300_000);
    assert_eq!(cli.catalog.services_per_node, 10);
    assert_eq!(cli.catalog.checks_per_service, 3);
    assert_eq!(cli.catalog.pool.workers, 1000);
    assert_eq!(cli.catalog.pool.error_policy, ErrorPolicy::Log);
    assert_eq!(cli.catalog.pool.progress_interval, Duration::from_secs(5));

    assert_eq!(cli.kv.kv_blobs, 40_000);
    assert_eq!(cli.kv.kv_blob_bytes, 400);
    assert_eq!(cli.kv.kv_prefix, "");
    assert_eq!(cli.kv.progress_every, 100);
}

#[test]
fn test_connection_options() {
    let cli = Cli::try_parse_from([
        "registry-populate",
        "kv",
        "--http-addr",
        "consul.internal:8500",
        "--token",
        "secret",
        "--datacenter",
        "dc2",
        "--request-timeout",
        "2m",
    ])
    .unwrap();

    let config = cli.registry.to_consul_config();
    assert_eq!(config.address, "consul.internal:8500");
    assert_eq!(config.token.as_deref(), Some("secret"));
    assert_eq!(config.datacenter.as_deref(), Some("dc2"));
    assert_eq!(config.request_timeout, Some(Duration::from_secs(120)));
}

#[test]
fn test_invalid_values_rejected() {
    assert!(Cli::try_parse_from(["registry-populate", "catalog", "--address-span", "300"]).is_err());
    assert!(Cli::try_parse_from(["registry-populate", "catalog", "--error-policy", "retry"]).is_err());
    assert!(
        Cli::try_parse_from(["registry-populate", "catalog", "--request-timeout", "soon"]).is_err()
    );
}

#[test]
fn test_error_policy_values() {
    let cli =
        Cli::try_parse_from(["registry-populate", "catalog", "--error-policy", "fail-fast"]).unwrap();
    assert_eq!(cli.catalog.pool.error_policy, ErrorPolicy::FailFast);

    let cli =
        Cli::try_parse_from(["registry-populate", "catalog", "--error-policy", "collect"]).unwrap();
    assert_eq!(cli.catalog.pool.error_policy, ErrorPolicy::Collect);
}

fn binary() -> std::process::Command {
    std::process::Command::new(env!("CARGO_BIN_EXE_registry-populate"))
}

#[test]
fn test_binary_exit_codes() {
    let missing = binary().output().unwrap();
    assert_eq!(missing.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&missing.stderr).contains("Usage"));

    let unknown = binary().arg("services").output().unwrap();
    assert_eq!(unknown.status.code(), Some(1));

    let help = binary().arg("--help").output().unwrap();
    assert_eq!(help.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&help.stdout).contains("kvclean"));
}

#[test]
fn test_binary_dry_run_succeeds() {
    let output = binary()
        .args(["kv", "--dry-run", "--kv-blobs", "5", "--kv-blob-bytes", "16"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0));
}

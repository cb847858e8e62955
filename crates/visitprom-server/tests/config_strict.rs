#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use visitprom_server::cli::{normalize_args, Cli};
use visitprom_server::config;

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
version: 1
server:
  listen: ":9090"
  listn: ":9091" # typo should fail
"#;

    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.code().as_str(), "BAD_REQUEST");
}

#[test]
fn ok_minimal_config() {
    let cfg = config::load_from_str("version: 1\n").expect("must parse");
    assert_eq!(cfg.server.listen, ":8080");
    assert_eq!(cfg.server.service_addr, "127.0.0.1:8080");
    assert_eq!(cfg.metrics.counter_name, "demo_queries");
}

#[test]
fn unsupported_version_rejected() {
    let err = config::load_from_str("version: 2\n").expect_err("must fail");
    assert_eq!(err.code().as_str(), "BAD_REQUEST");
}

#[test]
fn invalid_listen_rejected() {
    let bad = r#"
version: 1
server:
  listen: "not-an-address"
"#;
    assert!(config::load_from_str(bad).is_err());
}

#[test]
fn listen_addr_forms() {
    assert_eq!(
        config::listen_targets(":8080").unwrap(),
        vec!["[::]:8080".to_string(), "0.0.0.0:8080".to_string()]
    );
    assert_eq!(
        config::listen_targets("127.0.0.1:9000").unwrap(),
        vec!["127.0.0.1:9000".to_string()]
    );
    assert_eq!(
        config::listen_targets("[::1]:9000").unwrap(),
        vec!["[::1]:9000".to_string()]
    );
    assert!(config::listen_targets(":http").is_err());
    assert!(config::listen_targets("::1").is_err());
}

#[test]
fn host_name_listen_accepted() {
    assert_eq!(
        config::listen_targets("localhost:9090").unwrap(),
        vec!["localhost:9090".to_string()]
    );

    let ok = r#"
version: 1
server:
  listen: "localhost:9090"
"#;
    let cfg = config::load_from_str(ok).expect("host name listen must parse");
    assert_eq!(cfg.server.listen, "localhost:9090");
}

#[test]
fn cli_flag_overrides_defaults() {
    let cli = Cli {
        listen_address: Some("127.0.0.1:9999".into()),
        config: None,
    };
    let cfg = cli.resolve().unwrap();
    assert_eq!(cfg.server.listen, "127.0.0.1:9999");

    let cli = Cli {
        listen_address: Some("bogus".into()),
        config: None,
    };
    assert_eq!(cli.resolve().unwrap_err().code().as_str(), "BAD_REQUEST");
}

#[test]
fn cli_parses_listen_address_flag() {
    use clap::Parser;

    let cli = Cli::try_parse_from(["visitprom-server", "--listen-address", ":7070"]).unwrap();
    assert_eq!(cli.listen_address.as_deref(), Some(":7070"));
    assert!(cli.config.is_none());
}

#[test]
fn cli_accepts_single_dash_long_flags() {
    use clap::Parser;

    let args = normalize_args(["visitprom-server", "-listen-address", ":7070"]);
    let cli = Cli::try_parse_from(args).unwrap();
    assert_eq!(cli.listen_address.as_deref(), Some(":7070"));

    let args = normalize_args(["visitprom-server", "-listen-address=localhost:1", "-config=x.yaml"]);
    let cli = Cli::try_parse_from(args).unwrap();
    assert_eq!(cli.listen_address.as_deref(), Some("localhost:1"));
    assert_eq!(cli.config.unwrap().to_str(), Some("x.yaml"));
}

#[test]
fn normalize_args_leaves_other_args_alone() {
    let args = normalize_args(["bin", "--config", "-v", "-listen"]);
    let args: Vec<_> = args.iter().map(|a| a.to_str().unwrap()).collect();
    assert_eq!(args, vec!["bin", "--config", "-v", "-listen"]);
}

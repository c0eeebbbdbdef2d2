use std::time::Duration;

use bastion::config::Config;
use bastion::server::ServerContext;

#[test]
fn test_config_defaults() {
    let cfg = Config::default();

    assert_eq!(cfg.server.listen_addr, "127.0.0.1:8080");
    assert_eq!(cfg.server.read_timeout(), Some(Duration::from_secs(30)));
    assert!(!cfg.server.html5_fallback);
    assert_eq!(cfg.auth.token_lifetime_secs, 86400);
    assert_eq!(cfg.auth.store_capacity, 1000);
    assert_eq!(cfg.auth.username, "user0");
}

#[test]
fn test_config_from_partial_yaml() {
    let cfg = Config::from_yaml(
        r#"
server:
  listen_addr: "0.0.0.0:3000"
  read_timeout_secs: 0
  html5_fallback: true
auth:
  token_lifetime_secs: 60
"#,
    )
    .unwrap();

    assert_eq!(cfg.server.listen_addr, "0.0.0.0:3000");
    assert_eq!(cfg.server.read_timeout(), None);
    assert!(cfg.server.html5_fallback);
    assert_eq!(cfg.auth.token_lifetime_secs, 60);
    // Untouched fields keep their defaults.
    assert_eq!(cfg.server.max_body_bytes, 1024 * 1024);
    assert_eq!(cfg.auth.password, "thepassword");
}

#[test]
fn test_config_rejects_bad_yaml() {
    assert!(Config::from_yaml("server: [not, a, map]").is_err());
}

// Environment overrides are exercised in a single test so that parallel
// tests never observe each other's variables.
#[test]
fn test_config_env_overrides() {
    unsafe {
        std::env::remove_var("BASTION_CONFIG");
        std::env::set_var("LISTEN", "0.0.0.0:5000");
        std::env::set_var("SERVER_ROOT", "/srv/www");
        std::env::set_var("TOKEN_EXPIRATION", "120");
        std::env::set_var("SILENT", "1");
    }
    let cfg = Config::load().unwrap();
    assert_eq!(cfg.server.listen_addr, "0.0.0.0:5000");
    assert_eq!(cfg.server.root.to_str(), Some("/srv/www"));
    assert_eq!(cfg.auth.token_lifetime_secs, 120);
    assert!(cfg.server.silent);

    unsafe {
        std::env::set_var("TOKEN_EXPIRATION", "soon");
    }
    assert!(Config::load().is_err());

    unsafe {
        std::env::remove_var("LISTEN");
        std::env::remove_var("SERVER_ROOT");
        std::env::remove_var("TOKEN_EXPIRATION");
        std::env::remove_var("SILENT");
    }
}

#[test]
fn test_context_requires_existing_directory_root() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("file.txt");
    std::fs::write(&file, "x").unwrap();

    let mut cfg = Config::default();
    cfg.server.root = dir.path().join("missing");
    assert!(ServerContext::from_config(&cfg).is_err());

    cfg.server.root = file;
    assert!(ServerContext::from_config(&cfg).is_err());

    cfg.server.root = dir.path().to_path_buf();
    let ctx = ServerContext::from_config(&cfg).unwrap();
    assert!(ctx.root.is_absolute());
}

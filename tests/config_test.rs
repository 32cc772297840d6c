//! Config file loading.

use paidplay::{AppConfig, DEFAULT_ENTRY_FEE_USD};
use std::io::Write;
use std::time::Duration;

#[test]
fn test_from_file_reads_all_keys() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
entry_fee_usd = 0.25
fallback_native_usd_price = 3000.0
thinking_delay_ms = 250
price_api_url = "http://localhost:9999/api"
price_coin_id = "base-eth"
contract_address = "0x0000000000000000000000000000000000000001"
chain = "base-sepolia"
"#
    )
    .unwrap();

    let config = AppConfig::from_file(file.path()).unwrap();
    assert_eq!(*config.entry_fee_usd(), 0.25);
    assert_eq!(*config.fallback_native_usd_price(), 3000.0);
    assert_eq!(config.thinking_delay(), Duration::from_millis(250));
    assert_eq!(config.price_api_url(), "http://localhost:9999/api");
    assert_eq!(config.price_coin_id(), "base-eth");
    assert_eq!(config.chain(), "base-sepolia");
}

#[test]
fn test_missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = AppConfig::from_file(dir.path().join("absent.toml")).unwrap_err();
    assert!(err.message.starts_with("Failed to read config file"));
}

#[test]
fn test_load_or_default_without_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = AppConfig::load_or_default(dir.path().join("absent.toml")).unwrap();
    assert_eq!(config, AppConfig::default());
    assert_eq!(*config.entry_fee_usd(), DEFAULT_ENTRY_FEE_USD);
    assert_eq!(
        config.contract_address(),
        "0x621d9D991b3971bE088d2FC8b6A585eF142411F3"
    );
}

#[test]
fn test_empty_file_gives_defaults() {
    let file = tempfile::NamedTempFile::new().unwrap();
    let config = AppConfig::from_file(file.path()).unwrap();
    assert_eq!(config, AppConfig::default());
}

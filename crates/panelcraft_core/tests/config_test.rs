//! Configuration loading tests.

use panelcraft_core::{ComicConfig, HorizonConfig};
use std::io::Write;

#[test]
fn test_file_overrides_defaults() -> anyhow::Result<()> {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile()?;
    writeln!(
        file,
        r#"
[horizons]
text_horizon = 8

[fallback]
pool_token = "open-sesame"
"#
    )?;

    let config = ComicConfig::from_file(file.path())?;

    assert_eq!(*config.horizons().text_horizon(), 8);
    assert_eq!(*config.horizons().image_horizon(), 3);
    assert_eq!(config.fallback().pool_token(), "open-sesame");
    assert_eq!(config.fallback().text_model(), "gemini-2.5-flash");
    Ok(())
}

#[test]
fn test_missing_file_is_config_error() {
    let err = ComicConfig::from_file("/nonexistent/panelcraft.toml").unwrap_err();
    assert!(err.to_string().contains("Configuration"));
}

#[test]
fn test_setters() {
    let horizons = HorizonConfig::default()
        .with_text_horizon(1)
        .with_image_horizon(0);
    assert_eq!(*horizons.text_horizon(), 1);
    assert_eq!(*horizons.image_horizon(), 0);
}

//! Library integration tests.

use snapflat::SnapflatError;

#[test]
fn error_types_are_public() {
    let err = SnapflatError::unsupported("WSL detected");
    assert!(err.to_string().contains("WSL detected"));
    assert_eq!(err.exit_code(), 1);
}

#[test]
fn config_errors_exit_with_two() {
    let err = SnapflatError::config("unexpected argument 'foo'");
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn result_type_alias_is_public() {
    fn test_fn() -> snapflat::Result<()> {
        Ok(())
    }
    assert!(test_fn().is_ok());
}

#[test]
fn cli_types_are_public() {
    use clap::Parser;
    use snapflat::cli::{Cli, Options};

    let cli = Cli::parse_from(["snapflat", "--kde-discover", "--skip-update"]);
    let options = Options::from(cli);
    assert!(options.kde_discover);
    assert!(options.skip_update);
    assert!(!options.gnome_software);
}

#[test]
fn default_settings_point_at_flathub() {
    let settings = snapflat::install::InstallSettings::default();
    assert_eq!(settings.flathub_name, "flathub");
    assert!(settings.flathub_url.starts_with("https://dl.flathub.org/"));
    assert_eq!(settings.core_retry_delay.as_secs(), 10);
}

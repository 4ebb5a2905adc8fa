use super::*;

#[test]
fn parses_scan_command() {
    let cli = Cli::try_parse_from(["ecoscan-cli", "scan", "7891234567890"])
        .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Scan { ref barcode, alternatives: false } if barcode == "7891234567890"
    ));
}

#[test]
fn parses_scan_with_alternatives() {
    let cli = Cli::try_parse_from(["ecoscan-cli", "scan", "123", "--alternatives"]).unwrap();
    assert!(matches!(
        cli.command,
        Commands::Scan {
            alternatives: true,
            ..
        }
    ));
}

#[test]
fn scan_requires_barcode() {
    assert!(Cli::try_parse_from(["ecoscan-cli", "scan"]).is_err());
}

#[test]
fn parses_normalize_with_optional_files() {
    let cli = Cli::try_parse_from([
        "ecoscan-cli",
        "normalize",
        "--product",
        "product.json",
        "--nutrition",
        "nutrition.json",
    ])
    .unwrap();

    match cli.command {
        Commands::Normalize {
            product,
            impact,
            nutrition,
        } => {
            assert_eq!(product, PathBuf::from("product.json"));
            assert!(impact.is_none());
            assert_eq!(nutrition, Some(PathBuf::from("nutrition.json")));
        }
        other => panic!("expected Normalize, got {other:?}"),
    }
}

#[test]
fn list_defaults_to_first_page_of_twenty() {
    let cli = Cli::try_parse_from(["ecoscan-cli", "list"]).unwrap();
    assert!(matches!(cli.command, Commands::List { page: 0, size: 20 }));
}

#[test]
fn list_accepts_page_and_size() {
    let cli =
        Cli::try_parse_from(["ecoscan-cli", "list", "--page", "3", "--size", "5"]).unwrap();
    assert!(matches!(cli.command, Commands::List { page: 3, size: 5 }));
}

#[test]
fn parses_history_clear() {
    let cli = Cli::try_parse_from(["ecoscan-cli", "history", "--clear"]).unwrap();
    assert!(matches!(cli.command, Commands::History { clear: true }));
}

#[test]
fn no_command_is_an_error() {
    assert!(Cli::try_parse_from(["ecoscan-cli"]).is_err());
}

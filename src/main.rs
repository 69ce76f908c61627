use anyhow::{bail, Context, Result};
use clap::{Arg, Command};
use std::env;
use std::path::PathBuf;

use tizen_signer::{
    sign_package, ConfigManager, P12Password, SigningConfiguration,
};

fn main() -> Result<()> {
    let matches = Command::new("tizen-signer")
        .version("0.1.0")
        .about("Self-contained Tizen package signing utility (.wgt/.tpk)")
        .arg(
            Arg::new("input")
                .short('i')
                .long("input")
                .value_name("FILE")
                .help("Input package to sign (.wgt or .tpk)")
                .required(true),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .help("Output signed package (omit to sign in place when overwrite_input is set)"),
        )
        .arg(
            Arg::new("author-p12")
                .short('a')
                .long("author-p12")
                .value_name("FILE")
                .help("Author PKCS#12 bundle (defaults to the configured profile)"),
        )
        .arg(
            Arg::new("author-password")
                .long("author-password")
                .value_name("PASSWORD")
                .help("Author bundle password (can also use TIZEN_AUTHOR_PASSWORD env var)"),
        )
        .arg(
            Arg::new("distributor-p12")
                .short('d')
                .long("distributor-p12")
                .value_name("FILE")
                .help("Distributor PKCS#12 bundle (defaults to the configured profile)"),
        )
        .arg(
            Arg::new("distributor-password")
                .long("distributor-password")
                .value_name("PASSWORD")
                .help(
                    "Distributor bundle password (can also use TIZEN_DISTRIBUTOR_PASSWORD env var)",
                ),
        )
        .arg(
            Arg::new("dry-run")
                .long("dry-run")
                .help("Load key material and validate inputs without writing output")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    let config = ConfigManager::new()
        .and_then(|manager| manager.load_or_create_default())
        .unwrap_or_else(|e| {
            eprintln!("Warning: falling back to default configuration: {e}");
            SigningConfiguration::default()
        });

    let mut logger = env_logger::Builder::from_default_env();
    if config.verbose {
        logger.filter_level(log::LevelFilter::Debug);
    }
    logger.init();

    let input_path = PathBuf::from(matches.get_one::<String>("input").unwrap());
    let output_path = match matches.get_one::<String>("output") {
        Some(path) => PathBuf::from(path),
        None if config.overwrite_input => input_path.clone(),
        None => bail!(
            "No --output given; pass one or set overwrite_input = true in {} to sign in place",
            ConfigManager::default_config_path()
                .map(|path| path.display().to_string())
                .unwrap_or_else(|_| "the config file".to_string())
        ),
    };

    let author_p12 = matches
        .get_one::<String>("author-p12")
        .map(PathBuf::from)
        .or_else(|| config.author_p12.clone())
        .context("Author PKCS#12 bundle must be provided via --author-p12 or the config file")?;

    let distributor_p12 = matches
        .get_one::<String>("distributor-p12")
        .map(PathBuf::from)
        .or_else(|| config.distributor_p12.clone())
        .context(
            "Distributor PKCS#12 bundle must be provided via --distributor-p12 or the config file",
        )?;

    let author_password = matches
        .get_one::<String>("author-password")
        .map(String::from)
        .or_else(|| env::var(&config.author_password_env).ok())
        .map(P12Password::new)
        .with_context(|| {
            format!(
                "Author password must be provided via --author-password or the {} environment variable",
                config.author_password_env
            )
        })?;

    let distributor_password = matches
        .get_one::<String>("distributor-password")
        .map(String::from)
        .or_else(|| env::var(&config.distributor_password_env).ok())
        .map(P12Password::new)
        .with_context(|| {
            format!(
                "Distributor password must be provided via --distributor-password or the {} environment variable",
                config.distributor_password_env
            )
        })?;

    if matches.get_flag("dry-run") {
        use tizen_signer::SigningKeySet;

        SigningKeySet::from_pkcs12_file(&author_p12, &author_password)
            .context("Failed to load author key material")?;
        SigningKeySet::from_pkcs12_file(&distributor_p12, &distributor_password)
            .context("Failed to load distributor key material")?;
        std::fs::metadata(&input_path)
            .with_context(|| format!("Failed to read input package: {}", input_path.display()))?;

        println!("Dry run completed successfully - no file written");
        println!("Package would be signed and written to: {}", output_path.display());
        return Ok(());
    }

    sign_package(
        &input_path,
        &output_path,
        &author_p12,
        &author_password,
        &distributor_p12,
        &distributor_password,
    )
    .with_context(|| format!("Failed to sign package: {}", input_path.display()))?;

    println!("Successfully signed: {}", output_path.display());
    Ok(())
}

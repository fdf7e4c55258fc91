//! course-sync - CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use course_sync::{
    adapter::adapters_for,
    api::{fetch_courses, login, PortalClient},
    cli::Args,
    config::{validate_config, Config},
    download::{CoordinatorOptions, FetchCoordinator},
    error::{exit_codes, Error, Result},
    ledger::Ledger,
    output::{
        create_spinner, print_banner, print_config_summary, print_course_list, print_error,
        print_info, print_report, print_success, print_summary, print_warning,
    },
};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => ExitCode::from(code as u8),
        Err(e) => {
            print_error(&format!("{}", e));
            let code = match &e {
                Error::Config(_)
                | Error::ConfigValidation { .. }
                | Error::MissingConfig(_)
                | Error::TomlParse(_) => exit_codes::CONFIG_ERROR,
                Error::Authentication(_)
                | Error::Navigation(_)
                | Error::Transport(_)
                | Error::Timeout(_) => exit_codes::PORTAL_ERROR,
                e if e.is_ledger() => exit_codes::LEDGER_ERROR,
                _ => exit_codes::UNEXPECTED_ERROR,
            };
            ExitCode::from(code as u8)
        }
    }
}

async fn run() -> Result<i32> {
    // Parse CLI arguments
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug {
        "debug"
    } else if args.quiet {
        "warn"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    fmt().with_env_filter(filter).with_target(false).init();

    print_banner();

    // Load configuration
    let mut config = if args.config.exists() {
        Config::load(&args.config)?
    } else {
        print_warning(&format!(
            "Configuration file not found: {}",
            args.config.display()
        ));
        print_info("Using default configuration with CLI arguments");
        Config::default()
    };

    args.merge_into_config(&mut config);
    validate_config(&config)?;

    // Log in and enumerate courses
    let client = PortalClient::from_config(&config)?;

    let spinner = create_spinner("Logging in...");
    let identity = login(&client, &config.portal, &config.account).await;
    spinner.finish_and_clear();
    let identity = identity?;
    print_success(&format!("Logged in as {} ({})", identity.name, identity.institute));

    let spinner = create_spinner("Fetching course list...");
    let courses = fetch_courses(&client, &config.portal, &config.account).await;
    spinner.finish_and_clear();
    let courses = courses?;
    print_course_list(&courses);

    if args.list_courses {
        return Ok(exit_codes::SUCCESS);
    }

    let selected = config.options.courses.apply(&courses);
    if selected.is_empty() {
        print_warning("No courses selected");
        return Ok(exit_codes::SUCCESS);
    }

    let download_dir = config.download_directory();
    let ledger_path = config.ledger_path();
    print_config_summary(
        &config.options.modes,
        &config.options.courses,
        &download_dir,
        &ledger_path,
    );

    let ledger = Ledger::open(&ledger_path).await?;

    let coordinator = FetchCoordinator::new(
        &client,
        &ledger,
        download_dir,
        CoordinatorOptions::from_config(&config),
        adapters_for(&config.options.modes),
    );
    let result = coordinator.run(&selected).await;
    ledger.close().await;
    let report = result?;

    if args.quiet {
        print_summary(&report);
    } else {
        print_report(&report);
    }

    if report.has_errors() {
        print_warning(&format!(
            "{} item(s) could not be synced",
            report.errors.len()
        ));
        return Ok(exit_codes::SOME_DOWNLOADS_FAILED);
    }

    print_success("All selected courses are in sync");
    Ok(exit_codes::SUCCESS)
}

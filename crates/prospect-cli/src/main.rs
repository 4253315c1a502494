// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod runtime;

use anyhow::{bail, Context, Result};
use config::Config;
use prospect_api::{ApiClient, SessionStore};
use prospect_app::{AppState, AuthRole, TabKind};
use runtime::{DemoRuntime, HttpRuntime};
use std::env;
use std::path::PathBuf;

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `prospect --print-example-config` to generate a template",
            options.config_path.display()
        )
    })?;

    let sessions = SessionStore::at(SessionStore::default_path()?);

    if options.logout {
        sessions.clear()?;
        println!("logged out");
        return Ok(());
    }

    let client = ApiClient::new(config.base_url(), config.timeout()?, sessions).with_context(
        || {
            format!(
                "invalid [api] config in {}; fix base_url/timeout values",
                options.config_path.display()
            )
        },
    )?;

    if let Some(role) = options.login_role {
        let Some(email) = options.email.as_deref() else {
            bail!("--login requires --email <address>");
        };
        let Some(password) = options.password.as_deref() else {
            bail!("--login requires --password <password>");
        };
        client.login(role, email, password)?;
        println!("logged in as {}", role.as_str());
        return Ok(());
    }

    if options.check_only {
        if !client.health() {
            bail!(
                "backend is not reachable at {} -- start the CRM server or fix [api].base_url",
                client.base_url()
            );
        }
        println!("backend reachable at {}", client.base_url());
        return Ok(());
    }

    let mut state = AppState::default();
    if !config.show_dashboard() {
        state.active_tab = TabKind::Leads;
    }
    state.role = client.active_session().map(|session| session.role);

    if options.demo {
        let mut runtime = DemoRuntime::seeded(config.export_dir()?);
        prospect_tui::run_app(
            &mut state,
            &mut runtime,
            config.page_size(),
            config.max_pagination_links(),
        )
    } else {
        let mut runtime = HttpRuntime::new(client, config.export_dir()?);
        prospect_tui::run_app(
            &mut state,
            &mut runtime,
            config.page_size(),
            config.max_pagination_links(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    print_config_path: bool,
    print_example: bool,
    check_only: bool,
    demo: bool,
    login_role: Option<AuthRole>,
    email: Option<String>,
    password: Option<String>,
    logout: bool,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        print_config_path: false,
        print_example: false,
        check_only: false,
        demo: false,
        login_role: None,
        email: None,
        password: None,
        logout: false,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--demo" => {
                options.demo = true;
            }
            "--login" => {
                let value = iter.next().ok_or_else(|| {
                    anyhow::anyhow!("--login requires a role: admin, employee, or customer")
                })?;
                let role = AuthRole::parse(value.as_ref()).ok_or_else(|| {
                    anyhow::anyhow!(
                        "unknown role {:?}; use admin, employee, or customer",
                        value.as_ref()
                    )
                })?;
                options.login_role = Some(role);
            }
            "--email" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--email requires an address"))?;
                options.email = Some(value.as_ref().to_owned());
            }
            "--password" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--password requires a value"))?;
                options.password = Some(value.as_ref().to_owned());
            }
            "--logout" => {
                options.logout = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                return Err(anyhow::anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    Ok(options)
}

fn print_help() {
    println!("prospect");
    println!("  --config <path>              Use a specific config path");
    println!("  --print-config-path          Print resolved config path");
    println!("  --print-example-config       Print a config template");
    println!("  --check                      Validate config and probe the backend");
    println!("  --demo                       Launch with seeded in-memory data (no network)");
    println!("  --login <role>               Log in (admin, employee, or customer)");
    println!("  --email <address>            Email for --login");
    println!("  --password <password>        Password for --login");
    println!("  --logout                     Clear the stored session");
    println!("  --help                       Show this help");
}

#[cfg(test)]
mod tests {
    use super::{parse_cli_args, CliOptions};
    use anyhow::Result;
    use prospect_app::AuthRole;
    use std::path::PathBuf;

    fn default_options_path() -> PathBuf {
        PathBuf::from("/tmp/prospect-config.toml")
    }

    #[test]
    fn parse_cli_args_defaults_to_provided_config_path() -> Result<()> {
        let options = parse_cli_args(Vec::<String>::new(), default_options_path())?;
        assert_eq!(
            options,
            CliOptions {
                config_path: default_options_path(),
                print_config_path: false,
                print_example: false,
                check_only: false,
                demo: false,
                login_role: None,
                email: None,
                password: None,
                logout: false,
                show_help: false,
            }
        );
        Ok(())
    }

    #[test]
    fn parse_cli_args_sets_config_path_override() -> Result<()> {
        let options = parse_cli_args(
            vec!["--config", "/custom/config.toml"],
            default_options_path(),
        )?;
        assert_eq!(options.config_path, PathBuf::from("/custom/config.toml"));
        Ok(())
    }

    #[test]
    fn parse_cli_args_errors_for_missing_config_value() {
        let error = parse_cli_args(vec!["--config"], default_options_path())
            .expect_err("missing config value should fail");
        assert!(error.to_string().contains("--config requires a file path"));
    }

    #[test]
    fn parse_cli_args_errors_for_unknown_argument() {
        let error = parse_cli_args(vec!["--wat"], default_options_path())
            .expect_err("unknown arg should fail");
        let message = error.to_string();
        assert!(message.contains("unknown argument"));
        assert!(message.contains("--help"));
    }

    #[test]
    fn parse_cli_args_reads_login_credentials() -> Result<()> {
        let options = parse_cli_args(
            vec![
                "--login",
                "admin",
                "--email",
                "admin@crm.test",
                "--password",
                "hunter2",
            ],
            default_options_path(),
        )?;
        assert_eq!(options.login_role, Some(AuthRole::Admin));
        assert_eq!(options.email.as_deref(), Some("admin@crm.test"));
        assert_eq!(options.password.as_deref(), Some("hunter2"));
        Ok(())
    }

    #[test]
    fn parse_cli_args_rejects_unknown_login_role() {
        let error = parse_cli_args(vec!["--login", "root"], default_options_path())
            .expect_err("unknown role should fail");
        let message = error.to_string();
        assert!(message.contains("unknown role"));
        assert!(message.contains("admin, employee, or customer"));
    }

    #[test]
    fn parse_cli_args_sets_print_check_and_demo_flags() -> Result<()> {
        let options = parse_cli_args(
            vec![
                "--print-config-path",
                "--print-example-config",
                "--check",
                "--demo",
                "--logout",
            ],
            default_options_path(),
        )?;
        assert!(options.print_config_path);
        assert!(options.print_example);
        assert!(options.check_only);
        assert!(options.demo);
        assert!(options.logout);
        assert!(!options.show_help);
        Ok(())
    }

    #[test]
    fn parse_cli_args_sets_help_flag_for_long_and_short_variants() -> Result<()> {
        let long = parse_cli_args(vec!["--help"], default_options_path())?;
        assert!(long.show_help);

        let short = parse_cli_args(vec!["-h"], default_options_path())?;
        assert!(short.show_help);
        Ok(())
    }
}

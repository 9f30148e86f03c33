use std::{io, process::ExitCode};

use clap::Parser;
use maxctl::{
    app,
    cli::{AdminCommand, Cli, Command, GlobalArgs},
    config::{OutputConfig, config_dir},
    error::{CommandError, Context},
};
use maxctl_admin::{AdminClient, AliasConfig, resolve_target};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    let config = OutputConfig::from_args(&cli.global, console::colors_enabled());
    init_tracing(&config);

    let Command::Admin(AdminCommand::Decommission(command)) = &cli.command;
    let result = match connect(&cli.global, command.target()) {
        Ok(client) => {
            app::run(
                command,
                &client,
                &config,
                &mut io::stdout().lock(),
                &mut io::stderr().lock(),
            )
            .await
        }
        Err(err) => Err(err),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_fatal(&err.with_trace(command.args()), &config);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(config: &OutputConfig) {
    let mut env_filter = EnvFilter::from_default_env();
    if let Ok(directive) = config.log_directive().parse() {
        env_filter = env_filter.add_directive(directive);
    }
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .init();
}

fn connect(global: &GlobalArgs, target: &str) -> Result<AdminClient, CommandError> {
    let env = |name: &str| std::env::var(name).ok();
    let dir = config_dir(global, env);
    debug!(config_dir = %dir.display(), alias = target, "resolving alias");

    let context = || "Unable to initialize admin connection.".to_string();
    let aliases = AliasConfig::load(&dir).context(context)?;
    let resolved = resolve_target(target, &aliases, env).context(context)?;
    AdminClient::new(&resolved.host).context(context)
}

fn report_fatal(err: &CommandError, config: &OutputConfig) {
    if config.json {
        match err.fatal_json(config.debug) {
            Ok(report) => println!("{report}"),
            Err(_) => eprintln!("maxctl: <ERROR> {}", err.fatal_text()),
        }
    } else {
        eprintln!("maxctl: <ERROR> {}", err.fatal_text());
    }
}

use fetchsock_exchange::{DirectoryResolver, ExchangeConfig, FileServer, Shutdown};

use crate::cmd::{parse_optional_duration, ServeArgs};
use crate::exit::{exchange_error, CliError, CliResult, INTERNAL, SUCCESS};

pub fn run(args: ServeArgs) -> CliResult<i32> {
    let config = ExchangeConfig {
        read_timeout: parse_optional_duration(args.read_timeout.as_deref())?,
        write_timeout: parse_optional_duration(args.write_timeout.as_deref())?,
        ..ExchangeConfig::default()
    };

    if !args.root.is_dir() {
        tracing::warn!(
            root = %args.root.display(),
            "content root is not a directory; every request will come back empty"
        );
    }

    let server = FileServer::bind(&args.path, DirectoryResolver::new(&args.root))
        .map_err(|err| exchange_error("bind failed", err))?
        .with_config(config);

    install_ctrlc_handler(server.shutdown_handle())?;

    tracing::info!(
        path = %server.path().display(),
        root = %args.root.display(),
        "server started"
    );

    let summary = server
        .run()
        .map_err(|err| exchange_error("shutdown failed", err))?;

    tracing::info!(
        served = summary.served,
        aborted = summary.aborted,
        accept_errors = summary.accept_errors,
        "server stopped"
    );
    Ok(SUCCESS)
}

fn install_ctrlc_handler(shutdown: Shutdown) -> CliResult<()> {
    ctrlc::set_handler(move || shutdown.trigger()).map_err(|err| {
        CliError::new(INTERNAL, format!("signal handler setup failed: {err}"))
    })
}

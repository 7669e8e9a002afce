use haven::repository::FileRepository;
use haven::ssh::SessionRegistry;
use haven::{cli, config, events, logging, tui};

use std::process::ExitCode;
use std::sync::Arc;

fn main() -> ExitCode {
    let args = cli::main_args();
    let dev_mode = args.config_dir.is_some();

    if let Some(dir) = args.config_dir.clone() {
        config::set_override_dir(dir);
    }

    if let Err(err) = config::init(dev_mode) {
        eprintln!("failed to load configuration: {}", err);
        return ExitCode::FAILURE;
    }

    let log_dir = match config::log_dir(dev_mode) {
        Ok(dir) => dir,
        Err(err) => {
            eprintln!("failed to resolve log directory: {}", err);
            return ExitCode::FAILURE;
        }
    };

    let logger = logging::Logger::new(log_dir);
    let settings = config::CONFIG.read().unwrap_or_else(|poison| poison.into_inner()).settings.clone();

    if args.debug || settings.debug_mode {
        logger.enable_debug();
    }
    if args.ssh_logging || settings.ssh_logging {
        logger.enable_ssh_logging();
    }
    let ssh_logger = logger.ssh_logger();
    logger.install();

    // Keep the watcher alive for the process lifetime; dropping it stops the thread.
    let _watcher = config::config_watcher(dev_mode);

    let db_path = match config::database_path(dev_mode) {
        Ok(path) => path,
        Err(err) => {
            eprintln!("failed to resolve database path: {}", err);
            return ExitCode::FAILURE;
        }
    };
    let app_dir = match config::app_dir(dev_mode) {
        Ok(dir) => dir,
        Err(err) => {
            eprintln!("failed to resolve application directory: {}", err);
            return ExitCode::FAILURE;
        }
    };
    let repository = match FileRepository::open(&db_path, &app_dir) {
        Ok(repository) => Arc::new(repository),
        Err(err) => {
            eprintln!("failed to open database at {}: {}", db_path.display(), err);
            return ExitCode::FAILURE;
        }
    };

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("failed to start async runtime: {}", err);
            return ExitCode::FAILURE;
        }
    };

    let event_rx = events::EventBus::bind();
    let registry = Arc::new(SessionRegistry::new(runtime.handle().clone(), repository.clone(), ssh_logger));

    let result = tui::run(repository, registry.clone(), event_rx);

    registry.close_all();
    events::EventBus::release();
    // The runtime's background tasks are done once `close_all` has sent every
    // session's close signal; give them a moment to unwind before exiting.
    runtime.shutdown_timeout(std::time::Duration::from_secs(2));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", err);
            ExitCode::FAILURE
        }
    }
}

mod historical;
mod nightly;

use std::sync::Arc;
use std::time::Duration;

use fxvault_core::{
    ExchangeRateHostClient, RateStore, ReqwestTransport, ResilientRateProvider, StoreConfig,
};

use crate::cli::{Cli, Command};
use crate::error::CliError;

pub fn run(cli: &Cli) -> Result<(), CliError> {
    let store = open_store(cli)?;
    let gateway = build_gateway(cli);

    match &cli.command {
        Command::Nightly(args) => nightly::run(args, &store, &gateway),
        Command::Historical(args) => historical::run(args, &store, &gateway),
    }
}

fn open_store(cli: &Cli) -> Result<RateStore, CliError> {
    let config = match &cli.db_path {
        Some(path) => StoreConfig::with_db_path(path.clone()),
        None => StoreConfig::default(),
    };
    Ok(RateStore::open(config)?)
}

fn build_gateway(cli: &Cli) -> ResilientRateProvider {
    let transport = Arc::new(ReqwestTransport::new());
    let mut client = ExchangeRateHostClient::new(transport, cli.base)
        .with_timeout_ms(cli.timeout_ms)
        .with_retry_wait(Duration::from_millis(cli.retry_wait_ms));
    if cli.insecure {
        client = client.insecure();
    }
    ResilientRateProvider::new(Arc::new(client))
}

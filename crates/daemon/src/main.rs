// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! shepd: keeps the scheduler's desired workloads in sync with the catalog.

use clap::Parser;
use shep_adapters::{
    http, ConsulLockStore, HttpCatalogFetcher, HttpSchedulerClient, LeaderLock, LockConfig,
};
use shep_core::SystemClock;
use shep_daemon::supervisor::{run_supervised, EXIT_FATAL};
use shep_daemon::Config;
use shep_engine::{Processor, ProcessorConfig, TracingMetrics};
use shep_recipes::{BuilderConfig, LifecycleBuilders};
use std::sync::Arc;
use tokio::signal::unix::{signal, SignalKind};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let config = Config::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    std::process::exit(run(config).await);
}

async fn run(config: Config) -> i32 {
    let lifecycles = match config.lifecycle_map() {
        Ok(map) => map,
        Err(e) => {
            error!(error = %e, "invalid lifecycle mapping");
            return EXIT_FATAL;
        }
    };

    let client = match http::build_client(&http::HttpConfig {
        communication_timeout: config.communication_timeout,
        skip_cert_verify: config.skip_cert_verify,
    }) {
        Ok(client) => client,
        Err(e) => {
            error!(error = %e, "failed to build HTTP client");
            return EXIT_FATAL;
        }
    };

    let scheduler = Arc::new(HttpSchedulerClient::new(&config.diego_api_url, client.clone()));
    let fetcher = Arc::new(HttpCatalogFetcher::new(
        &config.cc_base_url,
        &config.cc_username,
        &config.cc_password,
        config.bulk_batch_size,
        client.clone(),
    ));
    let builders = Arc::new(LifecycleBuilders::new(BuilderConfig {
        lifecycles,
        file_server_url: config.file_server_url.clone(),
    }));

    let owner_id = uuid::Uuid::new_v4().to_string();
    let lock = LeaderLock::new(
        Arc::new(ConsulLockStore::new(&config.consul_cluster, client)),
        SystemClock,
        LockConfig { ttl: config.lock_ttl, retry_interval: config.heartbeat_retry_interval },
        owner_id,
    );

    let processor = Processor::new(
        scheduler,
        fetcher,
        builders,
        Arc::new(TracingMetrics),
        SystemClock,
        ProcessorConfig {
            polling_interval: config.polling_interval,
            domain_ttl: config.domain_ttl,
            pool_size: 10,
        },
    );

    let shutdown = CancellationToken::new();
    spawn_signal_handler(shutdown.clone());

    let exit_code = run_supervised(lock, processor, shutdown).await;
    info!(exit_code, "exited");
    exit_code
}

fn spawn_signal_handler(shutdown: CancellationToken) {
    tokio::spawn(async move {
        let mut sigterm = match signal(SignalKind::terminate()) {
            Ok(sigterm) => sigterm,
            Err(e) => {
                error!(error = %e, "failed to install SIGTERM handler");
                return;
            }
        };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
        info!("received termination signal");
        shutdown.cancel();
    });
}

//! # Watch Loop
//!
//! Runs one `kube_runtime::Controller` per managed resource kind. All of
//! them share the process-wide shutdown signal and readiness flag.

use crate::config::ControllerConfig;
use crate::controller::reconciler::{reconcile, ReconcileContext};
use crate::controller::{apigatewayv2, ec2, glue, iam, sesv2};
use crate::crd::Managed;
use crate::runtime::error_policy::handle_reconciliation_error;
use crate::server::ServerState;
use futures::StreamExt;
use kube::api::Api;
use kube::Client;
use kube_runtime::{controller, watcher, Controller};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Run every kind's controller until a shutdown signal arrives
pub async fn run_watch_loop(client: Client, config: ControllerConfig, server_state: Arc<ServerState>) {
    let shutdown_state = Arc::clone(&server_state);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received shutdown signal, waiting for in-flight reconciliations to complete...");
            shutdown_state.set_ready(false);
        }
    });

    server_state.set_ready(true);
    info!("Controllers initialized, starting watch loops...");

    futures::join!(
        run_controller(client.clone(), iam::role::setup(&client, &config), &config),
        run_controller(client.clone(), glue::connection::setup(&client, &config), &config),
        run_controller(
            client.clone(),
            apigatewayv2::route_response::setup(&client, &config),
            &config,
        ),
        run_controller(
            client.clone(),
            sesv2::configuration_set::setup(&client, &config),
            &config,
        ),
        run_controller(
            client.clone(),
            ec2::vpc_endpoint_service_configuration::setup(&client, &config),
            &config,
        ),
    );

    info!("Controllers stopped");
}

/// Watch one managed kind cluster-wide
pub async fn run_controller<R: Managed>(
    client: Client,
    ctx: ReconcileContext<R>,
    config: &ControllerConfig,
) {
    let kind = R::kind(&()).to_string();
    info!("Starting {} controller", kind);

    let api: Api<R> = Api::all(client);
    Controller::new(api, watcher::Config::default().any_semantic())
        .with_config(controller::Config::default().concurrency(config.max_reconcile_rate))
        .shutdown_on_signal()
        .run(reconcile, handle_reconciliation_error, Arc::new(ctx))
        .for_each(|result| {
            match result {
                Ok((obj, _)) => debug!("Reconciled {}", obj),
                Err(e) => warn!("{} controller stream error: {}", kind, e),
            }
            futures::future::ready(())
        })
        .await;

    info!("{} controller stopped", R::kind(&()));
}

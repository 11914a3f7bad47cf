//! # AWS Provider
//!
//! Kubernetes controller manager that reconciles AWS resources declared as
//! managed custom resources:
//!
//! - `Role.iam.aws.crossplane.io`
//! - `Connection.glue.aws.crossplane.io`
//! - `RouteResponse.apigatewayv2.aws.crossplane.io`
//! - `ConfigurationSet.sesv2.aws.crossplane.io`
//! - `VPCEndpointServiceConfiguration.ec2.aws.crossplane.io`
//!
//! Each kind is watched cluster-wide. Credentials come from the referenced
//! `ProviderConfig`.

use anyhow::Result;
use clap::Parser;
use provider_aws::config::ControllerConfig;
use provider_aws::runtime::initialization::initialize;
use provider_aws::runtime::watch_loop::run_watch_loop;

/// Command-line flags; each overrides the matching environment variable
#[derive(Debug, Parser)]
#[command(name = "provider-aws", about = "AWS support for Crossplane", version)]
struct Args {
    /// Run with debug logging
    #[arg(short, long)]
    debug: bool,

    /// Interval between observations of in-sync resources, in seconds
    #[arg(long)]
    poll: Option<u64>,

    /// Resources of one kind reconciled concurrently
    #[arg(long)]
    max_reconcile_rate: Option<u16>,

    /// Port of the metrics and probe server
    #[arg(long)]
    metrics_port: Option<u16>,
}

impl Args {
    fn apply(self, mut config: ControllerConfig) -> ControllerConfig {
        if self.debug {
            config.log_level = "DEBUG".to_string();
        }
        if let Some(poll) = self.poll {
            config.poll_interval_secs = poll;
        }
        if let Some(rate) = self.max_reconcile_rate {
            config.max_reconcile_rate = rate;
        }
        if let Some(port) = self.metrics_port {
            config.metrics_port = port;
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Args::parse().apply(ControllerConfig::from_env());

    let init = initialize(&config).await?;

    run_watch_loop(init.client, config, init.server_state).await;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let args = Args::parse_from([
            "provider-aws",
            "--debug",
            "--poll",
            "30",
            "--max-reconcile-rate",
            "4",
        ]);
        let config = args.apply(ControllerConfig::default());

        assert_eq!(config.log_level, "DEBUG");
        assert_eq!(config.poll_interval_secs, 30);
        assert_eq!(config.max_reconcile_rate, 4);
        assert_eq!(config.metrics_port, ControllerConfig::default().metrics_port);
    }

    #[test]
    fn test_no_flags_keep_config() {
        let args = Args::parse_from(["provider-aws"]);
        assert_eq!(
            args.apply(ControllerConfig::default()),
            ControllerConfig::default()
        );
    }
}

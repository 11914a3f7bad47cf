//! # CRD Generator
//!
//! Prints the CustomResourceDefinitions of every managed kind and of
//! `ProviderConfig` as one multi-document YAML stream.
//!
//! ```bash
//! cargo run --bin crdgen > package/crds.yaml
//! cargo run --bin crdgen | kubectl apply -f -
//! ```

use anyhow::Result;
use kube::core::CustomResourceExt;
use provider_aws::crd::{
    ConfigurationSet, Connection, ProviderConfig, Role, RouteResponse,
    VpcEndpointServiceConfiguration,
};

fn main() -> Result<()> {
    let crds = [
        ProviderConfig::crd(),
        Role::crd(),
        Connection::crd(),
        RouteResponse::crd(),
        ConfigurationSet::crd(),
        VpcEndpointServiceConfiguration::crd(),
    ];

    let documents = crds
        .iter()
        .map(serde_yaml::to_string)
        .collect::<Result<Vec<_>, _>>()?;
    print!("{}", documents.join("---\n"));
    Ok(())
}

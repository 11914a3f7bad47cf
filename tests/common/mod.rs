//! Common test utilities
//!
//! Builders for managed resources parsed from YAML the way users write them,
//! and a recording `ServiceApi` fake for exercising the hook-driven client.

#![allow(dead_code, reason = "each test binary uses a subset of the helpers")]

use provider_aws::crd::{Connection, Role};
use std::sync::{Arc, Mutex};

pub fn role_from_yaml(yaml: &str) -> Role {
    serde_yaml::from_str(yaml).expect("role YAML should deserialize")
}

pub fn connection_from_yaml(yaml: &str) -> Connection {
    serde_yaml::from_str(yaml).expect("connection YAML should deserialize")
}

pub const ROLE_YAML: &str = r#"
apiVersion: iam.aws.crossplane.io/v1beta1
kind: Role
metadata:
  name: app-role
  annotations:
    crossplane.io/external-name: app-role
spec:
  forProvider:
    assumeRolePolicyDocument: |
      {
        "Version": "2012-10-17",
        "Statement": [
          {
            "Effect": "Allow",
            "Principal": {"Service": "eks.amazonaws.com"},
            "Action": "sts:AssumeRole"
          }
        ]
      }
    description: application role
    tags:
      - key: team
        value: platform
"#;

pub const CONNECTION_YAML: &str = r#"
apiVersion: glue.aws.crossplane.io/v1alpha1
kind: Connection
metadata:
  name: warehouse
spec:
  deletionPolicy: Orphan
  providerConfigRef:
    name: analytics
  forProvider:
    region: eu-west-1
    connectionInput:
      connectionType: JDBC
      connectionProperties:
        JDBC_CONNECTION_URL: jdbc:postgresql://warehouse:5432/db
"#;

/// Shared log of the calls a fake made, in order
#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    pub fn push(&self, call: impl Into<String>) {
        self.0.lock().unwrap().push(call.into());
    }

    pub fn calls(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

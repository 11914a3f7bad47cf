//! # Constants
//!
//! Shared constants used throughout the provider.
//!
//! These values represent reasonable defaults and can be overridden via
//! configuration or environment variables where applicable.

/// Default HTTP server port for metrics and health probes
pub const DEFAULT_METRICS_PORT: u16 = 8080;

/// Default interval between observations of an in-sync resource (seconds)
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 60;

/// Default number of resources reconciled concurrently per kind
pub const DEFAULT_MAX_RECONCILE_RATE: u16 = 10;

/// Requeue delay after a successful create, so the new resource is observed soon (seconds)
pub const DEFAULT_CREATE_GRACE_REQUEUE_SECS: u64 = 5;

/// Requeue delay while waiting for an external resource to disappear (seconds)
pub const DEFAULT_DELETION_POLL_SECS: u64 = 10;

/// Error backoff bounds (seconds)
pub const DEFAULT_BACKOFF_MIN_SECS: u64 = 1;
pub const DEFAULT_BACKOFF_MAX_SECS: u64 = 60;

/// Default log level and format
pub const DEFAULT_LOG_LEVEL: &str = "INFO";
pub const DEFAULT_LOG_FORMAT: &str = "text";

/// Annotation holding the provider-side identifier of a managed resource
pub const EXTERNAL_NAME_ANNOTATION: &str = "crossplane.io/external-name";

/// Finalizer added to every managed resource before any external call
pub const MANAGED_FINALIZER: &str = "finalizer.managedresource.crossplane.io";

/// Field manager used for server-side apply of connection secrets
pub const FIELD_MANAGER: &str = "provider-aws";

/// Secret type for published connection details
pub const CONNECTION_SECRET_TYPE: &str = "connection.crossplane.io/v1alpha1";

/// ProviderConfig used when a resource does not reference one
pub const DEFAULT_PROVIDER_CONFIG: &str = "default";

/// Profile read from shared-credentials secrets
pub const DEFAULT_CREDENTIALS_PROFILE: &str = "default";

/// STS session name used for assumeRoleARN
pub const ASSUME_ROLE_SESSION_NAME: &str = "crossplane-provider-aws";

/// Region used for global services (IAM)
pub const GLOBAL_REGION: &str = "us-east-1";

/// Reserved tag keys stamped on every tagged resource
pub const TAG_KEY_NAME: &str = "Name";
pub const TAG_KEY_KIND: &str = "crossplane-kind";
pub const TAG_KEY_RESOURCE_NAME: &str = "crossplane-name";
pub const TAG_KEY_PROVIDER_CONFIG: &str = "crossplane-providerconfig";

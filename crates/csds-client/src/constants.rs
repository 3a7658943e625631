//! Constants shared with the control plane.
//!
//! Keep these stable: the control plane matches on the exact strings.

/// Default CSDS endpoint (Traffic Director).
pub const DEFAULT_SERVICE_URI: &str = "trafficdirector.googleapis.com:443";

/// Metadata key carrying the GCP project number in a node matcher.
pub const GCP_PROJECT_NUMBER_KEY: &str = "TRAFFICDIRECTOR_GCP_PROJECT_NUMBER";

/// Metadata key carrying the VPC network name in a node matcher.
pub const GCP_NETWORK_NAME_KEY: &str = "TRAFFICDIRECTOR_NETWORK_NAME";

/// Metadata keys every `gcp` request must match on.
pub const GCP_REQUIRED_KEYS: [&str; 2] = [GCP_PROJECT_NUMBER_KEY, GCP_NETWORK_NAME_KEY];

/// Header used to bill requests against the caller's project.
pub const USER_PROJECT_HEADER: &str = "x-goog-user-project";

/// Top-level key of a request document.
pub const NODE_MATCHERS_KEY: &str = "node_matchers";

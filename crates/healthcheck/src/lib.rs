//! Remote Control-Plane Liveness Probing
//!
//! Issues a bounded, unauthenticated `GET /livez` against each remote
//! cluster's API server and classifies the outcome. A probe answers one
//! question only: did the control plane respond with a success status
//! within the deadline?
//!
//! # Example
//!
//! ```no_run
//! use healthcheck::{HealthChecker, LivenessProbe};
//! use kubeconfig::RemoteApiServer;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let probe = LivenessProbe::new()?;
//! let target = RemoteApiServer {
//!     name: "cluster-a".to_string(),
//!     endpoint: "https://10.0.0.1:6443".to_string(),
//! };
//!
//! match probe.check(&target).await {
//!     Ok(()) => println!("{} is running", target.name),
//!     Err(e) => println!("{} is unreachable: {}", target.name, e),
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod probe;
#[path = "trait.rs"]
pub mod health_trait;
#[cfg(feature = "test-util")]
pub mod mock;

pub use error::HealthCheckError;
pub use health_trait::HealthChecker;
pub use probe::{LivenessProbe, PROBE_TIMEOUT};
#[cfg(feature = "test-util")]
pub use mock::MockHealthChecker;

//! Aggregated Kubeconfig Handling
//!
//! Parses a multi-context kubeconfig document that aggregates the connection
//! details of a whole fleet of remote clusters, and builds one `kube::Client`
//! per context without ever writing credentials to disk.
//!
//! # Example
//!
//! ```no_run
//! use kubeconfig::{read_kubeconfig, build_remote_clients, SecretRef};
//!
//! # async fn example(client: kube::Client) -> Result<(), Box<dyn std::error::Error>> {
//! let source = SecretRef::default();
//! let (raw, servers, targets) = read_kubeconfig(client, &source).await?;
//!
//! println!("{} endpoints, {} contexts", servers.len(), targets.len());
//!
//! // One ready-to-use client per context in the document.
//! let clients = build_remote_clients(&raw, &targets).await?;
//! # Ok(())
//! # }
//! ```

pub mod clients;
pub mod error;
pub mod parser;
pub mod read;
pub mod types;

pub use clients::build_remote_clients;
pub use error::KubeconfigError;
pub use parser::parse_kubeconfig;
pub use read::{SecretRef, read_kubeconfig};
pub use types::{RemoteApiServer, TargetCluster};

//! Kubeconfig handling errors

use thiserror::Error;

/// Errors that can occur while reading or consuming the aggregated kubeconfig
#[derive(Debug, Error)]
pub enum KubeconfigError {
    /// Kubernetes API error while fetching the Secret
    #[error("Kubernetes API error: {0}")]
    Kube(#[from] kube::Error),

    /// The Secret exists but does not carry the expected key
    #[error("Secret {namespace}/{name} has no key {key:?}")]
    MissingKey {
        /// Secret namespace
        namespace: String,
        /// Secret name
        name: String,
        /// Key the kubeconfig document was expected under
        key: String,
    },

    /// The Secret value is not valid UTF-8 text
    #[error("kubeconfig document is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    /// The document could not be decoded as YAML
    #[error("failed to decode kubeconfig document: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// `kube` rejected the document when loading it as a kubeconfig
    #[error("failed to load kubeconfig: {0}")]
    Load(#[from] kube::config::KubeconfigError),

    /// Client config could not be built for one context
    #[error("failed to build client config for context {context}: {source}")]
    Context {
        /// Context the failure belongs to
        context: String,
        /// Underlying kubeconfig error
        #[source]
        source: kube::config::KubeconfigError,
    },
}

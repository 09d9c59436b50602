//! Prints the ClusterDetector CRD manifest as YAML.
//!
//! Usage: `cargo run --bin crdgen > config/crd/clusterdetectors.yaml`

use crds::ClusterDetector;
use kube::CustomResourceExt;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    print!("{}", serde_yaml::to_string(&ClusterDetector::crd())?);
    Ok(())
}

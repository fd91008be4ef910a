//! docker-compose manifest synthesis.
//!
//! Discovers service directories in the project root, registers the new
//! ones in the manifest with collision-free host ports, and never touches
//! entries that are already there.

mod discovery;
mod dockerfile;
mod manifest;
mod ports;
mod synthesizer;

pub use discovery::{DOCKERFILE, DiscoveredService, build_context, discover};
pub use manifest::{
    Command, ComposeManifest, DEFAULT_VERSION, Environment, Networks, PortSpec, ServiceEntry,
    VolumeSpec,
};
pub use ports::{PortAllocator, host_ports};
pub use synthesizer::{
    ComposeReport, GOPATH_VOLUME, Plan, PortBinding, Registration, Synthesizer, Transport,
};

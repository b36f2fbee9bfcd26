/// Domain layer for the package audit pipeline
///
/// Pure types and rules: what a package request is, how manifests and
/// repository lists are read, how tool output is interpreted. Nothing in
/// here touches the network, the filesystem, or a subprocess.
pub mod domain;
pub mod policies;
pub mod services;

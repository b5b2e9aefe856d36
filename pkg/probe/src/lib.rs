pub mod discovery;
pub mod probe;

pub use discovery::{assign_roles, extract_candidates};
pub use probe::{EndpointProbe, probe_url};

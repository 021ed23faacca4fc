mod findings;
mod report;
mod severity;

pub use findings::Findings;
pub use report::{Advisory, ExternalLink, RelatedResource, Remediation, Report};
pub use severity::Severity;

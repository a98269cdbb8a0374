pub mod requests;
pub mod responses;

pub use requests::IvrRequest;
pub use responses::{HealthResponse, IvrResponse};

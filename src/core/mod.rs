//! Request pipeline: transport, session, executor and pagination.

pub mod connector;
pub mod envelope;
pub mod http;
pub mod logging;
pub mod pagination;
pub mod params;
pub mod session;

pub use connector::{ApiRequest, Connector, ConnectorConfig, DEFAULT_BASE_URL};
pub use envelope::{Cursor, Envelope, PageBudget};
pub use http::{FilePart, HttpBody, HttpMethod, HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
pub use params::{Params, build_params};
pub use session::{Credentials, Session};

//! Request coordination and resource services for the hateoas HAL client.
//!
//! # Layers
//!
//! - **Transport**: [`Transport`] performs one HTTP call and yields one
//!   response or one error. [`ReqwestTransport`] is the default; the
//!   [`transport::mock`] module scripts responses for tests.
//! - **Executor**: [`HttpExecutor`] runs the cache check, dispatch and
//!   cache update/eviction for each call.
//! - **Service**: [`ResourceService`] builds URLs, validates the response
//!   shape and materializes results.
//!
//! # Example
//!
//! ```no_run
//! use hateoas_client::ResourceService;
//! use hateoas_model::{Resource, TypeRegistry};
//! use hateoas_types::{ClientConfig, RequestOptions};
//!
//! # async fn run() -> hateoas_types::HateoasResult<()> {
//! let mut registry = TypeRegistry::new();
//! registry.register_resource("books", || Resource::new("Book"));
//!
//! let service = ResourceService::connect(
//!     ClientConfig::new("http://localhost:8080/api"),
//!     registry.freeze(),
//! )?;
//! let book = service.get_resource("books", "1", &RequestOptions::new()).await?;
//! println!("{}", book.to_json());
//! # Ok(())
//! # }
//! ```

mod executor;
mod http;
pub mod logging;
mod paging;
mod relations;
mod service;
pub mod transport;

pub use executor::HttpExecutor;
pub use http::ReqwestTransport;
pub use service::{Reply, ResourceService};
pub use transport::{HttpMethod, HttpRequest, HttpResponse, RequestBody, Transport};

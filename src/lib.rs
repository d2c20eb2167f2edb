//! Client-side object mapping over a GraphQL-like query protocol.
//!
//! The crate compiles schema declaration text into typed model metadata
//! ([`Schema`]), then lets callers fetch data by example: a probe closure reads
//! the fields it wants off an empty stand-in [`Shape`], the wire query is
//! synthesized from that access pattern, and the JSON response is hydrated back
//! into typed shapes the same probe then consumes.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use graphdal::Configuration;
//! use graphdal::Schema;
//! use graphdal::Session;
//! use url::Url;
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let schema = Arc::new(Schema::parse("type Person {\n  name: String!\n  age: Long\n}\n")?);
//! let configuration = Configuration::builder()
//!     .endpoint(Url::parse("http://localhost:7474/graphql/")?)
//!     .build();
//! let session = Session::new(schema, &configuration)?;
//!
//! let names = session
//!     .execute("Person", |people| {
//!         people
//!             .iter_mut()
//!             .map(|person| Ok(person.scalar("name")?.clone()))
//!             .collect::<Result<Vec<_>, _>>()
//!     })
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! Mutations are not supported; [`Session::mutate`] always fails.

pub mod configuration;
pub mod error;
pub mod graphql;
pub mod schema;
pub mod shape;
pub mod transport;

mod hydrate;
mod query;
mod session;

pub use crate::configuration::Configuration;
pub use crate::configuration::Credentials;
pub use crate::error::QueryError;
pub use crate::error::SchemaError;
pub use crate::error::TransportError;
pub use crate::schema::FieldDef;
pub use crate::schema::Schema;
pub use crate::schema::TypeDef;
pub use crate::session::Session;
pub use crate::shape::FieldValue;
pub use crate::shape::Shape;
pub use crate::transport::HttpTransport;
pub use crate::transport::Transport;

//! Query session orchestration.
//!
//! One `execute` call drives the whole round trip: build a query-mode shape, run
//! the probe over it to record the wanted fields, compile the recorded tree to
//! wire text, submit it, hydrate the payload, and run the probe a second time
//! over the hydrated data. The probe never receives a mode flag; it tells the
//! two invocations apart only by the values it observes.

use std::sync::Arc;

use crate::configuration::Configuration;
use crate::error::QueryError;
use crate::error::TransportError;
use crate::graphql::Request;
use crate::hydrate;
use crate::query;
use crate::schema::Schema;
use crate::shape::Shape;
use crate::transport::HttpTransport;
use crate::transport::Transport;

/// A query session over one schema and one transport.
///
/// Sessions share the registry behind an `Arc` and own nothing mutable between
/// calls, so independent sessions (or concurrent `execute` calls on clones of
/// the `Arc`) never interfere.
pub struct Session<T = HttpTransport> {
    schema: Arc<Schema>,
    transport: T,
}

impl Session<HttpTransport> {
    /// Create a session over the production HTTP transport.
    pub fn new(schema: Arc<Schema>, configuration: &Configuration) -> Result<Self, TransportError> {
        Ok(Self {
            schema,
            transport: HttpTransport::new(configuration)?,
        })
    }
}

impl<T: Transport> Session<T> {
    /// Create a session over a caller-supplied transport.
    pub fn with_transport(schema: Arc<Schema>, transport: T) -> Self {
        Self { schema, transport }
    }

    /// The registry this session queries against.
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Execute one query-by-example round trip.
    ///
    /// The probe is invoked exactly twice: first over a fresh query-mode shape
    /// (its field accesses are the query), then over the hydrated response data.
    /// Its second return value becomes the session result. The probe must have
    /// no side effects other than what it does to the shapes it is given.
    ///
    /// Backend-reported errors fail fast with the first message, before any
    /// hydration happens.
    pub async fn execute<R>(
        &self,
        type_name: &str,
        mut probe: impl FnMut(&mut [Shape]) -> Result<R, QueryError>,
    ) -> Result<R, QueryError> {
        let mut roots = [Shape::for_query(self.schema.clone(), type_name)?];
        probe(&mut roots)?;

        let compiled = query::compile(&roots[0]);
        tracing::debug!(query = %compiled, "compiled query");

        let response = self.transport.send(&Request::new(compiled)).await?;

        if let Some(error) = response.errors.first() {
            return Err(QueryError::Execution(error.message.clone()));
        }
        let data = response.data.ok_or_else(|| {
            QueryError::Hydration("success response carried no data".to_string())
        })?;

        let mut hydrated = hydrate::hydrate(&self.schema, &data)?;
        probe(&mut hydrated)
    }

    /// Mutations are not part of the wire contract and always fail.
    pub async fn mutate(&self, _document: &str) -> Result<(), QueryError> {
        Err(QueryError::MutationsUnsupported)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::Value;
    use serde_json::json;

    use super::*;
    use crate::graphql::Response;

    /// Replays a canned response and records every request it sees.
    struct CannedTransport {
        response: Value,
        requests: Mutex<Vec<Request>>,
    }

    impl CannedTransport {
        fn new(response: Value) -> Self {
            Self {
                response,
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Transport for CannedTransport {
        async fn send(&self, request: &Request) -> Result<Response, TransportError> {
            self.requests.lock().unwrap().push(request.clone());
            serde_json::from_value(self.response.clone()).map_err(|err| {
                TransportError::MalformedResponse {
                    reason: err.to_string(),
                }
            })
        }
    }

    fn person_schema() -> Arc<Schema> {
        Arc::new(
            Schema::parse("type Person {\n  name: String!\n  age: Long\n}\n").unwrap(),
        )
    }

    #[tokio::test]
    async fn full_round_trip() {
        let transport =
            CannedTransport::new(json!({"data": {"Person": {"name": "Ann"}}}));
        let session = Session::with_transport(person_schema(), transport);

        let name = session
            .execute("Person", |people| {
                Ok(people[0].scalar("name")?.clone())
            })
            .await
            .unwrap();

        assert_eq!(name, "Ann");
        let requests = session.transport.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].query, "{ Person{ name } }");
        assert!(requests[0].operation_name.is_none());
        assert!(requests[0].variables.is_empty());
    }

    #[tokio::test]
    async fn probe_runs_exactly_twice() {
        let transport =
            CannedTransport::new(json!({"data": {"Person": {"name": "Ann"}}}));
        let session = Session::with_transport(person_schema(), transport);

        let mut invocations = 0;
        session
            .execute("Person", |people| {
                invocations += 1;
                people[0].scalar("name")?;
                Ok(())
            })
            .await
            .unwrap();
        assert_eq!(invocations, 2);
    }

    #[tokio::test]
    async fn probe_sees_placeholder_then_data() {
        let transport =
            CannedTransport::new(json!({"data": {"Person": {"name": "Ann"}}}));
        let session = Session::with_transport(person_schema(), transport);

        let mut observed = Vec::new();
        session
            .execute("Person", |people| {
                observed.push(people[0].scalar("name")?.clone());
                Ok(())
            })
            .await
            .unwrap();
        assert_eq!(observed, [Value::Null, Value::String("Ann".to_string())]);
    }

    #[tokio::test]
    async fn list_responses_hydrate_to_multiple_shapes() {
        let transport = CannedTransport::new(
            json!({"data": {"Person": [{"name": "Ann"}, {"name": "Bo"}]}}),
        );
        let session = Session::with_transport(person_schema(), transport);

        let names = session
            .execute("Person", |people| {
                people
                    .iter_mut()
                    .map(|person| Ok(person.scalar("name")?.clone()))
                    .collect::<Result<Vec<_>, QueryError>>()
            })
            .await
            .unwrap();
        // The query pass sees one stand-in, the data pass two records.
        assert_eq!(names, [json!("Ann"), json!("Bo")]);
    }

    #[tokio::test]
    async fn backend_error_fails_fast_with_first_message() {
        let transport = CannedTransport::new(json!({
            "errors": [{"message": "unauthorized"}, {"message": "second"}]
        }));
        let session = Session::with_transport(person_schema(), transport);

        let mut invocations = 0;
        let err = session
            .execute("Person", |people| {
                invocations += 1;
                people[0].scalar("name")?;
                Ok(())
            })
            .await
            .unwrap_err();

        assert!(matches!(err, QueryError::Execution(ref m) if m == "unauthorized"));
        // No hydration, no second probe pass.
        assert_eq!(invocations, 1);
    }

    #[tokio::test]
    async fn success_without_data_is_a_hydration_error() {
        let transport = CannedTransport::new(json!({}));
        let session = Session::with_transport(person_schema(), transport);
        let err = session
            .execute("Person", |people| {
                people[0].scalar("name")?;
                Ok(())
            })
            .await
            .unwrap_err();
        assert!(matches!(err, QueryError::Hydration(_)));
    }

    #[tokio::test]
    async fn unknown_root_type_fails_before_any_transport_call() {
        let transport = CannedTransport::new(json!({"data": {}}));
        let session = Session::with_transport(person_schema(), transport);
        let err = session
            .execute("Robot", |_| Ok(()))
            .await
            .unwrap_err();
        assert!(matches!(err, QueryError::UnknownType(_)));
        assert!(session.transport.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn mutations_are_unsupported() {
        let transport = CannedTransport::new(json!({"data": {}}));
        let session = Session::with_transport(person_schema(), transport);
        assert!(matches!(
            session.mutate("{ createPerson }").await,
            Err(QueryError::MutationsUnsupported)
        ));
    }
}

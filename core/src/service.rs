//! Record operations executed over a `Transport`.
//!
//! Every call is one independent round-trip: no retries, no caching.
//! Failures are returned as `ApiError` so callers can tell "no records" from
//! "the API could not be reached".

use tracing::{debug, warn};

use crate::client::RecordsClient;
use crate::error::ApiError;
use crate::filter::{resolve_by_name, NameMatch};
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::Transport;
use crate::types::{LoginOutcome, Record};

#[derive(Debug)]
pub struct RecordService<T> {
    client: RecordsClient,
    transport: T,
}

impl<T: Transport> RecordService<T> {
    pub fn new(client: RecordsClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &RecordsClient {
        &self.client
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn list_records(&self) -> Result<Vec<Record>, ApiError> {
        let response = self.send(self.client.build_list_records())?;
        self.client.parse_list_records(response)
    }

    pub fn add_record(&self, record: &Record) -> Result<(), ApiError> {
        let response = self.send(self.client.build_add_record(record)?)?;
        self.client.parse_add_record(response)
    }

    pub fn update_record(&self, id: &str, record: &Record) -> Result<(), ApiError> {
        let response = self.send(self.client.build_update_record(id, record)?)?;
        self.client.parse_update_record(response)
    }

    pub fn delete_record(&self, id: &str) -> Result<(), ApiError> {
        let response = self.send(self.client.build_delete_record(id))?;
        self.client.parse_delete_record(response)
    }

    /// Transport failures are logged and reported as a rejection.
    pub fn login(&self, username: &str, password: &str) -> LoginOutcome {
        let response = self
            .client
            .build_login(username, password)
            .and_then(|req| self.send(req));
        match response {
            Ok(response) => self.client.parse_login(response),
            Err(err) => {
                warn!(error = %err, "login request failed");
                LoginOutcome::Rejected
            }
        }
    }

    /// Patient names in API order, duplicates included.
    pub fn patient_names(&self) -> Result<Vec<String>, ApiError> {
        Ok(self.list_records()?.iter().map(Record::name).collect())
    }

    /// Fresh fetch, then exact-name lookup.
    pub fn record_by_name(&self, name: &str) -> Result<NameMatch, ApiError> {
        Ok(resolve_by_name(self.list_records()?, name))
    }

    fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let method = request.method;
        let path = request.path.clone();
        let response = self.transport.execute(request)?;
        debug!(%method, %path, status = response.status, "records api round-trip");
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpMethod;
    use crate::transport::ScriptedTransport;

    fn service(transport: ScriptedTransport) -> RecordService<ScriptedTransport> {
        RecordService::new(RecordsClient::new("http://api.test"), transport)
    }

    #[test]
    fn list_failure_is_distinct_from_empty() {
        let svc = service(ScriptedTransport::new().respond(200, "[]").respond(500, "boom"));
        assert!(svc.list_records().unwrap().is_empty());
        assert!(matches!(
            svc.list_records(),
            Err(ApiError::HttpError { status: 500, .. })
        ));
    }

    #[test]
    fn added_record_becomes_resolvable_by_name() {
        let svc = service(
            ScriptedTransport::new()
                .respond(201, "{}")
                .respond(200, r#"[{"_id":"n1","NOME":"Ana Silva","HOSPITAL":"Santa Casa"}]"#),
        );
        let record = Record::new().with("NOME", "Ana Silva").with("HOSPITAL", "Santa Casa");
        svc.add_record(&record).unwrap();

        match svc.record_by_name("Ana Silva").unwrap() {
            NameMatch::Unique(found) => {
                assert_eq!(found.id.as_deref(), Some("n1"));
                assert_eq!(found.hospital(), "Santa Casa");
            }
            other => panic!("expected unique match, got {other:?}"),
        }

        let requests = svc.transport().requests();
        assert_eq!(requests[0].method, HttpMethod::Post);
        assert_eq!(requests[0].path, "http://api.test/add_record");
        assert_eq!(requests[1].method, HttpMethod::Get);
    }

    #[test]
    fn deleted_record_is_no_longer_resolvable() {
        let svc = service(
            ScriptedTransport::new()
                .respond(200, r#"{"message":"deleted"}"#)
                .respond(200, r#"[{"_id":"n2","NOME":"Pedro"}]"#),
        );
        svc.delete_record("n1").unwrap();
        assert!(svc.record_by_name("Ana Silva").unwrap().is_not_found());
        assert_eq!(
            svc.transport().requests()[0].path,
            "http://api.test/delete_record/n1"
        );
    }

    #[test]
    fn lookup_reports_fetch_failure_instead_of_not_found() {
        let svc = service(ScriptedTransport::new().fail("connection refused"));
        assert!(matches!(
            svc.record_by_name("Ana"),
            Err(ApiError::Transport(_))
        ));
    }

    #[test]
    fn update_addresses_the_record_id() {
        let svc = service(ScriptedTransport::new().respond(200, "{}"));
        let record = Record::new().with_id("n9").with("NOME", "Ana");
        svc.update_record("n9", &record).unwrap();
        let req = &svc.transport().requests()[0];
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.path, "http://api.test/update_record/n9");
    }

    #[test]
    fn login_never_errors() {
        let svc = service(
            ScriptedTransport::new()
                .respond(200, "{}")
                .respond(401, "nope")
                .fail("dns"),
        );
        assert_eq!(svc.login("u", "p"), LoginOutcome::Authenticated);
        assert_eq!(svc.login("u", "bad"), LoginOutcome::Rejected);
        assert_eq!(svc.login("u", "p"), LoginOutcome::Rejected);
    }

    #[test]
    fn patient_names_keep_api_order() {
        let svc = service(ScriptedTransport::new().respond(
            200,
            r#"[{"NOME":"Pedro"},{"NOME":"Ana"},{"NOME":"Pedro"}]"#,
        ));
        assert_eq!(svc.patient_names().unwrap(), ["Pedro", "Ana", "Pedro"]);
    }
}

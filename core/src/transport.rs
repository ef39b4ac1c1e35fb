//! The seam between the I/O-free core and the host that performs HTTP.

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};

/// Executes one HTTP round-trip.
///
/// Non-2xx statuses are returned as data; only failures that produced no
/// response at all become `ApiError::Transport`.
pub trait Transport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        (**self).execute(request)
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use scripted::ScriptedTransport;

#[cfg(any(test, feature = "test-support"))]
mod scripted {
    use std::cell::RefCell;
    use std::collections::VecDeque;

    use super::*;

    /// Replays queued responses in order and records every request.
    #[derive(Debug, Default)]
    pub struct ScriptedTransport {
        responses: RefCell<VecDeque<Result<HttpResponse, ApiError>>>,
        requests: RefCell<Vec<HttpRequest>>,
    }

    impl ScriptedTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn respond(self, status: u16, body: impl Into<String>) -> Self {
            self.push(status, body);
            self
        }

        pub fn fail(self, reason: &str) -> Self {
            self.responses
                .borrow_mut()
                .push_back(Err(ApiError::Transport(reason.to_string())));
            self
        }

        pub fn push(&self, status: u16, body: impl Into<String>) {
            self.responses
                .borrow_mut()
                .push_back(Ok(HttpResponse::new(status, body)));
        }

        pub fn requests(&self) -> Vec<HttpRequest> {
            self.requests.borrow().clone()
        }

        pub fn remaining(&self) -> usize {
            self.responses.borrow().len()
        }
    }

    impl Transport for ScriptedTransport {
        fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
            self.requests.borrow_mut().push(request);
            self.responses
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| {
                    Err(ApiError::Transport("no scripted response left".to_string()))
                })
        }
    }
}

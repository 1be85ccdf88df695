//! The request/response flow every operation shares.
//!
//! Build the call, execute it, classify the status, hand back the success
//! body. Each failure is recorded in the operation's diagnostics; `None` means
//! the operation must stop.

use std::fmt;

use authproxy_client::{CancellationToken, Transport};
use authproxy_core::{Diagnostics, ReconcileError, ReconcileResult, RemoteCall};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Verb {
    Create,
    Read,
    Update,
    Delete,
}

impl Verb {
    fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Read => "read",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }

    fn noun(self) -> &'static str {
        match self {
            Self::Create => "creation",
            Self::Read => "read",
            Self::Update => "update",
            Self::Delete => "deletion",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An operation on one entity kind, used to label diagnostics and logs.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Op {
    pub verb: Verb,
    pub entity: &'static str,
}

impl Op {
    pub const fn new(verb: Verb, entity: &'static str) -> Self {
        Self { verb, entity }
    }

    pub fn summary(&self) -> String {
        format!("Unable to {} {}", self.verb, self.entity)
    }

    pub fn fail(&self, diags: &mut Diagnostics, err: &ReconcileError) {
        diags.add_reconcile_error(self.summary(), err);
    }

    /// Records a decode failure, passing a decoded value through.
    pub fn decoded<T>(&self, diags: &mut Diagnostics, result: ReconcileResult<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::warn!(entity = self.entity, verb = %self.verb, "undecodable response: {}", err);
                self.fail(diags, &err);
                None
            }
        }
    }
}

pub(crate) async fn dispatch(
    transport: &dyn Transport,
    cancel: &CancellationToken,
    op: Op,
    call: ReconcileResult<RemoteCall>,
    diags: &mut Diagnostics,
) -> Option<Vec<u8>> {
    let call = match call {
        Ok(call) => call,
        Err(err) => {
            op.fail(diags, &err);
            return None;
        }
    };

    let exchange = match transport.execute(&call, cancel).await {
        Ok(exchange) => exchange,
        Err(err) => {
            op.fail(diags, &err);
            return None;
        }
    };

    if !exchange.is_success() {
        let status = exchange.status;
        match exchange.body {
            Ok(body) => {
                let body = String::from_utf8_lossy(&body).into_owned();
                tracing::error!(status, body = %body, "could not {} {}", op.verb, op.entity);
                op.fail(diags, &ReconcileError::remote_rejected(status, body));
            }
            Err(read_err) => {
                op.fail(diags, &ReconcileError::remote_rejected(status, ""));
                diags.add_reconcile_error(
                    format!(
                        "Unable to handle non 200 status code on {} {}",
                        op.entity,
                        op.verb.noun()
                    ),
                    &ReconcileError::transport(read_err),
                );
            }
        }
        return None;
    }

    match exchange.body {
        Ok(body) => Some(body),
        Err(read_err) => {
            op.fail(diags, &ReconcileError::transport(read_err));
            None
        }
    }
}

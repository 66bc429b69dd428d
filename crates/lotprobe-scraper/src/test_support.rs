//! Scripted collaborators for unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::dispatch::{DispatchRequest, RawResponse, Transport};
use crate::error::{DispatchError, RunnerError};
use crate::minter::{ProcessInvocation, ProcessOutput, ProcessRunner};
use crate::orchestrator::{OutcomeSink, TerminalRecord};

/// Successful exit with the given stdout.
pub(crate) fn exited_ok(stdout: &str) -> ProcessOutput {
    ProcessOutput {
        success: true,
        exit_code: Some(0),
        stdout: stdout.to_owned(),
        stderr: String::new(),
    }
}

/// Replays queued results in order and records every invocation.
#[derive(Default)]
pub(crate) struct ScriptedRunner {
    results: Mutex<VecDeque<Result<ProcessOutput, RunnerError>>>,
    invocations: Mutex<Vec<ProcessInvocation>>,
}

impl ScriptedRunner {
    pub(crate) fn new(results: Vec<Result<ProcessOutput, RunnerError>>) -> Self {
        Self {
            results: Mutex::new(results.into()),
            invocations: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn invocations(&self) -> Vec<ProcessInvocation> {
        self.invocations.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProcessRunner for ScriptedRunner {
    async fn run(&self, invocation: &ProcessInvocation) -> Result<ProcessOutput, RunnerError> {
        self.invocations.lock().unwrap().push(invocation.clone());
        self.results
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected minter invocation")
    }
}

/// Replays queued responses in order and records every request.
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<RawResponse, DispatchError>>>,
    requests: Mutex<Vec<DispatchRequest>>,
}

impl ScriptedTransport {
    pub(crate) fn new(responses: Vec<Result<RawResponse, DispatchError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn requests(&self) -> Vec<DispatchRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: DispatchRequest) -> Result<RawResponse, DispatchError> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected dispatch")
    }
}

#[derive(Default)]
pub(crate) struct CapturingSink {
    records: Mutex<Vec<TerminalRecord>>,
}

impl CapturingSink {
    pub(crate) fn records(&self) -> Vec<TerminalRecord> {
        self.records.lock().unwrap().clone()
    }
}

impl OutcomeSink for CapturingSink {
    fn record(&self, record: &TerminalRecord) {
        self.records.lock().unwrap().push(record.clone());
    }
}

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{CoreError, RpcError};

use super::WalletRpc;

/// A mock wallet RPC backend for testing. Returns scripted results per
/// method, in queue order, from a map populated via the builder pattern.
/// Records every call so tests can assert methods and parameters (the
/// pagination tests check the exact offset sequence this way).
pub struct MockRpc {
    responses: Mutex<HashMap<String, VecDeque<Scripted>>>,
    calls: Mutex<Vec<(String, Vec<serde_json::Value>)>>,
}

enum Scripted {
    Result(serde_json::Value),
    ServerError { code: i64, message: String },
}

impl MockRpc {
    pub fn builder() -> MockRpcBuilder {
        MockRpcBuilder {
            responses: HashMap::new(),
        }
    }

    /// All calls observed so far, in order.
    pub fn calls(&self) -> Vec<(String, Vec<serde_json::Value>)> {
        self.calls.lock().expect("mock call log lock").clone()
    }

    pub fn call_count(&self, method: &str) -> usize {
        self.calls
            .lock()
            .expect("mock call log lock")
            .iter()
            .filter(|(m, _)| m == method)
            .count()
    }
}

pub struct MockRpcBuilder {
    responses: HashMap<String, VecDeque<Scripted>>,
}

impl MockRpcBuilder {
    /// Queue a successful result for `method`.
    pub fn with_result(mut self, method: &str, value: serde_json::Value) -> Self {
        self.responses
            .entry(method.to_owned())
            .or_default()
            .push_back(Scripted::Result(value));
        self
    }

    /// Queue a daemon-reported error for `method`.
    pub fn with_server_error(mut self, method: &str, code: i64, message: &str) -> Self {
        self.responses
            .entry(method.to_owned())
            .or_default()
            .push_back(Scripted::ServerError {
                code,
                message: message.to_owned(),
            });
        self
    }

    pub fn build(self) -> MockRpc {
        MockRpc {
            responses: Mutex::new(self.responses),
            calls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl WalletRpc for MockRpc {
    async fn call(
        &self,
        method: &str,
        params: Vec<serde_json::Value>,
    ) -> Result<serde_json::Value, CoreError> {
        self.calls
            .lock()
            .expect("mock call log lock")
            .push((method.to_owned(), params));

        let scripted = self
            .responses
            .lock()
            .expect("mock response lock")
            .get_mut(method)
            .and_then(VecDeque::pop_front);

        match scripted {
            Some(Scripted::Result(value)) => Ok(value),
            Some(Scripted::ServerError { code, message }) => {
                Err(CoreError::Rpc(RpcError::ServerError { code, message }))
            }
            None => Err(CoreError::Rpc(RpcError::InvalidResponse(format!(
                "unscripted rpc call: {method}"
            )))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn scripted_results_pop_in_order() {
        let rpc = MockRpc::builder()
            .with_result("getblockcount", serde_json::json!(100))
            .with_result("getblockcount", serde_json::json!(101))
            .build();

        let first = rpc.call("getblockcount", Vec::new()).await.unwrap();
        let second = rpc.call("getblockcount", Vec::new()).await.unwrap();
        assert_eq!(first, serde_json::json!(100));
        assert_eq!(second, serde_json::json!(101));
        assert_eq!(rpc.call_count("getblockcount"), 2);
    }

    #[tokio::test]
    async fn scripted_errors_carry_code_and_message() {
        let rpc = MockRpc::builder()
            .with_server_error("walletlock", -13, "wallet already locked")
            .build();

        let err = rpc.call("walletlock", Vec::new()).await.unwrap_err();
        assert!(matches!(
            err,
            CoreError::Rpc(RpcError::ServerError { code: -13, .. })
        ));
    }

    #[tokio::test]
    async fn unscripted_calls_fail_loudly() {
        let rpc = MockRpc::builder().build();
        let err = rpc.call("getinfo", Vec::new()).await.unwrap_err();
        assert!(err.to_string().contains("unscripted rpc call"));
    }
}

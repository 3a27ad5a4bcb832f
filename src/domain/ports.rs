use crate::error::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;

/// Leaf element names and their text values from a gateway response.
pub type Fields = BTreeMap<String, String>;

/// Ordered request parameters; the SOAP service expects them in declaration order.
pub type Params = Vec<(String, String)>;

/// Flattened response of a single gateway action.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ApiResponse {
    action: String,
    fields: Fields,
}

impl ApiResponse {
    pub fn new(action: impl Into<String>, fields: Fields) -> Self {
        Self {
            action: action.into(),
            fields,
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Whether the gateway reported `<action>Result` as `true`.
    pub fn success(&self) -> bool {
        self.field(&format!("{}Result", self.action))
            .is_some_and(|result| result.trim().eq_ignore_ascii_case("true"))
    }

    /// Gateway-specific response code, when reported.
    pub fn epay_response(&self) -> Option<i32> {
        self.field("epayresponse")?.trim().parse().ok()
    }
}

/// Remote access to the payment gateway.
#[async_trait]
pub trait Api: Send + Sync {
    async fn request(&self, endpoint: &str, action: &str, params: Params) -> Result<ApiResponse>;
}

pub type ApiBox = Box<dyn Api>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_reads_action_result() {
        let ok = ApiResponse::new("capture", Fields::new()).with_field("captureResult", "true");
        assert!(ok.success());

        let declined =
            ApiResponse::new("capture", Fields::new()).with_field("captureResult", "false");
        assert!(!declined.success());

        let other_action =
            ApiResponse::new("capture", Fields::new()).with_field("creditResult", "true");
        assert!(!other_action.success());
    }

    #[test]
    fn test_epay_response_code() {
        let response =
            ApiResponse::new("gettransaction", Fields::new()).with_field("epayresponse", "-1008");
        assert_eq!(response.epay_response(), Some(-1008));
        assert_eq!(ApiResponse::default().epay_response(), None);
    }
}

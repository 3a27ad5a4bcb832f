use crate::domain::ports::{Api, ApiResponse, Fields, Params};
use crate::error::{EpayError, Result};
use async_trait::async_trait;
use quick_xml::Reader;
use quick_xml::escape::escape;
use quick_xml::events::Event;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;
use tracing::debug;

/// XML namespace of the payment service actions.
pub const PAYMENT_NAMESPACE: &str = "https://ssl.ditonlinebetalingssystem.dk/remote/payment";

// Subtrees whose leaves would clash with transaction fields.
const IGNORED_SUBTREES: &[&str] = &["history"];

/// Merchant credentials sent along with every request.
#[derive(Debug, Clone, PartialEq)]
pub struct Credentials {
    pub merchant_number: String,
    pub password: Option<String>,
}

/// [`Api`] implementation speaking SOAP 1.1 over HTTP.
#[derive(Clone)]
pub struct SoapApi {
    client: Client,
    credentials: Credentials,
}

impl SoapApi {
    /// Creates a client with a request timeout.
    pub fn new(credentials: Credentials, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            credentials,
        })
    }

    /// Builds the full parameter list: merchant number first, then the action's
    /// own parameters, then the response code placeholder and password.
    fn full_params(&self, params: Params) -> Params {
        let mut full = Vec::with_capacity(params.len() + 3);
        full.push((
            "merchantnumber".to_string(),
            self.credentials.merchant_number.clone(),
        ));
        full.extend(params);
        full.push(("epayresponse".to_string(), "-1".to_string()));
        if let Some(password) = &self.credentials.password {
            full.push(("pwd".to_string(), password.clone()));
        }
        full
    }
}

pub fn envelope(action: &str, params: &Params) -> String {
    let body: String = params
        .iter()
        .map(|(name, value)| format!("<{name}>{}</{name}>", escape(value.as_str())))
        .collect();

    format!(
        concat!(
            r#"<?xml version="1.0" encoding="utf-8"?>"#,
            r#"<soap:Envelope xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" "#,
            r#"xmlns:xsd="http://www.w3.org/2001/XMLSchema" "#,
            r#"xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/">"#,
            r#"<soap:Body><{action} xmlns="{namespace}">{body}</{action}></soap:Body>"#,
            r#"</soap:Envelope>"#
        ),
        action = action,
        namespace = PAYMENT_NAMESPACE,
        body = body,
    )
}

/// Flattens a SOAP response into its leaf elements, keyed by local name.
///
/// Empty elements are left out, so a missing value and `<x />` read the same.
pub fn parse_fields(xml: &str) -> Result<Fields> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut fields = Fields::new();
    let mut path: Vec<String> = Vec::new();
    let mut text = String::new();

    loop {
        match reader.read_event()? {
            Event::Start(element) => {
                let name = String::from_utf8_lossy(element.local_name().as_ref()).into_owned();
                path.push(name);
                text.clear();
            }
            // A leaf may arrive in several chunks around comments and CDATA sections.
            Event::Text(content) => text.push_str(&content.unescape()?),
            Event::CData(content) => {
                text.push_str(&String::from_utf8_lossy(&content.into_inner()));
            }
            Event::End(_) => {
                let Some(name) = path.pop() else {
                    continue;
                };
                let ignored = path
                    .iter()
                    .chain(std::iter::once(&name))
                    .any(|segment| IGNORED_SUBTREES.contains(&segment.as_str()));
                if !text.is_empty() && !ignored {
                    fields.insert(name, std::mem::take(&mut text));
                }
                text.clear();
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(fields)
}

#[async_trait]
impl Api for SoapApi {
    async fn request(&self, endpoint: &str, action: &str, params: Params) -> Result<ApiResponse> {
        let body = envelope(action, &self.full_params(params));

        let response = self
            .client
            .post(endpoint)
            .header(CONTENT_TYPE, "text/xml; charset=utf-8")
            .header("SOAPAction", format!("\"{PAYMENT_NAMESPACE}/{action}\""))
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        debug!(action, status = status.as_u16(), "payment gateway responded");

        let fields = match parse_fields(&text) {
            Ok(fields) => fields,
            Err(_) if !status.is_success() => {
                return Err(EpayError::UnexpectedStatus(status.as_u16()));
            }
            Err(e) => return Err(e),
        };

        if let Some(fault) = fields.get("faultstring") {
            return Err(EpayError::SoapFault(fault.clone()));
        }
        if !status.is_success() {
            return Err(EpayError::UnexpectedStatus(status.as_u16()));
        }

        Ok(ApiResponse::new(action, fields))
    }
}

//! Low-level SOAP protocol implementation for UPnP/Sonos communication.
//!
//! Builds the SOAP envelope, performs the HTTP POST and turns SOAP faults
//! into errors. High-level commands live in `device.rs`.

use reqwest::Client;
use tracing::debug;

use crate::error::{SoapError, SoapResult};
use crate::services::SonosService;
use crate::xml::{escape_xml, extract_xml_text};

/// Sends a SOAP request to a Sonos speaker.
///
/// `base_url` is `http://{ip}:{port}`. `args` are emitted in order.
pub async fn send_soap_request(
    client: &Client,
    base_url: &str,
    service: SonosService,
    action: &str,
    args: &[(&str, &str)],
) -> SoapResult<String> {
    let url = format!("{base_url}{}", service.control_path());
    let body = build_envelope(service, action, args);

    debug!("[SOAP] {action} -> {url} ({} bytes)", body.len());

    let res = client
        .post(&url)
        .header("Content-Type", "text/xml; charset=\"utf-8\"")
        .header("SOAPAction", format!("\"{}#{}\"", service.urn(), action))
        .body(body)
        .send()
        .await?;

    let status = res.status();
    let response_text = res.text().await?;

    // SOAP faults usually arrive with a 500 status, so check them first.
    if response_text.contains(":Fault>") {
        return Err(SoapError::Fault(describe_fault(&response_text)));
    }

    if !status.is_success() {
        return Err(SoapError::HttpStatus(status.as_u16(), response_text));
    }

    Ok(response_text)
}

/// Envelope must be a single line: Sonos rejects whitespace before the root element.
pub(crate) fn build_envelope(service: SonosService, action: &str, args: &[(&str, &str)]) -> String {
    let mut body = format!(
        r#"<?xml version="1.0" encoding="utf-8"?><s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/" s:encodingStyle="http://schemas.xmlsoap.org/soap/encoding/"><s:Body><u:{} xmlns:u="{}">"#,
        action,
        service.urn()
    );
    for (k, v) in args {
        body.push_str(&format!("<{k}>{}</{k}>", escape_xml(v)));
    }
    body.push_str(&format!("</u:{action}></s:Body></s:Envelope>"));
    body
}

/// `faultstring` plus the UPnP `errorCode`, e.g. `UPnPError (errorCode 701)`.
fn describe_fault(xml: &str) -> String {
    let fault = extract_xml_text(xml, "faultstring").unwrap_or_else(|| "Unknown SOAP fault".into());
    match extract_xml_text(xml, "errorCode") {
        Some(code) => format!("{fault} (errorCode {code})"),
        None => fault,
    }
}

/// Builder for SOAP requests.
///
/// ```ignore
/// let response = SoapRequestBuilder::new(&client, "http://192.168.1.20:1400")
///     .service(SonosService::AVTransport)
///     .action("Play")
///     .instance_id()
///     .arg("Speed", "1")
///     .send()
///     .await?;
/// ```
pub struct SoapRequestBuilder<'a> {
    client: &'a Client,
    base_url: &'a str,
    service: Option<SonosService>,
    action: Option<&'a str>,
    args: Vec<(&'a str, String)>,
}

impl<'a> SoapRequestBuilder<'a> {
    pub fn new(client: &'a Client, base_url: &'a str) -> Self {
        Self {
            client,
            base_url,
            service: None,
            action: None,
            args: Vec::new(),
        }
    }

    pub fn service(mut self, service: SonosService) -> Self {
        self.service = Some(service);
        self
    }

    pub fn action(mut self, action: &'a str) -> Self {
        self.action = Some(action);
        self
    }

    /// Adds an argument; arguments keep insertion order.
    pub fn arg(mut self, key: &'a str, value: impl Into<String>) -> Self {
        self.args.push((key, value.into()));
        self
    }

    /// Adds the standard `InstanceID=0` argument used by most Sonos actions.
    pub fn instance_id(self) -> Self {
        self.arg("InstanceID", "0")
    }

    pub async fn send(self) -> SoapResult<String> {
        let service = self
            .service
            .ok_or_else(|| SoapError::Fault("SoapRequestBuilder: service not set".into()))?;
        let action = self
            .action
            .ok_or_else(|| SoapError::Fault("SoapRequestBuilder: action not set".into()))?;

        let args: Vec<(&str, &str)> = self.args.iter().map(|(k, v)| (*k, v.as_str())).collect();
        send_soap_request(self.client, self.base_url, service, action, &args).await
    }

    #[cfg(test)]
    pub fn into_parts(self) -> Option<(SonosService, &'a str, Vec<(&'a str, String)>)> {
        Some((self.service?, self.action?, self.args))
    }
}

// https://github.com/hyperium/hyper/blob/master/examples/client.rs
// https://github.com/rustls/tokio-rustls/blob/main/examples/client.rs

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use guest_rsvp_model::{GuestResponse, GuestSubmission};
use http::uri::Scheme;
use http::{header, Method, Request, StatusCode, Uri};
use http_body_util::{BodyExt as _, Full};
use hyper::rt::{Read, Write};
use hyper_util::rt::TokioIo;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tokio::net::TcpStream;
use tokio_rustls::rustls::pki_types::ServerName;
use tokio_rustls::rustls::{ClientConfig, RootCertStore};
use tokio_rustls::TlsConnector;
use tracing::{debug, warn};

use crate::error::ClientError;

pub const GUESTS_PATH: &str = "/api/guests";

/// The two calls the client makes against the storage API.
#[async_trait]
pub trait GuestApi: Send + Sync {
    async fn create(&self, submission: &GuestSubmission) -> Result<GuestResponse, ClientError>;

    async fn list(&self) -> Result<Vec<GuestResponse>, ClientError>;
}

/// One HTTP/1 connection per call, no retries, no timeouts. `https` URLs are
/// spoken over TLS verified against the webpki roots.
#[derive(Clone)]
pub struct HttpGuestApi {
    guests_uri: Uri,
    tls: Option<TlsConnector>,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

fn tls_connector() -> TlsConnector {
    let mut root_cert_store = RootCertStore::empty();
    root_cert_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
    let config = ClientConfig::builder()
        .with_root_certificates(root_cert_store)
        .with_no_client_auth();
    TlsConnector::from(Arc::new(config))
}

async fn exchange<I>(io: I, request: Request<Full<Bytes>>) -> Result<(StatusCode, Bytes), ClientError>
where
    I: Read + Write + Unpin + Send + 'static,
{
    let (mut sender, conn) = hyper::client::conn::http1::handshake(io).await?;
    tokio::task::spawn(async move {
        if let Err(err) = conn.await {
            warn!("connection to API failed: {err}");
        }
    });

    let response = sender.send_request(request).await?;
    let status = response.status();
    let bytes = response.into_body().collect().await?.to_bytes();
    Ok((status, bytes))
}

impl HttpGuestApi {
    pub fn new(api_base_url: &str) -> Result<Self, ClientError> {
        let guests_uri: Uri = format!("{}{GUESTS_PATH}", api_base_url.trim_end_matches('/')).parse()?;
        if guests_uri.host().is_none() {
            return Err(ClientError::MissingHost(api_base_url.to_owned()));
        }
        let tls = match guests_uri.scheme() {
            Some(scheme) if *scheme == Scheme::HTTP => None,
            Some(scheme) if *scheme == Scheme::HTTPS => Some(tls_connector()),
            _ => return Err(ClientError::UnsupportedScheme(api_base_url.to_owned())),
        };
        Ok(Self { guests_uri, tls })
    }

    #[must_use]
    pub const fn guests_uri(&self) -> &Uri {
        &self.guests_uri
    }

    #[must_use]
    pub const fn uses_tls(&self) -> bool {
        self.tls.is_some()
    }

    #[must_use]
    pub fn port(&self) -> u16 {
        self.guests_uri
            .port_u16()
            .unwrap_or(if self.uses_tls() { 443 } else { 80 })
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        body: Bytes,
    ) -> Result<T, ClientError> {
        let url = &self.guests_uri;
        let host = url
            .host()
            .ok_or_else(|| ClientError::MissingHost(url.to_string()))?;
        let addr = format!("{host}:{}", self.port());

        let authority = url
            .authority()
            .map_or_else(|| addr.clone(), ToString::to_string);

        let request = Request::builder()
            .method(method.clone())
            .uri(url.path())
            .header(header::HOST, authority)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ACCEPT, "application/json")
            .body(Full::new(body))?;

        debug!(%method, %url, "calling API");
        let stream = TcpStream::connect(&addr).await?;
        let (status, bytes) = match &self.tls {
            None => exchange(TokioIo::new(stream), request).await?,
            Some(connector) => {
                let domain = ServerName::try_from(host.to_owned())
                    .map_err(|_| ClientError::ServerName(host.to_owned()))?;
                let stream = connector.connect(domain, stream).await?;
                exchange(TokioIo::new(stream), request).await?
            }
        };

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorBody>(&bytes)
                .map_or_else(|_| String::from_utf8_lossy(&bytes).into_owned(), |body| body.error);
            return Err(ClientError::Status { status, message });
        }
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl GuestApi for HttpGuestApi {
    async fn create(&self, submission: &GuestSubmission) -> Result<GuestResponse, ClientError> {
        let body = serde_json::to_vec(submission)?;
        self.send(Method::POST, Bytes::from(body)).await
    }

    async fn list(&self) -> Result<Vec<GuestResponse>, ClientError> {
        self.send(Method::GET, Bytes::new()).await
    }
}

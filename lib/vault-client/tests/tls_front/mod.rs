// lib/vault-client/tests/tls_front/mod.rs
//
// HTTPS listener that terminates TLS with a fixture certificate and relays the
// decrypted stream to a wiremock server.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use rustls::RootCertStore;
use rustls::crypto::ring::default_provider;
use rustls::pki_types::{CertificateDer, PrivateKeyDer};
use rustls::server::WebPkiClientVerifier;
use tokio::net::{TcpListener, TcpStream};
use tokio_rustls::TlsAcceptor;
use wiremock::MockServer;

pub const CA_CERT: &[u8] = include_bytes!("../fixtures/ca.pem");
pub const SERVER_CERT: &[u8] = include_bytes!("../fixtures/server.pem");
pub const SERVER_KEY: &[u8] = include_bytes!("../fixtures/server.key");
pub const FOREIGN_SERVER_CERT: &[u8] = include_bytes!("../fixtures/foreign-server.pem");
pub const FOREIGN_SERVER_KEY: &[u8] = include_bytes!("../fixtures/foreign-server.key");

fn load_certs(mut pem: &[u8]) -> Vec<CertificateDer<'static>> {
    rustls_pemfile::certs(&mut pem)
        .collect::<Result<Vec<_>, _>>()
        .unwrap()
}

fn load_key(mut pem: &[u8]) -> PrivateKeyDer<'static> {
    rustls_pemfile::private_key(&mut pem).unwrap().unwrap()
}

pub struct TlsFront {
    addr: SocketAddr,
    handshakes: Arc<AtomicUsize>,
    client_certificates: Arc<AtomicUsize>,
}

impl TlsFront {
    /// Serves `upstream` with a certificate issued by the fixture CA.
    pub async fn start(upstream: &MockServer) -> Self {
        Self::with_certificate(upstream, SERVER_CERT, SERVER_KEY).await
    }

    /// Client certificates are requested but optional; those offered must
    /// chain to the fixture CA.
    pub async fn with_certificate(upstream: &MockServer, cert: &[u8], key: &[u8]) -> Self {
        let provider = Arc::new(default_provider());

        let mut roots = RootCertStore::empty();
        for ca in load_certs(CA_CERT) {
            roots.add(ca).unwrap();
        }
        let verifier = WebPkiClientVerifier::builder_with_provider(Arc::new(roots), provider.clone())
            .allow_unauthenticated()
            .build()
            .unwrap();

        let config = rustls::ServerConfig::builder_with_provider(provider)
            .with_safe_default_protocol_versions()
            .unwrap()
            .with_client_cert_verifier(verifier)
            .with_single_cert(load_certs(cert), load_key(key))
            .unwrap();
        let acceptor = TlsAcceptor::from(Arc::new(config));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let upstream_addr = *upstream.address();
        let handshakes = Arc::new(AtomicUsize::new(0));
        let client_certificates = Arc::new(AtomicUsize::new(0));

        let (hs, cc) = (Arc::clone(&handshakes), Arc::clone(&client_certificates));
        tokio::spawn(async move {
            while let Ok((tcp, _)) = listener.accept().await {
                let acceptor = acceptor.clone();
                let (hs, cc) = (Arc::clone(&hs), Arc::clone(&cc));

                tokio::spawn(async move {
                    let Ok(mut tls) = acceptor.accept(tcp).await else {
                        return;
                    };
                    hs.fetch_add(1, Ordering::SeqCst);
                    if tls
                        .get_ref()
                        .1
                        .peer_certificates()
                        .is_some_and(|certs| !certs.is_empty())
                    {
                        cc.fetch_add(1, Ordering::SeqCst);
                    }

                    let Ok(mut plain) = TcpStream::connect(upstream_addr).await else {
                        return;
                    };
                    let _ = tokio::io::copy_bidirectional(&mut tls, &mut plain).await;
                });
            }
        });

        Self {
            addr,
            handshakes,
            client_certificates,
        }
    }

    pub fn uri(&self) -> String {
        format!("https://{}", self.addr)
    }

    pub fn address(&self) -> SocketAddr {
        self.addr
    }

    /// Completed TLS handshakes.
    pub fn handshakes(&self) -> usize {
        self.handshakes.load(Ordering::SeqCst)
    }

    /// Handshakes in which the client presented a certificate.
    pub fn client_certificates(&self) -> usize {
        self.client_certificates.load(Ordering::SeqCst)
    }
}

//! Network endpoints for client tests.

use std::net::TcpListener;

/// An `http://127.0.0.1:<port>` endpoint where nothing listens.
///
/// The port comes from a listener bound to an ephemeral port and dropped
/// before returning.
pub fn closed_endpoint() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind an ephemeral port");
    let port = listener.local_addr().expect("local address").port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

//! Listen — address that binds every local interface, probed once per process.

use std::sync::OnceLock;

use socket2::{Domain, Socket, Type};

const IPV6_ANY: &str = "[::]";
const IPV4_ANY: &str = "0.0.0.0";

static LISTEN_ALL_ADDRESS: OnceLock<&'static str> = OnceLock::new();

/// Address for a listener that should accept on every local interface.
///
/// `[::]` when the host can open an IPv6 stream socket, `0.0.0.0` otherwise.
/// The probe runs at most once; concurrent first callers block until it
/// completes and all observe the same value.
pub fn listen_on_all_local_interfaces_address() -> &'static str {
    LISTEN_ALL_ADDRESS.get_or_init(|| {
        let address = probe_listen_all_address();
        tracing::debug!("Listen-all address resolved to {}", address);
        address
    })
}

fn probe_listen_all_address() -> &'static str {
    match Socket::new(Domain::IPV6, Type::STREAM, None) {
        // Dropping the socket closes it.
        Ok(_socket) => IPV6_ANY,
        Err(e) => {
            tracing::debug!("IPv6 socket unavailable ({}), falling back to IPv4", e);
            IPV4_ANY
        }
    }
}

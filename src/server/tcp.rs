//! # Servidor TCP Concurrente
//! src/server/tcp.rs
//!
//! Un thread acepta conexiones y las entrega a un pool fijo de workers.
//! Si la cola del pool está llena, la conexión se responde con 503 desde el
//! mismo thread que acepta y se cierra.
//!
//! Si el puerto configurado está ocupado se prueba el siguiente, y así
//! sucesivamente; el puerto efectivo se obtiene con [`Server::local_addr`].

use super::connection::{self, ConnectionSettings};
use super::pool::{SubmitError, WorkerPool};
use crate::config::Config;
use crate::error::ServerError;
use crate::router::Router;
use std::io::{self, ErrorKind};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Pausa tras un `accept` fallido
const ACCEPT_BACKOFF: Duration = Duration::from_millis(50);

/// Servidor HTTP con tabla de rutas sellada
pub struct Server {
    listener: TcpListener,
    settings: ConnectionSettings,
    pool: WorkerPool<TcpStream>,
}

impl Server {
    /// Valida la configuración, hace bind y arranca los workers.
    ///
    /// A partir de aquí el router es de solo lectura.
    pub fn bind(config: Config, router: Router) -> Result<Self, ServerError> {
        config.validate()?;

        let listener = bind_with_retry(&config)?;
        let local_addr = listener.local_addr()?;
        tracing::info!(
            address = %local_addr,
            routes = router.len(),
            "Web server is running on http://localhost:{}",
            local_addr.port()
        );

        let settings = ConnectionSettings::from_config(&config);
        let router = Arc::new(router);

        let pool = WorkerPool::new(
            "conn",
            config.workers,
            config.queue_capacity,
            move |stream: TcpStream| serve(stream, &router, &settings),
        )?;

        Ok(Self {
            listener,
            settings,
            pool,
        })
    }

    /// Dirección efectiva (el puerto puede no ser el configurado)
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Loop de aceptación. No retorna mientras el pool siga vivo.
    pub fn run(&self) -> Result<(), ServerError> {
        tracing::info!(workers = self.pool.size(), "Accepting connections");

        let mut incoming = self.listener.incoming();
        while let Some(stream) = next_accepted(&mut incoming) {
            match self.pool.try_submit(stream) {
                Ok(()) => {}
                Err(SubmitError::Full(stream)) => {
                    tracing::warn!(
                        peer = %peer_of(&stream),
                        "Worker queue full, rejecting connection"
                    );
                    if let Err(e) = connection::reject_overloaded(stream, &self.settings) {
                        tracing::debug!(error = %e, "Failed to send 503");
                    }
                }
                Err(SubmitError::Closed(_)) => {
                    tracing::error!("Worker pool closed, stopping accept loop");
                    break;
                }
            }
        }

        Ok(())
    }
}

/// Siguiente conexión aceptada. Los `accept` fallidos se loguean y se
/// reintenta tras `ACCEPT_BACKOFF`; errores como EMFILE se repiten.
fn next_accepted<S>(incoming: &mut impl Iterator<Item = io::Result<S>>) -> Option<S> {
    for result in incoming {
        match result {
            Ok(stream) => return Some(stream),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to accept connection");
                thread::sleep(ACCEPT_BACKOFF);
            }
        }
    }

    None
}

/// Job de cada worker: atiende la conexión dentro de su propio span
fn serve(stream: TcpStream, router: &Router, settings: &ConnectionSettings) {
    let span = tracing::info_span!("conn", peer = %peer_of(&stream));
    let _guard = span.enter();

    match connection::handle(stream, router, settings) {
        Ok(()) => {}
        Err(e) if e.is_timeout() => tracing::warn!("Read timed out, closing connection"),
        Err(e) => tracing::warn!(error = %e, "Connection error"),
    }
}

fn peer_of(stream: &TcpStream) -> String {
    stream
        .peer_addr()
        .map(|addr| addr.to_string())
        .unwrap_or_else(|_| "unknown".to_string())
}

/// Bind en `host:port`, y si está ocupado en `port + 1`, `port + 2`, ...
fn bind_with_retry(config: &Config) -> Result<TcpListener, ServerError> {
    let mut port = config.port;

    loop {
        let address = config.address_with_port(port);

        match TcpListener::bind(&address) {
            Ok(listener) => return Ok(listener),
            Err(e) if e.kind() == ErrorKind::AddrInUse => {
                tracing::warn!(port, "Port {} is already in use, try another one", port);
                port = port
                    .checked_add(1)
                    .ok_or(ServerError::PortsExhausted { first: config.port })?;
            }
            Err(source) => return Err(ServerError::Bind { address, source }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::Request;
    use std::io::{Read, Write};

    fn local_config(port: u16) -> Config {
        Config {
            host: "127.0.0.1".to_string(),
            port,
            workers: 2,
            queue_capacity: 16,
            ..Config::default()
        }
    }

    fn get(addr: SocketAddr, path: &str) -> String {
        let mut stream = TcpStream::connect(addr).unwrap();
        stream.set_read_timeout(Some(Duration::from_secs(5))).unwrap();
        write!(stream, "GET {} HTTP/1.1\r\n\r\n", path).unwrap();

        let mut response = String::new();
        stream.read_to_string(&mut response).unwrap();
        response
    }

    #[test]
    fn test_bind_retries_next_port() {
        let occupied = TcpListener::bind("127.0.0.1:0").unwrap();
        let taken = occupied.local_addr().unwrap().port();

        // Puerto ocupado justo al final del rango: no hay siguiente
        if taken == u16::MAX {
            return;
        }

        let listener = bind_with_retry(&local_config(taken)).unwrap();
        let port = listener.local_addr().unwrap().port();

        assert!(port > taken, "expected a port after {}, got {}", taken, port);
    }

    #[test]
    fn test_accept_errors_back_off() {
        let mut incoming = vec![
            Err(io::Error::new(ErrorKind::Other, "too many open files")),
            Err(io::Error::new(ErrorKind::Other, "too many open files")),
            Ok(7),
        ]
        .into_iter();

        let started = std::time::Instant::now();
        assert_eq!(next_accepted(&mut incoming), Some(7));
        assert!(started.elapsed() >= ACCEPT_BACKOFF * 2);
        assert_eq!(next_accepted(&mut incoming), None);
    }

    #[test]
    fn test_bind_rejects_invalid_config() {
        let mut config = local_config(0);
        config.workers = 0;

        assert!(matches!(
            Server::bind(config, Router::new()),
            Err(ServerError::Config(_))
        ));
    }

    #[test]
    fn test_run_serves_concurrent_clients() {
        let mut router = Router::new();
        router.get("/hello", |_req: &Request| "Hello");

        let server = Server::bind(local_config(0), router).unwrap();
        let addr = server.local_addr().unwrap();
        thread::spawn(move || server.run());

        let clients: Vec<_> = (0..8)
            .map(|_| thread::spawn(move || get(addr, "/hello")))
            .collect();

        for client in clients {
            assert!(client.join().unwrap().ends_with("\r\n\r\nHello\r\n"));
        }
    }
}

use std::net::SocketAddr;
use std::sync::OnceLock;
use tracing::error;

/// Installs the test subscriber once and spins up a fresh mock timeline
/// service on an ephemeral port. Each test gets its own instance, so
/// they never share state.
#[allow(unused)]
pub async fn init() -> SocketAddr {
    static ONCE_LOCK: OnceLock<()> = OnceLock::new();

    ONCE_LOCK.get_or_init(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            default_panic(info);
            error!("Panic occurred: {info:?}");
        }));

        tracing_subscriber::fmt()
            .with_env_filter("loadsweep=debug,mock_service=debug")
            .init();
    });

    mock_service::spawn().await
}

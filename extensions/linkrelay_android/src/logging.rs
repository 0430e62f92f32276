//! Device logging setup

/// Route `log` and `tracing` output to logcat under `tag`.
#[cfg(target_os = "android")]
pub fn init_logging(tag: &str) {
    use tracing_subscriber::layer::SubscriberExt;

    android_logger::init_once(
        android_logger::Config::default()
            .with_max_level(log::LevelFilter::Debug)
            .with_tag(tag),
    );

    match tracing_android::layer(tag) {
        Ok(layer) => {
            let subscriber = tracing_subscriber::registry().with(layer);
            // Already installed on activity re-creation
            let _ = tracing::subscriber::set_global_default(subscriber);
        }
        Err(err) => log::warn!("tracing-android layer unavailable: {err}"),
    }
}

/// Host builds leave subscriber installation to the embedding binary.
#[cfg(not(target_os = "android"))]
pub fn init_logging(_tag: &str) {}
